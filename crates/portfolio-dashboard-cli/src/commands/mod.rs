pub mod allocation;
pub mod chart;
