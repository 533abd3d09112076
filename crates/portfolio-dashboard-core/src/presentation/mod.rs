pub mod chart;
pub mod format;
pub mod selection;

pub use chart::{
    build_chart_layout, nearest_point, quarter_label, quarter_ticks, tooltip_date, AxisTick,
    ChartAnnotations, ChartLayout, ChartPointView,
};
pub use format::{
    categorize_value, format_currency, format_number, format_percent, format_signed_percent,
};
pub use selection::{
    select_date, DateSelectionSink, SelectionAck, SelectionHandle, SelectionStatus,
};
