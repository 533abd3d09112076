pub mod metadata;
pub mod resolver;

pub use metadata::{find_ticker_meta, TickerMeta, TickerWeightValue};
pub use resolver::{
    calculate_asset_class_totals, calculate_ticker_weights, resolve_ticker_weights,
    AllocationTargets, AssetClassTotals, EnrichedSecurity, TickerWeight, TickerWeightBreakdown,
    TickerWeights,
};
