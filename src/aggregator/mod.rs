// Aggregator module: values resolved items and compares the two sides of a trade.

pub mod trade_value;

pub use trade_value::{
    Aggregator, OfferSummary, TradeAnalysis, ValueAggregator, Verdict, demand_adjusted_value,
    demand_multiplier, total_value,
};
