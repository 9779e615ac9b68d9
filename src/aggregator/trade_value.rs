use crate::model::{CatalogRecord, ResolutionResult};

/// Differences smaller than this are called even.
pub const FAIR_MARGIN: f64 = 50.0;

/// Totals for one side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OfferSummary {
    pub item_count: usize,
    pub base_total: f64,
    pub adjusted_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Fair,
    Win { diff: f64, percent: f64 },
    Lose { diff: f64, percent: f64 },
}

impl Verdict {
    /// `diff` is what the other side offers minus what you give.
    pub fn from_totals(yours: f64, theirs: f64) -> Self {
        let diff = theirs - yours;
        let percent = if yours > 0.0 {
            diff / yours.max(1.0) * 100.0
        } else {
            0.0
        };

        if diff.abs() < FAIR_MARGIN {
            Verdict::Fair
        } else if diff > 0.0 {
            Verdict::Win { diff, percent }
        } else {
            Verdict::Lose { diff, percent }
        }
    }
}

/// Both sides of a trade compared on base and demand-adjusted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeAnalysis {
    pub yours: OfferSummary,
    pub theirs: OfferSummary,
    pub base: Verdict,
    pub adjusted: Verdict,
}

/// Trait defining the interface for valuing resolved items.
pub trait Aggregator {
    fn summarize(&self, records: &[&CatalogRecord]) -> OfferSummary;
    fn compare(&self, yours: &[&CatalogRecord], theirs: &[&CatalogRecord]) -> TradeAnalysis;
}

/// Implementation of the value aggregator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueAggregator;

impl ValueAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize_result(&self, result: &ResolutionResult<'_>) -> OfferSummary {
        self.summarize(&result.records())
    }
}

/// Low demand (1-3) loses 20%, high demand (8-10) gains 20%.
pub fn demand_multiplier(demand: u8) -> f64 {
    match demand {
        0..=3 => 0.80,
        8.. => 1.20,
        _ => 1.00,
    }
}

pub fn total_value(records: &[&CatalogRecord]) -> f64 {
    records.iter().map(|r| r.primary_value).sum()
}

pub fn demand_adjusted_value(records: &[&CatalogRecord]) -> f64 {
    records
        .iter()
        .map(|r| r.primary_value * demand_multiplier(r.demand))
        .sum()
}

impl Aggregator for ValueAggregator {
    fn summarize(&self, records: &[&CatalogRecord]) -> OfferSummary {
        OfferSummary {
            item_count: records.len(),
            base_total: total_value(records),
            adjusted_total: demand_adjusted_value(records),
        }
    }

    fn compare(&self, yours: &[&CatalogRecord], theirs: &[&CatalogRecord]) -> TradeAnalysis {
        let yours = self.summarize(yours);
        let theirs = self.summarize(theirs);
        TradeAnalysis {
            yours,
            theirs,
            base: Verdict::from_totals(yours.base_total, theirs.base_total),
            adjusted: Verdict::from_totals(yours.adjusted_total, theirs.adjusted_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn multiplier_bands() {
        assert_eq!(demand_multiplier(1), 0.80);
        assert_eq!(demand_multiplier(3), 0.80);
        assert_eq!(demand_multiplier(4), 1.00);
        assert_eq!(demand_multiplier(7), 1.00);
        assert_eq!(demand_multiplier(8), 1.20);
        assert_eq!(demand_multiplier(10), 1.20);
    }

    #[test]
    fn summary_adds_base_and_adjusted_values() {
        let karambit = CatalogRecord::new("Karambit Fade", 1000.0, 9);
        let butterfly = CatalogRecord::new("Butterfly Tiger Tooth", 900.0, 7);
        let glock = CatalogRecord::new("Glock Sand Dune", 10.0, 2);

        let summary = ValueAggregator::new().summarize(&[&karambit, &butterfly, &glock]);
        assert_eq!(summary.item_count, 3);
        assert!(approx(summary.base_total, 1910.0));
        assert!(approx(summary.adjusted_total, 1200.0 + 900.0 + 8.0));
    }

    #[test]
    fn empty_side_sums_to_zero() {
        assert_eq!(ValueAggregator::new().summarize(&[]), OfferSummary::default());
    }

    #[test]
    fn verdict_uses_fair_margin_and_percent_of_your_side() {
        assert_eq!(Verdict::from_totals(1000.0, 1049.0), Verdict::Fair);
        assert_eq!(Verdict::from_totals(1000.0, 951.0), Verdict::Fair);
        assert_eq!(
            Verdict::from_totals(1000.0, 1250.0),
            Verdict::Win { diff: 250.0, percent: 25.0 }
        );
        assert_eq!(
            Verdict::from_totals(1000.0, 500.0),
            Verdict::Lose { diff: -500.0, percent: -50.0 }
        );
        assert_eq!(
            Verdict::from_totals(0.0, 300.0),
            Verdict::Win { diff: 300.0, percent: 0.0 }
        );
    }

    #[test]
    fn compare_can_differ_between_base_and_adjusted() {
        let hot = CatalogRecord::new("AWP Dragon Lore", 1000.0, 9);
        let cold = CatalogRecord::new("M4A4 Howl", 1040.0, 2);

        let analysis = ValueAggregator::new().compare(&[&hot], &[&cold]);
        assert_eq!(analysis.base, Verdict::Fair);
        assert!(matches!(analysis.adjusted, Verdict::Lose { .. }));
    }
}
