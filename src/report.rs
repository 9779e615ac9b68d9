// Plain-text rendering of trade results for the terminal.
use crate::aggregator::{OfferSummary, TradeAnalysis, Verdict};
use crate::model::{CatalogRecord, ResolutionResult};

const RULE_WIDTH: usize = 70;

/// Rounds toward zero and groups thousands: 1234567.8 → "1,234,567".
pub fn format_thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn demand_icon(record: &CatalogRecord) -> &'static str {
    match record.demand {
        8.. => "🔥",
        0..=3 => "❄️",
        _ => "⚖️",
    }
}

pub fn render_offer(label: &str, result: &ResolutionResult<'_>, summary: &OfferSummary) -> String {
    let rule = "─".repeat(RULE_WIDTH);
    let mut msg = format!("{} ({} items)\n{}\n", label, result.len(), rule);

    if result.is_empty() {
        msg.push_str("   (no items detected)\n");
    }
    for m in result.iter() {
        let flag = if m.low_confidence { " ?" } else { "" };
        msg.push_str(&format!(
            "   {:<45} {} {:>13}{}\n",
            m.matched_name,
            demand_icon(m.record),
            format_thousands(m.record.primary_value),
            flag
        ));
    }

    msg.push_str(&format!("{}\n", rule));
    msg.push_str(&format!("   {:<50} {:>15}\n", "BASE TOTAL:", format_thousands(summary.base_total)));
    msg.push_str(&format!(
        "   {:<50} {:>15}\n",
        "DEMAND ADJUSTED:",
        format_thousands(summary.adjusted_total)
    ));
    msg
}

pub fn render_verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Fair => "⚖️  FAIR TRADE".to_string(),
        Verdict::Win { diff, percent } => {
            format!("✅ WIN (+{} | +{:.1}%)", format_thousands(*diff), percent)
        }
        Verdict::Lose { diff, percent } => {
            format!("❌ LOSE ({} | {:.1}%)", format_thousands(*diff), percent)
        }
    }
}

pub fn render_trade(analysis: &TradeAnalysis) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "{rule}\nBASE VALUE ANALYSIS\n   {}\nDEMAND ADJUSTED ANALYSIS\n   {}\n{rule}\n",
        render_verdict(&analysis.base),
        render_verdict(&analysis.adjusted),
    )
}
