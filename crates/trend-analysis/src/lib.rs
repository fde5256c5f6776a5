use analysis_core::{TimePoint, TrendLabel, TrendVerdict};

/// Strict ratio bounds for the endpoint-delta rule. The contract is exactly
/// this rule, not a forecasting model.
const RISING_RATIO: f64 = 1.15;
const FALLING_RATIO: f64 = 0.85;

/// Label a series by comparing its last value to its first. Fewer than two
/// points is `unknown`; the reason always carries the literal endpoint
/// values for auditability.
pub fn estimate(series: &[TimePoint]) -> TrendVerdict {
    if series.len() < 2 {
        return TrendVerdict::unknown("insufficient data");
    }

    let first = series[0].value;
    let last = series[series.len() - 1].value;

    let label = if last > first * RISING_RATIO {
        TrendLabel::Rising
    } else if last < first * FALLING_RATIO {
        TrendLabel::Falling
    } else {
        TrendLabel::Flat
    };

    TrendVerdict {
        label,
        reason: format!("simple delta: from {first} to {last}"),
    }
}
