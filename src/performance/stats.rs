use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

const TRADING_DAYS_PER_YEAR: u32 = 252;
const SQRT_TRADING_DAYS_APPROX: Decimal = dec!(15.874507866); // sqrt(252)

/// Annualized standard deviation of daily sub-period returns.
pub fn calculate_volatility(daily_returns: &[Decimal]) -> Decimal {
    if daily_returns.len() < 2 {
        return Decimal::ZERO;
    }

    let count = Decimal::from(daily_returns.len());
    let sum: Decimal = daily_returns.iter().sum();
    let mean = sum / count;

    let sum_squared_diff: Decimal = daily_returns
        .iter()
        .map(|&r| {
            let diff = r - mean;
            diff * diff
        })
        .sum();

    let variance = sum_squared_diff / (count - Decimal::ONE);
    if variance.is_sign_negative() {
        return Decimal::ZERO;
    }

    let daily_volatility = variance.sqrt().unwrap_or(Decimal::ZERO);

    let annualization_factor = Decimal::from(TRADING_DAYS_PER_YEAR)
        .sqrt()
        .unwrap_or(SQRT_TRADING_DAYS_APPROX);

    daily_volatility * annualization_factor
}

/// Largest peak-to-trough decline of the compounded return curve.
pub fn calculate_max_drawdown(daily_returns: &[Decimal]) -> Decimal {
    if daily_returns.is_empty() {
        return Decimal::ZERO;
    }

    let mut cumulative_value = Decimal::ONE;
    let mut peak_value = Decimal::ONE;
    let mut max_drawdown = Decimal::ZERO;

    for &daily_return in daily_returns {
        cumulative_value *= Decimal::ONE + daily_return;
        peak_value = peak_value.max(cumulative_value);
        if peak_value.is_zero() {
            max_drawdown = max_drawdown.max(Decimal::ONE);
        } else {
            let drawdown = (peak_value - cumulative_value) / peak_value;
            max_drawdown = max_drawdown.max(drawdown);
        }
    }

    max_drawdown.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_returns_have_zero_volatility() {
        let returns = vec![dec!(0.01); 10];
        assert_eq!(calculate_volatility(&returns), Decimal::ZERO);
    }

    #[test]
    fn volatility_needs_two_points() {
        assert_eq!(calculate_volatility(&[dec!(0.05)]), Decimal::ZERO);
    }

    #[test]
    fn drawdown_captures_peak_to_trough() {
        // +10%, -20%, +5%: trough is 0.88 of the 1.10 peak.
        let returns = vec![dec!(0.10), dec!(-0.20), dec!(0.05)];
        let dd = calculate_max_drawdown(&returns);
        assert!((dd - dec!(0.20)).abs() < dec!(0.000001));
    }

    #[test]
    fn monotonic_growth_has_zero_drawdown() {
        let returns = vec![dec!(0.01), dec!(0.02), dec!(0.03)];
        assert_eq!(calculate_max_drawdown(&returns), Decimal::ZERO);
    }
}
