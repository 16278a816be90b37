use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for monetary values exposed by the engine.
pub const DECIMAL_PRECISION: u32 = 6;

/// USD amounts below this are treated as zero.
pub const USD_EPSILON: Decimal = dec!(0.00000001);

/// Asset unit quantities below this are treated as zero.
pub const UNIT_EPSILON: Decimal = dec!(0.000000000001);

pub const DAYS_PER_YEAR: Decimal = dec!(365);

// --- IRR solver ---
pub const IRR_MAX_ITERATIONS: usize = 100;
pub const IRR_TOLERANCE: Decimal = dec!(0.0000000001);
pub const IRR_DERIVATIVE_EPSILON: Decimal = dec!(0.000000000001);
/// Newton-Raphson iterates are clamped to this range to keep NPV defined.
pub const IRR_RATE_FLOOR: Decimal = dec!(-0.999);
pub const IRR_RATE_CEILING: Decimal = dec!(10);

// --- APR policy ---
/// Windows shorter than this report plain ROI instead of an annualized rate.
pub const APR_SHORT_PERIOD_DAYS: i64 = 30;
/// ROI below this is a near-total loss; annualizing it is misleading.
pub const APR_NEAR_TOTAL_LOSS_ROI: Decimal = dec!(-0.9);
/// A positive IRR above this while ROI is negative indicates an unstable root.
pub const APR_UNSTABLE_IRR_THRESHOLD: Decimal = dec!(0.5);
pub const APR_MIN_PERCENT: Decimal = dec!(-100);
pub const APR_MAX_PERCENT: Decimal = dec!(1000);

/// Fixed USD -> VND rate used when the price oracle cannot resolve VND.
pub const FALLBACK_USD_VND_RATE: Decimal = dec!(24000);

/// Identifier used for the cross-vault totals row in summaries.
pub const VAULTS_TOTAL_ID: &str = "TOTAL";
