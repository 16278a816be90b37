pub mod apr;
pub mod cashflow;
pub mod irr;
pub mod liquidation;
pub mod stats;
pub mod twrr;

pub use apr::{clamp_apr, compute_apr};
pub use cashflow::{CashFlowEntry, CashFlowExtractor};
pub use irr::solve_irr;
pub use liquidation::{apr_before_liquidation, detect_liquidation_date, is_liquidated};
pub use stats::{calculate_max_drawdown, calculate_volatility};
pub use twrr::TwrrChain;
