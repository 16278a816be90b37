pub mod constants;
pub mod errors;
pub mod events;
pub mod fx;
pub mod market_data;
pub mod performance;
pub mod reports;
pub mod snapshot;
pub mod valuation;

pub use events::*;
pub use reports::*;
