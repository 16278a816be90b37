pub mod price_cache;
pub mod price_errors;
pub mod price_model;
pub mod price_traits;

pub use price_cache::{PriceCache, PriceKey};
pub use price_errors::PriceError;
pub use price_model::PriceQuote;
pub use price_traits::PriceOracleTrait;
