pub mod fx_service;
pub mod fx_traits;

pub use fx_service::FxService;
pub use fx_traits::FxServiceTrait;
