use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("No USD rate available for {0} '{1}'")]
    RateUnavailable(String, String),

    #[error("Price provider failed: {0}")]
    Provider(String),
}
