use thiserror::Error;

/// Errors raised while validating a feed configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Exchange prefix must not be empty")]
    EmptyExchange,

    /// Price tick must be finite and strictly positive.
    #[error("Invalid price tick {tick} for product '{product}'")]
    InvalidPriceTick { product: String, tick: f64 },

    #[error("Invalid base price for product '{0}'")]
    InvalidBasePrice(String),

    #[error("Invalid price adjust weight for month '{0}'")]
    InvalidPriceAdjust(String),

    #[error("Product '{0}' is listed more than once")]
    DuplicateProduct(String),

    #[error("Month '{0}' is listed more than once")]
    DuplicateMonth(String),
}

/// A specialized Result type for feed configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
