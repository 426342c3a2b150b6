//! error.rs
//!
//!
//!

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum MarketError {
    /// a market code nobody knows about
    InvalidArgument(String),
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for MarketError {}
