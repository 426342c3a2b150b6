//! common_lib/src/lib.rs

pub mod clock;
pub mod common_structs;
pub mod error;
pub mod init;
pub mod market;
pub mod market_hours;
