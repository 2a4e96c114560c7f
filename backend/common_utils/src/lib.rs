//! Common utilities for the WalletOne connector service

pub mod consts;
pub mod crypto;
pub mod errors;
pub mod types;

pub use errors::{CustomResult, ParsingError};
pub use types::StringMajorUnit;
