//! Starknet-specific serialization utilities.
mod decimal;
mod newtype;

pub use decimal::FeltAsDecimalStr;
pub use newtype::NewType;
