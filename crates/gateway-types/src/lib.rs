//! Types exchanged with the Starknet gateway and feeder gateway.
pub mod error;
pub mod reply;
pub mod request;
