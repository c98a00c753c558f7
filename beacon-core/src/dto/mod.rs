//! Contract messages
//!
//! Query and execute messages in the contract's JSON wire format, plus the
//! response shapes of each query.

pub mod execute;
pub mod query;
