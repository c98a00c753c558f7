//! Repository layer
//!
//! Traits over the external collaborators a worker depends on: the ledger,
//! the compute sandbox and the completion service. The sweep logic only sees
//! these traits, so it can run against in-memory fakes in tests.
//!
//! Implementations delegate to the `beacon-client` HTTP clients without any
//! business logic and without timeouts; callers bound every call.

mod completion;
mod compute;
mod ledger;

// Re-export traits
pub use completion::CompletionEngine;
pub use compute::ComputeEngine;
pub use ledger::Ledger;

// Re-export implementations
pub use ledger::ChainLedger;
