//! Core domain types
//!
//! These types mirror the contract's view of an item (an NFT whose extension
//! carries executable code and the tasks submitted against it). They are
//! read-only from the workers' perspective; the ledger is the system of record.

pub mod item;
pub mod metadata;
