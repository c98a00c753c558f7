//! Beacon Core
//!
//! Core types shared by the Beacon workers and the ledger client.
//!
//! This crate contains:
//! - Domain types: the contract's item detail record and task descriptors
//! - DTOs: query and execute messages exchanged with the contract
//! - Fees: gas price parsing and fee calculation

pub mod domain;
pub mod dto;
pub mod fee;
pub mod ids;
