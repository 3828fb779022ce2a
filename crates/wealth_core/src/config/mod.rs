//! Fluent scenario construction.
//!
//! Hand-assembling a [`crate::model::scenario::Scenario`] plus its
//! `Vec<Account>`/`Vec<Transaction>` means juggling
//! [`crate::model::ids::AccountId`] handles yourself. [`ScenarioBuilder`]
//! defers that bookkeeping: accounts and transactions are referenced by
//! name while building, and resolved to stable ids only at
//! [`ScenarioBuilder::build`], via a pending-collection,
//! name-resolved-at-build-time pattern.

pub mod builder;

pub use builder::ScenarioBuilder;
