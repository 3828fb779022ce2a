//! Stable entity handles.
//!
//! `MortgageInterest` transactions reference two accounts at once
//! (mortgage + payer). Rather than entangling transaction lifetimes with
//! account lifetimes, accounts live in a flat arena and transactions hold
//! small `Copy` handles into it.

use serde::{Deserialize, Serialize};

/// Unique identifier for an Account within a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u16);

/// Unique identifier for a Transaction within a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub u16);
