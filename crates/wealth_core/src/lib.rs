//! Household wealth projection engine
//!
//! This crate simulates a household's wealth month-by-month over a
//! user-defined horizon. Scenarios describe accounts (assets or
//! liabilities) and transactions (one-time, recurring with indexation,
//! mortgage interest tied to a live balance); the engine produces
//! per-account balance histories, an aggregate wealth history, per-month
//! cash-flow detail records, and a self-consistent per-year tax charge
//! computed by fixed-point iteration against the wealth trajectory it
//! erodes.
//!
//! The crate performs no I/O: callers provide scenario/tariff data
//! through the [`Repository`] port and receive a [`SimulationResult`]
//! (or [`error::SimulationError`]) from [`simulate`].
//!
//! # Builder DSL
//!
//! ```ignore
//! use wealth_core::config::ScenarioBuilder;
//!
//! let (scenario, assets, transactions) = ScenarioBuilder::new("Household")
//!     .window(202401, 205012)
//!     .account("Savings", AccountKind::BankAccount, 0.0, 0.0)
//!     .account("Portfolio", AccountKind::Portfolio, 0.0, 0.07)
//!     .one_time("Portfolio", "Initial deposit", 1_300_000.0, 202405)
//!     .regular("Savings", "Salary", 17_814.0, 202401, 205001, 1, 0.02)
//!     .build();
//! ```

#![warn(clippy::all)]

pub mod cancellation;
pub mod config;
pub mod convergence;
pub mod error;
pub mod model;
pub mod overrides;
pub mod repository;
pub mod schedule;
pub mod simulation;
pub mod taxes;
pub mod time;

#[cfg(test)]
mod tests;

pub use cancellation::CancellationToken;
pub use config::ScenarioBuilder;
pub use error::SimulationError;
pub use model::account::{Account, AccountKind};
pub use model::ids::{AccountId, TransactionId};
pub use model::results::{AccountSummary, SimulationResult};
pub use model::scenario::Scenario;
pub use model::tax::{TariffRow, TariffTable, TaxConfig};
pub use model::transaction::Transaction;
pub use overrides::StressOverrides;
pub use repository::{Repository, simulate};
pub use schedule::Schedule;
pub use time::{MonthKey, Window};
