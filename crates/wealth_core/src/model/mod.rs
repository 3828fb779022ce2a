pub mod account;
pub mod ids;
pub mod results;
pub mod scenario;
pub mod tax;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use ids::{AccountId, TransactionId};
pub use results::{
    AccountSummary, BalancePoint, CashFlowDetail, CashFlowRecord, GrowthDetail, SimulationResult,
    TaxDetail, YearlyTax,
};
pub use scenario::Scenario;
pub use tax::{
    BracketRow, BracketTable, FederalTable, HouseholdStatus, TariffRow, TariffTable, TaxConfig,
};
pub use transaction::{MortgageInterest, OneTime, Regular, Transaction, TransactionMeta};
