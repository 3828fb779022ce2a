//! [`SqliteRepository`]: the sole implementor of `wealth_core::Repository`
//! in this workspace. Loaded once per run request with the already-parsed
//! domain model, so the trait methods (synchronous) just clone out of
//! memory rather than touching the database again.

use rusqlite::Connection;

use wealth_core::model::account::Account;
use wealth_core::model::scenario::Scenario;
use wealth_core::model::tax::{FederalTable, TariffTable};
use wealth_core::model::transaction::Transaction;
use wealth_core::repository::Repository;

use crate::conversion::{parse_body, scenario_body_to_domain};
use crate::error::{ApiError, ApiResult};

pub struct SqliteRepository {
    scenario: Option<Scenario>,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

impl SqliteRepository {
    /// Load and parse `scenario_id`'s stored document, if any. A missing
    /// row is not an error here — it surfaces as `get_scenario` returning
    /// `None`, which `wealth_core::simulate` turns into
    /// `SimulationError::ScenarioNotFound`.
    pub fn load(conn: &Connection, scenario_id: &str) -> ApiResult<Self> {
        let row: Option<String> = match conn.query_row(
            "SELECT body FROM scenarios WHERE id = ?1",
            [scenario_id],
            |row| row.get(0),
        ) {
            Ok(body) => Some(body),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(ApiError::from(e)),
        };

        match row {
            None => Ok(SqliteRepository {
                scenario: None,
                accounts: Vec::new(),
                transactions: Vec::new(),
            }),
            Some(raw) => {
                let body = parse_body(&raw)?;
                let (scenario, accounts, transactions) =
                    scenario_body_to_domain(scenario_id, &body);
                Ok(SqliteRepository {
                    scenario: Some(scenario),
                    accounts,
                    transactions,
                })
            }
        }
    }
}

impl Repository for SqliteRepository {
    fn get_scenario(&self, _scenario_id: &str) -> Option<Scenario> {
        self.scenario.clone()
    }

    fn list_assets_for_scenario(&self, _scenario_id: &str) -> Vec<Account> {
        self.accounts.clone()
    }

    fn list_transactions_for_scenario(&self, _scenario_id: &str) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// A scenario's tax configuration is embedded in its own stored
    /// document rather than referencing shared canton/tariff/federal rows
    /// by id — there's no separate reference table to look these up in,
    /// so these three always return `None`. Kept on the trait for a
    /// future implementor that does model shared tariff tables.
    fn get_state_tax_rate_for_canton(&self, _code: &str) -> Option<f64> {
        None
    }

    fn get_state_tax_tariff(&self, _tariff_id: &str) -> Option<TariffTable> {
        None
    }

    fn get_federal_tax_table(&self, _table_id: &str) -> Option<FederalTable> {
        None
    }
}
