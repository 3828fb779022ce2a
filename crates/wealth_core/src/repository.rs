//! The `Repository` port: the only channel through which the core reads
//! persisted scenario data. The core itself performs no I/O;
//! `wealth_server`'s `SqliteRepository` is the sole implementor in this
//! workspace, but the trait is defined here so the engine can be driven
//! by an in-memory fixture in tests without depending on the server
//! crate at all.

use crate::cancellation::CancellationToken;
use crate::convergence;
use crate::error::SimulationError;
use crate::model::account::Account;
use crate::model::results::SimulationResult;
use crate::model::scenario::Scenario;
use crate::model::tax::{FederalTable, TariffTable};
use crate::model::transaction::Transaction;
use crate::overrides::StressOverrides;

/// Read-only access to scenario data. All methods are synchronous: the
/// core has no opinion on how a repository reaches its backing store
/// (the server crate's implementation wraps blocking `rusqlite` calls in
/// `tokio::task::spawn_blocking` at the handler layer instead).
pub trait Repository {
    fn get_scenario(&self, scenario_id: &str) -> Option<Scenario>;
    fn list_assets_for_scenario(&self, scenario_id: &str) -> Vec<Account>;
    fn list_transactions_for_scenario(&self, scenario_id: &str) -> Vec<Transaction>;
    fn get_state_tax_rate_for_canton(&self, code: &str) -> Option<f64>;
    fn get_state_tax_tariff(&self, tariff_id: &str) -> Option<TariffTable>;
    fn get_federal_tax_table(&self, table_id: &str) -> Option<FederalTable>;
}

/// Load a scenario from `repo`, apply `overrides` (if any) to deep
/// copies of its assets/transactions, and run the tax-convergence loop
/// to produce a [`SimulationResult`].
///
/// This is the engine's single entry point; everything else in
/// `wealth_core` is a building block it assembles.
pub fn simulate(
    scenario_id: &str,
    repo: &dyn Repository,
    overrides: Option<&StressOverrides>,
) -> Result<SimulationResult, SimulationError> {
    simulate_cancellable(scenario_id, repo, overrides, &CancellationToken::new())
}

/// As [`simulate`], but observing `cancellation` at month boundaries and
/// at the top of each tax fixed-point round.
pub fn simulate_cancellable(
    scenario_id: &str,
    repo: &dyn Repository,
    overrides: Option<&StressOverrides>,
    cancellation: &CancellationToken,
) -> Result<SimulationResult, SimulationError> {
    let scenario = repo
        .get_scenario(scenario_id)
        .ok_or(SimulationError::ScenarioNotFound)?;

    let original_assets = repo.list_assets_for_scenario(scenario_id);
    if original_assets.is_empty() {
        return Err(SimulationError::NoAssets);
    }
    let original_transactions = repo.list_transactions_for_scenario(scenario_id);

    let mut accounts = original_assets.clone();
    let mut transactions = original_transactions.clone();
    let mut income_tax_rate = scenario.income_tax_rate;

    if let Some(overrides) = overrides {
        overrides.apply(
            &mut accounts,
            &mut transactions,
            &mut income_tax_rate,
            scenario.window,
        );
    }

    let mut effective_scenario = scenario;
    effective_scenario.income_tax_rate = income_tax_rate;

    convergence::run_to_convergence(
        scenario_id,
        &mut accounts,
        &transactions,
        &original_transactions,
        &effective_scenario,
        income_tax_rate,
        cancellation,
    )
}
