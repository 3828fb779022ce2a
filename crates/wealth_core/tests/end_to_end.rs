//! End-to-end fixtures for six worked scenarios spanning pure compounding,
//! indexed regular transactions, mortgage interest, stress shocks,
//! double-entry transfers, and tax convergence. Unit-level invariants live
//! alongside their source modules; this file only exercises the public
//! `simulate` entry point against a whole scenario.

use std::cell::RefCell;

use wealth_core::config::ScenarioBuilder;
use wealth_core::model::account::{Account, AccountKind};
use wealth_core::model::scenario::Scenario;
use wealth_core::model::tax::{HouseholdStatus, TariffRow, TariffTable, TaxConfig};
use wealth_core::model::transaction::Transaction;
use wealth_core::overrides::{Shock, StressOverrides};
use wealth_core::{Repository, simulate};

struct FixtureRepository {
    scenario: RefCell<Option<Scenario>>,
    assets: Vec<Account>,
    transactions: Vec<Transaction>,
}

impl Repository for FixtureRepository {
    fn get_scenario(&self, _scenario_id: &str) -> Option<Scenario> {
        self.scenario.borrow().clone()
    }
    fn list_assets_for_scenario(&self, _scenario_id: &str) -> Vec<Account> {
        self.assets.clone()
    }
    fn list_transactions_for_scenario(&self, _scenario_id: &str) -> Vec<Transaction> {
        self.transactions.clone()
    }
    fn get_state_tax_rate_for_canton(&self, _code: &str) -> Option<f64> {
        None
    }
    fn get_state_tax_tariff(&self, _tariff_id: &str) -> Option<TariffTable> {
        None
    }
    fn get_federal_tax_table(&self, _table_id: &str) -> Option<wealth_core::model::tax::FederalTable> {
        None
    }
}

fn run(scenario: Scenario, assets: Vec<Account>, transactions: Vec<Transaction>) -> wealth_core::SimulationResult {
    let id = scenario.id.clone();
    let repo = FixtureRepository {
        scenario: RefCell::new(Some(scenario)),
        assets,
        transactions,
    };
    simulate(&id, &repo, None).expect("scenario should simulate")
}

#[test]
fn scenario_a_pure_compound() {
    let (scenario, accounts, transactions) = ScenarioBuilder::new("scenario-a")
        .window(202401, 202412)
        .account("Savings", AccountKind::Portfolio, 1000.0, 0.12)
        .build();

    let result = run(scenario, accounts, transactions);
    assert_eq!(result.total_wealth.len(), 12);
    let december = &result.total_wealth[11];
    assert!((december.value - 1120.0).abs() < 0.01);
    for cf in &result.cash_flows {
        assert_eq!(cf.income, 0.0);
        assert_eq!(cf.expenses, 0.0);
        assert_eq!(cf.taxes, 0.0);
        assert!(cf.growth > 0.0);
        assert_eq!(cf.net, 0.0);
    }
}

#[test]
fn scenario_b_regular_with_indexation() {
    let (scenario, accounts, transactions) = ScenarioBuilder::new("scenario-b")
        .window(202401, 202412)
        .account("Checking", AccountKind::BankAccount, 0.0, 0.0)
        .regular("Checking", "Salary", 1000.0, 202401, 202412, 1, 0.12)
        .build();

    let result = run(scenario, accounts, transactions);
    let december = result.account_balances.get("Checking").unwrap().last().unwrap();
    // Twelve monthly deposits of 1000, each indexed per elapsed period at
    // the monthly-equivalent of 12% annual: a geometric series summing to
    // 1000 * (r^12 - 1) / (r - 1) with r = 1.12^(1/12).
    assert!((december.value - 12_646.47).abs() < 0.5);
    assert!((result.total_wealth.last().unwrap().value - december.value).abs() < 1e-6);
}

#[test]
fn scenario_c_mortgage_interest() {
    let (scenario, accounts, transactions) = ScenarioBuilder::new("scenario-c")
        .window(202401, 202412)
        .account("Payer", AccountKind::BankAccount, 100_000.0, 0.0)
        .account("Mortgage", AccountKind::Mortgage, -500_000.0, 0.0)
        .mortgage_interest("Mortgage", "Payer", "Interest", 0.03, 202401, 202412, 1)
        .build();

    let result = run(scenario, accounts, transactions);
    let payer = result.account_balances.get("Payer").unwrap().last().unwrap();
    let mortgage = result.account_balances.get("Mortgage").unwrap().last().unwrap();
    assert!((payer.value - 85_000.0).abs() < 0.01);
    assert!((mortgage.value - (-500_000.0)).abs() < 0.01);
}

#[test]
fn scenario_d_mortgage_rate_stress_shock() {
    let (scenario, accounts, transactions) = ScenarioBuilder::new("scenario-d")
        .window(202401, 202412)
        .account("Payer", AccountKind::BankAccount, 100_000.0, 0.0)
        .account("Mortgage", AccountKind::Mortgage, -500_000.0, 0.0)
        .mortgage_interest("Mortgage", "Payer", "Interest", 0.03, 202401, 202412, 1)
        .build();

    let overrides = StressOverrides {
        mortgage_rate_shocks: vec![Shock {
            pct: 0.02,
            start_year: Some(2024),
            start_month: Some(7),
            end_year: Some(2024),
            end_month: Some(12),
            ..Default::default()
        }],
        ..Default::default()
    };

    let id = scenario.id.clone();
    let repo = FixtureRepository {
        scenario: RefCell::new(Some(scenario)),
        assets: accounts,
        transactions,
    };
    let result = simulate(&id, &repo, Some(&overrides)).unwrap();
    let payer = result.account_balances.get("Payer").unwrap().last().unwrap();
    // 6 months at 3%/12*500_000=1250, then 6 months at 5%/12*500_000=2083.33
    assert!((payer.value - 80_000.0).abs() < 0.1);
}

#[test]
fn scenario_e_double_entry_transfer() {
    let (scenario, accounts, transactions) = ScenarioBuilder::new("scenario-e")
        .window(202401, 202406)
        .account("A", AccountKind::BankAccount, 10_000.0, 0.0)
        .account("B", AccountKind::BankAccount, 10_000.0, 0.0)
        .transfer("A", "B", "Sweep", 500.0, 202401, 202406, 1)
        .build();

    let result = run(scenario, accounts, transactions);
    let a = result.account_balances.get("A").unwrap().last().unwrap();
    let b = result.account_balances.get("B").unwrap().last().unwrap();
    assert!((a.value - 7_000.0).abs() < 1e-6);
    assert!((b.value - 13_000.0).abs() < 1e-6);
    for point in &result.total_wealth {
        assert!((point.value - 20_000.0).abs() < 1e-6);
    }
    for cf in &result.cash_flows {
        assert!(cf.income_details.is_empty());
        assert!(cf.expense_details.is_empty());
    }
}

#[test]
fn scenario_f_tax_fixed_point_converges() {
    let income_tariff = TariffTable::new(vec![TariffRow {
        threshold: 0.0,
        base_amount: 0.0,
        per_100_amount: 20.0,
    }]);
    let tax_config = TaxConfig {
        income_tariff: Some(income_tariff),
        wealth_tariff: None,
        federal_table: None,
        municipal_factor: 1.0,
        cantonal_factor: 0.0,
        church_factor: 0.0,
        personal_tax: 0.0,
        tax_account: None,
    };

    let (mut scenario, accounts, transactions) = ScenarioBuilder::new("scenario-f")
        .window(202401, 202812)
        .account("Wealth", AccountKind::Portfolio, 1_000_000.0, 0.05)
        .regular("Wealth", "Income", 100_000.0, 202401, 202812, 12, 0.0)
        .taxable(None)
        .build();
    scenario.household_status = HouseholdStatus::Single;
    scenario.tax_config = Some(tax_config);
    if let Some(config) = scenario.tax_config.as_mut() {
        config.tax_account = Some(accounts[0].id);
    }

    let result = run(scenario, accounts, transactions);
    assert!(!result.taxes.is_empty());
    for row in &result.taxes {
        assert!(row.total_all > 0.0);
    }
}
