//! Scenario: the top-level identifier, horizon, and tax defaults a
//! simulation run is configured against.

use serde::{Deserialize, Serialize};

use crate::model::tax::{HouseholdStatus, TaxConfig};
use crate::time::Window;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub window: Window,
    pub tax_config: Option<TaxConfig>,
    /// Default inflation rate, consulted where a transaction carries no
    /// explicit inflation schedule of its own.
    pub inflation_rate: f64,
    /// Flat effective rate used by the income-tax-shock override path —
    /// not the progressive `TaxConfig` engine, a single scalar that a
    /// stress shock can nudge.
    pub income_tax_rate: f64,
    pub wealth_tax_rate: f64,
    pub household_status: HouseholdStatus,
    pub child_count: u32,
}

impl Scenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>, window: Window) -> Self {
        Scenario {
            id: id.into(),
            name: name.into(),
            window,
            tax_config: None,
            inflation_rate: 0.0,
            income_tax_rate: 0.0,
            wealth_tax_rate: 0.0,
            household_status: HouseholdStatus::Single,
            child_count: 0,
        }
    }
}
