//! Stress overrides: translate shock lists into schedule entries attached
//! to accounts/transactions before simulation. Application is
//! additive — a shock nudges the base rate, it doesn't replace it — and
//! never mutates the caller's scenario data; callers apply overrides to
//! deep copies built for the run.

use crate::model::account::{Account, AccountKind};
use crate::model::transaction::Transaction;
use crate::time::Window;

/// A single time-windowed shock: add `pct` to whatever rate it targets,
/// for as long as the (optionally open-ended) window holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shock {
    pub pct: f64,
    pub start_year: Option<i32>,
    pub start_month: Option<u32>,
    pub end_year: Option<i32>,
    pub end_month: Option<u32>,
}

impl Shock {
    pub fn window(&self) -> Window {
        let start = match (self.start_year, self.start_month) {
            (Some(y), Some(m)) => Some(crate::time::month_key(y, m)),
            (Some(y), None) => Some(crate::time::month_key(y, 1)),
            _ => None,
        };
        let end = match (self.end_year, self.end_month) {
            (Some(y), Some(m)) => Some(crate::time::month_key(y, m)),
            (Some(y), None) => Some(crate::time::month_key(y, 12)),
            _ => None,
        };
        Window::new(start, end)
    }
}

/// The full set of shock lists a stress test can supply. Every list is
/// optional and independent; an empty list is a no-op.
#[derive(Debug, Clone, Default)]
pub struct StressOverrides {
    pub portfolio_growth_shocks: Vec<Shock>,
    pub real_estate_shocks: Vec<Shock>,
    pub mortgage_rate_shocks: Vec<Shock>,
    pub inflation_shocks: Vec<Shock>,
    pub income_tax_shocks: Vec<Shock>,

    /// Legacy single-shock fields: when `portfolio_growth_shocks` is
    /// empty and this is set, synthesize one entry from it.
    pub portfolio_growth_pct: Option<f64>,
    pub portfolio_start_year: Option<i32>,
    pub portfolio_start_month: Option<u32>,
    pub portfolio_end_year: Option<i32>,
    pub portfolio_end_month: Option<u32>,
}

impl StressOverrides {
    fn effective_portfolio_shocks(&self) -> Vec<Shock> {
        if !self.portfolio_growth_shocks.is_empty() {
            return self.portfolio_growth_shocks.clone();
        }
        match self.portfolio_growth_pct {
            Some(pct) => vec![Shock {
                pct,
                start_year: self.portfolio_start_year,
                start_month: self.portfolio_start_month,
                end_year: self.portfolio_end_year,
                end_month: self.portfolio_end_month,
            }],
            None => Vec::new(),
        }
    }

    /// Apply every shock list to deep copies of `accounts`/`transactions`,
    /// and to `scenario_income_tax_rate`, the flat rate a shock nudges
    /// additively. Mutates the inputs in place — callers are expected to
    /// have already cloned them for the run.
    pub fn apply(
        &self,
        accounts: &mut [Account],
        transactions: &mut [Transaction],
        scenario_income_tax_rate: &mut f64,
        scenario_window: Window,
    ) {
        for shock in self.effective_portfolio_shocks() {
            for account in accounts.iter_mut() {
                if account.kind == AccountKind::Portfolio {
                    let base = account.annual_growth_rate;
                    account.growth_schedule.push(shock.window(), base + shock.pct);
                }
            }
        }

        for shock in &self.real_estate_shocks {
            for account in accounts.iter_mut() {
                if account.kind == AccountKind::RealEstate {
                    let base = account.annual_growth_rate;
                    account.growth_schedule.push(shock.window(), base + shock.pct);
                }
            }
        }

        for shock in &self.mortgage_rate_shocks {
            for tx in transactions.iter_mut() {
                if let Transaction::MortgageInterest(m) = tx {
                    let base = m.annual_interest_rate;
                    m.rate_schedule.push(shock.window(), base + shock.pct);
                }
            }
        }

        for shock in &self.inflation_shocks {
            for tx in transactions.iter_mut() {
                if let Transaction::Regular(r) = tx {
                    r.inflation_schedule.push(shock.window(), shock.pct);
                }
            }
        }

        // Only the first shock whose window overlaps the scenario window
        // takes effect; later overlapping shocks are ignored.
        if let Some(shock) = self
            .income_tax_shocks
            .iter()
            .find(|s| windows_overlap(s.window(), scenario_window))
        {
            *scenario_income_tax_rate += shock.pct;
        }
    }
}

fn windows_overlap(a: Window, b: Window) -> bool {
    let a_start = a.start.unwrap_or(i32::MIN);
    let a_end = a.end.unwrap_or(i32::MAX);
    let b_start = b.start.unwrap_or(i32::MIN);
    let b_end = b.end.unwrap_or(i32::MAX);
    a_start <= b_end && b_start <= a_end
}
