//! Yearly taxable-income aggregation and the progressive per-year tax
//! formula. The aggregation step reads two different
//! sources depending on the transaction kind: ordinary transactions are
//! walked from their own definition, but mortgage-interest transactions
//! are read back out of the simulation's emitted cash-flow details,
//! because their amount depends on a live balance the definition alone
//! can't reproduce.

use rustc_hash::FxHashMap;

use crate::model::results::{BalancePoint, CashFlowRecord};
use crate::model::scenario::Scenario;
use crate::model::transaction::Transaction;
use crate::model::results::YearlyTax;
use crate::time::{self, MonthKey};

/// Safety cap on `Regular` occurrence walking to preclude runaway loops
/// from a malformed window.
const MAX_OCCURRENCES: u32 = 1000;

#[derive(Default, Clone, Copy)]
struct YearTotals {
    income: f64,
    expense: f64,
}

/// Scan `transactions` (the un-overridden originals) and
/// `cash_flows` (this run's emitted details, for mortgage interest) and
/// produce one [`YearlyTax`] row per calendar year spanned by
/// `scenario.window`.
pub fn compute_yearly_taxes(
    transactions: &[Transaction],
    cash_flows: &[CashFlowRecord],
    total_wealth: &[BalancePoint],
    scenario: &Scenario,
) -> Vec<YearlyTax> {
    let mut totals: FxHashMap<i32, YearTotals> = FxHashMap::default();

    for tx in transactions {
        match tx {
            Transaction::OneTime(t) if t.meta.taxable => {
                let (year, _) = time::split(t.month_key);
                credit(&mut totals, year, t.amount, tx.taxable_figure(t.amount));
            }
            Transaction::Regular(t) if t.meta.taxable => {
                // Missing start dates default to the scenario window.
                let Some(start) = t.window.start.or(scenario.window.start) else {
                    continue;
                };
                for step in 0..MAX_OCCURRENCES {
                    let key = advance(start, step * t.frequency_months.max(1));
                    if !t.window.contains(key) {
                        if let Some(end) = t.window.end
                            && key > end
                        {
                            break;
                        }
                        continue;
                    }
                    let amount = tx.effective_amount(key, 0.0);
                    let (year, _) = time::split(key);
                    credit(&mut totals, year, amount, tx.taxable_figure(amount));
                }
            }
            _ => {}
        }
    }

    for tx in transactions {
        let Transaction::MortgageInterest(m) = tx else {
            continue;
        };
        if !m.meta.taxable {
            continue;
        }
        for cf in cash_flows {
            for detail in &cf.expense_details {
                if detail.transaction_id != Some(m.meta.id.0) {
                    continue;
                }
                let year = cf.date[0..4].parse::<i32>().unwrap_or(0);
                credit(&mut totals, year, detail.amount, detail.amount.abs());
            }
        }
    }

    let Some(start) = scenario.window.start else {
        return Vec::new();
    };
    let Some(end) = scenario.window.end else {
        return Vec::new();
    };
    let (start_year, _) = time::split(start);
    let (end_year, _) = time::split(end);

    let mut rows = Vec::new();
    for year in start_year..=end_year {
        let YearTotals { income, expense } =
            totals.get(&year).copied().unwrap_or_default();
        let net = income - expense;
        let wealth = wealth_for_year(total_wealth, year);
        rows.push(tax_row(year, net, wealth, scenario));
    }
    rows
}

fn credit(totals: &mut FxHashMap<i32, YearTotals>, year: i32, nominal: f64, figure: f64) {
    let entry = totals.entry(year).or_default();
    if nominal >= 0.0 {
        entry.income += figure;
    } else {
        entry.expense += figure;
    }
}

fn advance(key: MonthKey, months: u32) -> MonthKey {
    let mut k = key;
    for _ in 0..months {
        k = time::next(k);
    }
    k
}

/// December's wealth snapshot if present, else the last snapshot seen in
/// that year, else 0.
fn wealth_for_year(total_wealth: &[BalancePoint], year: i32) -> f64 {
    let prefix = format!("{year:04}-");
    let mut last = None;
    for point in total_wealth {
        if point.date.starts_with(&prefix) {
            last = Some(point.value);
            if point.date.starts_with(&format!("{year:04}-12")) {
                return point.value;
            }
        }
    }
    last.unwrap_or(0.0)
}

fn tax_row(year: i32, net: f64, wealth: f64, scenario: &Scenario) -> YearlyTax {
    let config = scenario.tax_config.as_ref();

    let income_tax = config
        .and_then(|c| c.income_tariff.as_ref())
        .map(|t| t.evaluate(net))
        .unwrap_or(0.0);
    let wealth_tax = config
        .and_then(|c| c.wealth_tariff.as_ref())
        .map(|t| t.evaluate(wealth))
        .unwrap_or(0.0);
    let base_tax = income_tax + wealth_tax;

    let municipal_factor = config.map(|c| c.municipal_factor).unwrap_or(0.0);
    let cantonal_factor = config.map(|c| c.cantonal_factor).unwrap_or(0.0);
    let church_factor = config.map(|c| c.church_factor).unwrap_or(0.0);
    let personal_tax_rate = config.map(|c| c.personal_tax).unwrap_or(0.0);
    let household_size = scenario.household_status.persons();
    let personal_tax = personal_tax_rate * household_size;

    let tax_total =
        base_tax * (municipal_factor + cantonal_factor + church_factor) + personal_tax;

    let federal_tax = config
        .and_then(|c| c.federal_table.as_ref())
        .map(|f| {
            (f.brackets.evaluate(net) - f.child_deduction * scenario.child_count as f64).max(0.0)
        })
        .unwrap_or(0.0);

    YearlyTax {
        year,
        net,
        wealth,
        income_tax,
        wealth_tax,
        base_tax,
        personal_tax,
        tax_total,
        federal_tax,
        total_all: tax_total + federal_tax,
    }
}
