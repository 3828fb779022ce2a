//! Tax configuration: tariff tables (Swiss cantonal-style threshold/base/
//! per-100 rows) and legacy bracket tables (cap/rate slices), plus the
//! per-scenario multiplier configuration the tax engine reads.

use serde::{Deserialize, Serialize};

use crate::model::ids::AccountId;

/// Data-quality defense: a tariff's last row's `per_100_amount` is
/// clamped to this value, and the federal bracket evaluation never
/// extrapolates past it either.
pub const TARIFF_CLAMP: f64 = 11.5;

/// One row of a Swiss-style progressive tariff: below `threshold` the row
/// doesn't apply; at or above it, tax is `base_amount` plus `per_100_amount`
/// for every CHF 100 above the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffRow {
    pub threshold: f64,
    pub base_amount: f64,
    pub per_100_amount: f64,
}

/// Ordered-by-threshold tariff used for cantonal income/wealth tax.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TariffTable {
    rows: Vec<TariffRow>,
}

impl TariffTable {
    /// Build from raw rows, applying normalization rules:
    /// sort ascending by threshold, clamp negative `base_amount`/
    /// `per_100_amount` to zero, and clamp the last row's `per_100_amount`
    /// to [`TARIFF_CLAMP`] if it exceeds 20 (signals corrupted input data).
    pub fn new(mut rows: Vec<TariffRow>) -> Self {
        rows.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        for row in &mut rows {
            row.base_amount = row.base_amount.max(0.0);
            row.per_100_amount = row.per_100_amount.max(0.0);
        }
        if let Some(last) = rows.last_mut()
            && last.per_100_amount > 20.0
        {
            last.per_100_amount = TARIFF_CLAMP;
        }
        TariffTable { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Evaluate the tariff at `amount`: below the first
    /// row's threshold the first row's formula still applies (rows
    /// implicitly extend below their own threshold with negative
    /// "per-100" periods); otherwise find the bracket `amount` falls into
    /// and apply that row's base + per-100 slope.
    pub fn evaluate(&self, amount: f64) -> f64 {
        let Some(first) = self.rows.first() else {
            return 0.0;
        };
        if amount <= first.threshold {
            return first.base_amount + ((amount - first.threshold) / 100.0) * first.per_100_amount;
        }
        for window in self.rows.windows(2) {
            let (row, next) = (&window[0], &window[1]);
            if row.threshold <= amount && amount < next.threshold {
                return row.base_amount + ((amount - row.threshold) / 100.0) * row.per_100_amount;
            }
        }
        let last = self.rows.last().expect("checked non-empty above");
        last.base_amount + ((amount - last.threshold) / 100.0) * last.per_100_amount
    }
}

/// One slice of a legacy progressive bracket table: `cap = None` marks
/// the final, unbounded bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracketRow {
    pub cap: Option<f64>,
    pub rate: f64,
}

/// Legacy federal-style bracket table: ordered, progressive, consumed
/// left-to-right.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BracketTable {
    rows: Vec<BracketRow>,
}

impl BracketTable {
    pub fn new(rows: Vec<BracketRow>) -> Self {
        BracketTable { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Progressive tax on `amount`: each bracket taxes only the slice of
    /// `amount` that falls within it, at that bracket's rate.
    pub fn evaluate(&self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let mut tax = 0.0;
        let mut floor = 0.0;
        for row in &self.rows {
            let cap = row.cap.unwrap_or(f64::INFINITY);
            if amount <= floor {
                break;
            }
            let slice = (amount.min(cap) - floor).max(0.0);
            tax += slice * row.rate;
            floor = cap;
        }
        tax
    }
}

/// Federal tariff table plus the per-child deduction taken off the
/// computed federal tax.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FederalTable {
    pub brackets: BracketTable,
    pub child_deduction: f64,
}

impl FederalTable {
    pub fn new(brackets: BracketTable, child_deduction: f64) -> Self {
        FederalTable {
            brackets,
            child_deduction,
        }
    }
}

/// Household marital status, used only to size the per-person tax charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseholdStatus {
    Single,
    Married,
}

impl HouseholdStatus {
    pub fn persons(self) -> f64 {
        match self {
            HouseholdStatus::Single => 1.0,
            HouseholdStatus::Married => 2.0,
        }
    }
}

/// Per-scenario tax configuration: the tariff tables plus the layered
/// municipal/cantonal/church multipliers and the flat per-person charge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxConfig {
    pub income_tariff: Option<TariffTable>,
    pub wealth_tariff: Option<TariffTable>,
    pub federal_table: Option<FederalTable>,
    pub municipal_factor: f64,
    pub cantonal_factor: f64,
    pub church_factor: f64,
    pub personal_tax: f64,
    pub tax_account: Option<AccountId>,
}
