//! Error types for the simulation engine.
//!
//! The wire contract names exactly four outcomes for [`crate::simulate`];
//! everything else the engine encounters is non-fatal by design — missing
//! optional rates default to zero, a transaction referencing an unknown
//! account is skipped and logged, a corrupt tariff row is clamped.

/// Top-level error returned by [`crate::simulate`]. Variant names match
/// the wire contract exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    ScenarioNotFound,
    NoAssets,
    InvalidOverride(String),
    Cancelled,
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::ScenarioNotFound => write!(f, "scenario not found"),
            SimulationError::NoAssets => write!(f, "scenario has no assets configured"),
            SimulationError::InvalidOverride(msg) => write!(f, "invalid override: {msg}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {}
