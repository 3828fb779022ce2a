use crate::error::{ApiError, ApiResult};
use crate::models::WindowDto;

pub fn validate_scenario_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::ValidationError {
            field: "name".to_string(),
            message: "Scenario name cannot be empty".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ApiError::ValidationError {
            field: "name".to_string(),
            message: "Scenario name cannot exceed 200 characters".to_string(),
        });
    }

    Ok(())
}

/// A scenario with no accounts would fail `wealth_core::simulate` anyway
/// (`SimulationError::NoAssets`), but rejecting it at the CRUD boundary
/// gives a clearer 400 instead of letting the document persist and only
/// failing later on `/run`.
pub fn validate_scenario_has_accounts(account_count: usize) -> ApiResult<()> {
    if account_count == 0 {
        return Err(ApiError::ValidationError {
            field: "accounts".to_string(),
            message: "Scenario must have at least one account".to_string(),
        });
    }
    Ok(())
}

pub fn validate_window(window: WindowDto) -> ApiResult<()> {
    match (window.start, window.end) {
        (Some(start), Some(end)) if end < start => Err(ApiError::ValidationError {
            field: "window".to_string(),
            message: "Window end cannot precede window start".to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_scenario_name() {
        assert!(validate_scenario_name("Household").is_ok());
        assert!(validate_scenario_name("").is_err());
        assert!(validate_scenario_name("   ").is_err());
        assert!(validate_scenario_name(&"a".repeat(201)).is_err());
    }

    #[test]
    fn validates_account_presence() {
        assert!(validate_scenario_has_accounts(1).is_ok());
        assert!(validate_scenario_has_accounts(0).is_err());
    }

    #[test]
    fn rejects_inverted_window() {
        assert!(validate_window(WindowDto { start: Some(202412), end: Some(202401) }).is_err());
        assert!(validate_window(WindowDto { start: Some(202401), end: Some(202412) }).is_ok());
        assert!(validate_window(WindowDto { start: None, end: None }).is_ok());
    }
}
