//! Placeholder: integration-style coverage lives in `crates/wealth_core/tests/`
//! (one file per engine entry point) and in `#[cfg(test)]` blocks alongside
//! each module. Nothing to declare here.
