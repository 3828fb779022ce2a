//! Windowed-value schedules.
//!
//! Growth overrides, mortgage-rate overrides, and inflation overrides are
//! all instances of the same shape: an ordered list of `{window, value}`
//! entries, evaluated by taking the first entry whose window contains the
//! query key. One generic type serves all three call sites.

use crate::time::{MonthKey, Window};

/// One entry in a [`Schedule`]: a value that applies for as long as `key`
/// falls inside `window`.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleEntry<T> {
    pub window: Window,
    pub value: T,
}

/// First-match-wins list of windowed values.
///
/// Insertion order matters: stress shocks are appended after whatever
/// base entries already exist, so "first match wins" lets earlier
/// (base-scenario) entries take precedence over later overrides only when
/// the caller inserts them in that order, and lets a later override act
/// as a priority layer when inserted first. The engine always evaluates
/// in insertion order — it is the builder's job to decide the order that
/// expresses "this shock wins".
#[derive(Debug, Clone)]
pub struct Schedule<T> {
    entries: Vec<ScheduleEntry<T>>,
}

impl<T: Copy> Schedule<T> {
    pub fn new() -> Self {
        Schedule { entries: Vec::new() }
    }

    pub fn push(&mut self, window: Window, value: T) {
        self.entries.push(ScheduleEntry { window, value });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry whose window contains `key`, or `default` if none
    /// matches.
    pub fn resolve(&self, key: MonthKey, default: T) -> T {
        self.entries
            .iter()
            .find(|entry| entry.window.contains(key))
            .map(|entry| entry.value)
            .unwrap_or(default)
    }

    /// Same as [`Schedule::resolve`] but without a fallback, for callers
    /// that want to distinguish "no override" from "override resolved to
    /// this value".
    pub fn try_resolve(&self, key: MonthKey) -> Option<T> {
        self.entries
            .iter()
            .find(|entry| entry.window.contains(key))
            .map(|entry| entry.value)
    }
}

impl<T: Copy> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}
