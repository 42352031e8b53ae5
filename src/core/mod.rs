//! Core business logic - framework-agnostic habit, finance and reporting operations.
//!
//! Services borrow a [`sea_orm::DatabaseConnection`] that the caller opens once
//! and passes in; nothing here holds global state. Every mutating call commits
//! before it returns, so a caller can re-read any list right after.

/// Card lookups, debt adjustment and debt reconciliation
pub mod card;
/// Expense recording and card debt bookkeeping
pub mod finance;
/// Habit creation and per-day completion toggling
pub mod habit;
/// Read models for the dashboard page
pub mod report;

use chrono::{Local, NaiveDate};

pub use finance::{FinanceService, NewExpense};
pub use habit::HabitService;

/// What a service does when an operation names an id that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRecord {
    /// Treat the call as a no-op and report that nothing changed
    #[default]
    Ignore,
    /// Fail with the matching not-found error
    Reject,
}

/// Today's date in the local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
