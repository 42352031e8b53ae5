//! Shared test utilities.
//!
//! Helpers for setting up in-memory databases and creating habits and
//! expenses with sensible defaults.

use crate::{
    core::{FinanceService, HabitService, NewExpense},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a date, panicking on an invalid one. Tests only.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a habit dated 2024-01-01.
pub async fn create_test_habit(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::habit::Model> {
    HabitService::new(db).add_habit_on(name, date(2024, 1, 1)).await
}

/// Sets up a database holding one habit.
pub async fn setup_with_habit(
    name: &str,
) -> Result<(DatabaseConnection, entities::habit::Model)> {
    let db = setup_test_db().await?;
    let habit = create_test_habit(&db, name).await?;
    Ok((db, habit))
}

/// Records an expense with sensible defaults.
///
/// # Defaults
/// * `category`: "Food"
/// * `description`: None
pub async fn add_test_expense(
    db: &DatabaseConnection,
    date: NaiveDate,
    amount: f64,
    card_used: &str,
) -> Result<entities::expense::Model> {
    FinanceService::new(db)
        .add_expense(NewExpense::new(date, amount, card_used, "Food"))
        .await
}
