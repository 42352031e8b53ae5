//! Database configuration module.
//!
//! Handles the `SQLite` connection and idempotent table creation. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. There are no migrations:
//! every startup simply creates whatever is missing.

use crate::entities::{Card, Expense, Habit, HabitEntry, habit_entry};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Local database file used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://dashboard.db?mode=rwc";

/// Resolves the connection string.
///
/// `DATABASE_URL` from the environment wins, then the configured value, then
/// [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        configured.map_or_else(|| DEFAULT_DATABASE_URL.to_string(), ToString::to_string)
    })
}

/// Opens the database and makes sure every table exists.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {}", database_url);
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Database ready.");
    Ok(db)
}

async fn create_table_if_missing<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

/// Creates all tables and indexes that do not exist yet. Safe to call on every start.
///
/// Besides the four tables this adds the unique `(habit_id, date)` index that
/// keeps one completion entry per habit per day.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table_if_missing(db, &schema, Habit).await?;
    create_table_if_missing(db, &schema, HabitEntry).await?;
    create_table_if_missing(db, &schema, Expense).await?;
    create_table_if_missing(db, &schema, Card).await?;

    let entry_per_day = Index::create()
        .name("idx_habit_entries_habit_date")
        .table(HabitEntry)
        .col(habit_entry::Column::HabitId)
        .col(habit_entry::Column::Date)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&entry_per_day)).await?;

    debug!("Tables ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{
        card::Model as CardModel, expense::Model as ExpenseModel, habit::Model as HabitModel,
        habit_entry::Model as HabitEntryModel,
    };
    use chrono::NaiveDate;
    use sea_orm::{ActiveModelTrait, QuerySelect, Set};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<HabitModel> = Habit::find().limit(1).all(&db).await?;
        let _: Vec<HabitEntryModel> = HabitEntry::find().limit(1).all(&db).await?;
        let _: Vec<ExpenseModel> = Expense::find().limit(1).all(&db).await?;
        let _: Vec<CardModel> = Card::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<HabitModel> = Habit::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_entry_per_day_is_unique() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let habit = crate::entities::habit::ActiveModel {
            name: Set("Read".to_string()),
            created_date: Set(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let entry = || habit_entry::ActiveModel {
            habit_id: Set(habit.id),
            date: Set(day),
            completed: Set(true),
            ..Default::default()
        };

        entry().insert(&db).await?;
        assert!(entry().insert(&db).await.is_err());
        Ok(())
    }

    #[test]
    fn test_configured_url_used_without_env() {
        // Only meaningful when DATABASE_URL is not exported in the test environment
        if std::env::var("DATABASE_URL").is_err() {
            assert_eq!(get_database_url(Some("sqlite::memory:")), "sqlite::memory:");
            assert_eq!(get_database_url(None), DEFAULT_DATABASE_URL);
        }
    }
}
