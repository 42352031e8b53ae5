//! Habit business logic - creating and removing habits and toggling daily completion.
//!
//! A habit is "done" on a day exactly when a `habit_entries` row exists for that
//! (habit, day) pair. Toggling inserts or deletes that row; there is no
//! explicit "not done" state.

use crate::{
    core::{MissingRecord, today},
    entities::{Habit, HabitEntry, habit, habit_entry},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Habit operations over an injected database connection.
#[derive(Debug, Clone, Copy)]
pub struct HabitService<'a> {
    db: &'a DatabaseConnection,
    on_missing: MissingRecord,
}

impl<'a> HabitService<'a> {
    /// Creates a service that silently ignores unknown habit ids.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            on_missing: MissingRecord::Ignore,
        }
    }

    /// Overrides how unknown habit ids are handled.
    #[must_use]
    pub const fn with_missing_record(mut self, on_missing: MissingRecord) -> Self {
        self.on_missing = on_missing;
        self
    }

    fn missing(&self, habit_id: i64) -> Result<bool> {
        match self.on_missing {
            MissingRecord::Ignore => {
                debug!(habit_id, "Habit not found, ignoring");
                Ok(false)
            }
            MissingRecord::Reject => Err(Error::HabitNotFound { id: habit_id }),
        }
    }

    /// Adds a habit created today. See [`HabitService::add_habit_on`].
    pub async fn add_habit(&self, name: &str) -> Result<habit::Model> {
        self.add_habit_on(name, today()).await
    }

    /// Adds a habit with an explicit creation date.
    ///
    /// The name is trimmed and must not be empty. Duplicate names are allowed.
    #[instrument(skip(self))]
    pub async fn add_habit_on(&self, name: &str, created_date: NaiveDate) -> Result<habit::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Habit name cannot be empty"));
        }

        let habit = habit::ActiveModel {
            name: Set(name.to_string()),
            created_date: Set(created_date),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        info!(habit_id = habit.id, "Habit added");
        Ok(habit)
    }

    /// Finds a habit by id.
    pub async fn get_habit(&self, habit_id: i64) -> Result<Option<habit::Model>> {
        Habit::find_by_id(habit_id)
            .one(self.db)
            .await
            .map_err(Into::into)
    }

    /// Removes a habit together with all of its entries.
    ///
    /// Returns `true` when a habit was removed. Entries are deleted in the
    /// same transaction rather than relying on the foreign key cascade alone.
    #[instrument(skip(self))]
    pub async fn delete_habit(&self, habit_id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        let Some(habit) = Habit::find_by_id(habit_id).one(&txn).await? else {
            return self.missing(habit_id);
        };

        let removed = HabitEntry::delete_many()
            .filter(habit_entry::Column::HabitId.eq(habit_id))
            .exec(&txn)
            .await?;
        habit.delete(&txn).await?;

        txn.commit().await?;
        info!(
            habit_id,
            entries_removed = removed.rows_affected,
            "Habit deleted"
        );
        Ok(true)
    }

    /// Flips completion of `habit_id` on `date` and returns the new state.
    ///
    /// An existing entry is deleted (unchecked); otherwise one is inserted
    /// (checked). For an unknown habit nothing is written.
    #[instrument(skip(self))]
    pub async fn toggle_completion(&self, habit_id: i64, date: NaiveDate) -> Result<bool> {
        let txn = self.db.begin().await?;

        if Habit::find_by_id(habit_id).one(&txn).await?.is_none() {
            return self.missing(habit_id);
        }

        let existing = HabitEntry::find()
            .filter(habit_entry::Column::HabitId.eq(habit_id))
            .filter(habit_entry::Column::Date.eq(date))
            .one(&txn)
            .await?;

        let completed = if let Some(entry) = existing {
            entry.delete(&txn).await?;
            false
        } else {
            habit_entry::ActiveModel {
                habit_id: Set(habit_id),
                date: Set(date),
                completed: Set(true),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            true
        };

        txn.commit().await?;
        debug!(habit_id, %date, completed, "Habit completion toggled");
        Ok(completed)
    }

    /// Whether `habit_id` was completed on `date`.
    ///
    /// Unknown or deleted habits are simply not completed.
    pub async fn is_completed(&self, habit_id: i64, date: NaiveDate) -> Result<bool> {
        let entry = HabitEntry::find()
            .filter(habit_entry::Column::HabitId.eq(habit_id))
            .filter(habit_entry::Column::Date.eq(date))
            .one(self.db)
            .await?;
        Ok(entry.is_some_and(|e| e.completed))
    }

    /// All habits in creation order.
    pub async fn list_habits(&self) -> Result<Vec<habit::Model>> {
        Habit::find()
            .order_by_asc(habit::Column::Id)
            .all(self.db)
            .await
            .map_err(Into::into)
    }

    /// Every completion entry dated within `[start, end]`, across all habits.
    pub async fn list_entries_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<habit_entry::Model>> {
        HabitEntry::find()
            .filter(habit_entry::Column::Date.between(start, end))
            .order_by_asc(habit_entry::Column::HabitId)
            .order_by_asc(habit_entry::Column::Date)
            .all(self.db)
            .await
            .map_err(Into::into)
    }
}
