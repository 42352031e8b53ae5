//! Habit entry entity - Marks a habit as done on one day.
//!
//! Presence of a row means "completed"; there is at most one row per
//! (`habit_id`, `date`), enforced by a unique index created at startup.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Habit entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habit_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Habit this entry belongs to
    pub habit_id: i64,
    /// Calendar day, no time component
    pub date: Date,
    /// Always true when the row exists
    pub completed: bool,
}

/// Defines relationships between `HabitEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one habit
    #[sea_orm(
        belongs_to = "super::habit::Entity",
        from = "Column::HabitId",
        to = "super::habit::Column::Id",
        on_delete = "Cascade"
    )]
    Habit,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
