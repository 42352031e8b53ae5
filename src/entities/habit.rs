//! Habit entity - A named activity tracked once per calendar day.
//!
//! A habit owns its completion entries; removing the habit removes them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Habit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habits")]
pub struct Model {
    /// Unique identifier, assigned in creation order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Exercise", "Read")
    pub name: String,
    /// Day the habit was added
    pub created_date: Date,
}

/// Defines relationships between Habit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One habit has many completion entries
    #[sea_orm(has_many = "super::habit_entry::Entity")]
    Entries,
}

impl Related<super::habit_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
