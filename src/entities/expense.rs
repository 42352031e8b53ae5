//! Expense entity - A single spending transaction.
//!
//! `card_used` is free text matched against `cards.card_name` by value; it is
//! not a foreign key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier, increasing with insertion order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Day the money was spent
    pub date: Date,
    /// Amount spent, always positive
    pub amount: f64,
    /// Name of the card charged
    pub card_used: String,
    /// Spending category (e.g., "Food", "Transport")
    pub category: String,
    /// Optional free-text note
    pub description: Option<String>,
}

/// Expenses relate to cards by name only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
