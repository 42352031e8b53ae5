//! Card entity - A payment card and the debt accumulated on it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Card database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// Unique identifier for the card
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Card name as typed on the expense (e.g., "Visa Gold")
    #[sea_orm(unique)]
    pub card_name: String,
    /// Running total of expenses charged to this card
    pub debt: f64,
}

/// `Card` has no declared relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
