//! Card business logic - lookups and debt bookkeeping.
//!
//! `cards.debt` is a running total kept in step with the expenses charged to
//! the card: every expense insert adds its amount and every delete subtracts
//! it. Debt updates are single `UPDATE ... SET debt = debt + ?` statements so
//! they never read a stale balance.
//!
//! The running total can drift from the expense rows if they are edited
//! outside this crate. [`derived_card_debts`] recomputes the true sums and
//! [`reconcile_card_debts`] writes them back.

use crate::{
    entities::{Card, Expense, card},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Largest difference between recorded and derived debt treated as equal.
pub const DRIFT_TOLERANCE: f64 = 1e-9;

/// Finds a card by its exact name.
pub async fn get_card_by_name<C>(db: &C, card_name: &str) -> Result<Option<card::Model>>
where
    C: ConnectionTrait,
{
    Card::find()
        .filter(card::Column::CardName.eq(card_name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All cards in the order they were first charged.
pub async fn list_cards<C>(db: &C) -> Result<Vec<card::Model>>
where
    C: ConnectionTrait,
{
    Card::find()
        .order_by_asc(card::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds `delta` to a card's debt in one statement. Negative deltas subtract,
/// and the result is not clamped at zero.
pub async fn adjust_card_debt<C>(db: &C, card_id: i64, delta: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    Card::update_many()
        .col_expr(card::Column::Debt, Expr::col(card::Column::Debt).add(delta))
        .filter(card::Column::Id.eq(card_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Adds `amount` to the named card's debt, creating the card on first use.
pub async fn charge_card<C>(db: &C, card_name: &str, amount: f64) -> Result<card::Model>
where
    C: ConnectionTrait,
{
    let Some(existing) = get_card_by_name(db, card_name).await? else {
        let created = card::ActiveModel {
            card_name: Set(card_name.to_string()),
            debt: Set(amount),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(card = card_name, "Card created");
        return Ok(created);
    };

    adjust_card_debt(db, existing.id, amount).await?;
    Card::find_by_id(existing.id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("card {}", existing.id)).into())
}

/// Recorded and recomputed debt for one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDebtCheck {
    /// Card being checked
    pub card_name: String,
    /// Debt stored on the card row
    pub recorded: f64,
    /// Sum of the amounts of expenses charged to the card
    pub derived: f64,
}

impl CardDebtCheck {
    /// Whether the stored running total disagrees with the expense rows.
    #[must_use]
    pub fn has_drift(&self) -> bool {
        (self.recorded - self.derived).abs() > DRIFT_TOLERANCE
    }
}

/// Recomputes every card's debt from the expense table.
pub async fn derived_card_debts<C>(db: &C) -> Result<Vec<CardDebtCheck>>
where
    C: ConnectionTrait,
{
    let expenses = Expense::find().all(db).await?;
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for expense in &expenses {
        *sums.entry(expense.card_used.as_str()).or_default() += expense.amount;
    }

    Ok(list_cards(db)
        .await?
        .into_iter()
        .map(|card| CardDebtCheck {
            derived: sums.get(card.card_name.as_str()).copied().unwrap_or(0.0),
            recorded: card.debt,
            card_name: card.card_name,
        })
        .collect())
}

/// Overwrites each drifting card's debt with its derived sum.
///
/// Runs in one transaction and returns how many cards were corrected.
#[instrument(skip(db))]
pub async fn reconcile_card_debts(db: &DatabaseConnection) -> Result<usize> {
    let txn = db.begin().await?;

    let mut corrected = 0;
    for check in derived_card_debts(&txn).await? {
        if !check.has_drift() {
            continue;
        }
        warn!(
            card = %check.card_name,
            recorded = check.recorded,
            derived = check.derived,
            "Card debt drifted, resetting to expense total"
        );
        Card::update_many()
            .col_expr(card::Column::Debt, Expr::value(check.derived))
            .filter(card::Column::CardName.eq(check.card_name.as_str()))
            .exec(&txn)
            .await?;
        corrected += 1;
    }

    txn.commit().await?;
    Ok(corrected)
}
