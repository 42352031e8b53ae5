//! Finance business logic - recording expenses and keeping card debt in step.
//!
//! Adding an expense charges its card and deleting one refunds it. Both the
//! expense write and the card write happen inside one database transaction,
//! so a failure between them leaves neither behind.

use crate::{
    core::{MissingRecord, card as cards},
    entities::{Expense, card, expense},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Category used when an expense arrives without one.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Default length of the recent-expenses list.
pub const DEFAULT_RECENT_LIMIT: u64 = 20;

/// Input for [`FinanceService::add_expense`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    /// Day the money was spent
    pub date: NaiveDate,
    /// Amount spent, must be positive
    pub amount: f64,
    /// Card charged; trimmed, must not be blank
    pub card_used: String,
    /// Spending category; blank becomes [`FALLBACK_CATEGORY`]
    pub category: String,
    /// Optional note; blank is stored as none
    pub description: Option<String>,
}

impl NewExpense {
    /// Creates an expense without a description.
    pub fn new(
        date: NaiveDate,
        amount: f64,
        card_used: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            card_used: card_used.into(),
            category: category.into(),
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the preconditions and returns the row to insert.
    fn into_active_model(self) -> Result<expense::ActiveModel> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }

        let card_used = self.card_used.trim();
        if card_used.is_empty() {
            return Err(Error::validation("Card used cannot be empty"));
        }

        let category = match self.category.trim() {
            "" => FALLBACK_CATEGORY,
            category => category,
        };

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(expense::ActiveModel {
            date: Set(self.date),
            amount: Set(self.amount),
            card_used: Set(card_used.to_string()),
            category: Set(category.to_string()),
            description: Set(description),
            ..Default::default()
        })
    }
}

/// Expense and card operations over an injected database connection.
#[derive(Debug, Clone, Copy)]
pub struct FinanceService<'a> {
    db: &'a DatabaseConnection,
    on_missing: MissingRecord,
}

impl<'a> FinanceService<'a> {
    /// Creates a service that silently ignores unknown expense ids.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            on_missing: MissingRecord::Ignore,
        }
    }

    /// Overrides how unknown expense ids are handled.
    #[must_use]
    pub const fn with_missing_record(mut self, on_missing: MissingRecord) -> Self {
        self.on_missing = on_missing;
        self
    }

    /// Records an expense and charges its amount to the card.
    ///
    /// The card is created with `debt = amount` if no card has that name yet.
    /// Rejected input writes nothing.
    #[instrument(skip_all, fields(card = %new_expense.card_used, amount = new_expense.amount))]
    pub async fn add_expense(&self, new_expense: NewExpense) -> Result<expense::Model> {
        let row = new_expense.into_active_model()?;

        let txn = self.db.begin().await?;
        let expense = row.insert(&txn).await?;
        let card = cards::charge_card(&txn, &expense.card_used, expense.amount).await?;
        txn.commit().await?;

        info!(
            expense_id = expense.id,
            card_debt = card.debt,
            "Expense recorded"
        );
        Ok(expense)
    }

    /// Deletes an expense and takes its amount off the card's debt.
    ///
    /// Returns `true` when an expense was removed. Debt may end up at zero or
    /// below; it is not clamped. If the card no longer exists only the
    /// expense is removed.
    #[instrument(skip(self))]
    pub async fn delete_expense(&self, expense_id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        let Some(expense) = Expense::find_by_id(expense_id).one(&txn).await? else {
            return match self.on_missing {
                MissingRecord::Ignore => {
                    debug!(expense_id, "Expense not found, ignoring");
                    Ok(false)
                }
                MissingRecord::Reject => Err(Error::ExpenseNotFound { id: expense_id }),
            };
        };

        if let Some(card) = cards::get_card_by_name(&txn, &expense.card_used).await? {
            cards::adjust_card_debt(&txn, card.id, -expense.amount).await?;
        } else {
            debug!(card = %expense.card_used, "No card to refund");
        }
        expense.delete(&txn).await?;

        txn.commit().await?;
        info!(expense_id, "Expense deleted");
        Ok(true)
    }

    /// Finds an expense by id.
    pub async fn get_expense(&self, expense_id: i64) -> Result<Option<expense::Model>> {
        Expense::find_by_id(expense_id)
            .one(self.db)
            .await
            .map_err(Into::into)
    }

    /// All expenses dated within calendar `year`, in no particular order.
    pub async fn list_expenses_for_year(&self, year: i32) -> Result<Vec<expense::Model>> {
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Err(Error::validation(format!("Year {year} is out of range")));
        };

        Expense::find()
            .filter(expense::Column::Date.between(start, end))
            .all(self.db)
            .await
            .map_err(Into::into)
    }

    /// The `limit` newest expenses, newest date first.
    ///
    /// Same-day expenses come most recently inserted first.
    pub async fn list_recent_expenses(&self, limit: u64) -> Result<Vec<expense::Model>> {
        Expense::find()
            .order_by_desc(expense::Column::Date)
            .order_by_desc(expense::Column::Id)
            .limit(limit)
            .all(self.db)
            .await
            .map_err(Into::into)
    }

    /// All cards with their current debt.
    pub async fn list_cards(&self) -> Result<Vec<card::Model>> {
        cards::list_cards(self.db).await
    }

    /// Finds a card by its exact name.
    pub async fn get_card(&self, card_name: &str) -> Result<Option<card::Model>> {
        cards::get_card_by_name(self.db, card_name).await
    }
}
