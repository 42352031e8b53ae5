//! Report generation business logic.
//!
//! Builds the data behind each dashboard view: the monthly habit grid,
//! yearly spending per category, debt per card and the recent expenses list.
//! Every function re-queries the database; nothing is cached between calls.
//! The structs are plain data so any front end can draw them.

use crate::{
    config::Settings,
    core::{FinanceService, HabitService},
    entities::{card, expense, habit},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use sea_orm::DatabaseConnection;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One habit and the days of the month it was completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRow {
    /// The habit
    pub habit: habit::Model,
    /// Day-of-month numbers with a completion entry
    pub completed_days: BTreeSet<u32>,
}

impl HabitRow {
    /// Whether the habit was done on `day` of the month.
    #[must_use]
    pub fn is_completed_on(&self, day: u32) -> bool {
        self.completed_days.contains(&day)
    }
}

/// Completion grid for every habit over one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitMonth {
    /// First day of the month shown
    pub first_day: NaiveDate,
    /// Number of day columns
    pub days_in_month: u32,
    /// One row per habit, in creation order
    pub rows: Vec<HabitRow>,
}

/// Number of days in `month` of `year`, or `None` for an invalid month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month.checked_add(1)?)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?;
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

/// Builds the habit grid for one month with a single entry query.
pub async fn habit_month(db: &DatabaseConnection, year: i32, month: u32) -> Result<HabitMonth> {
    let (Some(first_day), Some(days)) = (
        NaiveDate::from_ymd_opt(year, month, 1),
        days_in_month(year, month),
    ) else {
        return Err(Error::validation(format!("Invalid month {year}-{month}")));
    };
    let last_day = first_day + chrono::Days::new(u64::from(days - 1));

    let habits = HabitService::new(db);
    let mut by_habit: BTreeMap<i64, BTreeSet<u32>> = BTreeMap::new();
    for entry in habits.list_entries_between(first_day, last_day).await? {
        if entry.completed {
            by_habit
                .entry(entry.habit_id)
                .or_default()
                .insert(entry.date.day());
        }
    }

    let rows = habits
        .list_habits()
        .await?
        .into_iter()
        .map(|habit| HabitRow {
            completed_days: by_habit.remove(&habit.id).unwrap_or_default(),
            habit,
        })
        .collect();

    Ok(HabitMonth {
        first_day,
        days_in_month: days,
        rows,
    })
}

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    /// Category name
    pub category: String,
    /// Sum of expense amounts
    pub total: f64,
}

/// Spending per category for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// Year covered
    pub year: i32,
    /// Per-category totals, sorted by category name
    pub categories: Vec<CategorySpending>,
    /// Sum over all categories
    pub total: f64,
}

/// Groups expenses by category and sums their amounts.
#[must_use]
pub fn summarize_by_category(expenses: &[expense::Model]) -> Vec<CategorySpending> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_default() += expense.amount;
    }
    totals
        .into_iter()
        .map(|(category, total)| CategorySpending {
            category: category.to_string(),
            total,
        })
        .collect()
}

/// Spending per category for every expense dated in `year`.
pub async fn spending_by_category(db: &DatabaseConnection, year: i32) -> Result<CategorySummary> {
    let expenses = FinanceService::new(db).list_expenses_for_year(year).await?;
    let categories = summarize_by_category(&expenses);
    let total = categories.iter().map(|c| c.total).sum();
    Ok(CategorySummary {
        year,
        categories,
        total,
    })
}

/// Cards that currently owe money.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtSummary {
    /// Cards with strictly positive debt, in creation order
    pub cards: Vec<card::Model>,
    /// Sum of their debt
    pub total_debt: f64,
}

/// Collects cards with positive debt. Zero and negative balances are left out.
pub async fn debt_summary(db: &DatabaseConnection) -> Result<DebtSummary> {
    let cards: Vec<card::Model> = FinanceService::new(db)
        .list_cards()
        .await?
        .into_iter()
        .filter(|c| c.debt > 0.0)
        .collect();
    let total_debt = cards.iter().map(|c| c.debt).sum();
    Ok(DebtSummary { cards, total_debt })
}

/// Everything the dashboard page shows, loaded in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Date the snapshot was taken for
    pub today: NaiveDate,
    /// Prefix for rendered amounts
    pub currency_symbol: String,
    /// Category choices offered when entering an expense
    pub categories: Vec<String>,
    /// Habit grid for the current month
    pub habits: HabitMonth,
    /// Spending per category for the current year
    pub spending: CategorySummary,
    /// Debt per card
    pub debt: DebtSummary,
    /// Newest expenses first
    pub recent_expenses: Vec<expense::Model>,
}

/// Loads a full dashboard snapshot for `today`.
pub async fn load_dashboard(
    db: &DatabaseConnection,
    today: NaiveDate,
    settings: &Settings,
) -> Result<Dashboard> {
    Ok(Dashboard {
        today,
        currency_symbol: settings.currency_symbol.clone(),
        categories: settings.categories.clone(),
        habits: habit_month(db, today.year(), today.month()).await?,
        spending: spending_by_category(db, today.year()).await?,
        debt: debt_summary(db).await?,
        recent_expenses: FinanceService::new(db)
            .list_recent_expenses(settings.recent_expense_limit)
            .await?,
    })
}

/// Calculates what share of `total` is `done`, as a percentage.
#[must_use]
pub fn calculate_progress(done: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    (done / total) * 100.0
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // clamped_progress is in [0, 100] so the product is in [0, length]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// Formats an amount with the currency symbol and two decimals, e.g. `₹12.50`.
#[must_use]
pub fn format_amount(symbol: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{amount:.2}")
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let money = |amount| format_amount(&self.currency_symbol, amount);

        writeln!(f, "Habit Tracker - {}", self.habits.first_day.format("%B %Y"))?;
        if self.habits.rows.is_empty() {
            writeln!(f, "  No habits added yet.")?;
        }
        for row in &self.habits.rows {
            let days: Vec<String> = row.completed_days.iter().map(ToString::to_string).collect();
            let progress = calculate_progress(
                f64::from(u32::try_from(row.completed_days.len()).unwrap_or(u32::MAX)),
                f64::from(self.habits.days_in_month),
            );
            writeln!(
                f,
                "  {:<20} {} days: {}",
                row.habit.name,
                format_progress_bar(progress, None),
                if days.is_empty() { "-".to_string() } else { days.join(" ") }
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Spending by Category ({})", self.spending.year)?;
        if self.spending.categories.is_empty() {
            writeln!(f, "  No expenses recorded for this year yet.")?;
        }
        for category in &self.spending.categories {
            writeln!(f, "  {:<20} {}", category.category, money(category.total))?;
        }

        writeln!(f)?;
        writeln!(f, "Debt by Card (Total: {})", money(self.debt.total_debt))?;
        if self.debt.cards.is_empty() {
            writeln!(f, "  No card debt recorded yet.")?;
        }
        for card in &self.debt.cards {
            writeln!(f, "  {:<20} {}", card.card_name, money(card.debt))?;
        }

        writeln!(f)?;
        writeln!(f, "Recent Expenses")?;
        writeln!(f, "  Categories: {}", self.categories.join(", "))?;
        if self.recent_expenses.is_empty() {
            writeln!(f, "  No expenses recorded yet.")?;
        }
        for expense in &self.recent_expenses {
            writeln!(
                f,
                "  #{:<5} {} {:>12} {:<15} {:<15} {}",
                expense.id,
                expense.date.format("%Y-%m-%d"),
                money(expense.amount),
                expense.card_used,
                expense.category,
                expense.description.as_deref().unwrap_or("-")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::NewExpense;
    use crate::test_utils::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 0), None);
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(calculate_progress(15.0, 30.0), 50.0);
        assert_eq!(calculate_progress(0.0, 31.0), 0.0);
        assert_eq!(calculate_progress(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(100.0, Some(10)), "[██████████] 100.0%");
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
        assert_eq!(format_progress_bar(0.0, Some(4)), "[░░░░] 0.0%");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("₹", 80.0), "₹80.00");
        assert_eq!(format_amount("$", 12.345), "$12.35");
        assert_eq!(format_amount("₹", -5.5), "-₹5.50");
    }

    #[test]
    fn test_summarize_by_category() {
        let make = |id, amount, category: &str| expense::Model {
            id,
            date: date(2024, 1, 1),
            amount,
            card_used: "Visa".to_string(),
            category: category.to_string(),
            description: None,
        };
        let expenses = vec![
            make(1, 10.0, "Food"),
            make(2, 4.5, "Bills"),
            make(3, 2.5, "Food"),
        ];

        let summary = summarize_by_category(&expenses);
        assert_eq!(
            summary,
            vec![
                CategorySpending {
                    category: "Bills".to_string(),
                    total: 4.5
                },
                CategorySpending {
                    category: "Food".to_string(),
                    total: 12.5
                },
            ]
        );
        assert!(summarize_by_category(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_habit_month_grid() -> Result<()> {
        let (db, read) = setup_with_habit("Read").await?;
        let walk = create_test_habit(&db, "Walk").await?;
        let habits = HabitService::new(&db);

        habits.toggle_completion(read.id, date(2024, 1, 31)).await?;
        habits.toggle_completion(read.id, date(2024, 2, 1)).await?;
        habits.toggle_completion(read.id, date(2024, 2, 29)).await?;
        habits.toggle_completion(read.id, date(2024, 3, 1)).await?;

        let month = habit_month(&db, 2024, 2).await?;
        assert_eq!(month.first_day, date(2024, 2, 1));
        assert_eq!(month.days_in_month, 29);
        assert_eq!(month.rows.len(), 2);

        assert_eq!(month.rows[0].habit, read);
        assert_eq!(month.rows[0].completed_days, BTreeSet::from([1, 29]));
        assert!(month.rows[0].is_completed_on(29));
        assert!(!month.rows[0].is_completed_on(2));

        assert_eq!(month.rows[1].habit, walk);
        assert!(month.rows[1].completed_days.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_habit_month_rejects_invalid_month() -> Result<()> {
        let db = setup_test_db().await?;
        let result = habit_month(&db, 2024, 13).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_spending_by_category_for_year() -> Result<()> {
        let db = setup_test_db().await?;
        let finance = FinanceService::new(&db);

        finance
            .add_expense(NewExpense::new(date(2024, 2, 1), 20.0, "Visa", "Food"))
            .await?;
        finance
            .add_expense(NewExpense::new(date(2024, 3, 1), 5.0, "Visa", "Transport"))
            .await?;
        finance
            .add_expense(NewExpense::new(date(2024, 4, 1), 10.0, "Amex", "Food"))
            .await?;
        finance
            .add_expense(NewExpense::new(date(2023, 4, 1), 99.0, "Amex", "Food"))
            .await?;

        let summary = spending_by_category(&db, 2024).await?;
        assert_eq!(summary.year, 2024);
        assert_eq!(summary.total, 35.0);
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories[0].category, "Food");
        assert_eq!(summary.categories[0].total, 30.0);
        assert_eq!(summary.categories[1].category, "Transport");
        Ok(())
    }

    #[tokio::test]
    async fn test_debt_summary_skips_settled_cards() -> Result<()> {
        let db = setup_test_db().await?;
        let finance = FinanceService::new(&db);

        add_test_expense(&db, date(2024, 5, 1), 40.0, "Visa").await?;
        let paid = add_test_expense(&db, date(2024, 5, 1), 15.0, "Amex").await?;
        add_test_expense(&db, date(2024, 5, 2), 2.5, "Visa").await?;
        finance.delete_expense(paid.id).await?;

        let summary = debt_summary(&db).await?;
        assert_eq!(summary.cards.len(), 1);
        assert_eq!(summary.cards[0].card_name, "Visa");
        assert_eq!(summary.total_debt, 42.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_dashboard_and_render() -> Result<()> {
        let (db, habit) = setup_with_habit("Exercise").await?;
        let today = date(2024, 6, 15);
        HabitService::new(&db)
            .toggle_completion(habit.id, date(2024, 6, 3))
            .await?;
        FinanceService::new(&db)
            .add_expense(
                NewExpense::new(date(2024, 6, 1), 50.0, "Visa", "Food").with_description("lunch"),
            )
            .await?;
        add_test_expense(&db, date(2024, 6, 2), 30.0, "Visa").await?;

        let settings = Settings {
            recent_expense_limit: 1,
            categories: vec!["Food".to_string(), "Rent".to_string()],
            ..Settings::default()
        };
        let dashboard = load_dashboard(&db, today, &settings).await?;

        assert_eq!(dashboard.habits.days_in_month, 30);
        assert!(dashboard.habits.rows[0].is_completed_on(3));
        assert_eq!(dashboard.spending.total, 80.0);
        assert_eq!(dashboard.debt.total_debt, 80.0);
        assert_eq!(dashboard.recent_expenses.len(), 1);
        assert_eq!(dashboard.recent_expenses[0].date, date(2024, 6, 2));
        assert_eq!(dashboard.categories, vec!["Food", "Rent"]);

        let text = dashboard.to_string();
        assert!(text.contains("Habit Tracker - June 2024"));
        assert!(text.contains("Exercise"));
        assert!(text.contains("Debt by Card (Total: ₹80.00)"));
        assert!(text.contains("₹30.00"));
        assert!(text.contains("Categories: Food, Rent"));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_dashboard_renders_placeholders() -> Result<()> {
        let db = setup_test_db().await?;
        let dashboard = load_dashboard(&db, date(2024, 1, 1), &Settings::default()).await?;

        let text = dashboard.to_string();
        assert!(text.contains("No habits added yet."));
        assert!(text.contains("No expenses recorded for this year yet."));
        assert!(text.contains("No card debt recorded yet."));
        assert!(text.contains("No expenses recorded yet."));
        assert!(text.contains("Categories: Food, Transport, Entertainment"));
        Ok(())
    }
}
