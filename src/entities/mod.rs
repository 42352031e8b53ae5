//! Entity module - SeaORM definitions for the four dashboard tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod card;
pub mod expense;
pub mod habit;
pub mod habit_entry;

// Re-export specific types to avoid conflicts
pub use card::{Column as CardColumn, Entity as Card, Model as CardModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use habit::{Column as HabitColumn, Entity as Habit, Model as HabitModel};
pub use habit_entry::{
    Column as HabitEntryColumn, Entity as HabitEntry, Model as HabitEntryModel,
};
