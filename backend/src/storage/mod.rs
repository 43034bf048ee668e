//! # Storage Layer
//!
//! Persistence for orders and expenses. The domain layer only talks to the
//! traits in [`traits`]; [`sqlite`] is the one backend shipped today.

pub mod sqlite;
pub mod traits;

pub use sqlite::DbConnection;
pub use traits::{Connection, ExpenseStorage, OrderStorage};
