//! Core of the Math Notes catalog: the formula and category collections, the
//! client for the backing store, and the state that front-ends render.

pub mod coordinator;
pub mod data;
pub mod digest;
pub mod query;
pub mod store;
pub mod sync;
pub mod view;

pub use coordinator::{CatalogError, Coordinator, Phase, Ticket, ValidationError};
pub use data::{Catalog, Category, CategoryId, Formula, FormulaId, NewFormula, UNKNOWN_CATEGORY};
pub use query::{CategoryFilter, FormulaQuery};
pub use store::{HttpStore, MemoryStore, StoreApi, StoreConfig, StoreError};
