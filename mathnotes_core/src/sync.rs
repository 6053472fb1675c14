//! Mutations of the catalog, expressed as transactions that can be applied to
//! the in-memory copy ahead of the backing store and rolled back if the store
//! rejects them.

pub mod transaction;

use crate::data::{Catalog, Category, CategoryId, Formula, FormulaId};
use crate::store::{Collection, StoreApi, StoreError};

pub use transaction::{execute_all_or_roll_back, Rollback, Transaction, TransactionError};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CatalogTx {
    /// Appends a category to the end of the category list.
    AddCategory(Category),
    RemoveCategory(CategoryId),
    /// Puts a formula at the front of the formula list.
    AddFormula(Formula),
    RemoveFormula(FormulaId),
}

impl CatalogTx {
    /// Sends the request that makes the backing store apply this transaction.
    pub async fn push<S: StoreApi>(&self, store: &S) -> Result<(), StoreError> {
        match self {
            CatalogTx::AddCategory(category) => store.create(category).await,
            CatalogTx::RemoveCategory(id) => store.delete(Collection::Categories, id.0).await,
            CatalogTx::AddFormula(formula) => store.create(formula).await,
            CatalogTx::RemoveFormula(id) => store.delete(Collection::Formulas, id.0).await,
        }
    }
}

impl Transaction<Catalog> for CatalogTx {
    fn execute(&self, catalog: &mut Catalog) -> Result<Rollback<Catalog>, TransactionError> {
        match self {
            CatalogTx::AddCategory(category) => {
                if catalog.get_category(category.id).is_some() {
                    return Err(TransactionError::DuplicateId(category.id.0));
                }
                catalog.categories.push(category.clone());
                let id = category.id;
                Ok(Box::new(move |catalog| {
                    let popped = catalog.categories.pop();
                    debug_assert!(
                        popped.is_some_and(|category| category.id == id),
                        "rollback from different state than expected"
                    );
                }))
            }
            &CatalogTx::RemoveCategory(id) => {
                let index = catalog
                    .categories
                    .iter()
                    .position(|category| category.id == id)
                    .ok_or(TransactionError::NotFound(id.0))?;
                let removed = catalog.categories.remove(index);
                Ok(Box::new(move |catalog| catalog.categories.insert(index, removed.clone())))
            }
            CatalogTx::AddFormula(formula) => {
                if catalog.get_formula(formula.id).is_some() {
                    return Err(TransactionError::DuplicateId(formula.id.0));
                }
                catalog.formulas.insert(0, formula.clone());
                let id = formula.id;
                Ok(Box::new(move |catalog| {
                    let removed = catalog.formulas.remove(0);
                    debug_assert!(removed.id == id, "rollback from different state than expected");
                }))
            }
            &CatalogTx::RemoveFormula(id) => {
                let index = catalog
                    .formulas
                    .iter()
                    .position(|formula| formula.id == id)
                    .ok_or(TransactionError::NotFound(id.0))?;
                let removed = catalog.formulas.remove(index);
                Ok(Box::new(move |catalog| catalog.formulas.insert(index, removed.clone())))
            }
        }
    }
}
