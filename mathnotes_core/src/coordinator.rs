//! The owner of the in-memory catalog.
//!
//! Every mutation is first applied to the in-memory copy (so front-ends can
//! show it right away) and then sent to the backing store. If the store
//! rejects it, the mutation is rolled back and the error is handed to the
//! caller, so the in-memory copy never silently drifts from the store.

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::{
    format_created_at, Catalog, Category, CategoryId, FormulaId, IdGenerator, NewFormula,
};
use crate::digest::Digestible;
use crate::store::{self, StoreApi, StoreError};
use crate::sync::{execute_all_or_roll_back, CatalogTx, Rollback, Transaction, TransactionError};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Phase {
    /// The initial download has not finished yet.
    Loading,
    Ready,
    /// The initial download failed. Nothing but the message can be shown.
    Error(String),
}

/// Identifies a mutation that has been applied locally but not yet confirmed
/// by the backing store.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct Ticket(u64);

struct Pending {
    ticket: Ticket,
    transaction: CatalogTx,
    rollback: Rollback<Catalog>,
}

pub struct Coordinator<S: StoreApi> {
    store: S,
    phase: Phase,
    /// The catalog as last downloaded, with all pending mutations applied on
    /// top of it.
    catalog: Catalog,
    /// Mutations applied to `self.catalog` that the store has not confirmed
    /// yet, oldest first.
    pending: Vec<Pending>,
    next_ticket: u64,
    ids: IdGenerator,
    clock: fn() -> DateTime<Local>,
}

impl<S: StoreApi> Coordinator<S> {
    /// Creates a coordinator in the loading phase. Nothing can be mutated
    /// until [`Coordinator::initial_load`] succeeds.
    pub fn new(store: S) -> Self {
        Coordinator {
            store,
            phase: Phase::Loading,
            catalog: Catalog::default(),
            pending: Vec::new(),
            next_ticket: 0,
            ids: IdGenerator::new(),
            clock: Local::now,
        }
    }

    /// Replaces the source of creation dates.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a coordinator and performs the initial download.
    pub async fn load(store: S) -> Self {
        let mut coordinator = Self::new(store);
        coordinator.initial_load().await;
        coordinator
    }

    /// Downloads both collections and leaves the loading phase, either for
    /// the ready phase or, if any download fails, for the error phase. Does
    /// nothing once the loading phase is over.
    pub async fn initial_load(&mut self) {
        if self.phase != Phase::Loading {
            return;
        }
        match store::list_all(&self.store).await {
            Ok(catalog) => {
                info!(
                    categories = catalog.categories.len(),
                    formulas = catalog.formulas.len(),
                    "catalog loaded"
                );
                self.adopt(catalog);
                self.phase = Phase::Ready;
            }
            Err(err) => {
                warn!(error = %err, "initial load failed");
                self.phase = Phase::Error(err.to_string());
            }
        }
    }

    /// Downloads both collections again, replacing the in-memory copy so that
    /// changes made to the store by others become visible. Pending mutations
    /// are replayed on top of the fresh data. Returns whether anything
    /// changed.
    pub async fn refresh(&mut self) -> Result<bool, CatalogError> {
        self.ensure_ready()?;
        let mut fresh = store::list_all(&self.store).await?;
        let rollbacks = execute_all_or_roll_back(
            &mut fresh,
            self.pending.iter().map(|pending| &pending.transaction),
        )
        .map_err(|(err, index)| {
            warn!(error = %err, index, "pending mutation conflicts with refreshed catalog");
            err
        })?;
        for (pending, rollback) in self.pending.iter_mut().zip(rollbacks) {
            pending.rollback = rollback;
        }

        let changed = fresh.digest() != self.catalog.digest();
        self.adopt(fresh);
        info!(changed, "catalog refreshed");
        Ok(changed)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The number of mutations that are awaiting confirmation by the store.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Creates a category with the given name and stores it.
    pub async fn add_category(&mut self, name: &str) -> Result<CategoryId, CatalogError> {
        let (ticket, id) = self.stage_new_category(name)?;
        self.commit(ticket).await?;
        Ok(id)
    }

    /// Deletes a category, unless a formula still belongs to it. A refused
    /// deletion sends no request.
    pub async fn delete_category(&mut self, id: CategoryId) -> Result<(), CatalogError> {
        let ticket = self.stage_category_removal(id)?;
        self.commit(ticket).await
    }

    /// Creates a formula, assigning its id and creation date, and stores it.
    pub async fn add_formula(&mut self, new_formula: NewFormula) -> Result<FormulaId, CatalogError> {
        let (ticket, id) = self.stage_new_formula(new_formula)?;
        self.commit(ticket).await?;
        Ok(id)
    }

    pub async fn delete_formula(&mut self, id: FormulaId) -> Result<(), CatalogError> {
        let ticket = self.stage_formula_removal(id)?;
        self.commit(ticket).await
    }

    /// Validates and builds a new category and applies it locally. The
    /// category is appended to the category list.
    pub fn stage_new_category(&mut self, name: &str) -> Result<(Ticket, CategoryId), CatalogError> {
        self.ensure_ready()?;
        if name.trim().is_empty() {
            return Err(ValidationError::BlankCategoryName.into());
        }
        let id = CategoryId(self.ids.next_id());
        let ticket = self.stage(CatalogTx::AddCategory(Category { id, name: name.to_string() }))?;
        Ok((ticket, id))
    }

    pub fn stage_category_removal(&mut self, id: CategoryId) -> Result<Ticket, CatalogError> {
        self.ensure_ready()?;
        let formulas = self.catalog.formulas_in(id);
        if formulas > 0 {
            debug!(%id, formulas, "refusing to delete category in use");
            return Err(CatalogError::CategoryInUse { id, formulas });
        }
        self.stage(CatalogTx::RemoveCategory(id))
    }

    /// Validates and builds a new formula and applies it locally. The formula
    /// goes to the front of the formula list.
    pub fn stage_new_formula(
        &mut self,
        new_formula: NewFormula,
    ) -> Result<(Ticket, FormulaId), CatalogError> {
        self.ensure_ready()?;
        if new_formula.latex.trim().is_empty() {
            return Err(ValidationError::BlankLatex.into());
        }
        if new_formula.category_id.0 == 0 {
            return Err(ValidationError::NoCategorySelected.into());
        }
        let id = FormulaId(self.ids.next_id());
        let created_at = format_created_at(&(self.clock)());
        let ticket = self.stage(CatalogTx::AddFormula(new_formula.into_formula(id, created_at)))?;
        Ok((ticket, id))
    }

    pub fn stage_formula_removal(&mut self, id: FormulaId) -> Result<Ticket, CatalogError> {
        self.ensure_ready()?;
        self.stage(CatalogTx::RemoveFormula(id))
    }

    /// Sends a staged mutation to the backing store. If the store rejects it,
    /// the mutation is undone locally; mutations staged after it stay applied.
    pub async fn commit(&mut self, ticket: Ticket) -> Result<(), CatalogError> {
        let transaction = self
            .pending
            .iter()
            .find(|pending| pending.ticket == ticket)
            .map(|pending| pending.transaction.clone())
            .ok_or(CatalogError::UnknownTicket(ticket))?;

        match transaction.push(&self.store).await {
            Ok(()) => {
                self.pending.retain(|pending| pending.ticket != ticket);
                debug!(?transaction, "mutation confirmed");
                Ok(())
            }
            Err(err) => {
                warn!(?transaction, error = %err, "mutation rejected, rolling back");
                self.revert(ticket);
                Err(err.into())
            }
        }
    }

    fn stage(&mut self, transaction: CatalogTx) -> Result<Ticket, CatalogError> {
        let rollback = transaction.execute(&mut self.catalog)?;
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push(Pending { ticket, transaction, rollback });
        Ok(ticket)
    }

    /// Undoes one pending mutation. Everything staged after it is rolled back
    /// first and replayed afterwards; anything that no longer applies is
    /// dropped.
    fn revert(&mut self, ticket: Ticket) {
        let Some(index) = self.pending.iter().position(|pending| pending.ticket == ticket) else {
            return;
        };
        let later = self.pending.split_off(index);
        for pending in later.iter().rev() {
            (pending.rollback)(&mut self.catalog);
        }
        for pending in later.into_iter().skip(1) {
            match pending.transaction.execute(&mut self.catalog) {
                Ok(rollback) => self.pending.push(Pending { rollback, ..pending }),
                Err(err) => {
                    warn!(transaction = ?pending.transaction, error = %err, "dropping mutation")
                }
            }
        }
    }

    fn adopt(&mut self, catalog: Catalog) {
        if let Some(max_id) = catalog.max_id() {
            self.ids.observe(max_id);
        }
        self.catalog = catalog;
    }

    fn ensure_ready(&self) -> Result<(), CatalogError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(CatalogError::NotReady)
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("The catalog is not loaded.")]
    NotReady,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("This category has formulas assigned to it ({formulas}) and cannot be deleted.")]
    CategoryInUse { id: CategoryId, formulas: usize },
    #[error("The mutation is not pending.")]
    UnknownTicket(Ticket),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input that is rejected before anything is changed.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("The category name must not be blank.")]
    BlankCategoryName,
    #[error("Enter a formula.")]
    BlankLatex,
    #[error("Select a category.")]
    NoCategorySelected,
    #[error("{0:?} is not a category id.")]
    InvalidCategorySelection(String),
}
