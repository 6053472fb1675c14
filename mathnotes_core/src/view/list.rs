use crate::coordinator::Coordinator;
use crate::data::{Catalog, Formula, FormulaId};
use crate::query::{CategoryFilter, FormulaQuery};
use crate::store::StoreApi;

use super::{preview, Notice, Preview, Typesetter};

/// Shown instead of the list when no formula passes the filters.
pub const NO_MATCHES: &str = "No formulas match the criteria.";

/// The formula list with its search box and category filter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormulaListView {
    pub query: FormulaQuery,
}

/// A formula as displayed in the list.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FormulaCard<'a> {
    pub formula: &'a Formula,
    pub category_name: &'a str,
    pub display: Preview,
}

/// An entry of the category filter.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FilterOption {
    pub filter: CategoryFilter,
    /// The category name followed by the number of its formulas.
    pub label: String,
}

impl FormulaListView {
    pub fn new(query: FormulaQuery) -> Self {
        FormulaListView { query }
    }

    /// The count shown in the list heading: every formula in the catalog,
    /// whatever the filters.
    pub fn heading_count(catalog: &Catalog) -> usize {
        catalog.formulas.len()
    }

    /// The formulas that pass the current filters, in catalog order.
    pub fn visible<'a>(
        &self,
        catalog: &'a Catalog,
        typesetter: &dyn Typesetter,
    ) -> Vec<FormulaCard<'a>> {
        self.query
            .apply(&catalog.formulas)
            .into_iter()
            .map(|formula| FormulaCard {
                formula,
                category_name: catalog.category_name(formula.category_id),
                display: preview(typesetter, &formula.latex),
            })
            .collect()
    }

    /// The choices of the category filter: everything first, then each
    /// category in order.
    pub fn filter_options(catalog: &Catalog) -> Vec<FilterOption> {
        let all = FilterOption {
            filter: CategoryFilter::All,
            label: format!("All ({})", catalog.formulas.len()),
        };
        let categories = catalog.category_counts().into_iter().map(|(category, count)| {
            FilterOption {
                filter: CategoryFilter::Only(category.id),
                label: format!("{} ({})", category.name, count),
            }
        });
        std::iter::once(all).chain(categories).collect()
    }

    pub async fn delete<S: StoreApi>(
        coordinator: &mut Coordinator<S>,
        id: FormulaId,
    ) -> Result<(), Notice> {
        Ok(coordinator.delete_formula(id).await?)
    }
}
