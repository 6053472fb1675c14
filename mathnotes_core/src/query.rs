//! Filtering of the formula collection for display.
//!
//! Queries are pure: the visible formulas are a function of the full formula
//! collection, a category filter and a search term, and are recomputed from
//! scratch whenever any of the three change.

use crate::data::{Category, CategoryId, Formula, UNKNOWN_CATEGORY};

/// Restricts a query to one category, or lets every category through.
#[derive(Debug, Default, PartialEq, Eq, Hash, Copy, Clone)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    /// Interprets a raw category id as a filter, where `0` stands for every
    /// category.
    pub fn from_raw(raw: u64) -> Self {
        match raw {
            0 => CategoryFilter::All,
            id => CategoryFilter::Only(CategoryId(id)),
        }
    }

    pub fn to_raw(self) -> u64 {
        match self {
            CategoryFilter::All => 0,
            CategoryFilter::Only(id) => id.0,
        }
    }

    pub fn matches(self, formula: &Formula) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => formula.category_id == id,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct FormulaQuery {
    pub category: CategoryFilter,
    /// Free text that must occur in the description or the LaTeX source of a
    /// formula, ignoring case. A blank term matches everything.
    pub search: String,
}

impl FormulaQuery {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        FormulaQuery { category, search: search.into() }
    }

    /// Returns the formulas that pass both filters, in their original order.
    pub fn apply<'a>(&self, formulas: &'a [Formula]) -> Vec<&'a Formula> {
        // the term itself is matched untrimmed; trimming only decides whether
        // the search filter is active at all
        let needle = (!self.search.trim().is_empty()).then(|| self.search.to_lowercase());

        formulas
            .iter()
            .filter(|formula| self.category.matches(formula))
            .filter(|formula| match &needle {
                Some(needle) => {
                    formula.description.to_lowercase().contains(needle.as_str())
                        || formula.latex.to_lowercase().contains(needle.as_str())
                }
                None => true,
            })
            .collect()
    }
}

/// Filters `formulas` by a raw category id (`0` for all categories) and a
/// search term.
pub fn filter_formulas<'a>(formulas: &'a [Formula], category: u64, search: &str) -> Vec<&'a Formula> {
    FormulaQuery::new(CategoryFilter::from_raw(category), search).apply(formulas)
}

/// Looks up the display name of a category. Never fails: unknown ids resolve
/// to [`UNKNOWN_CATEGORY`].
pub fn category_name(categories: &[Category], id: CategoryId) -> &str {
    categories
        .iter()
        .find(|category| category.id == id)
        .map_or(UNKNOWN_CATEGORY, |category| category.name.as_str())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::data::test::{category, formula};

    fn ids(formulas: &[&Formula]) -> Vec<u64> {
        formulas.iter().map(|formula| formula.id.0).collect()
    }

    fn sample() -> Vec<Formula> {
        vec![formula(1, 1, "Circle area", "\\pi r^2"), formula(2, 2, "Line", "y=mx+b")]
    }

    #[test]
    fn search_matches_description_ignoring_case() {
        let formulas = sample();
        assert_eq!(ids(&filter_formulas(&formulas, 0, "circle")), vec![1]);
    }

    #[test]
    fn category_filter_alone() {
        let formulas = sample();
        assert_eq!(ids(&filter_formulas(&formulas, 2, "")), vec![2]);
    }

    #[test]
    fn filters_intersect() {
        let formulas = sample();
        assert_eq!(ids(&filter_formulas(&formulas, 1, "line")), Vec::<u64>::new());
    }

    #[test]
    fn search_matches_latex() {
        let formulas = sample();
        assert_eq!(ids(&filter_formulas(&formulas, 0, "MX")), vec![2]);
        assert_eq!(ids(&filter_formulas(&formulas, 0, "\\pi")), vec![1]);
    }

    #[test]
    fn whitespace_search_is_ignored() {
        let formulas = sample();
        assert_eq!(ids(&filter_formulas(&formulas, 0, "   ")), vec![1, 2]);
    }

    #[test]
    fn padded_search_is_matched_as_typed() {
        let formulas = vec![formula(1, 1, "Circle area", "x"), formula(2, 1, "Circle", "x")];
        assert_eq!(ids(&filter_formulas(&formulas, 0, "circle ")), vec![1]);
    }

    #[test]
    fn unknown_category_filter_matches_nothing() {
        let formulas = sample();
        assert!(filter_formulas(&formulas, 99, "").is_empty());
    }

    #[test]
    fn category_name_lookup() {
        let categories = vec![category(1, "Algebra")];
        assert_eq!(category_name(&categories, CategoryId(1)), "Algebra");
        assert_eq!(category_name(&categories, CategoryId(7)), UNKNOWN_CATEGORY);
        assert_eq!(category_name(&[], CategoryId(1)), UNKNOWN_CATEGORY);
    }

    #[test]
    fn raw_filter_conversion() {
        assert_eq!(CategoryFilter::from_raw(0), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_raw(3), CategoryFilter::Only(CategoryId(3)));
        assert_eq!(CategoryFilter::from_raw(3).to_raw(), 3);
    }

    fn arb_formulas() -> impl Strategy<Value = Vec<Formula>> {
        prop::collection::vec((0u64..4, "[a-cA-C ]{0,6}", "[a-c\\\\^]{0,6}"), 0..12).prop_map(
            |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (category_id, description, latex))| {
                        formula(i as u64 + 1, category_id, &description, &latex)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn result_is_an_ordered_subset(
            formulas in arb_formulas(),
            category in 0u64..4,
            search in "[a-cA-C ]{0,3}",
        ) {
            let result = filter_formulas(&formulas, category, &search);
            let mut remaining = formulas.iter();
            for picked in result {
                prop_assert!(remaining.any(|formula| std::ptr::eq(formula, picked)));
            }
        }

        #[test]
        fn wildcard_filters_are_identity(formulas in arb_formulas()) {
            let result: Vec<Formula> = filter_formulas(&formulas, 0, "").into_iter().cloned().collect();
            prop_assert_eq!(result, formulas);
        }

        #[test]
        fn query_is_idempotent(
            formulas in arb_formulas(),
            category in 0u64..4,
            search in "[a-cA-C ]{0,3}",
        ) {
            let once: Vec<Formula> =
                filter_formulas(&formulas, category, &search).into_iter().cloned().collect();
            let twice: Vec<Formula> =
                filter_formulas(&once, category, &search).into_iter().cloned().collect();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn filter_order_does_not_matter(
            formulas in arb_formulas(),
            category in 0u64..4,
            search in "[a-cA-C ]{0,3}",
        ) {
            let combined = filter_formulas(&formulas, category, &search);
            let search_first: Vec<Formula> =
                filter_formulas(&formulas, 0, &search).into_iter().cloned().collect();
            let then_category = filter_formulas(&search_first, category, "");
            prop_assert_eq!(ids(&combined), ids(&then_category));
        }

        #[test]
        fn unknown_ids_get_the_fallback_name(id in 10u64..) {
            let categories = vec![category(1, "Algebra"), category(2, "Geometry")];
            prop_assert_eq!(category_name(&categories, CategoryId(id)), UNKNOWN_CATEGORY);
        }
    }
}
