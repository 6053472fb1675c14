mod category;
mod formula;
pub(crate) mod id;

use crate::digest::{hash_digest, DigestOutput, Digestible};

pub use category::{Category, CategoryId};
pub use formula::{format_created_at, Formula, FormulaId, NewFormula};
pub use id::IdGenerator;

/// The label shown for a formula whose category cannot be found.
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// The in-memory copy of both collections of the backing store.
///
/// Order is significant: categories are listed in the order they were
/// created, while new formulas go to the front.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub formulas: Vec<Formula>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, formulas: Vec<Formula>) -> Self {
        Catalog { categories, formulas }
    }

    pub fn get_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn get_formula(&self, id: FormulaId) -> Option<&Formula> {
        self.formulas.iter().find(|formula| formula.id == id)
    }

    /// Returns the name of the category with the given id, or
    /// [`UNKNOWN_CATEGORY`] if there is no such category.
    pub fn category_name(&self, id: CategoryId) -> &str {
        crate::query::category_name(&self.categories, id)
    }

    /// The number of formulas that belong to the given category.
    pub fn formulas_in(&self, id: CategoryId) -> usize {
        self.formulas.iter().filter(|formula| formula.category_id == id).count()
    }

    /// Whether any formula refers to the given category. A category in use
    /// must not be deleted.
    pub fn is_category_in_use(&self, id: CategoryId) -> bool {
        self.formulas.iter().any(|formula| formula.category_id == id)
    }

    /// Pairs every category with the number of formulas that belong to it, in
    /// category order.
    pub fn category_counts(&self) -> Vec<(&Category, usize)> {
        self.categories.iter().map(|category| (category, self.formulas_in(category.id))).collect()
    }

    /// The largest id of any entity in the catalog, if there are any.
    pub fn max_id(&self) -> Option<u64> {
        let category_ids = self.categories.iter().map(|category| category.id.0);
        let formula_ids = self.formulas.iter().map(|formula| formula.id.0);
        category_ids.chain(formula_ids).max()
    }
}

impl Digestible for Catalog {
    fn digest(&self) -> DigestOutput {
        hash_digest(self)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub fn category(id: u64, name: &str) -> Category {
        Category { id: CategoryId(id), name: name.to_string() }
    }

    pub fn formula(id: u64, category_id: u64, description: &str, latex: &str) -> Formula {
        Formula {
            id: FormulaId(id),
            latex: latex.to_string(),
            description: description.to_string(),
            category_id: CategoryId(category_id),
            created_at: "01.01.2024".to_string(),
        }
    }

    #[test]
    fn unknown_category_falls_back() {
        let catalog = Catalog::new(vec![category(1, "Algebra")], vec![]);
        assert_eq!(catalog.category_name(CategoryId(1)), "Algebra");
        assert_eq!(catalog.category_name(CategoryId(2)), UNKNOWN_CATEGORY);
    }

    #[test]
    fn category_usage() {
        let catalog = Catalog::new(
            vec![category(1, "Algebra"), category(2, "Geometry")],
            vec![formula(10, 1, "", "a+b"), formula(11, 1, "", "a-b")],
        );
        assert!(catalog.is_category_in_use(CategoryId(1)));
        assert!(!catalog.is_category_in_use(CategoryId(2)));
        assert_eq!(catalog.formulas_in(CategoryId(1)), 2);
        assert_eq!(
            catalog.category_counts(),
            vec![(&catalog.categories[0], 2), (&catalog.categories[1], 0)]
        );
    }

    #[test]
    fn max_id_spans_both_collections() {
        assert_eq!(Catalog::default().max_id(), None);
        let catalog = Catalog::new(vec![category(50, "Algebra")], vec![formula(10, 50, "", "x")]);
        assert_eq!(catalog.max_id(), Some(50));
    }

    #[test]
    fn digest_tracks_contents() {
        let a = Catalog::new(vec![category(1, "Algebra")], vec![]);
        let mut b = a.clone();
        assert_eq!(a.digest(), b.digest());
        b.categories[0].name = "Analysis".to_string();
        assert_ne!(a.digest(), b.digest());
    }
}
