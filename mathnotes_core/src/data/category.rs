use serde::{Deserialize, Serialize};

use super::id::entity_id;

entity_id!(
    /// The id of a category. Formulas refer to their category by this id.
    CategoryId
);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// A short label for the category, e.g. "Algebra". Never blank.
    pub name: String,
}
