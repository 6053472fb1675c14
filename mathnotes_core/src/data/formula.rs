use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::{category::CategoryId, id::entity_id};

entity_id!(FormulaId);

/// A stored formula, as it appears in the `formulas` collection.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    pub id: FormulaId,
    /// The LaTeX source of the formula. Never blank.
    pub latex: String,
    /// An optional human description, e.g. "Area of a circle". Empty when
    /// none was given.
    #[serde(default)]
    pub description: String,
    /// The category that this formula belongs to. Nothing guarantees that the
    /// category still exists.
    pub category_id: CategoryId,
    /// The date on which the formula was created, already formatted for
    /// display. It is assigned once and never recomputed.
    #[serde(default)]
    pub created_at: String,
}

/// The user-supplied part of a formula, before an id and a creation date have
/// been assigned.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NewFormula {
    pub latex: String,
    pub description: String,
    pub category_id: CategoryId,
}

impl NewFormula {
    pub fn into_formula(self, id: FormulaId, created_at: String) -> Formula {
        let NewFormula { latex, description, category_id } = self;
        Formula { id, latex, description, category_id, created_at }
    }
}

/// Formats a creation date the way it is stored on formulas, e.g.
/// "18.10.2026".
pub fn format_created_at<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formula_wire_shape() {
        let formula = Formula {
            id: FormulaId(10),
            latex: "\\pi r^2".to_string(),
            description: "Circle area".to_string(),
            category_id: CategoryId(1),
            created_at: "01.02.2024".to_string(),
        };
        let json = serde_json::to_value(&formula).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 10,
                "latex": "\\pi r^2",
                "description": "Circle area",
                "categoryId": 1,
                "createdAt": "01.02.2024",
            })
        );
    }

    #[test]
    fn formula_without_description_parses() {
        let formula: Formula =
            serde_json::from_str(r#"{"id":"7","latex":"y=mx+b","categoryId":2}"#).unwrap();
        assert_eq!(formula.id, FormulaId(7));
        assert_eq!(formula.description, "");
        assert_eq!(formula.category_id, CategoryId(2));
    }

    #[test]
    fn created_at_is_a_display_date() {
        let dt = Utc.with_ymd_and_hms(2024, 2, 1, 13, 30, 0).unwrap();
        assert_eq!(format_created_at(&dt), "01.02.2024");
    }
}
