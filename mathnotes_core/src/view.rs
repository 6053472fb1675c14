//! Front-end-agnostic state of the three regions of the page: the category
//! manager, the formula form with its live preview, and the filterable
//! formula list.

mod authoring;
mod list;
mod registry;
mod typeset;

use std::fmt;

use crate::coordinator::{CatalogError, ValidationError};

pub use authoring::FormulaForm;
pub use list::{FilterOption, FormulaCard, FormulaListView, NO_MATCHES};
pub use registry::{CategoryRegistryView, CategoryRow};
pub use typeset::{preview, PlainTypesetter, Preview, TypesetError, Typesetter};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum NoticeLevel {
    /// The user asked for something that is not allowed; nothing changed.
    Warning,
    /// Something went wrong on the way to the store; nothing changed.
    Error,
}

/// A message that must be shown to the user right away.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Error, message: message.into() }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<ValidationError> for Notice {
    fn from(err: ValidationError) -> Self {
        Notice::warning(err.to_string())
    }
}

impl From<CatalogError> for Notice {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(err) => err.into(),
            err @ CatalogError::CategoryInUse { .. } => Notice::warning(err.to_string()),
            err => Notice::error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::CategoryId;
    use crate::store::{Collection, StoreError};

    #[test]
    fn refusals_are_warnings_and_failures_are_errors() {
        let refusal = Notice::from(CatalogError::CategoryInUse { id: CategoryId(1), formulas: 2 });
        assert_eq!(refusal.level, NoticeLevel::Warning);
        let validation = Notice::from(CatalogError::Validation(ValidationError::BlankLatex));
        assert_eq!(validation, Notice::warning("Enter a formula."));
        let failure = Notice::from(CatalogError::Store(StoreError::RequestFailed {
            collection: Collection::Formulas,
            status: 503,
        }));
        assert_eq!(failure.level, NoticeLevel::Error);
        assert!(failure.message.contains("503"));
    }
}
