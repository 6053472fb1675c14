use crate::coordinator::{Coordinator, ValidationError};
use crate::data::{CategoryId, FormulaId, NewFormula};
use crate::store::StoreApi;

use super::{preview, Notice, Preview, Typesetter};

/// The "add formula" form. All fields hold raw input as typed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormulaForm {
    pub latex: String,
    pub description: String,
    /// The id of the selected category as text, empty when nothing is
    /// selected.
    pub selected_category: String,
}

impl FormulaForm {
    /// The live preview of the LaTeX input.
    pub fn preview(&self, typesetter: &dyn Typesetter) -> Preview {
        preview(typesetter, &self.latex)
    }

    pub fn to_new_formula(&self) -> Result<NewFormula, ValidationError> {
        if self.latex.trim().is_empty() {
            return Err(ValidationError::BlankLatex);
        }
        let selected = self.selected_category.trim();
        if selected.is_empty() {
            return Err(ValidationError::NoCategorySelected);
        }
        let category_id = selected
            .parse()
            .map_err(|_| ValidationError::InvalidCategorySelection(selected.to_string()))?;
        Ok(NewFormula {
            latex: self.latex.clone(),
            description: self.description.clone(),
            category_id: CategoryId(category_id),
        })
    }

    /// Creates a formula from the form and resets every field. Invalid input
    /// is reported and leaves everything untouched.
    pub async fn submit<S: StoreApi>(
        &mut self,
        coordinator: &mut Coordinator<S>,
    ) -> Result<FormulaId, Notice> {
        let new_formula = self.to_new_formula()?;
        let id = coordinator.add_formula(new_formula).await?;
        self.reset();
        Ok(id)
    }

    pub fn reset(&mut self) {
        *self = FormulaForm::default();
    }
}
