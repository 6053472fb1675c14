use crate::coordinator::Coordinator;
use crate::data::{Catalog, CategoryId};
use crate::store::StoreApi;

use super::Notice;

/// The category manager: the list of categories and the input for a new one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryRegistryView {
    /// The name typed into the "new category" input.
    pub input: String,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CategoryRow<'a> {
    pub id: CategoryId,
    pub name: &'a str,
    /// How many formulas belong to the category. Only categories without
    /// formulas can be deleted.
    pub formulas: usize,
}

impl CategoryRegistryView {
    pub fn rows(catalog: &Catalog) -> Vec<CategoryRow<'_>> {
        catalog
            .category_counts()
            .into_iter()
            .map(|(category, formulas)| CategoryRow {
                id: category.id,
                name: &category.name,
                formulas,
            })
            .collect()
    }

    /// Creates a category named after the input and clears the input. A
    /// blank input is ignored without a notice. On failure the input is kept
    /// so that it can be submitted again.
    pub async fn submit<S: StoreApi>(
        &mut self,
        coordinator: &mut Coordinator<S>,
    ) -> Result<Option<CategoryId>, Notice> {
        if self.input.trim().is_empty() {
            return Ok(None);
        }
        let id = coordinator.add_category(&self.input).await?;
        self.input.clear();
        Ok(Some(id))
    }

    pub async fn delete<S: StoreApi>(
        coordinator: &mut Coordinator<S>,
        id: CategoryId,
    ) -> Result<(), Notice> {
        Ok(coordinator.delete_category(id).await?)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::test::{category, formula};
    use crate::store::{MemoryStore, Request};
    use crate::view::NoticeLevel;

    async fn coordinator(catalog: Catalog) -> Coordinator<MemoryStore> {
        Coordinator::load(MemoryStore::with_catalog(&catalog)).await
    }

    #[tokio::test]
    async fn submit_creates_and_clears() {
        let mut coordinator = coordinator(Catalog::default()).await;
        let mut view = CategoryRegistryView { input: "Algebra".to_string() };
        let id = view.submit(&mut coordinator).await.unwrap().unwrap();
        assert_eq!(view.input, "");
        assert_eq!(
            CategoryRegistryView::rows(coordinator.catalog()),
            vec![CategoryRow { id, name: "Algebra", formulas: 0 }]
        );
    }

    #[tokio::test]
    async fn blank_input_is_silently_ignored() {
        let mut coordinator = coordinator(Catalog::default()).await;
        let mut view = CategoryRegistryView { input: "  ".to_string() };
        assert_eq!(view.submit(&mut coordinator).await, Ok(None));
        assert_eq!(view.input, "  ");
        assert!(coordinator.catalog().categories.is_empty());
        assert_eq!(coordinator.store().requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_submit_keeps_input() {
        let mut coordinator = coordinator(Catalog::default()).await;
        coordinator.store().set_fail_writes(true);
        let mut view = CategoryRegistryView { input: "Algebra".to_string() };
        let notice = view.submit(&mut coordinator).await.unwrap_err();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(view.input, "Algebra");
    }

    #[tokio::test]
    async fn deleting_a_used_category_warns() {
        let mut coordinator = coordinator(Catalog::new(
            vec![category(1, "Algebra"), category(2, "Geometry")],
            vec![formula(10, 1, "Sum", "a+b")],
        ))
        .await;
        let notice = CategoryRegistryView::delete(&mut coordinator, CategoryId(1)).await.unwrap_err();
        assert_eq!(notice.level, NoticeLevel::Warning);

        CategoryRegistryView::delete(&mut coordinator, CategoryId(2)).await.unwrap();
        assert_eq!(
            CategoryRegistryView::rows(coordinator.catalog()),
            vec![CategoryRow { id: CategoryId(1), name: "Algebra", formulas: 1 }]
        );
        let deletes: Vec<_> = coordinator
            .store()
            .requests()
            .into_iter()
            .filter(|request| matches!(request, Request::Delete(..)))
            .collect();
        assert_eq!(deletes.len(), 1);
    }
}
