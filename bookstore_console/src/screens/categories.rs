use bookstore_repository::api::Category;

use crate::backend::BookstoreBackend;
use crate::forms::{CategoryForm, SubmitError};
use crate::screens::resource::{ResourceKind, ResourceScreen};

pub struct CategoryResource;

pub type CategoriesScreen = ResourceScreen<CategoryResource>;

#[async_trait::async_trait]
impl ResourceKind for CategoryResource {
    type Record = Category;
    type Form = CategoryForm;

    const NOUN: &'static str = "category";

    fn id(record: &Category) -> i32 {
        record.category_id
    }

    fn label(record: &Category) -> &str {
        &record.category_name
    }

    fn form_for(record: &Category) -> CategoryForm {
        CategoryForm::from_category(record)
    }

    async fn fetch(backend: &dyn BookstoreBackend) -> anyhow::Result<Vec<Category>> {
        backend.list_categories().await
    }

    async fn create(backend: &dyn BookstoreBackend, form: &CategoryForm) -> Result<(), SubmitError> {
        let category = form.to_new_category()?;
        Ok(backend.add_category(category).await?)
    }

    async fn update(
        backend: &dyn BookstoreBackend,
        id: i32,
        form: &CategoryForm,
    ) -> Result<(), SubmitError> {
        let patch = form.to_patch()?;
        Ok(backend.update_category(id, patch).await?)
    }

    async fn delete(backend: &dyn BookstoreBackend, id: i32) -> anyhow::Result<()> {
        backend.delete_category(id).await
    }
}
