use futures_util::future::join;

use bookstore_repository::api::{Book, Category};

use crate::backend::BookstoreBackend;
use crate::forms::{BookForm, SubmitError};
use crate::screens::resource::{ResourceKind, ResourceScreen};
use crate::ConsoleContext;

pub struct BookResource;

#[async_trait::async_trait]
impl ResourceKind for BookResource {
    type Record = Book;
    type Form = BookForm;

    const NOUN: &'static str = "book";

    fn id(record: &Book) -> i32 {
        record.book_id
    }

    fn label(record: &Book) -> &str {
        &record.title
    }

    fn form_for(record: &Book) -> BookForm {
        BookForm::from_book(record)
    }

    async fn fetch(backend: &dyn BookstoreBackend) -> anyhow::Result<Vec<Book>> {
        backend.list_books().await
    }

    async fn create(backend: &dyn BookstoreBackend, form: &BookForm) -> Result<(), SubmitError> {
        let book = form.to_new_book()?;
        Ok(backend.add_book(book).await?)
    }

    async fn update(
        backend: &dyn BookstoreBackend,
        id: i32,
        form: &BookForm,
    ) -> Result<(), SubmitError> {
        let patch = form.to_patch()?;
        Ok(backend.update_book(id, patch).await?)
    }

    async fn delete(backend: &dyn BookstoreBackend, id: i32) -> anyhow::Result<()> {
        backend.delete_book(id).await
    }
}

/// Book list plus the categories offered by the book form
#[derive(Default)]
pub struct BooksScreen {
    pub books: ResourceScreen<BookResource>,
    categories: Vec<Category>,
}

impl BooksScreen {
    /// Loads books and categories side by side, each keeps its previous value if its own request fails
    pub async fn load(&mut self, ctx: &ConsoleContext) {
        let (_, categories) = join(self.books.load(ctx), ctx.backend.list_categories()).await;
        match categories {
            Ok(categories) => self.categories = categories,
            Err(err) => tracing::error!("Error loading categories: {:#}", err),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}
