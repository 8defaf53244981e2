use crate::backend::BookstoreBackend;
use crate::filter::{filter_records, Searchable};
use crate::forms::{FormFields, SubmitError};
use crate::messages;
use crate::screens::MutationOutcome;
use crate::ConsoleContext;

/// A kind of record managed through a list with create, edit and delete
#[async_trait::async_trait]
pub trait ResourceKind: Send + Sync + 'static {
    type Record: Searchable + Clone + Send + Sync;
    type Form: FormFields + Default + Clone + Send + Sync;

    /// Name used in messages, e.g. "book"
    const NOUN: &'static str;

    fn id(record: &Self::Record) -> i32;
    fn label(record: &Self::Record) -> &str;
    fn form_for(record: &Self::Record) -> Self::Form;

    async fn fetch(backend: &dyn BookstoreBackend) -> anyhow::Result<Vec<Self::Record>>;
    async fn create(backend: &dyn BookstoreBackend, form: &Self::Form) -> Result<(), SubmitError>;
    async fn update(
        backend: &dyn BookstoreBackend,
        id: i32,
        form: &Self::Form,
    ) -> Result<(), SubmitError>;
    async fn delete(backend: &dyn BookstoreBackend, id: i32) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenForm<F> {
    pub target: FormTarget,
    pub fields: F,
}

/// List of records with a text filter and at most one open form
pub struct ResourceScreen<K: ResourceKind> {
    records: Vec<K::Record>,
    filter: String,
    form: Option<OpenForm<K::Form>>,
}

impl<K: ResourceKind> Default for ResourceScreen<K> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            filter: String::new(),
            form: None,
        }
    }
}

impl<K: ResourceKind> ResourceScreen<K> {
    /// Replaces the list with what the server has. On failure the previous list stays
    pub async fn load(&mut self, ctx: &ConsoleContext) {
        match K::fetch(ctx.backend.as_ref()).await {
            Ok(records) => self.records = records,
            Err(err) => tracing::error!(resource = K::NOUN, "Error loading {}s: {:#}", K::NOUN, err),
        }
    }

    pub fn records(&self) -> &[K::Record] {
        &self.records
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn visible_records(&self) -> Vec<&K::Record> {
        filter_records(&self.records, &self.filter)
    }

    pub fn find(&self, id: i32) -> Option<&K::Record> {
        self.records.iter().find(|record| K::id(record) == id)
    }

    pub fn form(&self) -> Option<&OpenForm<K::Form>> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut OpenForm<K::Form>> {
        self.form.as_mut()
    }

    pub fn open_create_form(&mut self) -> &mut OpenForm<K::Form> {
        self.form.insert(OpenForm {
            target: FormTarget::Create,
            fields: K::Form::default(),
        })
    }

    /// Opens the edit form prefilled from the listed record, `None` if the id is not listed
    pub fn open_edit_form(&mut self, id: i32) -> Option<&mut OpenForm<K::Form>> {
        let fields = K::form_for(self.find(id)?);
        Some(self.form.insert(OpenForm {
            target: FormTarget::Edit(id),
            fields,
        }))
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Sends the open form. Success closes it and reloads, any failure leaves it open
    pub async fn submit_form(&mut self, ctx: &ConsoleContext) -> MutationOutcome {
        let Some(form) = &self.form else {
            return MutationOutcome::NoOpenForm;
        };
        let backend = ctx.backend.as_ref();
        let result = match form.target {
            FormTarget::Create => K::create(backend, &form.fields).await,
            FormTarget::Edit(id) => K::update(backend, id, &form.fields).await,
        };
        match result {
            Ok(()) => {
                self.form = None;
                self.load(ctx).await;
                ctx.interaction.notify(&messages::saved(K::NOUN));
                MutationOutcome::Completed
            }
            Err(SubmitError::Invalid(err)) => {
                ctx.interaction.notify(&messages::invalid_form(&err));
                MutationOutcome::Invalid(err)
            }
            Err(SubmitError::Backend(err)) => {
                tracing::error!(resource = K::NOUN, "Error saving {}: {:#}", K::NOUN, err);
                ctx.interaction.notify(&messages::save_failed(K::NOUN));
                MutationOutcome::Failed
            }
        }
    }

    /// Deletes a listed record after the user confirms. An open form is left as it is
    pub async fn delete(&mut self, ctx: &ConsoleContext, id: i32) -> MutationOutcome {
        let Some(record) = self.find(id) else {
            tracing::warn!(resource = K::NOUN, id, "Delete requested for a record not in the list");
            return MutationOutcome::NotListed;
        };
        let question = messages::delete_confirmation(K::NOUN, K::label(record));
        if !ctx.interaction.confirm(&question) {
            return MutationOutcome::Cancelled;
        }
        match K::delete(ctx.backend.as_ref(), id).await {
            Ok(()) => {
                self.load(ctx).await;
                ctx.interaction.notify(&messages::deleted(K::NOUN));
                MutationOutcome::Completed
            }
            Err(err) => {
                tracing::error!(resource = K::NOUN, id, "Error deleting {}: {:#}", K::NOUN, err);
                ctx.interaction.notify(&messages::delete_failed(K::NOUN));
                MutationOutcome::Failed
            }
        }
    }
}
