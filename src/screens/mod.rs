//! The list / edit-in-dialog / delete-with-confirmation screens.
//!
//! [`CrudScreen`] holds the interaction shared by every entity family; the
//! product and user modules add their typed field edits and table extras.

use std::sync::Arc;

use futures::future::join_all;

use crate::{
    error::{AppError, AppResult, ErrorKind},
    models::{Entity, EntityId},
    notify::{Notification, Notifier},
    services::CrudResource,
    store::ScreenStore,
    validation::FieldErrors,
};

pub mod products;
pub mod users;

pub use products::{ProductField, ProductScreen, ReferenceData, VariantField};
pub use users::{UserField, UserScreen};

/// Per-entity knobs of the generic screen.
pub trait CrudForm: Entity + Default {
    /// Singular label used in notifications, e.g. "Product".
    const LABEL: &'static str;
    /// Plural, lower-case, e.g. "products".
    const PLURAL: &'static str;

    type Options: Copy + Default + Send + Sync;

    fn validate(&self, options: Self::Options) -> Result<(), FieldErrors>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    Idle,
    EditingNew,
    EditingExisting,
    Submitting,
}

pub struct CrudScreen<E: CrudForm, R: CrudResource<E>> {
    resource: Arc<R>,
    notifier: Arc<dyn Notifier>,
    options: E::Options,
    query: R::Query,
    store: ScreenStore<E>,
}

impl<E, R> CrudScreen<E, R>
where
    E: CrudForm,
    R: CrudResource<E>,
{
    pub fn new(resource: Arc<R>, notifier: Arc<dyn Notifier>, options: E::Options) -> Self {
        Self {
            resource,
            notifier,
            options,
            query: R::Query::default(),
            store: ScreenStore::default(),
        }
    }

    pub fn store(&self) -> &ScreenStore<E> {
        &self.store
    }

    pub fn query(&self) -> &R::Query {
        &self.query
    }

    pub fn phase(&self) -> ScreenPhase {
        if self.store.submitting {
            ScreenPhase::Submitting
        } else if !self.store.dialog_open {
            ScreenPhase::Idle
        } else if self.store.buffer.as_ref().and_then(Entity::id).is_some() {
            ScreenPhase::EditingExisting
        } else {
            ScreenPhase::EditingNew
        }
    }

    pub fn buffer(&self) -> Option<&E> {
        self.store.buffer.as_ref()
    }

    /// Errors to show inline; empty until a save has been attempted.
    pub fn field_errors(&self) -> &FieldErrors {
        &self.store.field_errors
    }

    pub fn can_save(&self) -> bool {
        self.store.dialog_open && !self.store.submitting
    }

    /// Fetches the current page. The store shows `loading` for the duration.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let result = {
            let _loading = Busy::set(&mut self.store.loading);
            self.resource.list(&self.query).await
        };
        match result {
            Ok(page) => {
                self.store.set_page(page);
                Ok(())
            }
            Err(err) => {
                self.report(&err, format!("Failed to fetch {}", E::PLURAL));
                Err(err)
            }
        }
    }

    /// Replaces the query and fetches with it.
    pub async fn list(&mut self, query: R::Query) -> AppResult<&[E]> {
        self.query = query;
        self.refresh().await?;
        Ok(&self.store.items)
    }

    pub fn open_create(&mut self) {
        self.store.open_dialog(E::default());
    }

    pub fn open_edit(&mut self, entity: &E) {
        self.store.open_dialog(entity.clone());
    }

    pub fn hide_dialog(&mut self) {
        self.store.close_dialog();
    }

    /// Applies a pure edit to the buffer. No-op when no dialog is open.
    pub fn edit(&mut self, f: impl FnOnce(E) -> E) {
        if let Some(buffer) = self.store.buffer.take() {
            self.store.buffer = Some(f(buffer));
        }
    }

    pub fn try_edit(&mut self, f: impl FnOnce(E) -> AppResult<E>) -> AppResult<()> {
        let buffer = self.store.buffer.clone().ok_or(AppError::NothingToSave)?;
        self.store.buffer = Some(f(buffer)?);
        Ok(())
    }

    pub async fn save(&mut self) -> AppResult<E> {
        if self.store.submitting {
            return Err(AppError::SaveInFlight);
        }
        self.store.submitted = true;
        let buffer = self.store.buffer.clone().ok_or(AppError::NothingToSave)?;

        if let Err(errors) = buffer.validate(self.options) {
            tracing::debug!(entity = E::LABEL, errors = %errors, "validation failed");
            self.store.field_errors = errors.clone();
            return Err(AppError::Validation(errors));
        }
        self.store.field_errors = FieldErrors::default();

        let result = {
            let _submitting = Busy::set(&mut self.store.submitting);
            match buffer.id() {
                Some(id) => self.resource.update(id, &buffer).await,
                None => self.resource.create(&buffer).await,
            }
        };

        match result {
            Ok(saved) => {
                let verb = if buffer.id().is_some() { "updated" } else { "created" };
                self.store.close_dialog();
                self.notifier.show(Notification::success(format!(
                    "{} {verb} successfully",
                    E::LABEL
                )));
                self.refresh_after_mutation().await;
                Ok(saved)
            }
            Err(err) => {
                self.report(&err, format!("Failed to save {}", E::LABEL.to_lowercase()));
                Err(err)
            }
        }
    }

    pub fn confirm_delete(&mut self, entity: &E) {
        self.store.pending_delete = Some(entity.clone());
        self.store.delete_dialog_open = true;
    }

    pub fn cancel_delete(&mut self) {
        self.store.pending_delete = None;
        self.store.delete_dialog_open = false;
    }

    /// Deletes the row awaiting confirmation.
    pub async fn remove_confirmed(&mut self) -> AppResult<()> {
        let entity = self.store.pending_delete.clone().ok_or(AppError::NoSelection)?;
        self.remove(&entity).await
    }

    pub async fn remove(&mut self, entity: &E) -> AppResult<()> {
        let id = entity.id().cloned().ok_or(AppError::NoSelection)?;
        match self.resource.delete(&id).await {
            Ok(()) => {
                self.store.remove_item(&id);
                self.store.deselect(&id);
                self.cancel_delete();
                self.notifier.show(Notification::success(format!(
                    "{} deleted successfully",
                    E::LABEL
                )));
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(err) => {
                self.report(&err, format!("Failed to delete {}", E::LABEL.to_lowercase()));
                Err(err)
            }
        }
    }

    pub fn set_selection(&mut self, entities: Vec<E>) {
        self.store.set_selection(entities);
    }

    pub fn toggle_selection(&mut self, entity: &E) {
        self.store.toggle_selection(entity);
    }

    pub fn selection(&self) -> &[E] {
        &self.store.selected
    }

    /// Opens the bulk confirmation; refused while nothing is selected.
    pub fn confirm_delete_selected(&mut self) -> AppResult<()> {
        if self.store.selected.is_empty() {
            return Err(AppError::NoSelection);
        }
        self.store.bulk_delete_dialog_open = true;
        Ok(())
    }

    pub fn cancel_delete_selected(&mut self) {
        self.store.bulk_delete_dialog_open = false;
    }

    /// One concurrent delete per selected row. Succeeds only if every delete
    /// does; otherwise a single failure is reported with no per-row detail,
    /// even though some rows may already be gone on the server.
    pub async fn remove_selected(&mut self) -> AppResult<()> {
        let ids: Vec<EntityId> = self
            .store
            .selected
            .iter()
            .filter_map(|e| e.id().cloned())
            .collect();
        if ids.is_empty() {
            return Err(AppError::NoSelection);
        }

        let resource = &self.resource;
        let results = join_all(ids.iter().map(|id| resource.delete(id))).await;

        if let Some(err) = results.into_iter().find_map(Result::err) {
            self.report(&err, format!("Failed to delete {}", E::PLURAL));
            return Err(err);
        }

        for id in &ids {
            self.store.remove_item(id);
        }
        self.store.clear_selection();
        self.store.bulk_delete_dialog_open = false;
        self.notifier.show(Notification::success(format!(
            "{} deleted successfully",
            capitalize(E::PLURAL)
        )));
        self.refresh_after_mutation().await;
        Ok(())
    }

    /// The mutation already invalidated the cache; wait for the new list so
    /// the table never shows the pre-mutation rows after the dialog closes.
    async fn refresh_after_mutation(&mut self) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, entity = E::LABEL, "refetch after mutation failed");
        }
    }

    fn report(&self, err: &AppError, detail: String) {
        tracing::warn!(error = %err, entity = E::LABEL, "{detail}");
        let detail = match err.kind() {
            ErrorKind::SessionExpired => "Session expired, please sign in again".to_string(),
            _ => detail,
        };
        self.notifier.show(Notification::error(detail));
    }

    pub(crate) fn query_mut(&mut self) -> &mut R::Query {
        &mut self.query
    }

    pub(crate) fn store_mut(&mut self) -> &mut ScreenStore<E> {
        &mut self.store
    }
}

/// Holds a store flag up for the lifetime of an awaited request. Dropping it,
/// including when the caller drops the request future, lowers the flag.
struct Busy<'a>(&'a mut bool);

impl<'a> Busy<'a> {
    fn set(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use futures::FutureExt;

    use super::*;
    use crate::{
        models::Product, notify::Toasts, response::Page, validation::ProductFormOptions,
    };

    /// A backend that accepts requests and never answers.
    struct Stalled;

    #[async_trait]
    impl CrudResource<Product> for Stalled {
        type Query = ();

        async fn list(&self, _query: &()) -> AppResult<Page<Product>> {
            futures::future::pending().await
        }

        async fn create(&self, _entity: &Product) -> AppResult<Product> {
            futures::future::pending().await
        }

        async fn update(&self, _id: &EntityId, _entity: &Product) -> AppResult<Product> {
            futures::future::pending().await
        }

        async fn delete(&self, _id: &EntityId) -> AppResult<()> {
            futures::future::pending().await
        }
    }

    fn stalled_screen() -> CrudScreen<Product, Stalled> {
        CrudScreen::new(
            Arc::new(Stalled),
            Arc::new(Toasts::new()),
            ProductFormOptions::default(),
        )
    }

    fn named(product: Product) -> Product {
        Product {
            name: "Cap".into(),
            ..product
        }
    }

    #[test]
    fn abandoned_save_releases_the_form() {
        let mut screen = stalled_screen();
        screen.open_create();
        screen.edit(named);

        // Poll once so the request is in flight, then give up on it.
        assert!(screen.save().now_or_never().is_none());
        assert!(!screen.store().submitting);
        assert_eq!(screen.phase(), ScreenPhase::EditingNew);
        assert!(screen.can_save());

        screen.hide_dialog();
        screen.open_create();
        screen.edit(named);
        // Reaches the backend again instead of failing with SaveInFlight.
        assert!(screen.save().now_or_never().is_none());
        assert_eq!(screen.phase(), ScreenPhase::EditingNew);
    }

    #[test]
    fn abandoned_refresh_clears_loading() {
        let mut screen = stalled_screen();
        assert!(screen.refresh().now_or_never().is_none());
        assert!(!screen.store().loading);
    }

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("products"), "Products");
        assert_eq!(capitalize(""), "");
    }
}
