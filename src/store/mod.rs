//! Per-screen UI state: the edit buffer, dialog flags, selection and the
//! loaded page. A store lives exactly as long as the screen that owns it.

use crate::{
    models::{Entity, EntityId, Product, User},
    response::{Page, PaginationMeta},
    routes::params::Pagination,
    validation::FieldErrors,
};

pub type ProductStore = ScreenStore<Product>;
pub type UserStore = ScreenStore<User>;

#[derive(Debug, Clone)]
pub struct ScreenStore<E> {
    pub items: Vec<E>,
    pub pagination: Option<PaginationMeta>,
    pub loading: bool,
    /// Paginator position for tables paged on the client.
    pub paginator: Pagination,
    /// Edit buffer of the form dialog.
    pub buffer: Option<E>,
    pub dialog_open: bool,
    pub submitted: bool,
    pub submitting: bool,
    pub field_errors: FieldErrors,
    /// Row awaiting single-delete confirmation.
    pub pending_delete: Option<E>,
    pub delete_dialog_open: bool,
    pub bulk_delete_dialog_open: bool,
    pub selected: Vec<E>,
}

impl<E> Default for ScreenStore<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
            loading: false,
            paginator: Pagination::default(),
            buffer: None,
            dialog_open: false,
            submitted: false,
            submitting: false,
            field_errors: FieldErrors::default(),
            pending_delete: None,
            delete_dialog_open: false,
            bulk_delete_dialog_open: false,
            selected: Vec::new(),
        }
    }
}

impl<E: Entity> ScreenStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_page(&mut self, page: Page<E>) {
        self.items = page.items;
        self.pagination = Some(page.pagination);
    }

    pub fn open_dialog(&mut self, buffer: E) {
        self.buffer = Some(buffer);
        self.submitted = false;
        self.field_errors = FieldErrors::default();
        self.dialog_open = true;
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
        self.submitted = false;
        self.field_errors = FieldErrors::default();
        self.buffer = None;
    }

    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selected.iter().any(|e| e.id() == Some(id))
    }

    pub fn set_selection(&mut self, entities: Vec<E>) {
        self.selected = entities;
    }

    pub fn toggle_selection(&mut self, entity: &E) {
        let Some(id) = entity.id() else { return };
        if self.is_selected(id) {
            self.selected.retain(|e| e.id() != Some(id));
        } else {
            self.selected.push(entity.clone());
        }
    }

    pub fn deselect(&mut self, id: &EntityId) {
        self.selected.retain(|e| e.id() != Some(id));
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Drops a deleted row locally so it disappears even before a refetch lands.
    pub fn remove_item(&mut self, id: &EntityId) {
        let before = self.items.len();
        self.items.retain(|e| e.id() != Some(id));
        if let Some(meta) = self.pagination.as_mut() {
            let removed = (before - self.items.len()) as u64;
            meta.total_items = meta.total_items.saturating_sub(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: Some(EntityId::new(id)),
            ..User::default()
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = UserStore::new();
        store.toggle_selection(&user("1"));
        store.toggle_selection(&user("2"));
        store.toggle_selection(&user("1"));
        assert_eq!(store.selected.len(), 1);
        assert!(store.is_selected(&EntityId::new("2")));
    }

    #[test]
    fn unsaved_rows_cannot_be_selected() {
        let mut store = UserStore::new();
        store.toggle_selection(&User::default());
        assert!(store.selected.is_empty());
    }

    #[test]
    fn close_dialog_drops_buffer() {
        let mut store = UserStore::new();
        store.open_dialog(user("1"));
        store.submitted = true;
        store.close_dialog();
        assert!(store.buffer.is_none());
        assert!(!store.submitted);
        assert!(!store.dialog_open);
    }

    #[test]
    fn remove_item_updates_total() {
        let mut store = UserStore::new();
        store.set_page(Page::whole(vec![user("1"), user("2")]));
        store.remove_item(&EntityId::new("1"));
        assert_eq!(store.items.len(), 1);
        assert_eq!(store.pagination.unwrap().total_items, 1);
    }
}
