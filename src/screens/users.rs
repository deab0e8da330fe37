use crate::{
    error::{AppError, AppResult},
    models::{Role, User},
    routes::params::{Pagination, ROWS_PER_PAGE_OPTIONS},
    screens::{CrudForm, CrudScreen},
    services::UserService,
    validation::{FieldErrors, validate_user},
};

pub type UserScreen = CrudScreen<User, UserService>;

impl CrudForm for User {
    const LABEL: &'static str = "User";
    const PLURAL: &'static str = "users";

    type Options = ();

    fn validate(&self, _options: ()) -> Result<(), FieldErrors> {
        validate_user(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserField {
    FirstName(String),
    LastName(String),
    Email(String),
    Image(Option<String>),
    Role(Option<Role>),
    Password(String),
}

pub fn update_field(mut user: User, field: UserField) -> User {
    match field {
        UserField::FirstName(v) => user.first_name = v,
        UserField::LastName(v) => user.last_name = v,
        UserField::Email(v) => user.email = v,
        UserField::Image(v) => user.image = v,
        UserField::Role(v) => user.role = v,
        UserField::Password(v) => user.password = Some(v),
    }
    user
}

impl UserScreen {
    pub fn set_field(&mut self, field: UserField) {
        self.edit(|u| update_field(u, field));
    }

    /// Rows of the current table page.
    pub fn visible_rows(&self) -> &[User] {
        let store = self.store();
        let items = &store.items;
        let start = store.paginator.offset().min(items.len());
        let end = (start + store.paginator.normalize().per_page as usize).min(items.len());
        &items[start..end]
    }

    pub fn page_count(&self) -> usize {
        let per_page = self.store().paginator.normalize().per_page as usize;
        self.store().items.len().div_ceil(per_page)
    }

    pub fn go_to_page(&mut self, page: u32) {
        let last = self.page_count().max(1) as u32;
        self.store_mut().paginator.page = page.clamp(1, last);
    }

    /// Only the sizes offered by the paginator dropdown are accepted.
    pub fn set_rows_per_page(&mut self, per_page: u32) -> AppResult<()> {
        if !ROWS_PER_PAGE_OPTIONS.contains(&per_page) {
            return Err(AppError::Config(format!(
                "rows per page must be one of {ROWS_PER_PAGE_OPTIONS:?}"
            )));
        }
        self.store_mut().paginator = Pagination { page: 1, per_page };
        Ok(())
    }

    /// "Showing {first} to {last} of {total} users".
    pub fn page_report(&self) -> String {
        let total = self.store().items.len();
        let shown = self.visible_rows().len();
        let first = if shown == 0 {
            0
        } else {
            self.store().paginator.offset() + 1
        };
        let last = if shown == 0 { 0 } else { first + shown - 1 };
        format!("Showing {first} to {last} of {total} users")
    }
}
