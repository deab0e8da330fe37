use crate::models::User;

/// Body sent for a user create or update. The password is write-only: it goes
/// out only when one was typed, so an untouched edit re-sends the row as read.
pub fn user_payload(user: &User) -> User {
    let mut payload = user.clone();
    payload.password = user
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    payload
}
