pub mod guard;
pub mod menu;

pub use guard::{AuthGuard, AuthState, RouteDecision};
pub use menu::{MenuItem, MenuSection};
