//! Headless back-office client: CRUD screens for products and users, the
//! reference lists behind their dropdowns, and the session guard, all driven
//! against the back-office REST API.

pub mod auth;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod response;
pub mod routes;
pub mod screens;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod validation;

pub use error::{AppError, AppResult};
pub use state::AppState;
