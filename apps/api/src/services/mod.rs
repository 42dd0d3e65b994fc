//! Business services sitting between the HTTP handlers and the store.
//!
//! - [`auth_service`] - registration, login, token issuance
//! - [`sweet_service`] - inventory CRUD and stock mutation

pub mod auth_service;
pub mod sweet_service;

pub use auth_service::{AuthResponse, AuthService};
pub use sweet_service::SweetService;
