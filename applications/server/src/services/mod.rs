/// Server services
pub mod accounts;
pub mod auth;
pub mod file_storage;

pub use auth::AuthService;
pub use file_storage::FileStorage;
