/// HTTP request handlers: request/response DTOs and status-code mapping.
/// Business rules live in the service layer.
pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

pub use auth::*;
pub use health::*;
pub use posts::*;
pub use users::*;
