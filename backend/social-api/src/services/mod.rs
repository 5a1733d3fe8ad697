/// Business logic layer.
pub mod auth;
pub mod engagement;
pub mod posts;
pub mod social;
pub mod storage;

pub use auth::AuthService;
pub use engagement::EngagementService;
pub use posts::PostService;
pub use social::SocialService;
pub use storage::{MediaStorage, SharedStorage};
