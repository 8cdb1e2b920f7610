pub mod models;
pub mod repository;
pub mod service;

pub use models::{LoginRequest, RegisterRequest, TokenResponse, User, UserError};
pub use repository::{PgUserRepository, UserRepository};
pub use service::UserService;
