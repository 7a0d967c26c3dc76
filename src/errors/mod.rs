// Error layer - internal store errors plus per-module API response enums
pub mod auth;
pub mod registration;
pub mod role;
pub mod store;

pub use auth::AuthError;
pub use registration::RegistrationError;
pub use role::RoleError;
pub use store::StoreError;
