// Database entities - SeaORM models
pub mod password_reset_token;
pub mod registration;
pub mod role;
pub mod user;
