// DTOs - request/response models for the HTTP API
pub mod auth;
pub mod common;
pub mod registration;
pub mod role;
