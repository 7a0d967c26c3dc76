// Internal types shared across stores and services
pub mod auth;
pub mod menu;
pub mod role;

pub use auth::Claims;
pub use menu::{parse_menus, MenuId};
pub use role::Role;
