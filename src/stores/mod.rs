// Stores layer - Data access and repository pattern
//
// Store methods take `&impl ConnectionTrait` so services can run several
// store calls inside one transaction when an operation must be atomic.
pub mod registration_store;
pub mod reset_token_store;
pub mod role_store;
pub mod user_store;

pub use registration_store::{NewRegistration, RegistrationStore, ReviewDecision};
pub use reset_token_store::ResetTokenStore;
pub use role_store::{decode_menus, RoleStore};
pub use user_store::UserStore;
