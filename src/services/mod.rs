// Services layer - Business logic and orchestration
pub mod account_resolver;
pub mod crypto;
pub mod mailer;
pub mod menu_filter;
pub mod password_reset;
pub mod promotion;
pub mod token_service;

pub use account_resolver::{AccountOutcome, AccountResolver, ResolvedAccount};
pub use mailer::{LogMailer, Mailer, OutboundEmail};
pub use menu_filter::MenuFilter;
pub use password_reset::PasswordResetService;
pub use promotion::PromotionService;
pub use token_service::TokenService;
