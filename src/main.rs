mod api;
mod config;
mod errors;
mod services;
mod stores;
mod types;

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};
use tracing::info;

use api::{AuthApi, HealthApi, RegistrationApi, RoleApi};
use config::logging::init_logging;
use config::AppConfig;
use services::{
    AccountResolver, LogMailer, Mailer, MenuFilter, PasswordResetService, PromotionService,
    TokenService,
};
use stores::{RegistrationStore, ResetTokenStore, RoleStore, UserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let app_config = AppConfig::from_env()?;

    let db: DatabaseConnection = Database::connect(&app_config.database_url).await?;
    info!(database_url = %app_config.database_url, "Connected to database");

    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    let tokens = Arc::new(TokenService::new(app_config.jwt_secret.clone()));
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);

    let promotions = Arc::new(PromotionService::new(
        db.clone(),
        RegistrationStore,
        AccountResolver::new(UserStore),
        mailer.clone(),
    ));
    let password_reset = Arc::new(PasswordResetService::new(
        db.clone(),
        UserStore,
        ResetTokenStore,
        app_config.reset_token_secret.clone(),
        mailer,
    ));
    let menu_filter = Arc::new(MenuFilter::new(RoleStore));

    let auth_api = AuthApi::new(
        db.clone(),
        UserStore,
        tokens.clone(),
        menu_filter,
        password_reset,
    );
    let registration_api = RegistrationApi::new(tokens.clone(), promotions);
    let role_api = RoleApi::new(db, tokens, RoleStore);

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, registration_api, role_api),
        "PPDB Backend",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", app_config.bind_addr));

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    info!(bind_addr = %app_config.bind_addr, "Starting server");

    Server::new(TcpListener::bind(app_config.bind_addr))
        .run_with_graceful_shutdown(
            app,
            async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            },
            None,
        )
        .await?;

    Ok(())
}
