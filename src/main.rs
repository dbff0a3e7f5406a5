mod api;
mod auth;
mod config;
mod domain;
mod error;
mod notifications;
mod payments;
mod repository;
mod service;

use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::Settings,
    notifications::{MailQueue, mailer::{Mailer, NullMailer, SmtpMailer}},
    payments::StripeGateway,
    service::{PaymentService, ServiceContext},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lyceum=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting Lyceum server on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    // Initialize auth service
    let auth_service = Arc::new(auth::AuthService::new(
        db_pool.clone(),
        settings.auth.session_secret.clone(),
    ));

    // Initialize repositories
    let user_repo = Arc::new(repository::SqliteUserRepository::new(db_pool.clone()));
    let course_repo = Arc::new(repository::SqliteCourseRepository::new(db_pool.clone()));
    let lesson_repo = Arc::new(repository::SqliteLessonRepository::new(db_pool.clone()));
    let subscription_repo = Arc::new(repository::SqliteSubscriptionRepository::new(db_pool.clone()));
    let payment_repo = Arc::new(repository::SqlitePaymentRepository::new(db_pool.clone()));

    // Start the outbound mail worker
    let mailer: Arc<dyn Mailer> = match SmtpMailer::from_config(&settings.smtp) {
        Some(smtp) => {
            tracing::info!("Email delivery enabled via {}", settings.smtp.host.as_deref().unwrap_or("smtp"));
            Arc::new(smtp)
        }
        None => {
            tracing::info!("Email delivery disabled");
            Arc::new(NullMailer)
        }
    };
    let mail_queue = Arc::new(MailQueue::start(mailer));

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        user_repo,
        course_repo.clone(),
        lesson_repo.clone(),
        subscription_repo,
        payment_repo.clone(),
        auth_service,
        mail_queue,
        db_pool.clone(),
    ));

    // Initialize the payment service if a provider is configured
    let payments = if settings.stripe.enabled {
        if let Some(api_key) = settings.stripe.secret_key.clone() {
            tracing::info!("Stripe payment processing enabled");
            let gateway = Arc::new(StripeGateway::new(
                api_key,
                settings.checkout_success_url(),
                settings.checkout_cancel_url(),
            ));
            Some(Arc::new(PaymentService::new(
                payment_repo,
                course_repo,
                lesson_repo,
                gateway,
                Duration::from_secs(settings.stripe.timeout_secs),
            )))
        } else {
            tracing::warn!("Stripe enabled but missing configuration");
            None
        }
    } else {
        tracing::info!("Stripe payment processing disabled");
        None
    };

    // Create API app
    let app = api::create_app(service_context, payments, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on http://{}:{}", settings.server.host, settings.server.port);

    axum::serve(listener, app).await?;

    Ok(())
}
