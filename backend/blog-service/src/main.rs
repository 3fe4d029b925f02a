use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use blog_service::openapi::ApiDoc;
use blog_service::{routes, AppState, Config};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            anyhow::bail!("invalid configuration: {}", e);
        }
    };

    tracing::info!(
        env = %config.app.env,
        production = config.is_production(),
        storage = %config.storage,
        "Starting blog-service v{}",
        env!("CARGO_PKG_VERSION")
    );

    if config.jwt.using_development_secret {
        tracing::warn!(
            "JWT_SECRET is not set; signing tokens with the built-in development secret. \
             Anyone who knows it can forge tokens"
        );
    }

    let state = web::Data::new(
        AppState::initialize(&config)
            .await
            .context("Failed to initialize application state")?,
    );

    let bind_address = config.bind_address();
    tracing::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    let allowed_origins = config.cors.allowed_origins.clone();
    let openapi_doc = ApiDoc::openapi();

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .service(
                SwaggerUi::new("/api-docs/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.clone()),
            )
            .configure(routes::configure)
    })
    .bind(bind_address)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    tracing::info!("blog-service shut down");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blog_service=info,actix_web=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
