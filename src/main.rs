use actix_web::{App, HttpServer, middleware, web};
use clip_evaluate::api::{AppState, configure_routes, cors_headers};
use clip_evaluate::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    // A missing .env is fine; the process environment still applies
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Could not load .env file: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    if app_config.huggingface_token.is_none() {
        log::warn!("HUGGINGFACE_TOKEN not set; evaluation endpoints will answer 500");
    }
    log::info!(
        "External scorer: {} {:?} (timeout {:?})",
        app_config.process.program,
        app_config.process.args,
        app_config.process.timeout
    );

    let bind = (app_config.host.clone(), app_config.port);
    let state = AppState::new(app_config).map_err(std::io::Error::other)?;

    println!("🚀 Starting server on http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors_headers())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
