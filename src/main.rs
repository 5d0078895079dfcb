use actix_web::{App, HttpServer, middleware, web};

use painel::api::ApiClient;
use painel::app;
use painel::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env();
    let api = ApiClient::new(config.api_base_url.clone(), config.api_timeout)
        .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;
    let secret_key = config.cookie_key();

    log::info!("Backend API at {}", api.base_url());
    log::info!("Starting server at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);
    let api = web::Data::new(api);

    HttpServer::new(move || {
        App::new()
            .wrap(app::session_middleware(&config, secret_key.clone()))
            .wrap(middleware::Logger::default())
            .app_data(config.clone())
            .app_data(api.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(app::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
