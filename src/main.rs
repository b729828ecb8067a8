use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use tasknest::auth::AuthMiddleware;
use tasknest::{db, routes, Config, TokenManager};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let token_manager = TokenManager::from_config(&config);

    let pool = db::connect(&config)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let bind_addr = (config.server_host.clone(), config.server_port);
    log::info!("Starting tasknest server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(token_manager.clone()))
            .app_data(web::Data::new(config.clone()))
            // Later wraps run first: CORS (preflights skip auth), then
            // request logging, then the authorization gate.
            .wrap(AuthMiddleware)
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(routes::config)
    })
    .bind(bind_addr)?
    .run()
    .await
}
