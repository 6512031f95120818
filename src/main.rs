use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use gamevault_backend::{
    config::Config,
    database::{connect, run_migrations},
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let db = connect(&config.database)
        .await
        .expect("Failed to connect to database");

    run_migrations(&db)
        .await
        .expect("Failed to run database migrations");

    let catalog_service = CatalogService::new(db.clone());
    let user_service = UserService::new(db.clone());
    let subscription_service = SubscriptionService::new(db.clone());
    let entitlement_service = EntitlementService::new(
        db.clone(),
        catalog_service.clone(),
        subscription_service.clone(),
    );
    let purchase_service = PurchaseService::new(
        db.clone(),
        catalog_service.clone(),
        user_service.clone(),
        entitlement_service.clone(),
    );
    let cart_service = CartService::new(
        db.clone(),
        catalog_service.clone(),
        entitlement_service.clone(),
        purchase_service.clone(),
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(catalog_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(entitlement_service.clone()))
            .app_data(web::Data::new(purchase_service.clone()))
            .app_data(web::Data::new(cart_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::catalog_config)
                    .configure(handlers::cart_config)
                    .configure(handlers::entitlement_config)
                    .configure(handlers::purchase_config)
                    .configure(handlers::subscription_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
