mod cors;

use actix_web::{App, HttpServer, web};
use api_ai::GatewayClient;
use api_loans::LoanPolicy;
use api_notify::EmailClient;
use common::{env_config::Config, http};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // outbound clients share one deadline
    let gateway_client = GatewayClient::new(config.ai_gateway.clone(), config.upstream_timeout)
        .expect("Failed to build AI gateway client");
    let email_client = EmailClient::new(config.email.clone(), config.upstream_timeout)
        .expect("Failed to build email client");

    let policy = web::Data::new(LoanPolicy::default());

    log::info!(
        "Starting ecofin on {}:{} ({} workers, {})",
        config.server_host,
        config.server_port,
        config.num_workers,
        config.environment
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(gateway_client.clone()))
            .app_data(web::Data::new(email_client.clone()))
            .app_data(policy.clone())
            .app_data(http::json_config())
            .wrap(extractor::middleware(&config_data.jwt_config.secret)) // 3rd
            .wrap(logger::middleware(config_data.console_logging_enabled)) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .configure(api_loans::mount_loans)
            .configure(api_redeem::mount_redeem)
            .configure(api_ai::mount_ai)
            .configure(api_notify::mount_notify)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
