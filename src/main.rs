use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{error, info, warn};

use somnia_relay::web::{routes, AppState};
use somnia_relay::{Config, Relay};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting chat relay");

    let config = Config::from_env();

    let relay = match Relay::from_config(&config) {
        Ok(relay) => relay,
        Err(e) => {
            error!("Failed to initialize upstream providers: {}", e);
            std::process::exit(1);
        }
    };

    if relay.is_offline() {
        warn!("No provider API keys configured; all chats use the offline responder");
    } else {
        info!(
            "Upstream providers: {} (timeout {:?})",
            relay.provider_names().join(", "),
            config.upstream_timeout
        );
    }

    let app_state = Data::new(AppState::new(relay));

    info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
