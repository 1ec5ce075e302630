use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::{Context, Result};
use log::{error, info};

use config::Config;
use server::AppState;
use store::RateStore;

mod config;
mod error;
mod exchange_rate;
mod fetcher;
mod recorder;
mod server;
mod store;
mod usd_brl;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let store = RateStore::open(
        &config.db_path,
        config.store_fetch_timeout,
        config.store_insert_timeout,
    )
    .await
    .inspect_err(|e| error!("Failed to create database {}: {}", config.db_path.display(), e))
    .with_context(|| format!("Failed to create database {}", config.db_path.display()))?;
    let stored = store
        .count()
        .await
        .with_context(|| format!("Failed to read database {}", config.db_path.display()))?;
    info!("{} quotes stored so far", stored);

    let state = web::Data::new(AppState::new(&config, store));
    info!(
        "Quoting {} (deadline {}ms), listening on {}",
        state.fetcher.url(),
        config.request_timeout.as_millis(),
        config.listen_addr
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(server::routes)
    })
    .bind(config.listen_addr)?
    .run()
    .await?;

    Ok(())
}
