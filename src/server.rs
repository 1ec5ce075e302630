use std::time::Duration;

use actix_web::{HttpResponse, web};
use log::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::CotacaoError;
use crate::fetcher::RateFetcher;
use crate::recorder::FileRecorder;
use crate::store::RateStore;

pub const TIMEOUT_MESSAGE: &str = "The operation exceeded the time limit 3";

pub struct AppState {
    pub fetcher: RateFetcher,
    pub recorder: FileRecorder,
    pub store: RateStore,
    pub request_timeout: Duration,
    pub store_refetch: bool,
}

impl AppState {
    pub fn new(config: &Config, store: RateStore) -> Self {
        Self {
            fetcher: RateFetcher::new(config.api_url.clone()),
            recorder: FileRecorder::new(config.file_path.clone()),
            store,
            request_timeout: config.request_timeout,
            store_refetch: config.store_refetch,
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/cotacao", web::get().to(cotacao));
}

async fn cotacao(state: web::Data<AppState>) -> Result<HttpResponse, CotacaoError> {
    let request_id = Uuid::new_v4();

    let rate = match state
        .fetcher
        .fetch_bid("rate fetch", state.request_timeout)
        .await
    {
        Ok(rate) => rate,
        Err(e) if e.is_deadline_exceeded() => {
            warn!("[{}] {}", request_id, e);
            return Ok(HttpResponse::GatewayTimeout()
                .content_type("text/plain; charset=utf-8")
                .body(TIMEOUT_MESSAGE));
        }
        Err(e) => {
            warn!("[{}] fetch failed: {}", request_id, e);
            return Err(e);
        }
    };

    state.recorder.record(&rate).await.inspect_err(|e| {
        warn!("[{}] writing {} failed: {}", request_id, state.recorder.path().display(), e)
    })?;

    let stored = if state.store_refetch {
        state.store.refetch_and_insert(&state.fetcher).await
    } else {
        state.store.insert(rate).await
    };
    let stored = stored.inspect_err(|e| warn!("[{}] store failed: {}", request_id, e))?;

    info!(
        "[{}] bid {} recorded as row {} ({} {})",
        request_id, rate, stored.id, stored.valor, stored.moeda
    );
    Ok(HttpResponse::Ok().json(rate.to_string()))
}
