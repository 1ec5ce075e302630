use std::time::Duration;

use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::error::CotacaoError;
use crate::usd_brl::ExchangeRateInfo;

/// Fetches the USD-BRL quote. One attempt per call, bounded by the
/// deadline the caller passes in.
#[derive(Debug, Clone)]
pub struct RateFetcher {
    client: Client,
    url: String,
}

impl RateFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_bid(
        &self,
        operation: &'static str,
        deadline: Duration,
    ) -> Result<Decimal, CotacaoError> {
        let info = tokio::time::timeout(deadline, self.load_json())
            .await
            .map_err(|_| CotacaoError::deadline(operation, deadline))??;

        let bid = info.bid()?;
        if let Some(at) = info.usd_brl.as_ref().and_then(|d| d.quoted_at()) {
            debug!("{} got bid {} quoted at {}", operation, bid, at);
        }
        Ok(bid)
    }

    async fn load_json(&self) -> Result<ExchangeRateInfo, CotacaoError> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(CotacaoError::UpstreamStatus(resp.status().as_u16()));
        }

        let body = resp.bytes().await?;
        ExchangeRateInfo::from_slice(&body)
    }
}
