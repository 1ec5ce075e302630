use std::{path::Path, time::Duration};

use log::info;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::error::CotacaoError;
use crate::exchange_rate::ExchangeRate;
use crate::fetcher::RateFetcher;

pub const CURRENCY: &str = "USD";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cotacao (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    valor FLOAT NOT NULL,
    moeda TEXT NOT NULL
)"#;

/// Append-only quote table over a single shared pool.
#[derive(Debug, Clone)]
pub struct RateStore {
    pool: SqlitePool,
    fetch_timeout: Duration,
    insert_timeout: Duration,
}

impl RateStore {
    /// Opens (creating if missing) the database file and ensures the table exists.
    pub async fn open(
        db_path: &Path,
        fetch_timeout: Duration,
        insert_timeout: Duration,
    ) -> Result<Self, CotacaoError> {
        let opts = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        info!("Database {} ready", db_path.display());

        Ok(Self {
            pool,
            fetch_timeout,
            insert_timeout,
        })
    }

    /// Inserts `(value, "USD")` and returns the stored row.
    pub async fn insert(&self, value: Decimal) -> Result<ExchangeRate, CotacaoError> {
        let valor = value.to_f64().ok_or_else(|| {
            CotacaoError::MalformedQuote(format!("{value} does not fit a float"))
        })?;

        let query = sqlx::query_as::<_, ExchangeRate>(
            "INSERT INTO cotacao (valor, moeda) VALUES (?, ?) RETURNING id, valor, moeda",
        )
        .bind(valor)
        .bind(CURRENCY)
        .fetch_one(&self.pool);

        let row = tokio::time::timeout(self.insert_timeout, query)
            .await
            .map_err(|_| CotacaoError::deadline("database insert", self.insert_timeout))??;
        Ok(row)
    }

    /// Fetches the rate again, independently of any caller, and stores it.
    pub async fn refetch_and_insert(
        &self,
        fetcher: &RateFetcher,
    ) -> Result<ExchangeRate, CotacaoError> {
        let value = fetcher.fetch_bid("store fetch", self.fetch_timeout).await?;
        self.insert(value).await
    }

    pub async fn count(&self) -> Result<i64, CotacaoError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cotacao")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
