use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::CotacaoError;

/// Appends one line per quote to a local text file.
#[derive(Debug, Clone)]
pub struct FileRecorder {
    path: PathBuf,
}

impl FileRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn record(&self, rate: &Decimal) -> Result<(), CotacaoError> {
        let line = format_line(rate);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

pub fn format_line(rate: &Decimal) -> String {
    format!("Dólar: {} \n", rate)
}
