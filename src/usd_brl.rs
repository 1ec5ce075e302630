use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use crate::error::CotacaoError;

#[derive(Debug, Deserialize, Serialize, PartialEq, Default)]
pub struct CurrencyDetails {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub codein: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub high: String,
    #[serde(default)]
    pub low: String,
    #[serde(rename = "varBid", alias = "varbid", default)]
    pub var_bid: String,
    #[serde(rename = "pctChange", default)]
    pub pct_change: String,
    #[serde(default)]
    pub bid: String,
    #[serde(default)]
    pub ask: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub create_date: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ExchangeRateInfo {
    #[serde(rename = "USDBRL")]
    pub usd_brl: Option<CurrencyDetails>,
}

impl ExchangeRateInfo {
    pub fn from_slice(body: &[u8]) -> Result<Self, CotacaoError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Bid of the USD-BRL pair, parsed at the boundary.
    pub fn bid(&self) -> Result<Decimal, CotacaoError> {
        let details = self
            .usd_brl
            .as_ref()
            .ok_or_else(|| CotacaoError::MalformedQuote("missing USDBRL pair".to_string()))?;
        details.bid()
    }
}

impl CurrencyDetails {
    pub fn bid(&self) -> Result<Decimal, CotacaoError> {
        let normalized = normalize_decimal_string(self.bid.trim());
        if normalized.is_empty() {
            return Err(CotacaoError::MalformedQuote("empty bid".to_string()));
        }
        Decimal::from_str(&normalized)
            .map_err(|e| CotacaoError::MalformedQuote(format!("bid {:?}: {}", self.bid, e)))
    }

    pub fn quoted_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

fn normalize_decimal_string(s: &str) -> String {
    s.replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"USDBRL":{"code":"USD","codein":"BRL","name":"Dólar Americano/Real Brasileiro","high":"5.3512","low":"5.3001","varBid":"0.0123","pctChange":"0.23","bid":"5.32","ask":"5.3215","timestamp":"1718035199","create_date":"2024-06-10 12:59:59"}}"#;

    #[test]
    fn bid_is_taken_from_the_pair_ignoring_other_fields() {
        let info = ExchangeRateInfo::from_slice(SAMPLE.as_bytes()).unwrap();
        let details = info.usd_brl.as_ref().unwrap();
        assert_eq!(details.ask, "5.3215");
        assert_eq!(details.var_bid, "0.0123");
        assert_eq!(info.bid().unwrap().to_string(), "5.32");
    }

    #[test]
    fn bid_keeps_upstream_scale() {
        let info =
            ExchangeRateInfo::from_slice(br#"{"USDBRL":{"bid":"5.3200"}}"#).unwrap();
        assert_eq!(info.bid().unwrap().to_string(), "5.3200");
    }

    #[test]
    fn decimal_comma_is_accepted() {
        let info = ExchangeRateInfo::from_slice(br#"{"USDBRL":{"bid":"5,1"}}"#).unwrap();
        assert_eq!(info.bid().unwrap(), Decimal::new(51, 1));
    }

    #[test]
    fn lowercase_varbid_alias() {
        let info =
            ExchangeRateInfo::from_slice(br#"{"USDBRL":{"bid":"1","varbid":"0.5"}}"#).unwrap();
        assert_eq!(info.usd_brl.unwrap().var_bid, "0.5");
    }

    #[test]
    fn missing_pair_is_malformed() {
        let info = ExchangeRateInfo::from_slice(br#"{"EURBRL":{"bid":"6.1"}}"#).unwrap();
        assert!(matches!(info.bid(), Err(CotacaoError::MalformedQuote(_))));
    }

    #[test]
    fn non_numeric_bid_is_malformed() {
        let info = ExchangeRateInfo::from_slice(br#"{"USDBRL":{"bid":"n/a"}}"#).unwrap();
        assert!(matches!(info.bid(), Err(CotacaoError::MalformedQuote(_))));

        let info = ExchangeRateInfo::from_slice(br#"{"USDBRL":{"bid":""}}"#).unwrap();
        assert!(matches!(info.bid(), Err(CotacaoError::MalformedQuote(_))));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = ExchangeRateInfo::from_slice(b"<html>").unwrap_err();
        assert!(matches!(err, CotacaoError::Decode(_)));
    }

    #[test]
    fn quoted_at_parses_unix_seconds() {
        let info = ExchangeRateInfo::from_slice(SAMPLE.as_bytes()).unwrap();
        let at = info.usd_brl.unwrap().quoted_at().unwrap();
        assert_eq!(at.timestamp(), 1718035199);

        let details = CurrencyDetails {
            timestamp: "soon".to_string(),
            ..Default::default()
        };
        assert!(details.quoted_at().is_none());
    }
}
