use std::time::Duration;

use serde_json::Value;

use super::BalanceSource;
use crate::{
    errors::{ForecastError, Result},
    ledger::bill::parse_amount,
};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Reads the opening balance from a JSON endpoint.
///
/// The named field may be a number or a formatted string such as `"$1,234.56"`;
/// dotted names (`account.available`) reach into nested objects.
pub struct HttpBalanceSource {
    url: String,
    field: String,
    client: reqwest::blocking::Client,
}

impl HttpBalanceSource {
    pub fn new(url: impl Into<String>, field: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            url: url.into(),
            field: field.into(),
            client,
        })
    }
}

impl BalanceSource for HttpBalanceSource {
    fn fetch_balance(&self) -> Result<f64> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Remote(format!(
                "{} answered {}",
                self.url, status
            )));
        }
        let body: Value = response.json()?;
        balance_from_json(&body, &self.field)
    }
}

pub(crate) fn balance_from_json(body: &Value, field: &str) -> Result<f64> {
    let mut node = body;
    for key in field.split('.').filter(|key| !key.is_empty()) {
        node = node.get(key).ok_or_else(|| {
            ForecastError::Remote(format!("balance response has no `{field}` field"))
        })?;
    }
    match node {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| ForecastError::Remote(format!("`{field}` is out of range"))),
        Value::String(text) => parse_amount(text)
            .ok_or_else(|| ForecastError::Remote(format!("`{field}` is not a number: {text}"))),
        other => Err(ForecastError::Remote(format!(
            "`{field}` has unexpected type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_numbers_and_formatted_strings() {
        assert_eq!(balance_from_json(&json!({"balance": 1523.75}), "balance").unwrap(), 1523.75);
        assert_eq!(
            balance_from_json(&json!({"balance": "$2,001.10"}), "balance").unwrap(),
            2001.1
        );
    }

    #[test]
    fn follows_dotted_paths() {
        let body = json!({"account": {"available": 99}});
        assert_eq!(balance_from_json(&body, "account.available").unwrap(), 99.0);
    }

    #[test]
    fn missing_or_odd_fields_are_remote_errors() {
        assert!(matches!(
            balance_from_json(&json!({}), "balance"),
            Err(ForecastError::Remote(_))
        ));
        assert!(matches!(
            balance_from_json(&json!({"balance": null}), "balance"),
            Err(ForecastError::Remote(_))
        ));
        assert!(matches!(
            balance_from_json(&json!({"balance": "n/a"}), "balance"),
            Err(ForecastError::Remote(_))
        ));
    }
}
