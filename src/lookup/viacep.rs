//! HTTP client for the ViaCEP postal-code directory
//!
//! `GET {base}/ws/{cep}/json/` answers with the address record, or with
//! `{"erro": true}` when the code is unknown.

use super::directory::{AddressDirectory, AddressLookupResult, LookupError};
use super::retry::RetryPolicy;
use crate::config::FormConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Wire format of a ViaCEP answer
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViaCepResponse {
    cep: String,
    logradouro: String,
    complemento: String,
    bairro: String,
    localidade: String,
    uf: String,
    /// `true` (or `"true"` in newer responses) when the code is unknown
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }
}

impl From<ViaCepResponse> for AddressLookupResult {
    fn from(r: ViaCepResponse) -> Self {
        Self {
            postal_code: r.cep,
            street: r.logradouro,
            complement: r.complemento,
            district: r.bairro,
            city: r.localidade,
            state: r.uf,
        }
    }
}

/// Client for the ViaCEP directory
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ViaCepClient {
    /// Create a client from configuration
    pub fn new(config: &FormConfig) -> Result<Self, LookupError> {
        Self::with_base_url(config.directory_url(), config.timeout())
            .map(|client| client.with_retry_policy(RetryPolicy::new(config.max_retries())))
    }

    /// Create a client against an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, postal_code: &str) -> String {
        format!("{}/ws/{}/json/", self.base_url, postal_code)
    }

    /// Single request, no retries
    async fn fetch_once(&self, postal_code: &str) -> Result<AddressLookupResult, LookupError> {
        let response = self
            .http
            .get(self.endpoint(postal_code))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                postal_code: postal_code.to_string(),
            });
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body: ViaCepResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout
            } else {
                LookupError::Decode(e.to_string())
            }
        })?;

        if body.is_not_found() {
            return Err(LookupError::NotFound {
                postal_code: postal_code.to_string(),
            });
        }

        Ok(body.into())
    }
}

fn transport_error(e: reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Transport(e.to_string())
    }
}

#[async_trait]
impl AddressDirectory for ViaCepClient {
    async fn lookup(&self, postal_code: &str) -> Result<AddressLookupResult, LookupError> {
        tracing::debug!(postal_code, "querying address directory");
        self.retry.run(|| self.fetch_once(postal_code)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client =
            ViaCepClient::with_base_url("http://localhost:9/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9");
        assert_eq!(
            client.endpoint("01001000"),
            "http://localhost:9/ws/01001000/json/"
        );
    }

    #[test]
    fn test_parse_found_response() {
        let json = r#"{
            "cep": "01001-000",
            "logradouro": "Praça da Sé",
            "complemento": "lado ímpar",
            "unidade": "",
            "bairro": "Sé",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308"
        }"#;
        let parsed: ViaCepResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_not_found());

        let result = AddressLookupResult::from(parsed);
        assert_eq!(result.postal_code, "01001-000");
        assert_eq!(result.street, "Praça da Sé");
        assert_eq!(result.complement, "lado ímpar");
        assert_eq!(result.district, "Sé");
        assert_eq!(result.city, "São Paulo");
        assert_eq!(result.state, "SP");
    }

    #[test]
    fn test_parse_not_found_flag() {
        let bool_flag: ViaCepResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(bool_flag.is_not_found());

        let string_flag: ViaCepResponse = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(string_flag.is_not_found());

        let cleared: ViaCepResponse = serde_json::from_str(r#"{"erro": false}"#).unwrap();
        assert!(!cleared.is_not_found());
    }

    #[test]
    fn test_new_uses_config() {
        let config = FormConfig {
            directory_url: Some("http://directory.test".into()),
            timeout_ms: Some(100),
            max_retries: Some(1),
        };
        let client = ViaCepClient::new(&config).unwrap();
        assert_eq!(client.retry.max_retries, 1);
    }
}
