use std::env;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use game_core::model::Similarity;
use log::{debug, warn};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, OracleError};

pub const API_KEY_VAR: &str = "HUGGINGFACE_API_KEY";
pub const API_URL_VAR: &str = "SIMILARITY_API_URL";
pub const TIMEOUT_VAR: &str = "SIMILARITY_TIMEOUT_SECS";
pub const MAX_RETRIES_VAR: &str = "SIMILARITY_MAX_RETRIES";

pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 2;

const BACKOFF_BASE_MS: u64 = 250;
const BACKOFF_JITTER_MS: u64 = 100;
const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// Scores how close a candidate sentence is to a reference sentence.
#[async_trait]
pub trait SimilarityOracle: Send + Sync {
    /// # Errors
    ///
    /// Returns `OracleError` when the service is unreachable, refuses the
    /// request, or answers with something other than a list of scores.
    async fn similarity(&self, reference: &str, candidate: &str)
    -> Result<Similarity, OracleError>;
}

#[derive(Clone)]
pub struct OracleConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl OracleConfig {
    /// Read the oracle configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` when the key is unset or blank and
    /// `ConfigError::InvalidValue` for unparseable numeric settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// See `from_env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let api_url = lookup(API_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => Duration::from_secs(parse_number(TIMEOUT_VAR, &raw)?),
            None => DEFAULT_TIMEOUT,
        };
        let max_retries = match lookup(MAX_RETRIES_VAR) {
            Some(raw) => parse_number(MAX_RETRIES_VAR, &raw)?,
            None => DEFAULT_MAX_RETRIES,
        };
        Ok(Self {
            api_url,
            api_key,
            timeout,
            max_retries,
        })
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        raw: raw.to_string(),
    })
}

/// Sentence-similarity oracle backed by a Hugging Face inference endpoint.
#[derive(Clone)]
pub struct HttpSimilarityOracle {
    client: Client,
    config: OracleConfig,
}

impl HttpSimilarityOracle {
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the HTTP client cannot be built.
    pub fn new(config: OracleConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    async fn request_once(&self, payload: &SimilarityRequest<'_>) -> Result<Similarity, OracleError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(OracleError::HttpStatus {
                status,
                detail: error_detail(&body),
            });
        }

        let body = response.bytes().await?;
        parse_similarity(&body)
    }
}

#[async_trait]
impl SimilarityOracle for HttpSimilarityOracle {
    async fn similarity(
        &self,
        reference: &str,
        candidate: &str,
    ) -> Result<Similarity, OracleError> {
        let payload = SimilarityRequest::new(reference, candidate);
        let mut retry = 0_u32;
        loop {
            match self.request_once(&payload).await {
                Err(err) if err.is_transient() && retry < self.config.max_retries => {
                    let delay = backoff_delay(retry);
                    warn!(
                        "similarity request failed ({err}); retry {} of {} in {delay:?}",
                        retry + 1,
                        self.config.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                result => {
                    if let Ok(similarity) = &result {
                        debug!("similarity service scored {similarity}");
                    }
                    return result;
                }
            }
        }
    }
}

/// Exponential backoff with a little random jitter.
fn backoff_delay(retry: u32) -> Duration {
    let base = BACKOFF_BASE_MS << retry.min(5);
    let jitter = rand::rng().random_range(0..=BACKOFF_JITTER_MS);
    Duration::from_millis(base + jitter)
}

/// First few hundred characters of an error body, e.g. "Model is currently loading".
fn error_detail(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(MAX_ERROR_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Decode the service body; element 0 is the score for the single candidate.
///
/// # Errors
///
/// Returns `OracleError::Malformed` for anything but a non-empty list of
/// finite numbers.
pub fn parse_similarity(body: &[u8]) -> Result<Similarity, OracleError> {
    let parsed: SimilarityResponse = serde_json::from_slice(body).map_err(|err| {
        OracleError::Malformed(format!("{err}: {}", String::from_utf8_lossy(body)))
    })?;
    match parsed {
        SimilarityResponse::Scores(scores) => {
            let first = scores
                .first()
                .copied()
                .ok_or_else(|| OracleError::Malformed("empty score list".into()))?;
            Similarity::clamped(first).map_err(|err| OracleError::Malformed(err.to_string()))
        }
        SimilarityResponse::Error { error } => {
            Err(OracleError::Malformed(format!("service error: {error}")))
        }
    }
}

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    inputs: SimilarityInputs<'a>,
}

#[derive(Debug, Serialize)]
struct SimilarityInputs<'a> {
    source_sentence: &'a str,
    sentences: [&'a str; 1],
}

impl<'a> SimilarityRequest<'a> {
    fn new(reference: &'a str, candidate: &'a str) -> Self {
        Self {
            inputs: SimilarityInputs {
                source_sentence: reference,
                sentences: [candidate],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SimilarityResponse {
    Scores(Vec<f64>),
    Error { error: String },
}
