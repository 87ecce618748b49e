use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use wordpeek_config::dictionary::DictionaryConfig;
use wordpeek_core::{LookupError, LookupResult, LookupToken};

use crate::DefinitionClient;
use crate::response::parse_entries;

/// Same set `encodeURIComponent` leaves alone
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const USER_AGENT: &str = concat!("wordpeek/", env!("CARGO_PKG_VERSION"));

/// Client for the free dictionary API (`<base>/entries/<lang>/<word>`)
#[derive(Clone)]
pub struct DictionaryApiClient {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl DictionaryApiClient {
    pub fn new(config: &DictionaryConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }

        Ok(Self::with_client(
            builder.build()?,
            config.base_url.clone(),
            config.language.clone(),
        ))
    }

    pub fn with_client(client: reqwest::Client, base_url: String, language: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    pub fn entry_url(&self, token: &LookupToken) -> String {
        format!(
            "{}/entries/{}/{}",
            self.base_url,
            self.language,
            utf8_percent_encode(token.as_str(), COMPONENT)
        )
    }

    async fn fetch(&self, token: &LookupToken) -> LookupResult {
        let url = self.entry_url(token);
        tracing::debug!("GET {url}");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return LookupResult::NetworkError(LookupError::Transport(e.to_string())),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return LookupResult::NotFound;
        }

        if !status.is_success() {
            return LookupResult::NetworkError(LookupError::Status(status.as_u16()));
        }

        match response.bytes().await {
            Ok(body) => parse_entries(&body),
            Err(e) => LookupResult::NetworkError(LookupError::Transport(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl DefinitionClient for DictionaryApiClient {
    async fn lookup(&self, token: &LookupToken, cancel: CancellationToken) -> LookupResult {
        if cancel.is_cancelled() {
            return LookupResult::Cancelled;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => LookupResult::Cancelled,
            result = self.fetch(token) => {
                // cancelled while the body was being parsed
                if cancel.is_cancelled() {
                    LookupResult::Cancelled
                } else {
                    result
                }
            }
        }
    }
}
