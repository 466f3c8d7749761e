//! Generated descriptions via an OpenAI-compatible chat completions API.
//!
//! ### Request
//!
//! - **Endpoint**: `{base_url}/chat/completions`
//! - **Authentication**: `Authorization: Bearer <api_key>` when a key is set.
//! - **Body**: `{ model, messages: [system, user] }` built from
//!   [`DescriptionPrompt`].
//!
//! The first choice's message content is the description. Every failure is
//! logged and reported as no description.

mod error;

pub use error::DescribeError;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};

use terravue_core::{AppConfig, DescriptionPrompt, Describer, Error, Impact};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Description API client configuration.
#[derive(Debug, Clone)]
pub struct DescriberConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token; omitted from requests when None.
    pub api_key: Option<String>,
    /// Model name (default: gpt-4o-mini).
    pub model: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for DescriberConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        Self {
            base_url: String::new(),
            api_key: None,
            model: app.describer_model,
            timeout: DEFAULT_TIMEOUT,
            user_agent: app.user_agent,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client implementing [`Describer`].
#[derive(Debug, Clone)]
pub struct HttpDescriber {
    http: reqwest::Client,
    endpoint: String,
    config: Arc<DescriberConfig>,
}

impl HttpDescriber {
    pub fn new(config: DescriberConfig) -> Result<Self, Error> {
        let base = config.base_url.trim().trim_end_matches('/');
        let parsed = url::Url::parse(base).map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!("unsupported scheme: {}", parsed.scheme())));
        }
        let endpoint = format!("{base}/chat/completions");

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, endpoint, config: Arc::new(config) })
    }

    /// Build a describer from application config.
    ///
    /// Returns `Ok(None)` when no base URL is configured.
    pub fn from_app_config(app: &AppConfig) -> Result<Option<Self>, Error> {
        let Some(base_url) = app.describer_base_url() else {
            return Ok(None);
        };

        let config = DescriberConfig {
            base_url: base_url.to_string(),
            api_key: app.describer_api_key.clone().filter(|k| !k.trim().is_empty()),
            model: app.describer_model.clone(),
            timeout: app.timeout().max(DEFAULT_TIMEOUT),
            user_agent: app.user_agent.clone(),
        };

        Self::new(config).map(Some)
    }

    /// Send one completion request and return the trimmed reply text.
    pub async fn complete(&self, prompt: &DescriptionPrompt) -> Result<String, DescribeError> {
        let start = Instant::now();
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage { role: "system", content: &prompt.system },
                ChatMessage { role: "user", content: &prompt.user },
            ],
        };

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("description API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(DescribeError::AuthError);
        }

        if status == 429 {
            return Err(DescribeError::RateLimited);
        }

        if !status.is_success() {
            return Err(DescribeError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes).map_err(|e| DescribeError::Parse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(DescribeError::EmptyCompletion)?;

        tracing::debug!("description generated in {:?}", start.elapsed());
        Ok(text)
    }
}

#[async_trait::async_trait]
impl Describer for HttpDescriber {
    async fn describe(&self, website: &str, category: &str, impact: Impact) -> Option<String> {
        let prompt = DescriptionPrompt::build(website, category, impact);
        match self.complete(&prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(website, error = %e, "description generation failed");
                None
            }
        }
    }
}
