use async_trait::async_trait;
use fitcore::{EvaluationRequest, EvaluationResult, RemoteError, ScoringService};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://fitstack-lot0.onrender.com";

const EVALUATE_PATH: &str = "evaluate";
const DOCUMENT_FIELD: &str = "resume_file";
const GITHUB_FIELD: &str = "github_link";
const LINKEDIN_FIELD: &str = "linkedin_link";
const DOCUMENT_MIME: &str = "application/pdf";

/// Connection settings for the scoring service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("fitstack/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Scoring service reached over HTTP
pub struct HttpScoringService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpScoringService {
    pub fn new(config: ClientConfig) -> Result<Self, RemoteError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| RemoteError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::InvalidEndpoint(format!("{}{}: {}", self.base_url, path, e)))
    }

    fn form(request: EvaluationRequest) -> Result<Form, RemoteError> {
        let document = Part::bytes(request.document.bytes)
            .file_name(request.document.file_name)
            .mime_str(DOCUMENT_MIME)
            .map_err(|e| RemoteError::Transport(format!("Invalid document part: {}", e)))?;

        Ok(Form::new()
            .part(DOCUMENT_FIELD, document)
            .text(GITHUB_FIELD, request.github_link)
            .text(LINKEDIN_FIELD, request.linkedin_link))
    }
}

#[async_trait]
impl ScoringService for HttpScoringService {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<EvaluationResult, RemoteError> {
        let url = self.endpoint(EVALUATE_PATH)?;
        tracing::debug!(
            "POST {} ({} bytes)",
            url,
            request.document.len()
        );

        let response = self
            .client
            .post(url)
            .multipart(Self::form(request)?)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are kept for logs only, never parsed
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::Transport(format!("Failed to read response: {}", e)))?;

        EvaluationResult::from_slice(&body)
    }

    async fn warm_up(&self) -> Result<(), RemoteError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status {
                status: status.as_u16(),
                body: String::new(),
            })
        }
    }
}

/// Accept http(s) URLs only and make sure relative joins stay under the base path
fn parse_base_url(raw: &str) -> Result<Url, RemoteError> {
    let mut url =
        Url::parse(raw).map_err(|e| RemoteError::InvalidEndpoint(format!("{}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(RemoteError::InvalidEndpoint(format!(
            "{}: unsupported scheme '{}'",
            raw,
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
