//! LlamaParse Provider
//!
//! Client for the LlamaParse cloud API. A parse is a job: the file is
//! uploaded, the job is polled until it settles, then the per-page JSON
//! result is fetched.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::provider::DocumentParser;
use super::types::{ParsedDocument, ParserError, PAGE_KEY};
use crate::config::{ParserConfig, ResultType};

/// Job status as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum JobStatus {
    Pending,
    Success,
    PartialSuccess,
    Error,
    Canceled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    id: String,
    #[serde(default)]
    status: Option<JobStatus>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonResult {
    #[serde(default)]
    pages: Vec<JsonPage>,
}

#[derive(Debug, Deserialize)]
struct JsonPage {
    #[serde(default)]
    page: Option<Value>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    md: Option<String>,
}

/// LlamaParse cloud client
pub struct LlamaParseClient {
    client: reqwest::Client,
    config: ParserConfig,
}

impl LlamaParseClient {
    pub fn new(config: ParserConfig) -> Result<Self, ParserError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pdf-parse-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/parsing{}", self.config.base_url, path)
    }

    /// Upload the file and return the job id
    async fn upload(&self, path: &Path) -> Result<String, ParserError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/pdf")?;

        let form = Form::new()
            .part("file", part)
            .text("language", self.config.language.clone());

        let response = self
            .client
            .post(self.url("/upload"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let job: JobResponse = read_json(response).await?;
        Ok(job.id)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobResponse, ParserError> {
        let response = self
            .client
            .get(self.url(&format!("/job/{}", job_id)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        read_json(response).await
    }

    /// Poll until the job succeeds, fails, or runs past `max_timeout`
    async fn wait_for_completion(&self, job_id: &str) -> Result<(), ParserError> {
        let started = Instant::now();

        loop {
            let job = self.job_status(job_id).await?;

            match job.status {
                Some(JobStatus::Success) | Some(JobStatus::PartialSuccess) => return Ok(()),
                Some(status @ (JobStatus::Error | JobStatus::Canceled)) => {
                    return Err(ParserError::JobFailed {
                        job_id: job_id.to_string(),
                        message: job
                            .error_message
                            .unwrap_or_else(|| format!("job ended with status {:?}", status)),
                    });
                }
                _ => {}
            }

            if started.elapsed() >= self.config.max_timeout {
                return Err(ParserError::Timeout {
                    job_id: job_id.to_string(),
                    secs: self.config.max_timeout.as_secs(),
                });
            }

            tracing::debug!(job_id = %job_id, status = ?job.status, "Parse job still running");
            tokio::time::sleep(self.config.check_interval).await;
        }
    }

    async fn fetch_result(&self, job_id: &str) -> Result<Vec<ParsedDocument>, ParserError> {
        let response = self
            .client
            .get(self.url(&format!("/job/{}/result/json", job_id)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let result: JsonResult = read_json(response).await?;

        let documents = result
            .pages
            .into_iter()
            .map(|page| {
                let text = match self.config.result_type {
                    ResultType::Markdown => page.md.or(page.text),
                    ResultType::Text => page.text.or(page.md),
                }
                .unwrap_or_default();

                let mut doc = ParsedDocument::new(text).with_metadata("job_id", job_id);
                if let Some(number) = page.page {
                    doc = doc.with_metadata(PAGE_KEY, number);
                }
                doc
            })
            .collect();

        Ok(documents)
    }
}

#[async_trait]
impl DocumentParser for LlamaParseClient {
    fn name(&self) -> &'static str {
        "llamaparse"
    }

    async fn parse(&self, path: &Path) -> Result<Vec<ParsedDocument>, ParserError> {
        let job_id = self.upload(path).await?;
        tracing::debug!(job_id = %job_id, path = %path.display(), "Started LlamaParse job");

        self.wait_for_completion(&job_id).await?;
        self.fetch_result(&job_id).await
    }
}

/// Decode a JSON body, turning non-2xx responses into `ParserError::Api`
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ParserError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|e| e.to_string());
        return Err(ParserError::Api {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ParserError::InvalidResponse(e.to_string()))
}
