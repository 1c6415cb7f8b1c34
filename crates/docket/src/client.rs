//! Service gateway for the classification service
//!
//! A thin typed wrapper over the service's HTTP endpoints. It holds no
//! business state: every method is exactly one request and one response,
//! with no retry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClassifierError, ClassifierResult};
use crate::types::{
  AnalysisResult, AnalyzeRequest, CorrectRequest, DeleteRecordRequest, ErrorBody, HistoryRecord,
  UpdateKeywordsRequest,
};

/// The remote operations the session and history store depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassificationGateway: Send + Sync {
  /// Submit document text; always creates a new history record
  async fn analyze(&self, content: &str) -> ClassifierResult<AnalysisResult>;

  /// Overwrite the keyword list of a history record
  async fn persist_keywords(&self, history_id: &str, keywords: &[String]) -> ClassifierResult<()>;

  /// Record the operator-confirmed department as a training signal
  async fn correct(&self, history_id: &str, content: &str, department: &str)
    -> ClassifierResult<()>;

  /// All history records, in service order
  async fn list_history(&self) -> ClassifierResult<Vec<HistoryRecord>>;

  async fn delete_history_item(&self, id: &str) -> ClassifierResult<()>;

  async fn clear_history(&self) -> ClassifierResult<()>;
}

/// reqwest-backed gateway
pub struct HttpGateway {
  client: Client,
  config: ClientConfig,
}

impl HttpGateway {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build().context("Failed to create HTTP client")?;

    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  fn endpoint(&self, path: &str) -> ClassifierResult<Url> {
    self
      .config
      .base_url
      .join(path)
      .map_err(|e| ClassifierError::transport(format!("invalid endpoint '{path}': {e}")))
  }

  async fn post<B: Serialize + Sync>(&self, path: &str, body: Option<&B>) -> ClassifierResult<Response> {
    let url = self.endpoint(path)?;
    tracing::debug!(%url, "POST");

    let request = self.client.post(url);
    let request = match body {
      Some(body) => request.json(body),
      None => request,
    };

    let response = request.send().await.map_err(|e| {
      tracing::warn!(endpoint = path, error = %e, "request failed");
      ClassifierError::from(e)
    })?;
    tracing::debug!(endpoint = path, status = %response.status(), "response received");
    Ok(response)
  }

  async fn get(&self, path: &str) -> ClassifierResult<Response> {
    let url = self.endpoint(path)?;
    tracing::debug!(%url, "GET");

    let response = self.client.get(url).send().await.map_err(|e| {
      tracing::warn!(endpoint = path, error = %e, "request failed");
      ClassifierError::from(e)
    })?;
    tracing::debug!(endpoint = path, status = %response.status(), "response received");
    Ok(response)
  }
}

/// Read a response body, surfacing an `error` field or a failing status as a remote error
async fn read_body(response: Response, action: &str) -> ClassifierResult<Vec<u8>> {
  let status = response.status();
  let bytes = response.bytes().await.map_err(ClassifierError::from)?;

  if let Ok(ErrorBody { error: Some(message) }) = serde_json::from_slice::<ErrorBody>(&bytes) {
    tracing::warn!(action, %status, %message, "service reported an error");
    return Err(ClassifierError::remote(message));
  }

  if !status.is_success() {
    tracing::warn!(action, %status, "service returned a failing status");
    return Err(ClassifierError::remote(format!("{action} failed: HTTP {status}")));
  }

  Ok(bytes.to_vec())
}

async fn decode<T: DeserializeOwned>(response: Response, action: &str) -> ClassifierResult<T> {
  let bytes = read_body(response, action).await?;
  serde_json::from_slice(&bytes)
    .map_err(|e| ClassifierError::remote(format!("malformed {action} response: {e}")))
}

async fn acknowledge(response: Response, action: &str) -> ClassifierResult<()> {
  read_body(response, action).await.map(|_| ())
}

#[async_trait]
impl ClassificationGateway for HttpGateway {
  async fn analyze(&self, content: &str) -> ClassifierResult<AnalysisResult> {
    let response = self.post("analyze", Some(&AnalyzeRequest { content })).await?;
    let result: AnalysisResult = decode(response, "analyze").await?;
    tracing::info!(
      history_id = result.history_id.as_deref().unwrap_or("-"),
      predictions = result.predictions.len(),
      "analysis received"
    );
    Ok(result)
  }

  async fn persist_keywords(&self, history_id: &str, keywords: &[String]) -> ClassifierResult<()> {
    let body = UpdateKeywordsRequest { id: history_id, keywords };
    let response = self.post("update_history", Some(&body)).await?;
    acknowledge(response, "update keywords").await
  }

  async fn correct(
    &self,
    history_id: &str,
    content: &str,
    department: &str,
  ) -> ClassifierResult<()> {
    let body = CorrectRequest { id: history_id, content, department };
    let response = self.post("correct", Some(&body)).await?;
    acknowledge(response, "correct").await
  }

  async fn list_history(&self) -> ClassifierResult<Vec<HistoryRecord>> {
    let response = self.get("history").await?;
    decode(response, "list history").await
  }

  async fn delete_history_item(&self, id: &str) -> ClassifierResult<()> {
    let response = self.post("delete_history_item", Some(&DeleteRecordRequest { id })).await?;
    acknowledge(response, "delete history item").await
  }

  async fn clear_history(&self) -> ClassifierResult<()> {
    let response = self.post::<()>("clear_history", None).await?;
    acknowledge(response, "clear history").await
  }
}
