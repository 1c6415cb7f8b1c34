//! Analysis session: submit text, review the result, edit keywords, confirm a department

use std::sync::Arc;

use crate::client::ClassificationGateway;
use crate::confirm::{ActionOutcome, Confirm, ConfirmRequest};
use crate::error::{ClassifierError, ClassifierResult};
use crate::types::AnalysisResult;

/// Keywords the operator edits locally. Seeded from the analysis result and
/// only written back to the service on an explicit save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
  keywords: Vec<String>,
}

impl KeywordSet {
  pub fn new(keywords: Vec<String>) -> Self {
    Self { keywords }
  }

  /// Append the trimmed text. Blank text is ignored; duplicates are kept.
  pub fn add(&mut self, text: &str) -> bool {
    let keyword = text.trim();
    if keyword.is_empty() {
      return false;
    }
    self.keywords.push(keyword.to_string());
    true
  }

  /// Remove the keyword at `index`, if there is one
  pub fn remove(&mut self, index: usize) -> Option<String> {
    if index < self.keywords.len() {
      Some(self.keywords.remove(index))
    } else {
      None
    }
  }

  pub fn as_slice(&self) -> &[String] {
    &self.keywords
  }

  pub fn len(&self) -> usize {
    self.keywords.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keywords.is_empty()
  }
}

/// A result under review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyAnalysis {
  pub result: AnalysisResult,
  pub keywords: KeywordSet,
  /// The text that produced `result`
  pub content: String,
}

impl ReadyAnalysis {
  fn linked_history_id(&self) -> ClassifierResult<&str> {
    self
      .result
      .history_id
      .as_deref()
      .filter(|id| !id.is_empty())
      .ok_or_else(|| ClassifierError::validation("This analysis is not linked to a history record"))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
  #[default]
  Idle,
  Analyzing,
  Ready(Box<ReadyAnalysis>),
  Failed(ClassifierError),
}

/// Holds the session in `Analyzing` until `finish`; reverts it to `Idle` if
/// the analyze future is dropped first
struct InFlight<'a> {
  state: &'a mut AnalysisState,
}

impl<'a> InFlight<'a> {
  fn start(state: &'a mut AnalysisState) -> Self {
    *state = AnalysisState::Analyzing;
    Self { state }
  }

  fn finish(self, next: AnalysisState) {
    *self.state = next;
  }
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    if matches!(self.state, AnalysisState::Analyzing) {
      tracing::debug!("analysis abandoned before the service answered");
      *self.state = AnalysisState::Idle;
    }
  }
}

pub struct AnalysisSession {
  gateway: Arc<dyn ClassificationGateway>,
  input: String,
  state: AnalysisState,
}

impl AnalysisSession {
  pub fn new(gateway: Arc<dyn ClassificationGateway>) -> Self {
    Self { gateway, input: String::new(), state: AnalysisState::Idle }
  }

  pub fn input(&self) -> &str {
    &self.input
  }

  /// Replace the document text. The session never clears it on its own.
  pub fn set_input(&mut self, text: impl Into<String>) {
    self.input = text.into();
  }

  pub fn state(&self) -> &AnalysisState {
    &self.state
  }

  pub fn is_analyzing(&self) -> bool {
    matches!(self.state, AnalysisState::Analyzing)
  }

  pub fn ready(&self) -> Option<&ReadyAnalysis> {
    match &self.state {
      AnalysisState::Ready(ready) => Some(ready),
      _ => None,
    }
  }

  pub fn result(&self) -> Option<&AnalysisResult> {
    self.ready().map(|ready| &ready.result)
  }

  pub fn keywords(&self) -> Option<&KeywordSet> {
    self.ready().map(|ready| &ready.keywords)
  }

  pub fn history_id(&self) -> Option<&str> {
    self.result().and_then(|result| result.history_id.as_deref())
  }

  pub fn last_error(&self) -> Option<&ClassifierError> {
    match &self.state {
      AnalysisState::Failed(err) => Some(err),
      _ => None,
    }
  }

  /// Submit the current input for analysis.
  ///
  /// Empty input and a submission while another is in flight are rejected
  /// without touching state. Otherwise any previous result and its history
  /// link are dropped before the request goes out. If the returned future is
  /// dropped before the service answers, the session falls back to `Idle`.
  pub async fn analyze(&mut self) -> ClassifierResult<()> {
    if self.is_analyzing() {
      return Err(ClassifierError::validation("An analysis is already in progress"));
    }
    if self.input.trim().is_empty() {
      return Err(ClassifierError::validation("Enter the requested document text first"));
    }

    let content = self.input.clone();
    let in_flight = InFlight::start(&mut self.state);
    tracing::debug!(chars = content.chars().count(), "analysis started");

    match self.gateway.analyze(&content).await {
      Ok(result) => {
        tracing::info!(
          history_id = result.history_id.as_deref().unwrap_or("-"),
          keywords = result.keywords.len(),
          "analysis ready"
        );
        let keywords = KeywordSet::new(result.keywords.clone());
        in_flight.finish(AnalysisState::Ready(Box::new(ReadyAnalysis { result, keywords, content })));
        Ok(())
      }
      Err(err) => {
        tracing::warn!(error = %err, "analysis failed");
        in_flight.finish(AnalysisState::Failed(err.clone()));
        Err(err)
      }
    }
  }

  /// Add a keyword locally. No-op without a result or for blank text.
  pub fn add_keyword(&mut self, text: &str) -> bool {
    match &mut self.state {
      AnalysisState::Ready(ready) => ready.keywords.add(text),
      _ => false,
    }
  }

  /// Remove a keyword locally. No-op without a result or for an out-of-range index.
  pub fn remove_keyword(&mut self, index: usize) -> Option<String> {
    match &mut self.state {
      AnalysisState::Ready(ready) => ready.keywords.remove(index),
      _ => None,
    }
  }

  /// Write the local keyword list to the linked history record.
  /// Local keywords are left as they are whether or not the write succeeds.
  pub async fn persist_keywords(&self) -> ClassifierResult<()> {
    let ready = self.require_ready("Nothing to save: run an analysis first")?;
    let history_id = ready.linked_history_id()?;

    self.gateway.persist_keywords(history_id, ready.keywords.as_slice()).await?;
    tracing::info!(history_id, keywords = ?ready.keywords.as_slice(), "keywords saved");
    Ok(())
  }

  /// Confirm one of the ranked predictions as the correct department
  pub async fn correct_with_prediction(
    &self,
    rank: u32,
    confirm: &dyn Confirm,
  ) -> ClassifierResult<ActionOutcome> {
    let ready = self.require_ready("No predictions to choose from: run an analysis first")?;
    let department = ready
      .result
      .prediction_by_rank(rank)
      .map(|prediction| prediction.department.clone())
      .ok_or_else(|| ClassifierError::validation(format!("No prediction with rank {rank}")))?;

    self.correct_department(&department, confirm).await
  }

  /// Send `department` as the correct label once the operator confirms it
  pub async fn correct_department(
    &self,
    department: &str,
    confirm: &dyn Confirm,
  ) -> ClassifierResult<ActionOutcome> {
    let department = department.trim();
    if department.is_empty() {
      return Err(ClassifierError::validation("Enter a department name"));
    }

    let ready = self.require_ready("Nothing to correct: run an analysis first")?;
    let history_id = ready.linked_history_id()?;

    if !confirm.confirm(&ConfirmRequest::Correct { department: department.to_string() }) {
      tracing::debug!(department, "correction declined");
      return Ok(ActionOutcome::Declined);
    }

    self.gateway.correct(history_id, &ready.content, department).await?;
    tracing::info!(history_id, department, "department confirmed");
    Ok(ActionOutcome::Completed)
  }

  fn require_ready(&self, message: &str) -> ClassifierResult<&ReadyAnalysis> {
    self.ready().ok_or_else(|| ClassifierError::validation(message))
  }
}
