//! History store: the fetched list of past analyses

use std::sync::Arc;

use crate::client::ClassificationGateway;
use crate::confirm::{ActionOutcome, Confirm, ConfirmRequest};
use crate::error::{ClassifierError, ClassifierResult};
use crate::types::HistoryRecord;

/// Sets a flag for as long as it is alive
struct LoadingFlag<'a>(&'a mut bool);

impl<'a> LoadingFlag<'a> {
  fn raise(flag: &'a mut bool) -> Self {
    *flag = true;
    Self(flag)
  }
}

impl Drop for LoadingFlag<'_> {
  fn drop(&mut self) {
    *self.0 = false;
  }
}

pub struct HistoryStore {
  gateway: Arc<dyn ClassificationGateway>,
  records: Vec<HistoryRecord>,
  loading: bool,
  last_error: Option<ClassifierError>,
}

impl HistoryStore {
  pub fn new(gateway: Arc<dyn ClassificationGateway>) -> Self {
    Self { gateway, records: Vec::new(), loading: false, last_error: None }
  }

  pub fn records(&self) -> &[HistoryRecord] {
    &self.records
  }

  pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
    self.records.iter().find(|record| record.id == id)
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// True only while `refresh` holds the store. Cleared on every outcome,
  /// including a refresh future that is dropped before the service answers.
  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Error from the most recent refresh, if it failed
  pub fn last_error(&self) -> Option<&ClassifierError> {
    self.last_error.as_ref()
  }

  /// Re-fetch every record, replacing the local list on success.
  /// On failure the previous list is kept.
  pub async fn refresh(&mut self) -> ClassifierResult<()> {
    let fetched = {
      let _loading = LoadingFlag::raise(&mut self.loading);
      self.gateway.list_history().await
    };

    match fetched {
      Ok(records) => {
        tracing::debug!(count = records.len(), "history refreshed");
        self.records = records;
        self.last_error = None;
        Ok(())
      }
      Err(err) => {
        tracing::warn!(error = %err, "history refresh failed");
        self.last_error = Some(err.clone());
        Err(err)
      }
    }
  }

  /// Delete one record after confirmation, then drop it from the local list by id
  pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> ClassifierResult<ActionOutcome> {
    if id.trim().is_empty() {
      return Err(ClassifierError::validation("Specify which record to delete"));
    }
    if !confirm.confirm(&ConfirmRequest::DeleteRecord { id: id.to_string() }) {
      return Ok(ActionOutcome::Declined);
    }

    self.gateway.delete_history_item(id).await?;
    self.records.retain(|record| record.id != id);
    tracing::info!(record_id = id, remaining = self.records.len(), "history record deleted");
    Ok(ActionOutcome::Completed)
  }

  /// Delete every record after confirmation
  pub async fn clear(&mut self, confirm: &dyn Confirm) -> ClassifierResult<ActionOutcome> {
    if !confirm.confirm(&ConfirmRequest::ClearHistory) {
      return Ok(ActionOutcome::Declined);
    }

    self.gateway.clear_history().await?;
    self.records.clear();
    tracing::info!("history cleared");
    Ok(ActionOutcome::Completed)
  }
}
