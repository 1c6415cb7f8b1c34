//! The state the presentation layer drives: one session, one history store
//! and one view controller sharing a gateway.
//!
//! Fields are public so the session and the store can be borrowed
//! independently; they own disjoint state and may run interleaved.

use anyhow::Result;
use std::sync::Arc;

use crate::client::{ClassificationGateway, HttpGateway};
use crate::config::ClientConfig;
use crate::error::ClassifierResult;
use crate::history::HistoryStore;
use crate::session::AnalysisSession;
use crate::view::{ViewController, ViewMode};

pub struct Workbench {
  pub session: AnalysisSession,
  pub history: HistoryStore,
  pub view: ViewController,
}

impl Workbench {
  pub fn new(gateway: Arc<dyn ClassificationGateway>) -> Self {
    Self {
      session: AnalysisSession::new(Arc::clone(&gateway)),
      history: HistoryStore::new(gateway),
      view: ViewController::new(),
    }
  }

  /// Build a workbench talking HTTP to the configured service
  pub fn connect(config: ClientConfig) -> Result<Self> {
    tracing::debug!(base_url = %config.base_url, "connecting workbench");
    Ok(Self::new(Arc::new(HttpGateway::new(config)?)))
  }

  pub fn mode(&self) -> ViewMode {
    self.view.mode()
  }

  pub async fn show_history(&mut self) -> ClassifierResult<()> {
    self.view.show_history(&mut self.history).await
  }

  pub fn show_analysis(&mut self) {
    self.view.show_analysis();
  }
}
