//! Which workflow is on screen

use crate::error::ClassifierResult;
use crate::history::HistoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
  #[default]
  Analysis,
  History,
}

#[derive(Debug, Default)]
pub struct ViewController {
  mode: ViewMode,
}

impl ViewController {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn mode(&self) -> ViewMode {
    self.mode
  }

  /// Show the history view. Every call refreshes the store, even when the
  /// history view is already showing.
  pub async fn show_history(&mut self, history: &mut HistoryStore) -> ClassifierResult<()> {
    self.mode = ViewMode::History;
    history.refresh().await
  }

  /// Return to the analysis view. Session state is untouched.
  pub fn show_analysis(&mut self) {
    self.mode = ViewMode::Analysis;
  }
}
