//! Operator confirmation for destructive or training-affecting actions

use std::fmt;

/// What the operator is being asked to approve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
  /// Send `department` to the service as the correct label
  Correct { department: String },
  /// Delete one history record
  DeleteRecord { id: String },
  /// Delete every history record; cannot be undone
  ClearHistory,
}

impl fmt::Display for ConfirmRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Correct { department } => {
        write!(f, "Confirm '{department}' as the correct department?")
      }
      Self::DeleteRecord { id } => write!(f, "Delete history record {id}?"),
      Self::ClearHistory => write!(f, "Delete ALL history records? This cannot be undone."),
    }
  }
}

/// Answers confirmation requests. Implemented by the terminal prompt, by
/// `--yes`, and by closures in tests.
pub trait Confirm: Send + Sync {
  fn confirm(&self, request: &ConfirmRequest) -> bool;
}

impl<F> Confirm for F
where
  F: Fn(&ConfirmRequest) -> bool + Send + Sync,
{
  fn confirm(&self, request: &ConfirmRequest) -> bool {
    self(request)
  }
}

/// Approves everything without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
  fn confirm(&self, _request: &ConfirmRequest) -> bool {
    true
  }
}

/// Result of an action that needed confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
  /// The operator approved and the service accepted the change
  Completed,
  /// The operator declined; nothing was sent
  Declined,
}
