use dialoguer::Confirm as YesNo;

use crate::confirm::{Confirm, ConfirmRequest};

/// Asks the operator on the terminal. Anything but an explicit yes declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
  fn confirm(&self, request: &ConfirmRequest) -> bool {
    match YesNo::new().with_prompt(request.to_string()).default(false).interact() {
      Ok(answer) => answer,
      Err(e) => {
        tracing::warn!(error = %e, "confirmation prompt failed, treating as declined");
        false
      }
    }
  }
}
