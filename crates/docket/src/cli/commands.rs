use anyhow::{bail, Context, Result};
use std::io::Read;

use crate::cli::display;
use crate::confirm::{ActionOutcome, Confirm};
use crate::workbench::Workbench;

/// Analyze `text` (or stdin when empty) and print the result
pub async fn analyze(workbench: &mut Workbench, text: &[String]) -> Result<()> {
  let content = if text.is_empty() {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer).context("Failed to read document from stdin")?;
    buffer
  } else {
    text.join(" ")
  };

  workbench.session.set_input(content);
  workbench.session.analyze().await?;

  if let Some(ready) = workbench.session.ready() {
    print!("{}", display::format_analysis(ready));
  }
  Ok(())
}

pub async fn list_history(workbench: &mut Workbench) -> Result<()> {
  workbench.show_history().await?;
  print!("{}", display::format_history(workbench.history.records()));
  Ok(())
}

pub async fn inspect_history(workbench: &mut Workbench, id: &str) -> Result<()> {
  workbench.show_history().await?;
  match workbench.history.get(id) {
    Some(record) => print!("{}", display::format_record(record)),
    None => bail!("No history record with id {id}"),
  }
  Ok(())
}

pub async fn delete_history(workbench: &mut Workbench, id: &str, confirm: &dyn Confirm) -> Result<()> {
  match workbench.history.delete(id, confirm).await? {
    ActionOutcome::Completed => display::success(&format!("Deleted history record {id}")),
    ActionOutcome::Declined => display::info("Delete cancelled."),
  }
  Ok(())
}

pub async fn clear_history(workbench: &mut Workbench, confirm: &dyn Confirm) -> Result<()> {
  match workbench.history.clear(confirm).await? {
    ActionOutcome::Completed => display::success("History cleared."),
    ActionOutcome::Declined => display::info("Clear cancelled."),
  }
  Ok(())
}
