//! Interactive shell over a [`Workbench`]

use anyhow::{anyhow, bail, Result};
use colored::*;
use std::io::{self, BufRead, Write};

use crate::cli::display;
use crate::confirm::{ActionOutcome, Confirm};
use crate::error::ClassifierResult;
use crate::view::ViewMode;
use crate::workbench::Workbench;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
  /// Replace the document text
  Input(String),
  /// Analyze, optionally replacing the document text first
  Analyze(Option<String>),
  AddKeyword(String),
  /// 1-based position, as displayed
  RemoveKeyword(usize),
  SaveKeywords,
  /// Confirm the prediction with this rank
  Pick(u32),
  /// Confirm a manually entered department
  Department(String),
  History,
  Back,
  Show,
  Inspect(RecordRef),
  Delete(RecordRef),
  Clear,
  Help,
  Quit,
}

/// A history record addressed by id or by its listed position (`#2`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
  Id(String),
  Position(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Quit,
}

pub const HELP: &str = "\
Analysis view:
  input <text>        set the requested document text
  analyze [text]      analyze the current (or given) text
  kw add <keyword>    add a keyword
  kw rm <n>           remove keyword number n
  kw save             save keywords to the history record
  pick <rank>         confirm the prediction with this rank
  dept <name>         confirm a department typed by hand
  history             switch to the history view
History view:
  inspect <id|#n>     show one record in full
  delete <id|#n>      delete one record
  clear               delete every record
  back                return to the analysis view
Anywhere:
  show, help, quit";

/// Parse one line of shell input. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
  let line = line.trim();
  if line.is_empty() {
    return Ok(None);
  }

  let (word, rest) = match line.split_once(char::is_whitespace) {
    Some((word, rest)) => (word, rest.trim()),
    None => (line, ""),
  };

  let command = match word.to_lowercase().as_str() {
    "input" => ShellCommand::Input(required(rest, "input <text>")?.to_string()),
    "analyze" | "a" => ShellCommand::Analyze((!rest.is_empty()).then(|| rest.to_string())),
    "kw" | "keyword" => parse_keyword_command(rest)?,
    "pick" => ShellCommand::Pick(
      required(rest, "pick <rank>")?.parse().map_err(|_| anyhow!("Rank must be a number"))?,
    ),
    "dept" | "department" => ShellCommand::Department(required(rest, "dept <name>")?.to_string()),
    "history" | "h" => ShellCommand::History,
    "back" | "b" => ShellCommand::Back,
    "show" | "s" => ShellCommand::Show,
    "inspect" | "i" => ShellCommand::Inspect(parse_record_ref(required(rest, "inspect <id|#n>")?)?),
    "delete" | "del" | "rm" => {
      ShellCommand::Delete(parse_record_ref(required(rest, "delete <id|#n>")?)?)
    }
    "clear" => ShellCommand::Clear,
    "help" | "?" => ShellCommand::Help,
    "quit" | "exit" | "q" => ShellCommand::Quit,
    other => bail!("Unknown command '{other}'. Type 'help' for a list."),
  };

  Ok(Some(command))
}

fn parse_keyword_command(rest: &str) -> Result<ShellCommand> {
  let (action, arg) = match rest.split_once(char::is_whitespace) {
    Some((action, arg)) => (action, arg.trim()),
    None => (rest, ""),
  };

  match action {
    "add" => Ok(ShellCommand::AddKeyword(required(arg, "kw add <keyword>")?.to_string())),
    "rm" | "remove" => {
      let position: usize = required(arg, "kw rm <n>")?
        .parse()
        .map_err(|_| anyhow!("Keyword number must be a positive number"))?;
      if position == 0 {
        bail!("Keywords are numbered from 1");
      }
      Ok(ShellCommand::RemoveKeyword(position))
    }
    "save" => Ok(ShellCommand::SaveKeywords),
    _ => bail!("Usage: kw add <keyword> | kw rm <n> | kw save"),
  }
}

fn parse_record_ref(arg: &str) -> Result<RecordRef> {
  match arg.strip_prefix('#') {
    Some(position) => {
      let position: usize =
        position.parse().map_err(|_| anyhow!("'#{position}' is not a record number"))?;
      if position == 0 {
        bail!("Records are numbered from 1");
      }
      Ok(RecordRef::Position(position))
    }
    None => Ok(RecordRef::Id(arg.to_string())),
  }
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str> {
  if arg.is_empty() {
    bail!("Usage: {usage}");
  }
  Ok(arg)
}

/// Resolve a record reference against the currently listed records
fn resolve_record(workbench: &Workbench, reference: &RecordRef) -> Option<String> {
  match reference {
    RecordRef::Id(id) => Some(id.clone()),
    RecordRef::Position(position) => position
      .checked_sub(1)
      .and_then(|index| workbench.history.records().get(index))
      .map(|record| record.id.clone()),
  }
}

fn require_mode(workbench: &Workbench, mode: ViewMode) -> bool {
  if workbench.mode() == mode {
    return true;
  }
  match mode {
    ViewMode::Analysis => display::warn("Only available in the analysis view; type 'back' first"),
    ViewMode::History => display::warn("Only available in the history view; type 'history' first"),
  }
  false
}

fn report(result: ClassifierResult<ActionOutcome>, done: &str) {
  match result {
    Ok(ActionOutcome::Completed) => display::success(done),
    Ok(ActionOutcome::Declined) => display::info("Cancelled."),
    Err(err) => display::failure(&err),
  }
}

/// Render whatever the current view shows
pub fn render(workbench: &Workbench) -> String {
  match workbench.mode() {
    ViewMode::Analysis => match workbench.session.ready() {
      Some(ready) => display::format_analysis(ready),
      None => match workbench.session.last_error() {
        Some(err) => format!("Last analysis failed: {err}\n"),
        None => "No analysis yet. Use 'input <text>' then 'analyze'.\n".to_string(),
      },
    },
    ViewMode::History => display::format_history(workbench.history.records()),
  }
}

/// Run one command. Service failures are reported to the operator and the
/// shell carries on.
pub async fn execute(
  workbench: &mut Workbench,
  command: ShellCommand,
  confirm: &dyn Confirm,
) -> Result<Flow> {
  match command {
    ShellCommand::Input(text) => {
      workbench.session.set_input(text);
      display::info("Input updated.");
    }
    ShellCommand::Analyze(text) => {
      if !require_mode(workbench, ViewMode::Analysis) {
        return Ok(Flow::Continue);
      }
      if let Some(text) = text {
        workbench.session.set_input(text);
      }
      display::info("Analyzing...");
      match workbench.session.analyze().await {
        Ok(()) => print!("{}", render(workbench)),
        Err(err) => display::failure(&err),
      }
    }
    ShellCommand::AddKeyword(keyword) => {
      if require_mode(workbench, ViewMode::Analysis) {
        if workbench.session.result().is_none() {
          display::warn("Run an analysis first");
        } else if workbench.session.add_keyword(&keyword) {
          print_keywords(workbench);
        }
      }
    }
    ShellCommand::RemoveKeyword(position) => {
      if require_mode(workbench, ViewMode::Analysis) {
        match position.checked_sub(1).and_then(|index| workbench.session.remove_keyword(index)) {
          Some(_) => print_keywords(workbench),
          None => display::warn(&format!("No keyword number {position}")),
        }
      }
    }
    ShellCommand::SaveKeywords => {
      if require_mode(workbench, ViewMode::Analysis) {
        match workbench.session.persist_keywords().await {
          Ok(()) => display::success("Keyword changes saved to history."),
          Err(err) => display::failure(&err),
        }
      }
    }
    ShellCommand::Pick(rank) => {
      if require_mode(workbench, ViewMode::Analysis) {
        let result = workbench.session.correct_with_prediction(rank, confirm).await;
        report(result, "Correction recorded; the history record now carries this department.");
      }
    }
    ShellCommand::Department(department) => {
      if require_mode(workbench, ViewMode::Analysis) {
        let result = workbench.session.correct_department(&department, confirm).await;
        report(result, "Correction recorded; the history record now carries this department.");
      }
    }
    ShellCommand::History => {
      display::info("Loading history...");
      match workbench.show_history().await {
        Ok(()) => print!("{}", render(workbench)),
        Err(err) => display::failure(&err),
      }
    }
    ShellCommand::Back => {
      workbench.show_analysis();
      print!("{}", render(workbench));
    }
    ShellCommand::Show => print!("{}", render(workbench)),
    ShellCommand::Inspect(reference) => {
      if require_mode(workbench, ViewMode::History) {
        let record = resolve_record(workbench, &reference)
          .and_then(|id| workbench.history.get(&id).cloned());
        match record {
          Some(record) => print!("{}", display::format_record(&record)),
          None => display::warn("No such record in the current list"),
        }
      }
    }
    ShellCommand::Delete(reference) => {
      if require_mode(workbench, ViewMode::History) {
        match resolve_record(workbench, &reference) {
          Some(id) => {
            let result = workbench.history.delete(&id, confirm).await;
            report(result, "Record deleted.");
          }
          None => display::warn("No such record in the current list"),
        }
      }
    }
    ShellCommand::Clear => {
      if require_mode(workbench, ViewMode::History) {
        let result = workbench.history.clear(confirm).await;
        report(result, "History cleared.");
      }
    }
    ShellCommand::Help => println!("{HELP}"),
    ShellCommand::Quit => return Ok(Flow::Quit),
  }

  Ok(Flow::Continue)
}

fn print_keywords(workbench: &Workbench) {
  if let Some(keywords) = workbench.session.keywords() {
    print!("{}", display::format_keywords(keywords.as_slice()));
  }
}

fn prompt(workbench: &Workbench) -> String {
  match workbench.mode() {
    ViewMode::Analysis => format!("{} ", "docket>".blue().bold()),
    ViewMode::History => format!("{} ", "history>".magenta().bold()),
  }
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(workbench: &mut Workbench, confirm: &dyn Confirm) -> Result<()> {
  println!("{}", "Requested-document classifier. Type 'help' for commands.".bold());

  let stdin = io::stdin();
  loop {
    print!("{}", prompt(workbench));
    io::stdout().flush()?;

    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
      println!();
      break;
    }

    match parse_command(&line) {
      Ok(None) => continue,
      Ok(Some(command)) => {
        if execute(workbench, command, confirm).await? == Flow::Quit {
          break;
        }
      }
      Err(e) => display::warn(&e.to_string()),
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parsed(line: &str) -> ShellCommand {
    parse_command(line).unwrap().unwrap()
  }

  #[test]
  fn test_blank_line() {
    assert!(parse_command("   ").unwrap().is_none());
  }

  #[test]
  fn test_input_keeps_inner_spacing() {
    assert_eq!(
      parsed("input  예산안 관련  자료 제출 요청 "),
      ShellCommand::Input("예산안 관련  자료 제출 요청".to_string())
    );
    assert!(parse_command("input").is_err());
  }

  #[test]
  fn test_analyze_with_and_without_text() {
    assert_eq!(parsed("analyze"), ShellCommand::Analyze(None));
    assert_eq!(parsed("a 인사 자료"), ShellCommand::Analyze(Some("인사 자료".to_string())));
  }

  #[test]
  fn test_keyword_commands() {
    assert_eq!(parsed("kw add 요청"), ShellCommand::AddKeyword("요청".to_string()));
    assert_eq!(parsed("kw rm 2"), ShellCommand::RemoveKeyword(2));
    assert_eq!(parsed("kw save"), ShellCommand::SaveKeywords);
    assert!(parse_command("kw rm 0").is_err());
    assert!(parse_command("kw rm x").is_err());
    assert!(parse_command("kw add").is_err());
    assert!(parse_command("kw").is_err());
  }

  #[test]
  fn test_department_commands() {
    assert_eq!(parsed("pick 1"), ShellCommand::Pick(1));
    assert!(parse_command("pick first").is_err());
    assert_eq!(parsed("dept 정보화기획실"), ShellCommand::Department("정보화기획실".to_string()));
  }

  #[test]
  fn test_record_refs() {
    assert_eq!(parsed("delete abc-123"), ShellCommand::Delete(RecordRef::Id("abc-123".to_string())));
    assert_eq!(parsed("del #3"), ShellCommand::Delete(RecordRef::Position(3)));
    assert_eq!(parsed("inspect #1"), ShellCommand::Inspect(RecordRef::Position(1)));
    assert!(parse_command("delete #0").is_err());
    assert!(parse_command("delete #x").is_err());
  }

  #[test]
  fn test_view_and_misc_commands() {
    assert_eq!(parsed("HISTORY"), ShellCommand::History);
    assert_eq!(parsed("back"), ShellCommand::Back);
    assert_eq!(parsed("clear"), ShellCommand::Clear);
    assert_eq!(parsed("?"), ShellCommand::Help);
    assert_eq!(parsed("exit"), ShellCommand::Quit);
    assert!(parse_command("frobnicate").is_err());
  }
}
