//! Terminal rendering and operator notifications

use colored::*;

use crate::error::ClassifierError;
use crate::session::ReadyAnalysis;
use crate::types::HistoryRecord;

fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

fn notify(color: Color, prefix: &str, message: &str) {
  let prefix = format_prefix(color, prefix);
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
}

pub fn info(message: &str) {
  notify(Color::Blue, "info", message);
}

pub fn success(message: &str) {
  notify(Color::Green, "done", message);
}

pub fn warn(message: &str) {
  notify(Color::Yellow, "warn", message);
}

/// Surface a failed action to the operator
pub fn failure(err: &ClassifierError) {
  match err {
    ClassifierError::Validation { .. } => notify(Color::Yellow, "warn", &err.to_string()),
    _ => notify(Color::Red, "error", &err.to_string()),
  }
}

pub fn format_analysis(ready: &ReadyAnalysis) -> String {
  let mut out = String::new();
  let result = &ready.result;

  out.push_str(&format!("{}\n", "📄 Summary".blue().bold()));
  out.push_str(&format!("{}\n\n", result.summary));

  out.push_str(&format!("{}\n", "🏷  Keywords (edit, then save)".blue().bold()));
  out.push_str(&format_keywords(ready.keywords.as_slice()));
  out.push('\n');

  out.push_str(&format!("{}\n", "🏢 Suggested departments".blue().bold()));
  if result.predictions.is_empty() {
    out.push_str(&format!("  {}\n", "no predictions".dimmed()));
  }
  for (index, prediction) in result.predictions.iter().enumerate() {
    let rank = format!("{:>2}", index + 1);
    if index == 0 {
      out.push_str(&format!(
        "  {} {} {}\n",
        rank.green().bold(),
        prediction.department.green().bold(),
        "★".green()
      ));
    } else {
      out.push_str(&format!("  {} {}\n", rank.dimmed(), prediction.department.bold()));
    }
    if !prediction.reason.is_empty() {
      out.push_str(&format!("     {}\n", prediction.reason.dimmed()));
    }
  }

  if let Some(id) = result.history_id.as_deref() {
    out.push_str(&format!("\n{} {}\n", "history id:".dimmed(), id.cyan()));
  }

  out
}

/// Keywords numbered from 1, as the shell addresses them
pub fn format_keywords(keywords: &[String]) -> String {
  if keywords.is_empty() {
    return format!("  {}\n", "(none)".dimmed());
  }

  let tags: Vec<String> = keywords
    .iter()
    .enumerate()
    .map(|(index, keyword)| format!("{}:{}", index + 1, format!("#{keyword}").cyan()))
    .collect();
  format!("  {}\n", tags.join("  "))
}

pub fn format_history(records: &[HistoryRecord]) -> String {
  if records.is_empty() {
    return "No history records.\n".to_string();
  }

  let mut out = format!("{} record(s)\n\n", records.len());
  for (index, record) in records.iter().enumerate() {
    out.push_str(&format!(
      "{:>3}. {} {} {}\n",
      index + 1,
      record.timestamp.dimmed(),
      record.final_department.blue().bold(),
      record.id.cyan()
    ));
    out.push_str(&format!("     {}\n", first_line(&record.input, 70)));
  }
  out
}

pub fn format_record(record: &HistoryRecord) -> String {
  let mut out = String::new();
  out.push_str(&format!("{} {}\n", "id:".dimmed(), record.id.cyan()));
  out.push_str(&format!("{} {}\n", "time:".dimmed(), record.timestamp));
  out.push_str(&format!("{} {}\n\n", "department:".dimmed(), record.final_department.blue().bold()));
  out.push_str(&format!("{}\n\n", record.input));

  if !record.keywords.is_empty() {
    let tags: Vec<String> = record.keywords.iter().map(|k| format!("#{k}")).collect();
    out.push_str(&format!("{}\n\n", tags.join(" ").cyan()));
  }

  out.push_str(&format!("{}\n", record.summary));
  out
}

/// First line of `text`, cut to `width` characters
fn first_line(text: &str, width: usize) -> String {
  let line = text.lines().next().unwrap_or("");
  if line.chars().count() > width {
    let cut: String = line.chars().take(width).collect();
    format!("{cut}…")
  } else {
    line.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::session::KeywordSet;
  use crate::types::{AnalysisResult, Prediction};

  fn plain() {
    colored::control::set_override(false);
  }

  fn record(id: &str) -> HistoryRecord {
    HistoryRecord {
      id: id.to_string(),
      timestamp: "2025-03-01 09:30:00".to_string(),
      final_department: "기획재정부".to_string(),
      input: "예산안 관련 자료 제출 요청\n둘째 줄".to_string(),
      summary: "예산안 자료 요구".to_string(),
      keywords: vec!["예산".to_string(), "자료".to_string()],
    }
  }

  #[test]
  fn test_format_keywords_numbers_from_one() {
    plain();
    let keywords = vec!["예산".to_string(), "자료".to_string()];
    assert_eq!(format_keywords(&keywords), "  1:#예산  2:#자료\n");
    assert!(format_keywords(&[]).contains("(none)"));
  }

  #[test]
  fn test_format_analysis_marks_top_prediction() {
    plain();
    let ready = ReadyAnalysis {
      result: AnalysisResult {
        summary: "요약".to_string(),
        keywords: vec!["예산".to_string()],
        predictions: vec![
          Prediction {
            rank: Some(3),
            department: "기획재정부".to_string(),
            reason: "예산".to_string(),
          },
          Prediction { rank: None, department: "감사관실".to_string(), reason: String::new() },
        ],
        history_id: Some("abc123".to_string()),
      },
      keywords: KeywordSet::new(vec!["예산".to_string(), "요청".to_string()]),
      content: "요청".to_string(),
    };

    let out = format_analysis(&ready);
    assert!(out.contains(" 1 기획재정부 ★"));
    assert!(out.contains(" 2 감사관실"));
    assert!(!out.contains("감사관실 ★"));
    assert!(out.contains("2:#요청"));
    assert!(out.contains("abc123"));
  }

  #[test]
  fn test_format_history() {
    plain();
    assert_eq!(format_history(&[]), "No history records.\n");

    let out = format_history(&[record("h1"), record("h2")]);
    assert!(out.starts_with("2 record(s)"));
    assert!(out.contains("  1. 2025-03-01 09:30:00 기획재정부 h1"));
    assert!(!out.contains("둘째 줄"));
  }

  #[test]
  fn test_format_record_shows_everything() {
    plain();
    let out = format_record(&record("h1"));
    assert!(out.contains("둘째 줄"));
    assert!(out.contains("#예산 #자료"));
    assert!(out.contains("예산안 자료 요구"));
  }

  #[test]
  fn test_first_line_truncates_by_chars() {
    assert_eq!(first_line("가나다라마", 3), "가나다…");
    assert_eq!(first_line("짧음\n다음", 10), "짧음");
    assert_eq!(first_line("", 10), "");
  }
}
