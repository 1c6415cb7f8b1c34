//! Wire and domain types shared by the gateway, the session and the history store

use serde::{Deserialize, Deserializer, Serialize};

// Analysis
// ========

/// A single ranked department suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
  /// Rank as reported by the service. Informational only: list position is
  /// the ranking. Missing or unreadable values become `None`.
  #[serde(default, deserialize_with = "lenient_rank", skip_serializing_if = "Option::is_none")]
  pub rank: Option<u32>,

  /// Suggested department name
  pub department: String,

  /// Why the service picked this department
  #[serde(default)]
  pub reason: String,
}

/// Result of one successful analyze call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
  /// Prose summary of the requested document
  #[serde(default)]
  pub summary: String,

  /// Keywords extracted by the service, in service order
  #[serde(default)]
  pub keywords: Vec<String>,

  /// Department predictions; index 0 is the top pick
  #[serde(default)]
  pub predictions: Vec<Prediction>,

  /// Identifier of the history record created for this analysis
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub history_id: Option<String>,
}

impl AnalysisResult {
  /// The highlighted top prediction, if any
  pub fn top_prediction(&self) -> Option<&Prediction> {
    self.predictions.first()
  }

  /// The prediction listed at 1-based position `rank`
  pub fn prediction_by_rank(&self, rank: u32) -> Option<&Prediction> {
    let index = usize::try_from(rank).ok()?.checked_sub(1)?;
    self.predictions.get(index)
  }
}

/// Accept a rank written as a number or a numeric string; anything else is `None`
fn lenient_rank<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
  D: Deserializer<'de>,
{
  let rank = match Option::<serde_json::Value>::deserialize(deserializer)? {
    Some(serde_json::Value::Number(number)) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
    Some(serde_json::Value::String(text)) => text.trim().parse().ok(),
    _ => None,
  };
  Ok(rank)
}

// History
// =======

/// A persisted past analysis, owned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
  pub id: String,

  /// Creation time as formatted by the service
  #[serde(default)]
  pub timestamp: String,

  /// Last confirmed department (initially the top prediction)
  #[serde(default)]
  pub final_department: String,

  /// Original requested-document text
  #[serde(default)]
  pub input: String,

  #[serde(default)]
  pub summary: String,

  #[serde(default)]
  pub keywords: Vec<String>,
}

// Requests
// ========

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
  pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateKeywordsRequest<'a> {
  pub id: &'a str,
  pub keywords: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct CorrectRequest<'a> {
  pub id: &'a str,
  pub content: &'a str,
  pub department: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteRecordRequest<'a> {
  pub id: &'a str,
}

/// Shape of any body that may carry an error payload
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
  #[serde(default)]
  pub error: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_analysis_result_from_service_json() {
    let body = r#"{
      "summary": "예산 집행 내역 제출 요구",
      "keywords": ["예산", "자료"],
      "predictions": [
        {"rank": 1, "department": "기획재정부", "reason": "예산 관련"},
        {"rank": 2, "department": "감사관실", "reason": "집행 점검"}
      ],
      "history_id": "abc123"
    }"#;

    let result: AnalysisResult = serde_json::from_str(body).unwrap();
    assert_eq!(result.keywords, vec!["예산", "자료"]);
    assert_eq!(result.history_id.as_deref(), Some("abc123"));
    assert_eq!(result.top_prediction().unwrap().department, "기획재정부");
    assert_eq!(result.prediction_by_rank(2).unwrap().department, "감사관실");
    assert!(result.prediction_by_rank(3).is_none());
  }

  #[test]
  fn test_rank_follows_list_order() {
    let body = r#"{
      "predictions": [
        {"rank": 0, "department": "A"},
        {"rank": 0, "department": "B"},
        {"rank": 7, "department": "C"}
      ]
    }"#;

    let result: AnalysisResult = serde_json::from_str(body).unwrap();
    assert_eq!(result.prediction_by_rank(1).unwrap().department, "A");
    assert_eq!(result.prediction_by_rank(2).unwrap().department, "B");
    assert_eq!(result.prediction_by_rank(3).unwrap().department, "C");
    assert!(result.prediction_by_rank(0).is_none());
    assert!(result.prediction_by_rank(7).is_none());
  }

  #[test]
  fn test_prediction_rank_is_lenient() {
    let body = r#"[
      {"rank": "2", "department": "A"},
      {"department": "B"},
      {"rank": "first", "department": "C"},
      {"rank": -1, "department": "D"},
      {"rank": null, "department": "E"},
      {"rank": 3, "department": "F"}
    ]"#;

    let predictions: Vec<Prediction> = serde_json::from_str(body).unwrap();
    let ranks: Vec<Option<u32>> = predictions.iter().map(|p| p.rank).collect();
    assert_eq!(ranks, vec![Some(2), None, None, None, None, Some(3)]);
  }

  #[test]
  fn test_analysis_result_without_history_id() {
    let result: AnalysisResult =
      serde_json::from_str(r#"{"summary": "s", "keywords": [], "predictions": []}"#).unwrap();
    assert!(result.history_id.is_none());
    assert!(result.top_prediction().is_none());
  }

  #[test]
  fn test_history_record_missing_optional_fields() {
    let body = r#"{"id": "h1", "timestamp": "2025-01-02 10:00:00",
      "final_department": "미정", "input": "요청"}"#;

    let record: HistoryRecord = serde_json::from_str(body).unwrap();
    assert_eq!(record.final_department, "미정");
    assert!(record.keywords.is_empty());
    assert!(record.summary.is_empty());
  }

  #[test]
  fn test_correct_request_field_names() {
    let request = CorrectRequest { id: "abc123", content: "요청", department: "기획재정부" };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
      value,
      serde_json::json!({"id": "abc123", "content": "요청", "department": "기획재정부"})
    );
  }
}
