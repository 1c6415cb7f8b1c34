use thiserror::Error;

/// Every failure the core can report to the operator.
///
/// All three kinds are handled the same way at the boundary: shown once,
/// never retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
  /// Rejected locally before any request was issued
  #[error("{message}")]
  Validation { message: String },

  /// The service answered, but with an error payload or an unusable body
  #[error("classification service error: {message}")]
  Remote { message: String },

  /// The service could not be reached
  #[error("could not reach classification service: {message}")]
  Transport { message: String },
}

impl ClassifierError {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation { message: message.into() }
  }

  pub fn remote(message: impl Into<String>) -> Self {
    Self::Remote { message: message.into() }
  }

  pub fn transport(message: impl Into<String>) -> Self {
    Self::Transport { message: message.into() }
  }

  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Validation { .. })
  }
}

impl From<reqwest::Error> for ClassifierError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      Self::remote(format!("malformed response: {err}"))
    } else {
      Self::transport(err.to_string())
    }
  }
}

pub type ClassifierResult<T> = std::result::Result<T, ClassifierError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_messages() {
    assert_eq!(ClassifierError::validation("enter some text").to_string(), "enter some text");
    assert_eq!(
      ClassifierError::remote("model offline").to_string(),
      "classification service error: model offline"
    );
    assert!(ClassifierError::transport("refused").to_string().contains("could not reach"));
  }

  #[test]
  fn test_is_validation() {
    assert!(ClassifierError::validation("x").is_validation());
    assert!(!ClassifierError::remote("x").is_validation());
    assert!(!ClassifierError::transport("x").is_validation());
  }
}
