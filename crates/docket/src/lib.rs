//! Docket - Requested-Document Classifier Client
//!
//! Submits requested-document text to a classification service, lets the
//! operator review the summary, keywords and ranked department predictions,
//! correct the department, and manage the persisted analysis history.

pub mod cli;
pub mod client;
pub mod config;
pub mod confirm;
pub mod error;
pub mod history;
pub mod session;
pub mod types;
pub mod view;
pub mod workbench;

pub use client::{ClassificationGateway, HttpGateway};
pub use config::ClientConfig;
pub use confirm::{ActionOutcome, AssumeYes, Confirm, ConfirmRequest};
pub use error::{ClassifierError, ClassifierResult};
pub use history::HistoryStore;
pub use session::{AnalysisSession, AnalysisState, KeywordSet};
pub use types::{AnalysisResult, HistoryRecord, Prediction};
pub use view::{ViewController, ViewMode};
pub use workbench::Workbench;
