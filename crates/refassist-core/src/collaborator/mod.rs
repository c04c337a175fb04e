//! The remote service the client delegates all real work to.
//!
//! Three operations: process pasted reference text, extract text from
//! uploaded documents, and build a downloadable report archive.

pub mod http;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::UploadFile;

pub use http::HttpCollaborator;

/// Endpoint paths relative to the collaborator base URL.
pub const PROCESS_PATH: &str = "/api/process";
pub const EXTRACT_PATH: &str = "/api/extract";
pub const DOWNLOAD_REPORT_PATH: &str = "/api/download-report";

/// File name the downloaded report archive is saved under.
pub const REPORT_FILE_NAME: &str = "refassist_report.zip";

/// Failure of a collaborator round-trip.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-2xx response; the body is ignored.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// Non-2xx from the extract endpoint, with the body kept verbatim.
    #[error("Server extract failed ({status}): {body}")]
    ExtractRejected { status: u16, body: String },
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("failed to save report: {0}")]
    Io(#[from] std::io::Error),
}

/// Error counts reported alongside a processed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSummary {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub success: usize,
    #[serde(default)]
    pub errors: usize,
}

/// Body of a 2xx response from the process endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    #[serde(default)]
    pub success: bool,
    pub formatted_output: Option<String>,
    pub summary: Option<ProcessSummary>,
    pub preview: Option<String>,
    pub error: Option<String>,
}

impl ProcessResponse {
    /// Error count, treating a missing summary as zero.
    pub fn error_count(&self) -> usize {
        self.summary.as_ref().map_or(0, |s| s.errors)
    }
}

/// Body of a 2xx response from the extract endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub text: Option<String>,
}

pub type CollaboratorFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ClientError>> + Send + 'a>>;

/// The processing/extraction/report service.
pub trait Collaborator: Send + Sync {
    /// Submit the raw reference text for checking and formatting.
    fn process<'a>(&'a self, references: &'a str) -> CollaboratorFuture<'a, ProcessResponse>;

    /// Submit every file in one request and get back their combined text.
    fn extract<'a>(&'a self, files: &'a [UploadFile]) -> CollaboratorFuture<'a, ExtractResponse>;

    /// Build the full report archive for the raw reference text.
    fn download_report<'a>(&'a self, references: &'a str) -> CollaboratorFuture<'a, Vec<u8>>;
}
