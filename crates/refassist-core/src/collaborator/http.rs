//! reqwest-backed [`Collaborator`] talking to the RefAssist API server.

use reqwest::multipart::{Form, Part};

use super::{
    ClientError, Collaborator, CollaboratorFuture, DOWNLOAD_REPORT_PATH, EXTRACT_PATH,
    ExtractResponse, PROCESS_PATH, ProcessResponse,
};
use crate::registry::UploadFile;

/// HTTP client for the three collaborator endpoints.
///
/// No request deadline is set; the transport default applies.
#[derive(Debug, Clone)]
pub struct HttpCollaborator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCollaborator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn references_form(references: &str) -> Form {
        Form::new().text("references", references.to_string())
    }
}

impl Collaborator for HttpCollaborator {
    fn process<'a>(&'a self, references: &'a str) -> CollaboratorFuture<'a, ProcessResponse> {
        Box::pin(async move {
            let url = self.endpoint(PROCESS_PATH);
            tracing::debug!(%url, bytes = references.len(), "submitting references");

            let resp = self
                .client
                .post(&url)
                .multipart(Self::references_form(references))
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ClientError::Status(status.as_u16()));
            }

            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
        })
    }

    fn extract<'a>(&'a self, files: &'a [UploadFile]) -> CollaboratorFuture<'a, ExtractResponse> {
        Box::pin(async move {
            let url = self.endpoint(EXTRACT_PATH);
            tracing::debug!(%url, files = files.len(), "submitting files for extraction");

            let form = files.iter().fold(Form::new(), |form, file| {
                form.part(
                    "files",
                    Part::bytes(file.data.clone()).file_name(file.name.clone()),
                )
            });

            let resp = self.client.post(&url).multipart(form).send().await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ClientError::ExtractRejected {
                    status: status.as_u16(),
                    body,
                });
            }

            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
        })
    }

    fn download_report<'a>(&'a self, references: &'a str) -> CollaboratorFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let url = self.endpoint(DOWNLOAD_REPORT_PATH);
            tracing::debug!(%url, "requesting report archive");

            let resp = self
                .client
                .post(&url)
                .multipart(Self::references_form(references))
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ClientError::Status(status.as_u16()));
            }

            Ok(resp.bytes().await?.to_vec())
        })
    }
}
