//! HTTP client for the processing server.
//!
//! All endpoints share one status mapping ([`check_status`]): 401 becomes
//! [`SpecError::Unauthorized`], 404 [`SpecError::NotFound`], anything else
//! unsuccessful [`SpecError::Server`] carrying the server's own message.
//! No call is retried.

use std::time::Duration;

use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::data::dataset::Dataset;
use crate::data::export::{file_name_from_disposition, ExportBlob, MeanExportRequest, ProcessedExportRequest};
use crate::data::processing::{ProcessRequest, ProcessResponse, UploadFile, UploadResponse};
use crate::error::{Result, SpecError};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeBody {
    analysis: Option<String>,
    error: Option<String>,
}

/// Connection settings plus a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>, session_token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the session credential, if any.
    pub(crate) fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.session_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.get(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.post(self.url(path)))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.delete(self.url(path)))
    }

    /// Upload raw spectrum files and turn the parsed response into datasets.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<Dataset>> {
        if files.is_empty() {
            return Err(SpecError::Validation("no files selected".into()));
        }
        let mut form = multipart::Form::new();
        for file in files {
            log::info!("uploading {} ({} bytes)", file.name, file.bytes.len());
            form = form.part("files", multipart::Part::bytes(file.bytes).file_name(file.name));
        }
        let resp = check_status(self.post("upload_files").multipart(form).send().await?).await?;
        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| SpecError::Validation(format!("malformed upload response: {e}")))?;
        body.into_datasets()
    }

    pub async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse> {
        let resp = check_status(self.post("process_data").json(request).send().await?).await?;
        resp.json()
            .await
            .map_err(|e| SpecError::Validation(format!("malformed processing response: {e}")))
    }

    pub async fn export_mean(&self, request: &MeanExportRequest) -> Result<ExportBlob> {
        let resp = self.post("export_mean_spectrum").json(request).send().await?;
        read_blob(check_status(resp).await?, "mean_spectrum.csv").await
    }

    pub async fn export_processed(&self, request: &ProcessedExportRequest) -> Result<ExportBlob> {
        let resp = self.post("export_processed").json(request).send().await?;
        read_blob(check_status(resp).await?, "processed_spectra.csv").await
    }

    /// Ask the server for a free-text narrative about one dataset.
    pub async fn analyze(
        &self,
        dataset: &Dataset,
        metadata: &std::collections::BTreeMap<String, String>,
    ) -> Result<String> {
        let body = serde_json::json!({
            "label": dataset.label,
            "frequencies": dataset.frequencies,
            "amplitudes": dataset.amplitudes,
            "metadata": metadata,
        });
        let resp = check_status(self.post("analyze").json(&body).send().await?).await?;
        let body: AnalyzeBody = resp
            .json()
            .await
            .map_err(|e| SpecError::Validation(format!("malformed analysis response: {e}")))?;
        match (body.analysis, body.error) {
            (Some(text), _) if !text.trim().is_empty() => Ok(text),
            (_, Some(err)) => Err(SpecError::Server {
                status: StatusCode::OK.as_u16(),
                message: err,
            }),
            _ => Err(SpecError::Validation("analysis response is empty".into())),
        }
    }
}

/// Map unsuccessful statuses onto the error taxonomy.
pub async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(SpecError::Unauthorized),
        StatusCode::NOT_FOUND => Err(SpecError::NotFound),
        _ => {
            let text = resp.text().await.unwrap_or_default();
            Err(SpecError::Server {
                status: status.as_u16(),
                message: server_message(&text),
            })
        }
    }
}

/// The `error` field of a JSON error body, or the raw body text.
pub fn server_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(msg) }) => msg,
        _ => body.trim().to_string(),
    }
}

async fn read_blob(resp: Response, fallback_name: &str) -> Result<ExportBlob> {
    let file_name = resp
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(file_name_from_disposition)
        .unwrap_or_else(|| fallback_name.to_string());
    let bytes = resp.bytes().await?.to_vec();
    Ok(ExportBlob { file_name, bytes })
}
