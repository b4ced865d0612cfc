//! End-to-end invoice processing orchestration.
//!
//! Coordinates the full workflow: read the local document → resolve
//! credentials → resolve the storage namespace → submit the extraction job
//! → derive the output key from the job id → fetch, stage, and decode the
//! output artifact.
//!
//! Each invocation is strictly sequential and entirely call-scoped; a
//! pipeline value may serve concurrent invocations. There is no retry or
//! polling loop: the first failing step aborts the invocation, and a
//! not-yet-written output object surfaces as
//! [`DocpipeError::NotFound`](crate::error::DocpipeError::NotFound).
//! A remote job whose output was never fetched is left to the service's own
//! lifecycle policies.

use std::fs;
use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::info;

use crate::credentials::CredentialProvider;
use crate::document_job::DocumentJobs;
use crate::error::{DocpipeError, Result};
use crate::models::{result_object_key, OutputLocation, ProcessingRequest};
use crate::object_store::ObjectStore;

/// Call-scoped parameters for one [`InvoicePipeline::process_invoice`] run.
#[derive(Debug, Clone)]
pub struct ProcessParams {
    pub compartment_id: String,
    pub container: String,
    pub prefix: String,
    pub display_name: String,
    pub document_path: PathBuf,
}

/// The orchestrator. Collaborators are injected as trait objects so tests
/// can exercise the workflow against in-process fakes.
pub struct InvoicePipeline {
    credentials: Box<dyn CredentialProvider>,
    store: Box<dyn ObjectStore>,
    jobs: Box<dyn DocumentJobs>,
}

impl InvoicePipeline {
    pub fn new(
        credentials: Box<dyn CredentialProvider>,
        store: Box<dyn ObjectStore>,
        jobs: Box<dyn DocumentJobs>,
    ) -> Self {
        Self {
            credentials,
            store,
            jobs,
        }
    }

    /// Run the full workflow for one document and return the decoded
    /// artifact.
    ///
    /// # Errors
    ///
    /// - [`DocpipeError::Input`] — document absent, unreadable, or empty;
    ///   raised before any credential resolution or remote call.
    /// - [`DocpipeError::Authentication`] — no usable identity; raised
    ///   before any remote call.
    /// - [`DocpipeError::Storage`] / [`DocpipeError::Submission`] — a remote
    ///   step failed.
    /// - [`DocpipeError::NotFound`] — the job's output object is absent.
    /// - [`DocpipeError::Parse`] — the output blob is not a JSON object.
    pub async fn process_invoice(&self, params: &ProcessParams) -> Result<Map<String, Value>> {
        let document = fs::read(&params.document_path).map_err(|e| DocpipeError::Input {
            path: params.document_path.display().to_string(),
            reason: e.to_string(),
        })?;
        if document.is_empty() {
            return Err(DocpipeError::Input {
                path: params.document_path.display().to_string(),
                reason: "document is empty".to_string(),
            });
        }
        info!(
            "read input document {} ({} bytes)",
            params.document_path.display(),
            document.len()
        );

        let credentials = self.credentials.resolve()?;

        let namespace = self.store.resolve_namespace(&credentials).await?;
        info!("using namespace: {}", namespace);

        let request = ProcessingRequest {
            compartment_id: params.compartment_id.clone(),
            display_name: params.display_name.clone(),
            document,
            output: OutputLocation {
                namespace_name: namespace.clone(),
                bucket_name: params.container.clone(),
                prefix: params.prefix.clone(),
            },
        };
        let job = self.jobs.submit_extraction_job(&credentials, &request).await?;
        info!(
            "extraction job {} submitted: state {:?}, {}% complete",
            job.id,
            job.lifecycle_state,
            job.percent_complete.unwrap_or(0.0)
        );

        let key = result_object_key(&params.prefix, &job.id);
        let blob = self
            .store
            .get_object(&credentials, &namespace, &params.container, &key)
            .await?;

        let artifact = stage_and_decode(&blob)?;
        info!("decoded output artifact at {} ({} fields)", key, artifact.len());
        Ok(artifact)
    }
}

/// Stage the fetched blob to a scoped temp file, then decode it as a JSON
/// object.
///
/// The temp directory is removed when the guard drops, on every exit path.
fn stage_and_decode(blob: &[u8]) -> Result<Map<String, Value>> {
    let staging = tempfile::tempdir()
        .map_err(|e| DocpipeError::Storage(format!("cannot create staging directory: {}", e)))?;
    let staged = staging.path().join("output.json");

    fs::write(&staged, blob)
        .map_err(|e| DocpipeError::Storage(format!("cannot stage output object: {}", e)))?;
    let raw = fs::read_to_string(&staged).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => {
            DocpipeError::Parse("output object is not valid UTF-8".to_string())
        }
        _ => DocpipeError::Storage(format!("cannot read staged output object: {}", e)),
    })?;

    let value: Value =
        serde_json::from_str(&raw).map_err(|e| DocpipeError::Parse(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DocpipeError::Parse(
            "expected a JSON object at the top level".to_string(),
        )),
    }
}
