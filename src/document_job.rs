//! Remote extraction-job submission client.
//!
//! Builds the single `POST /processorJobs` request that creates an
//! extraction job: the document bytes travel inline in the JSON body
//! (base64), together with the output location the service writes its
//! result to and the processor configuration (invoice document type,
//! key-value extraction feature).
//!
//! Submission is not idempotent: every call creates a new remote job with
//! a new identifier.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

use crate::credentials::Credentials;
use crate::error::{DocpipeError, Result};
use crate::models::{OutputLocation, ProcessingJob, ProcessingRequest};
use crate::signing;

/// Extraction-job submission, as the pipeline depends on it.
#[async_trait]
pub trait DocumentJobs: Send + Sync {
    /// Submit one extraction job and return the service's job snapshot.
    async fn submit_extraction_job(
        &self,
        credentials: &Credentials,
        request: &ProcessingRequest,
    ) -> Result<ProcessingJob>;
}

/// HTTP implementation of [`DocumentJobs`].
pub struct DocumentJobClient {
    http: reqwest::Client,
    endpoint: String,
    host: String,
    region: String,
}

impl DocumentJobClient {
    pub fn new(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let host = endpoint
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocpipeError::Submission(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            host,
            region: region.into(),
        })
    }
}

#[async_trait]
impl DocumentJobs for DocumentJobClient {
    async fn submit_extraction_job(
        &self,
        credentials: &Credentials,
        request: &ProcessingRequest,
    ) -> Result<ProcessingJob> {
        let body = CreateJobBody::from_request(request);
        let payload = serde_json::to_vec(&body)
            .map_err(|e| DocpipeError::Submission(format!("cannot encode job request: {}", e)))?;

        let path = "/processorJobs";
        let url = format!("{}{}", self.endpoint, path);
        let headers = signing::signed_headers(
            credentials,
            "POST",
            &self.host,
            path,
            "",
            &payload,
            &self.region,
            "document",
            Utc::now(),
        );

        let mut http_request = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .body(payload);
        for (name, value) in headers {
            http_request = http_request.header(name.as_str(), value.as_str());
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| DocpipeError::Submission(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocpipeError::Submission(format!(
                "create-job rejected (HTTP {}): {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        response
            .json::<ProcessingJob>()
            .await
            .map_err(|e| DocpipeError::Submission(format!("create-job returned an unreadable body: {}", e)))
    }
}

// ============ Wire Format ============

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateJobBody<'a> {
    compartment_id: &'a str,
    display_name: &'a str,
    input_location: InlineInput,
    output_location: &'a OutputLocation,
    processor_config: ProcessorConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineInput {
    source_type: &'static str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessorConfig {
    processor_type: &'static str,
    document_type: &'static str,
    features: Vec<Feature>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    feature_type: &'static str,
}

impl<'a> CreateJobBody<'a> {
    fn from_request(request: &'a ProcessingRequest) -> Self {
        Self {
            compartment_id: &request.compartment_id,
            display_name: &request.display_name,
            input_location: InlineInput {
                source_type: "INLINE_DOCUMENT_CONTENT",
                data: BASE64.encode(&request.document),
            },
            output_location: &request.output,
            processor_config: ProcessorConfig {
                processor_type: "GENERAL",
                document_type: "INVOICE",
                features: vec![Feature {
                    feature_type: "KEY_VALUE_EXTRACTION",
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_request() -> ProcessingRequest {
        ProcessingRequest {
            compartment_id: "ocid1.compartment.x".to_string(),
            display_name: "invoice-processor".to_string(),
            document: b"hello".to_vec(),
            output: OutputLocation {
                namespace_name: "acme".to_string(),
                bucket_name: "outputs".to_string(),
                prefix: "results".to_string(),
            },
        }
    }

    #[test]
    fn test_create_job_body_wire_shape() {
        let request = sample_request();
        let body = CreateJobBody::from_request(&request);
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();

        assert_eq!(json["compartmentId"], "ocid1.compartment.x");
        assert_eq!(json["displayName"], "invoice-processor");
        assert_eq!(json["inputLocation"]["sourceType"], "INLINE_DOCUMENT_CONTENT");
        assert_eq!(json["outputLocation"]["namespaceName"], "acme");
        assert_eq!(json["outputLocation"]["bucketName"], "outputs");
        assert_eq!(json["outputLocation"]["prefix"], "results");
        assert_eq!(json["processorConfig"]["documentType"], "INVOICE");
        assert_eq!(
            json["processorConfig"]["features"][0]["featureType"],
            "KEY_VALUE_EXTRACTION"
        );
    }

    #[test]
    fn test_document_bytes_travel_inline_base64() {
        let request = sample_request();
        let body = CreateJobBody::from_request(&request);
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();

        assert_eq!(json["inputLocation"]["data"], "aGVsbG8=");
    }
}
