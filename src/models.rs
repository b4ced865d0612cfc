//! Core data types for the extraction workflow.
//!
//! These types represent the request submitted to the document-understanding
//! service, the job snapshot it returns, and the naming contract that locates
//! the job's output object afterwards.

use serde::{Deserialize, Serialize};

/// Where a processor job writes its result objects.
///
/// Serialized camelCase on the wire, matching the service's job API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLocation {
    pub namespace_name: String,
    pub bucket_name: String,
    pub prefix: String,
}

/// A single extraction-job submission.
///
/// The document bytes travel inline in the request body; there is no
/// separate upload step. Bytes must be non-empty.
#[derive(Debug, Clone)]
pub struct ProcessingRequest {
    pub compartment_id: String,
    pub display_name: String,
    pub document: Vec<u8>,
    pub output: OutputLocation,
}

/// Lifecycle state reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobLifecycleState {
    Accepted,
    InProgress,
    Succeeded,
    Failed,
    Cancelled,
}

/// Read-only snapshot of the remote job, as returned at submission time.
///
/// The job resource itself is owned by the remote service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingJob {
    pub id: String,
    pub lifecycle_state: JobLifecycleState,
    #[serde(default)]
    pub percent_complete: Option<f64>,
    pub output_location: OutputLocation,
}

/// Storage key under which a finished job writes its default result object.
///
/// This is a contract with the service's documented output-path scheme and
/// must be reproduced exactly for retrieval to succeed.
pub fn result_object_key(prefix: &str, job_id: &str) -> String {
    format!("{}/{}/_/results/defaultObject.json", prefix, job_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_result_object_key_plain_id() {
        assert_eq!(
            result_object_key("results", "job123"),
            "results/job123/_/results/defaultObject.json"
        );
    }

    #[test]
    fn test_result_object_key_uuid_like_id() {
        assert_eq!(
            result_object_key("results", "0191b2c3-44d5-7e6f-8a9b-0c1d2e3f4a5b"),
            "results/0191b2c3-44d5-7e6f-8a9b-0c1d2e3f4a5b/_/results/defaultObject.json"
        );
    }

    #[test]
    fn test_result_object_key_is_deterministic() {
        let a = result_object_key("out", "job-123");
        let b = result_object_key("out", "job-123");
        assert_eq!(a, b);
    }

    #[test]
    fn test_processing_job_deserializes_wire_format() {
        let json = r#"{
            "id": "job-123",
            "lifecycleState": "SUCCEEDED",
            "percentComplete": 100.0,
            "outputLocation": {
                "namespaceName": "acme",
                "bucketName": "outputs",
                "prefix": "results"
            }
        }"#;

        let job: ProcessingJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, "job-123");
        assert_eq!(job.lifecycle_state, JobLifecycleState::Succeeded);
        assert_eq!(job.percent_complete, Some(100.0));
        assert_eq!(job.output_location.namespace_name, "acme");
        assert_eq!(job.output_location.bucket_name, "outputs");
    }

    #[test]
    fn test_lifecycle_state_screaming_snake_case() {
        let state: JobLifecycleState = serde_json::from_str(r#""IN_PROGRESS""#).unwrap();
        assert_eq!(state, JobLifecycleState::InProgress);

        let state: JobLifecycleState = serde_json::from_str(r#""CANCELLED""#).unwrap();
        assert_eq!(state, JobLifecycleState::Cancelled);
    }

    #[test]
    fn test_percent_complete_optional() {
        let json = r#"{
            "id": "j",
            "lifecycleState": "ACCEPTED",
            "outputLocation": {"namespaceName": "n", "bucketName": "b", "prefix": "p"}
        }"#;

        let job: ProcessingJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.percent_complete, None);
    }
}
