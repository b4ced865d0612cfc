//! # docpipe
//!
//! Submit invoice documents to a remote document-understanding service and
//! fetch the structured extraction result back from object storage.
//!
//! docpipe does not extract anything itself. It orchestrates the remote
//! workflow end to end: resolve credentials, submit an extraction job with
//! the document bytes inline, derive the deterministic key the service
//! writes its output under, then fetch and decode that output object.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐    ┌──────────────────┐    ┌───────────────┐
//! │ Credential │───▶│ InvoicePipeline   │───▶│ DocumentJob   │
//! │ Provider   │    │ (orchestration)   │    │ Client (POST) │
//! └────────────┘    │                   │    └───────────────┘
//!                   │                   │    ┌───────────────┐
//!                   │                   │───▶│ ObjectStore   │
//!                   └──────────┬────────┘    │ Client (GET)  │
//!                              ▼             └───────────────┘
//!                     parsed JSON artifact
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docpipe --config ./config/docpipe.toml invoice.pdf
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`credentials`] | Credential context and resolution strategies |
//! | [`signing`] | HMAC-SHA256 request signing |
//! | [`models`] | Core data types and the output-key contract |
//! | [`object_store`] | Blob-storage client (namespace, get-object) |
//! | [`document_job`] | Extraction-job submission client |
//! | [`pipeline`] | End-to-end orchestration |
//! | [`error`] | Error taxonomy |

pub mod config;
pub mod credentials;
pub mod document_job;
pub mod error;
pub mod models;
pub mod object_store;
pub mod pipeline;
pub mod signing;
