//! Common test infrastructure
//!
//! Shared fixtures for the end-to-end pipeline tests: a temp-dir-backed
//! object store and builders for the event payloads the adapters consume.
//! Tests should only import from this module, not from internal submodules.
#![allow(dead_code)]

mod fixtures;

pub use fixtures::{job_status_event, transcript_document, upload_event, TestStore};
