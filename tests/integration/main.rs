//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a mock news site and exercise the
//! pipeline stages end-to-end with real HTTP and real files.

mod common;
mod download_tests;
mod pipeline_tests;
