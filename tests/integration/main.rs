//! Integration tests for Docket
//!
//! These tests use wiremock to serve listing pages and documents, and a
//! temporary SQLite database, to exercise full crawl cycles end-to-end.

mod common;
mod crawl_tests;
mod scheduler_tests;
mod search_tests;
