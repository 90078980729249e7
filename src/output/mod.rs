//! Output module for run summaries
//!
//! This module handles:
//! - Collecting the counters of every stage that ran
//! - Formatting and printing the end-of-run summary

mod summary;

pub use summary::{format_summary, print_summary, CrawlCounts, RunSummary};
