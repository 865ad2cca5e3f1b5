//! Three-stage test generation pipeline:
//!
//! 1. [`extractor`] scrapes a page into an element inventory (`elements.json`)
//! 2. [`scenario`] asks a model for test cases (`test_cases.xlsx`)
//! 3. [`script`] asks a model for one Selenium script per case (`test_scripts.xlsx`)
//!
//! Stages share nothing in memory; each reads the file its predecessor wrote.

pub mod cli;
pub mod error;
pub mod extractor;
pub mod llm;
pub mod scenario;
pub mod script;
pub mod sheet;
pub mod trace;

pub use error::{PipelineError, Result};
