//! Visibility analysis of chatbot answers.
//!
//! Raw provider records are normalized, their sources extracted, and
//! the citation and mention metrics computed per prompt.

pub mod aggregator;
pub mod analyzer;
pub mod domain;
pub mod metrics;
pub mod record;
pub mod sources;

pub use aggregator::generate_summary_text;
pub use analyzer::{analyze_record, BrandProfile};
pub use record::{ChatbotRecord, RawRecord};
