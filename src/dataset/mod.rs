//! Dataset collection API.
//!
//! This module provides the client, the poll loop and the per-chatbot
//! job settings used to collect chatbot answers.

pub mod client;
pub mod poller;
pub mod providers;

pub use client::{DatasetApi, DatasetClient, DEFAULT_BASE_URL};
pub use poller::{poll_job, PollSettings, Sleeper, TokioSleeper};
pub use providers::ProviderTable;
