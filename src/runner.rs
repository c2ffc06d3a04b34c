//! Collection run driver.
//!
//! Runs the dataset jobs one chatbot at a time (trigger, then poll),
//! downloads the finished snapshots, and analyzes every record.

use crate::analysis::{analyze_record, BrandProfile, ChatbotRecord, RawRecord};
use crate::dataset::{poll_job, DatasetApi, PollSettings, ProviderTable, Sleeper, TokioSleeper};
use crate::models::{AnalyzedResult, Chatbot, JobStatus, SnapshotRecord};
use crate::output::{clean_payload, write_json, RunLayout};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings for one collection run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub check_url: String,
    pub country: String,
    pub prompts: Vec<String>,
    pub poll: PollSettings,
    pub show_progress: bool,
}

/// Drives dataset jobs against the API and writes their artifacts.
pub struct Collector<A, S = TokioSleeper> {
    client: A,
    sleeper: S,
    providers: ProviderTable,
    config: RunConfig,
    layout: RunLayout,
}

impl<A: DatasetApi> Collector<A, TokioSleeper> {
    pub fn new(client: A, providers: ProviderTable, config: RunConfig, layout: RunLayout) -> Self {
        Self::with_sleeper(client, TokioSleeper, providers, config, layout)
    }
}

impl<A: DatasetApi, S: Sleeper> Collector<A, S> {
    pub fn with_sleeper(
        client: A,
        sleeper: S,
        providers: ProviderTable,
        config: RunConfig,
        layout: RunLayout,
    ) -> Self {
        Self {
            client,
            sleeper,
            providers,
            config,
            layout,
        }
    }

    /// Trigger and poll every job in order, saving each snapshot record.
    ///
    /// A job that times out or fails is recorded and the run moves on; a
    /// trigger or transport error aborts the run.
    pub async fn run_jobs(&self, jobs: &[(Chatbot, String)]) -> Result<Vec<SnapshotRecord>> {
        let mut snapshots = Vec::with_capacity(jobs.len());

        for (chatbot, dataset_id) in jobs {
            let snapshot = self.run_job(*chatbot, dataset_id).await?;

            write_json(&self.layout.snapshot_path(*chatbot), &snapshot)?;
            snapshots.push(snapshot);
        }

        Ok(snapshots)
    }

    async fn run_job(&self, chatbot: Chatbot, dataset_id: &str) -> Result<SnapshotRecord> {
        let inputs = self.providers.build_inputs(
            chatbot,
            &self.config.prompts,
            &self.config.check_url,
            &self.config.country,
        );
        let output_fields = self.providers.output_fields(chatbot);

        println!("🚀 Triggering {} dataset {} ({} prompts)", chatbot, dataset_id, inputs.len());
        let snapshot_id = self
            .client
            .trigger(dataset_id, &inputs, &output_fields)
            .await
            .with_context(|| format!("Failed to trigger {} dataset {}", chatbot, dataset_id))?;

        let spinner = self.spinner(format!("Waiting for {} snapshot {}", chatbot, snapshot_id));
        let status = poll_job(&self.client, &self.sleeper, &snapshot_id, self.config.poll)
            .await
            .with_context(|| format!("Failed to poll {} snapshot {}", chatbot, snapshot_id));
        spinner.finish_and_clear();
        let status = status?;

        match status {
            JobStatus::Ready => println!("   ✅ {} snapshot {} is ready", chatbot, snapshot_id),
            other => {
                warn!("{} snapshot {} ended as {}", chatbot, snapshot_id, other);
                println!("   ⚠️  {} snapshot {}: {}", chatbot, snapshot_id, other);
            }
        }

        Ok(SnapshotRecord {
            chatbot,
            dataset_id: dataset_id.to_string(),
            snapshot_id,
            status,
        })
    }

    /// Download every ready snapshot, save the cleaned payload, and analyze it.
    ///
    /// Results keep snapshot order, then record order within each payload.
    pub async fn collect_results(
        &self,
        snapshots: &[SnapshotRecord],
        profile: &BrandProfile,
    ) -> Result<Vec<AnalyzedResult>> {
        let mut results = Vec::new();

        for snapshot in snapshots {
            if snapshot.status != JobStatus::Ready {
                info!(
                    "Skipping download for {} snapshot {} ({})",
                    snapshot.chatbot, snapshot.snapshot_id, snapshot.status
                );
                continue;
            }

            println!("📥 Downloading {} snapshot {}", snapshot.chatbot, snapshot.snapshot_id);
            let payload = self
                .client
                .download(&snapshot.snapshot_id, "json")
                .await
                .with_context(|| format!("Failed to download snapshot {}", snapshot.snapshot_id))?;

            write_json(
                &self.layout.raw_path(snapshot.chatbot, &snapshot.snapshot_id),
                &clean_payload(&payload),
            )?;

            let analyzed = analyze_payload(snapshot.chatbot, &payload, profile);
            info!("Analyzed {} {} records", analyzed.len(), snapshot.chatbot);
            results.extend(analyzed);
        }

        Ok(results)
    }

    fn spinner(&self, message: String) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}

/// Analyze a downloaded payload.
///
/// Only an array payload is analyzed. Non-object items and records
/// without a prompt are skipped.
pub fn analyze_payload(chatbot: Chatbot, payload: &Value, profile: &BrandProfile) -> Vec<AnalyzedResult> {
    let Some(items) = payload.as_array() else {
        debug!("{} payload is not an array; nothing to analyze", chatbot);
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let raw = RawRecord::from_value(item);
            if raw.is_none() {
                debug!("Skipping non-object {} record", chatbot);
            }
            raw
        })
        .map(|raw| analyze_record(&ChatbotRecord::new(chatbot, raw), profile))
        .filter(|result| !result.prompt.is_empty())
        .collect()
}
