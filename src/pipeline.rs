use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::classifier::{Classify, is_candidate};
use crate::records::JobRecord;
use crate::ui::BatchProgress;

/// Limits for one filtering batch.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Classification calls allowed per batch. Pre-filter rejects don't count.
    pub max_jobs: usize,
    /// Pause after every classification call, whatever its outcome.
    pub inter_call_delay: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_jobs: 50,
            inter_call_delay: Duration::from_secs(5),
        }
    }
}

/// Runs records through the pre-filter and the classifier, one at a time.
pub struct FilterPipeline<C> {
    classifier: C,
    settings: PipelineSettings,
    progress: Option<BatchProgress>,
}

impl<C: Classify> FilterPipeline<C> {
    pub fn new(classifier: C, settings: PipelineSettings) -> Self {
        Self {
            classifier,
            settings,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: BatchProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Returns the records judged relevant, in input order.
    ///
    /// Scanning stops once `max_jobs` records have been classified; records
    /// after that point are not even pre-filtered.
    pub async fn filter_jobs(&self, records: &[JobRecord]) -> Vec<JobRecord> {
        info!(
            total = records.len(),
            max_jobs = self.settings.max_jobs,
            "starting job filtering"
        );
        let mut accepted = Vec::new();
        let mut processed = 0usize;

        for record in records {
            if processed >= self.settings.max_jobs {
                info!(max_jobs = self.settings.max_jobs, "reached max_jobs limit");
                break;
            }

            if !is_candidate(&record.title) {
                debug!(title = %record.title, "skipped job (pre-filter)");
                continue;
            }

            let relevant = self.classifier.classify(&record.title).await;
            if relevant {
                info!(title = %record.title, "added job");
                accepted.push(record.clone());
            } else {
                debug!(title = %record.title, "skipped job");
            }
            if let Some(progress) = &self.progress {
                progress.advance(&record.title, relevant);
            }

            processed += 1;
            sleep(self.settings.inter_call_delay).await;
        }

        if let Some(progress) = &self.progress {
            progress.finish();
        }
        info!(count = accepted.len(), processed, "filtered relevant jobs");
        accepted
    }
}
