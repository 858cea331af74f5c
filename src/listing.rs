//! Client for the paginated public job board.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::JobsiftError;
use crate::records::JobRecord;

pub const LISTING_URL: &str = "https://www.arbeitnow.com/api/job-board-api";

const MISSING: &str = "N/A";

#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    data: Vec<ListingJob>,
}

#[derive(Debug, Deserialize)]
struct ListingJob {
    title: Option<String>,
    company_name: Option<String>,
    location: Option<String>,
    url: Option<String>,
}

impl From<ListingJob> for JobRecord {
    fn from(job: ListingJob) -> Self {
        let or_missing = |field: Option<String>| field.unwrap_or_else(|| MISSING.to_string());
        Self {
            title: or_missing(job.title),
            company: or_missing(job.company_name),
            location: or_missing(job.location),
            apply_url: or_missing(job.url),
        }
    }
}

/// Pagination limits for [`ListingClient::fetch_all`].
#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub max_pages: u32,
    pub page_delay: Duration,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            max_pages: 3,
            page_delay: Duration::from_secs(1),
        }
    }
}

pub struct ListingClient {
    client: Client,
    base_url: String,
    settings: ListingSettings,
}

impl ListingClient {
    pub fn new(
        base_url: String,
        timeout: Duration,
        settings: ListingSettings,
    ) -> Result<Self, JobsiftError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            settings,
        })
    }

    /// Fetches pages until one comes back empty or `max_pages` is reached.
    ///
    /// A failed request ends pagination; whatever was collected so far is
    /// returned.
    pub async fn fetch_all(&self) -> Vec<JobRecord> {
        let mut jobs = Vec::new();

        for page in 1..=self.settings.max_pages {
            let batch = match self.fetch_page(page).await {
                Ok(batch) => batch,
                Err(e) => {
                    error!(page, error = %e, "error fetching page, stopping");
                    break;
                }
            };

            if batch.is_empty() {
                debug!(page, "empty page, stopping");
                break;
            }

            debug!(page, count = batch.len(), "fetched page");
            jobs.extend(batch.into_iter().map(JobRecord::from));

            if page < self.settings.max_pages {
                sleep(self.settings.page_delay).await;
            }
        }

        info!(count = jobs.len(), "fetched jobs");
        jobs
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<ListingJob>, reqwest::Error> {
        let page_body = self
            .client
            .get(&self.base_url)
            .query(&[("page", page)])
            .send()
            .await?
            .error_for_status()?
            .json::<ListingPage>()
            .await?;
        Ok(page_body.data)
    }
}
