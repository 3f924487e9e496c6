use std::path::PathBuf;

use aws_config::{BehaviorVersion, Region};

use crate::config::{Backend, Config, RunSettings};
use crate::db::ItemRepository;
use crate::error::{AppError, Result};
use crate::highlights::{archive_highlights, index_highlights, HighlightFetcher};
use crate::models::{HighlightPayload, RunReport, StageOutcome};
use crate::services::{BlobStore, DynamoTable, ItemTable, LocalBlobStore, S3BlobStore};

pub struct App {
    settings: RunSettings,
    fetcher: HighlightFetcher,
    blob_store: Box<dyn BlobStore>,
    table: Box<dyn ItemTable>,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let settings = config.run_settings()?;
        let fetcher = HighlightFetcher::new(&settings)?;

        let (blob_store, table) = match config.backend {
            Backend::Aws => {
                let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(config.aws_region.clone()))
                    .load()
                    .await;
                let blob_store: Box<dyn BlobStore> = Box::new(S3BlobStore::new(
                    &sdk_config,
                    config.s3_bucket_name.clone(),
                    config.aws_region.clone(),
                ));
                let table: Box<dyn ItemTable> =
                    Box::new(DynamoTable::new(&sdk_config, config.dynamodb_table.clone()));
                (blob_store, table)
            }
            Backend::Local => {
                let data_dir = PathBuf::from(&config.local_data_dir);
                std::fs::create_dir_all(&data_dir)?;
                let db_path = data_dir.join("highlights.db");
                let db_path = db_path
                    .to_str()
                    .ok_or_else(|| AppError::Config(format!("non UTF-8 data dir {:?}", data_dir)))?;
                let blob_store: Box<dyn BlobStore> = Box::new(LocalBlobStore::new(
                    data_dir.join("blobs"),
                    config.s3_bucket_name.clone(),
                ));
                let table: Box<dyn ItemTable> =
                    Box::new(ItemRepository::new(db_path, config.dynamodb_table.clone()).await?);
                (blob_store, table)
            }
        };

        Ok(Self::with_services(settings, fetcher, blob_store, table))
    }

    pub fn with_services(
        settings: RunSettings,
        fetcher: HighlightFetcher,
        blob_store: Box<dyn BlobStore>,
        table: Box<dyn ItemTable>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            blob_store,
            table,
        }
    }

    /// Fetch, then archive and index. Archive and index only run when the
    /// fetch produced a non-empty payload, and an archive failure does not
    /// stop indexing.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();

        tracing::info!(
            "Fetching highlights for {} on {}",
            self.settings.league_name,
            self.settings.date
        );
        let payload = match self.fetcher.fetch_highlights().await {
            Ok(payload) => {
                tracing::info!("Highlights fetched ({} records)", payload.records().len());
                report.fetch = StageOutcome::Completed;
                payload
            }
            Err(e) => {
                tracing::error!("Error fetching highlights: {}", e);
                report.fetch = StageOutcome::Failed(e.to_string());
                return report;
            }
        };

        if payload.is_empty() {
            tracing::warn!("Highlights API returned an empty payload, nothing to do");
            return report;
        }

        report.archive = self.archive(&payload).await;
        self.index(&payload, &mut report).await;

        report
    }

    async fn archive(&self, payload: &HighlightPayload) -> StageOutcome {
        tracing::info!("Saving highlights to blob store...");
        match archive_highlights(self.blob_store.as_ref(), payload, &self.settings.archive_name).await {
            Ok(_) => StageOutcome::Completed,
            Err(e) => {
                tracing::error!("Error saving highlights: {}", e);
                StageOutcome::Failed(e.to_string())
            }
        }
    }

    async fn index(&self, payload: &HighlightPayload, report: &mut RunReport) {
        tracing::info!("Storing highlights in table...");
        match index_highlights(self.table.as_ref(), payload, &self.settings.date).await {
            Ok(summary) => {
                tracing::info!(
                    "Indexed {} highlights ({} skipped without id or url)",
                    summary.stored,
                    summary.skipped
                );
                report.index_summary = summary;
                report.index = StageOutcome::Completed;
            }
            Err(aborted) => {
                tracing::error!("Error storing highlights: {}", aborted);
                report.index_summary = aborted.summary;
                report.index = StageOutcome::Failed(aborted.source.to_string());
            }
        }
    }
}
