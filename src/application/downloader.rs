use std::path::PathBuf;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::api::ApiClient;
use crate::config::ConfigStore;
use crate::domain::{AppError, Report};

/// Runs the whole download workflow: load settings, authenticate, fetch
/// the feed, write it to the configured save location.
#[derive(Clone)]
pub struct Downloader {
    api_client: ApiClient,
    config_store: ConfigStore,
}

impl Downloader {
    pub fn new(api_client: ApiClient, config_store: ConfigStore) -> Self {
        Self {
            api_client,
            config_store,
        }
    }

    /// The reports available for download, for the shell to list.
    pub fn list_reports(&self) -> &'static [Report] {
        &Report::ALL
    }

    /// Download one report and return the path it was written to.
    ///
    /// Every invocation starts from scratch: settings are re-read from
    /// storage and a fresh token is obtained. Errors are returned to the
    /// caller for display; there are no retries. A failure after the
    /// destination file was created may leave a partial file behind, which
    /// the next successful download overwrites.
    pub async fn download(&self, report: Report) -> Result<PathBuf, AppError> {
        let config = self.config_store.load()?;
        if !config.has_credentials() {
            return Err(AppError::CredentialsMissing);
        }

        let token = self
            .api_client
            .authenticate(&config.username, &config.password)
            .await
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        let (_total_size, stream) = self
            .api_client
            .fetch_feed_stream(report, &token)
            .await
            .map_err(|e| AppError::Download(e.to_string()))?;

        let path = config.save_location.join(report.archive_name());
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::Persistence(format!("cannot create {}: {}", path.display(), e)))?;

        let mut stream = stream.boxed();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AppError::Download(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::Persistence(format!("write error: {}", e)))?;
        }

        file.sync_all()
            .await
            .map_err(|e| AppError::Persistence(format!("cannot sync {}: {}", path.display(), e)))?;

        log::info!("saved {} feed to {}", report.label(), path.display());
        Ok(path)
    }
}
