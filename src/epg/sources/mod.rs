pub mod xmltv;

use std::time::Duration;

use futures::future::try_join_all;

use crate::config::SourceConfig;
use crate::epg::model::FeedDocument;
use crate::error::EpgError;

pub async fn fetch_source(
    source: &SourceConfig,
    http_client: &reqwest::Client,
    timeout: Duration,
) -> Result<FeedDocument, EpgError> {
    match source {
        SourceConfig::Http {
            name,
            url,
            compression,
        } => xmltv::fetch_feed(http_client, name, url, *compression, timeout).await,
        SourceConfig::File {
            name,
            path,
            compression,
        } => {
            let bytes = tokio::fs::read(path).await.map_err(|e| EpgError::Fetch {
                source_name: name.clone(),
                message: format!("{}: {e}", path.display()),
            })?;
            let xml = xmltv::decode_body(name, &bytes, *compression)?;
            xmltv::parse_document(name, &xml)
        }
    }
}

/// Fetch every source concurrently. Documents come back in configured order,
/// which is also priority order. The first failure fails the whole batch.
pub async fn fetch_all(
    sources: &[SourceConfig],
    http_client: &reqwest::Client,
    timeout: Duration,
) -> Result<Vec<FeedDocument>, EpgError> {
    let futures = sources.iter().map(|source| async move {
        match fetch_source(source, http_client, timeout).await {
            Ok(doc) => {
                tracing::info!(
                    source = %source.name(),
                    channels = doc.channels.len(),
                    programmes = doc.programmes.len(),
                    "Fetched guide feed"
                );
                Ok(doc)
            }
            Err(e) => {
                tracing::error!(source = %source.name(), error = %e, "Failed to fetch guide feed");
                Err(e)
            }
        }
    });

    try_join_all(futures).await
}
