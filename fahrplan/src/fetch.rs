use anyhow::{anyhow, Result};
use fahrplan_core::ScheduleIndex;
use reqwest::StatusCode;
use tokio::fs;

use crate::cli::Source;

async fn fetch_remote(url: &str) -> Result<String> {
    log::debug!("Sending HTTP request to {url}");
    let response = reqwest::get(url).await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(anyhow!("Got response status {status}"));
    }

    Ok(response.text().await?)
}

/// Loads the schedule, preferring the remote feed and falling back to the
/// local copy. Without any usable feed the schedule is empty.
pub async fn load_schedule(source: &Source) -> ScheduleIndex {
    if !source.offline {
        match fetch_remote(&source.url).await {
            Ok(body) => match ScheduleIndex::from_json(&body) {
                Ok(index) => {
                    if let Err(err) = fs::write(&source.cache, &body).await {
                        log::warn!("Failed to cache feed at {}: {err}", source.cache.display());
                    }
                    return index;
                }
                Err(err) => log::warn!("Remote feed is unusable: {err}"),
            },
            Err(err) => log::warn!("Failed to fetch {}: {err}", source.url),
        }
    }

    match load_local(source).await {
        Ok(index) => index,
        Err(err) => {
            log::error!("No schedule available: {err}");
            ScheduleIndex::default()
        }
    }
}

async fn load_local(source: &Source) -> Result<ScheduleIndex> {
    let body = fs::read_to_string(&source.cache)
        .await
        .map_err(|err| anyhow!("failed to read {}: {err}", source.cache.display()))?;

    Ok(ScheduleIndex::from_json(body)?)
}
