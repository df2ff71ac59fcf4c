use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Ids found at the start of each line. Other lines are skipped.
pub fn parse(content: &str) -> BTreeSet<u32> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let end = line
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(line.len());
            line[..end].parse().ok()
        })
        .collect()
}

/// Reads the selected ids, treating a missing or unreadable file as empty.
pub async fn read(path: &Path) -> BTreeSet<u32> {
    match fs::read_to_string(path).await {
        Ok(content) => parse(&content),
        Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeSet::new(),
        Err(err) => {
            log::warn!("Failed to read selection from {}: {err}", path.display());
            BTreeSet::new()
        }
    }
}

pub async fn append(path: &Path, ids: &[u32]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    let lines: String = ids.iter().map(|id| format!("{id}\n")).collect();
    file.write_all(lines.as_bytes()).await?;
    file.flush().await?;

    log::debug!("Selected {} events in {}", ids.len(), path.display());
    Ok(())
}
