use berth_model::DesiredRecord;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum DesiredFile {
    Records(Vec<DesiredRecord>),
    Document { containers: Vec<DesiredRecord> },
}

/// Reads desired records from a JSON file holding either an array of records
/// or an object with a `containers` array.
pub fn load_records(path: &Path) -> Result<Vec<DesiredRecord>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let file: DesiredFile = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    let records = match file {
        DesiredFile::Records(records) => records,
        DesiredFile::Document { containers } => containers,
    };
    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let kept: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        value.to_string()
    }
}
