//! Saving the selected image to disk.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Prefix of every downloaded file name.
pub const DOWNLOAD_PREFIX: &str = "fluxtogether";

/// Decode a `b64_json` payload into raw PNG bytes.
pub fn decode_image(b64_json: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(b64_json.trim())
}

/// Timestamped file name, e.g. `fluxtogether-1700000000000.png`.
pub fn download_filename(at: DateTime<Utc>) -> String {
    format!("{}-{}.png", DOWNLOAD_PREFIX, at.timestamp_millis())
}

/// Write decoded image bytes into `dir`, creating it if needed.
pub fn save_image(dir: &Path, bytes: &[u8], at: DateTime<Utc>) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(download_filename(at));
    std::fs::write(&path, bytes)?;
    Ok(path)
}
