use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write asset to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve a startup asset (cascade model, label font) by name.
///
/// Resolution order: an optional local override path, then the user
/// cache directory, then download from `url` into the cache. A missing or
/// undownloadable asset is a fatal configuration error for the caller;
/// nothing here is retried per frame.
pub fn resolve(
    name: &str,
    url: &str,
    local_override: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, AssetResolveError> {
    if let Some(path) = local_override {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }

    let cache_dir = asset_cache_dir()?;
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        return Ok(cached_path);
    }

    fs::create_dir_all(&cache_dir).map_err(AssetResolveError::CacheDir)?;
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform cache directory for downloaded assets, e.g.
/// `~/.cache/headcount/assets/` on Linux.
pub fn asset_cache_dir() -> Result<PathBuf, AssetResolveError> {
    dirs::cache_dir()
        .map(|d| d.join("headcount").join("assets"))
        .ok_or(AssetResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), AssetResolveError> {
    let err_download = |e: reqwest::Error| AssetResolveError::Download {
        url: url.to_string(),
        source: e,
    };
    let response = reqwest::blocking::get(url).map_err(err_download)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(err_download)?;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |e: std::io::Error| AssetResolveError::Write { path, source: e }
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;

    let mut written: u64 = 0;
    for chunk in bytes.chunks(1024 * 1024) {
        file.write_all(chunk).map_err(write_err(&temp_path))?;
        written += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(written, total);
        }
    }
    file.flush().map_err(write_err(&temp_path))?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(write_err(dest))?;
    Ok(())
}
