use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("could not determine a model cache directory")]
    NoCacheDir,
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 when the server sends no Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolves a model file by name, preferring local copies over the network.
///
/// Order: user cache directory, then the optional bundled directory, then a
/// download into the cache. Model files are fetched as-is, with no
/// versioning or integrity check.
pub fn resolve(
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    let cached = cache_dir.join(name);
    if cached.exists() {
        log::debug!("model {name} found in cache");
        return Ok(cached);
    }

    if let Some(dir) = bundled_dir {
        let bundled = dir.join(name);
        if bundled.exists() {
            log::debug!("model {name} found bundled at {}", dir.display());
            return Ok(bundled);
        }
    }

    fs::create_dir_all(&cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("downloading {name} from {url}");
    download(url, &cached, progress)?;
    Ok(cached)
}

/// Platform cache directory for model files.
///
/// macOS keeps models under Application Support; elsewhere the user cache
/// directory is used.
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    let base = if cfg!(target_os = "macos") {
        dirs::data_dir()
    } else {
        dirs::cache_dir()
    };
    base.map(|d| d.join("moodcam").join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let map_download = |source: reqwest::Error| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let response = reqwest::blocking::get(url).map_err(map_download)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(map_download)?;

    // Stage into a .part file and rename, so an interrupted download never
    // masquerades as a complete model.
    let staging = dest.with_extension("part");
    let map_write = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ModelResolveError::Write { path, source }
    };

    let mut file = fs::File::create(&staging).map_err(map_write(&staging))?;
    let mut written: u64 = 0;
    for chunk in bytes.chunks(1024 * 1024) {
        file.write_all(chunk).map_err(map_write(&staging))?;
        written += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(written, total);
        }
    }
    file.flush().map_err(map_write(&staging))?;
    drop(file);

    fs::rename(&staging, dest).map_err(map_write(dest))?;
    Ok(())
}
