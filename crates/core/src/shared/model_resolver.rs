use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
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
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// An ONNX model the service needs at startup.
#[derive(Clone, Copy, Debug)]
pub struct ModelSource<'a> {
    pub name: &'a str,
    pub url: &'a str,
}

/// Resolve a model file by name, checking local locations before downloading.
///
/// Resolution order:
/// 1. Bundled directory (deployments that ship models with the image)
/// 2. User cache directory
/// 3. Download from URL into the cache
///
/// Blocking: call before the async runtime starts.
pub fn resolve(
    model: ModelSource<'_>,
    bundled_dir: Option<&Path>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = bundled_dir.and_then(|dir| find_in(dir, model.name)) {
        return Ok(path);
    }

    let cache_dir = model_cache_dir()?;
    if let Some(path) = find_in(&cache_dir, model.name) {
        return Ok(path);
    }

    fs::create_dir_all(&cache_dir).map_err(ModelResolveError::CacheDir)?;
    let dest = cache_dir.join(model.name);
    log::info!("Downloading {} from {}", model.name, model.url);
    download(model.url, &dest)?;
    Ok(dest)
}

fn find_in(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    path.is_file().then_some(path)
}

/// Platform-specific model cache directory, e.g. `~/.cache/FaceVerify/models/`
/// on Linux.
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    dirs::cache_dir()
        .map(|d| d.join("FaceVerify").join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");

    let result = download_inner(url, dest, &temp_path);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn download_inner(url: &str, dest: &Path, temp_path: &Path) -> Result<(), ModelResolveError> {
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut file = fs::File::create(temp_path).map_err(write_error(temp_path))?;

    // Stream in chunks; models are 100MB+.
    let mut buf = vec![0u8; 1024 * 1024];
    let mut downloaded: u64 = 0;
    loop {
        let n = response.read(&mut buf).map_err(write_error(temp_path))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_error(temp_path))?;
        downloaded += n as u64;
        log::debug!("{url}: {downloaded}/{total} bytes");
    }

    file.flush().map_err(write_error(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(write_error(dest))?;
    Ok(())
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ModelResolveError {
    let path = path.to_path_buf();
    move |source| ModelResolveError::Write { path, source }
}
