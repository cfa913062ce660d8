use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::APP_DIR_NAME;

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
    #[error("model {0} not found locally or in the model cache, and no download URL was given")]
    NotFound(PathBuf),
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve the detector model file.
///
/// Resolution order:
/// 1. `model` as given, if it exists
/// 2. Its file name inside `cache_dir`
/// 3. Download from `url` into `cache_dir`
pub fn resolve_in(
    model: &Path,
    cache_dir: &Path,
    url: Option<&str>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if model.exists() {
        return Ok(model.to_path_buf());
    }

    let file_name = model
        .file_name()
        .ok_or_else(|| ModelResolveError::NotFound(model.to_path_buf()))?;
    let cached_path = cache_dir.join(file_name);
    if cached_path.exists() {
        log::info!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    let Some(url) = url else {
        return Err(ModelResolveError::NotFound(model.to_path_buf()));
    };
    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading model from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// [`resolve_in`] against the platform model cache directory.
pub fn resolve(
    model: &Path,
    url: Option<&str>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if model.exists() {
        return Ok(model.to_path_buf());
    }
    resolve_in(model, &model_cache_dir()?, url, progress)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/FaceCrop/models/`
/// - Linux: `$XDG_CACHE_HOME/FaceCrop/models/` or `~/.cache/FaceCrop/models/`
/// - Windows: `%LOCALAPPDATA%/FaceCrop/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");

    let result = download_inner(url, dest, &temp_path, progress);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn download_inner(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ModelResolveError> {
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let mut file = fs::File::create(temp_path).map_err(write_err(temp_path))?;

    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(write_err(temp_path))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err(temp_path))?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(write_err(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(write_err(dest))?;

    Ok(())
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> ModelResolveError {
    let path = path.to_path_buf();
    move |source| ModelResolveError::Write { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_prefers_existing_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("last.onnx");
        fs::write(&model, b"weights").unwrap();

        let resolved = resolve_in(&model, &tmp.path().join("cache"), None, None).unwrap();
        assert_eq!(resolved, model);
    }

    #[test]
    fn test_resolve_falls_back_to_cache_by_file_name() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        fs::create_dir_all(&cache).unwrap();
        fs::write(cache.join("last.onnx"), b"cached weights").unwrap();

        let missing = tmp.path().join("elsewhere").join("last.onnx");
        let resolved = resolve_in(&missing, &cache, None, None).unwrap();
        assert_eq!(resolved, cache.join("last.onnx"));
    }

    #[test]
    fn test_resolve_without_url_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("last.onnx");
        let err = resolve_in(&missing, &tmp.path().join("cache"), None, None).unwrap_err();
        assert!(matches!(err, ModelResolveError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR_NAME));
        assert!(path.to_string_lossy().contains("models"));
    }

    #[test]
    fn test_download_invalid_url_leaves_no_partial_file() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.onnx");
        let result = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
