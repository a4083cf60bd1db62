//! Local artefact cache backed by a one-time remote download.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::common::error::{YieldError, YieldResult};

use super::domain::ModelArtifact;

/// Anything able to produce the artefact bytes for a URL.
pub trait ArtifactFetcher {
    fn fetch(&self, url: &str) -> YieldResult<Vec<u8>>;
}

/// Blocking HTTP(S) download.
#[derive(Default)]
pub struct HttpFetcher;

impl ArtifactFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> YieldResult<Vec<u8>> {
        let network = |message: String| YieldError::Network {
            url: url.to_string(),
            message,
        };
        let response = ureq::get(url).call().map_err(|e| network(e.to_string()))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| network(format!("read failed: {e}")))?;
        Ok(bytes)
    }
}

/// Artefact stored at a fixed path, fetched from `url` when absent.
pub struct FsModelRepo<F = HttpFetcher> {
    path: PathBuf,
    url: String,
    fetcher: F,
}

impl FsModelRepo<HttpFetcher> {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self::with_fetcher(path, url, HttpFetcher)
    }
}

impl<F: ArtifactFetcher> FsModelRepo<F> {
    pub fn with_fetcher(path: impl Into<PathBuf>, url: impl Into<String>, fetcher: F) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
            fetcher,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached artefact, downloading it first when nothing is cached.
    pub fn ensure_and_load(&self) -> YieldResult<ModelArtifact> {
        if self.path.exists() {
            let bytes = fs::read(&self.path).map_err(|e| YieldError::io(&self.path, e))?;
            return ModelArtifact::from_slice(&bytes);
        }
        self.download()
    }

    /// Download into place when nothing is cached yet. Returns whether a
    /// download happened.
    pub fn ensure_local(&self) -> YieldResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.download()?;
        Ok(true)
    }

    /// Fetch, validate, then persist. A body that is not a loadable artefact
    /// is never written, so the next attempt fetches again.
    fn download(&self) -> YieldResult<ModelArtifact> {
        info!(url = %self.url, path = %self.path.display(), "model artefact not cached, downloading");
        let bytes = self.fetcher.fetch(&self.url)?;
        let artifact = ModelArtifact::from_slice(&bytes).map_err(|e| {
            warn!(url = %self.url, bytes = bytes.len(), error = %e, "downloaded model artefact rejected");
            e
        })?;
        persist_atomically(&self.path, &bytes)?;
        info!(bytes = bytes.len(), path = %self.path.display(), "model artefact cached");
        Ok(artifact)
    }
}

/// Write through a temp file in the target directory so a failed transfer
/// never leaves a truncated artefact behind.
fn persist_atomically(path: &Path, bytes: &[u8]) -> YieldResult<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| YieldError::io(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| YieldError::io(parent, e))?;
    temp.write_all(bytes)
        .and_then(|_| temp.flush())
        .map_err(|e| YieldError::io(temp.path(), e))?;
    temp.persist(path).map_err(|e| YieldError::io(path, e.error))?;
    Ok(())
}
