use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;

use crate::foundation::error::PosterResult;

/// Identity of a cacheable HTTP request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestSignature {
    /// HTTP method.
    pub method: &'static str,
    /// Absolute request URL.
    pub url: String,
    /// User-Agent header sent with the request.
    pub user_agent: String,
}

impl RequestSignature {
    /// Signature of a GET request.
    pub fn get(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            method: "GET",
            url: url.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Stable 16-hex-digit key derived from the signature.
    pub fn key(&self) -> String {
        let mut buf = Vec::with_capacity(self.url.len() + self.user_agent.len() + 8);
        buf.extend_from_slice(self.method.as_bytes());
        buf.push(0);
        buf.extend_from_slice(self.url.as_bytes());
        buf.push(0);
        buf.extend_from_slice(self.user_agent.as_bytes());
        format!("{:016x}", xxhash_rust::xxh3::xxh3_64(&buf))
    }
}

/// Persistent store of HTTP response bodies shared by all renders of a host.
///
/// Implementations must tolerate concurrent `get`/`put` from several renders.
pub trait CacheStore: Send + Sync {
    /// Cached body for `sig`, if any.
    fn get(&self, sig: &RequestSignature) -> Option<Vec<u8>>;

    /// Store `body` for `sig`, replacing any previous entry.
    fn put(&self, sig: &RequestSignature, body: &[u8]) -> PosterResult<()>;
}

/// Cache that never stores anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl CacheStore for NoCache {
    fn get(&self, _sig: &RequestSignature) -> Option<Vec<u8>> {
        None
    }

    fn put(&self, _sig: &RequestSignature, _body: &[u8]) -> PosterResult<()> {
        Ok(())
    }
}

/// File-per-entry cache without expiry.
#[derive(Debug)]
pub struct DiskCache {
    dir: PathBuf,
    seq: AtomicU64,
}

impl DiskCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> PosterResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create cache dir '{}'", dir.display()))?;
        Ok(Self {
            dir,
            seq: AtomicU64::new(0),
        })
    }

    /// Cache root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, sig: &RequestSignature) -> PathBuf {
        self.dir.join(format!("{}.bin", sig.key()))
    }
}

impl CacheStore for DiskCache {
    fn get(&self, sig: &RequestSignature) -> Option<Vec<u8>> {
        std::fs::read(self.entry_path(sig)).ok()
    }

    fn put(&self, sig: &RequestSignature, body: &[u8]) -> PosterResult<()> {
        let dst = self.entry_path(sig);
        // Unique temp name per writer; rename makes the entry appear atomically.
        let tmp = self.dir.join(format!(
            "{}.{}.{}.tmp",
            sig.key(),
            std::process::id(),
            self.seq.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&tmp, body)
            .with_context(|| format!("write cache entry '{}'", tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, &dst) {
            let _ = std::fs::remove_file(&tmp);
            return Err(anyhow::Error::new(e)
                .context(format!("commit cache entry '{}'", dst.display()))
                .into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
