//! Event-file retrieval.
//!
//! The parser never touches the network or archives itself. Content comes
//! from an [`ArchiveCache`] (already materialized locally) or, failing that,
//! from an optional [`ArchiveFetcher`]. Either path yields the same
//! [`EventFile`] list, so parsing is indifferent to where input came from.
//!
//! [`DirectoryCache`] reads extracted archives laid out as:
//! ```text
//! cache/
//!   2023eve/
//!     2023NYA.EVA
//!     2023BOS.EVA
//!   2023as/
//!     2023AS.EVE
//!   2023post/
//!     2023WS.EVE
//! ```

use crate::constants::{CACHE_APP_DIR, CACHE_SUBDIR, EVENT_FILE_EXTENSIONS};
use crate::error::{Result, RetroError};
use crate::models::{EventFile, EventSource, SourceType};
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

/// Retrieves event files for an archive over the network.
///
/// Implementations own transport and retry policy; failures surface as
/// [`RetroError::Retrieval`].
pub trait ArchiveFetcher: Send + Sync {
    fn fetch(&self, year: i32, source_type: SourceType) -> Result<Vec<EventFile>>;
}

/// Supplies event files for archives that are already local.
pub trait ArchiveCache: Send + Sync {
    fn is_cached(&self, year: i32, source_type: SourceType) -> bool;

    fn load(&self, year: i32, source_type: SourceType) -> Result<Vec<EventFile>>;
}

/// Cache first, then the fetcher if one is configured
#[derive(Clone)]
pub struct ArchiveSource {
    cache: Arc<dyn ArchiveCache>,
    fetcher: Option<Arc<dyn ArchiveFetcher>>,
}

impl ArchiveSource {
    pub fn new(cache: impl ArchiveCache + 'static) -> Self {
        Self {
            cache: Arc::new(cache),
            fetcher: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: impl ArchiveFetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn retrieve(&self, year: i32, source_type: SourceType) -> Result<Vec<EventFile>> {
        if self.cache.is_cached(year, source_type) {
            debug!("Loading {} {} from cache", year, source_type);
            return self.cache.load(year, source_type);
        }
        match &self.fetcher {
            Some(fetcher) => {
                debug!("Fetching {}", source_type.archive_name(year));
                fetcher.fetch(year, source_type)
            }
            None => Err(RetroError::retrieval(
                year,
                source_type,
                format!("{} is not cached", source_type.archive_name(year)),
            )),
        }
    }
}

impl std::fmt::Debug for ArchiveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveSource")
            .field("has_fetcher", &self.fetcher.is_some())
            .finish()
    }
}

/// Default cache root: `<user data dir>/retrosheet/cache`
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(CACHE_APP_DIR).join(CACHE_SUBDIR))
}

/// Extracted archives on the local filesystem
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RetroError::CacheNotFound { path: root });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive_dir(&self, year: i32, source_type: SourceType) -> PathBuf {
        self.root.join(source_type.archive_stem(year))
    }

    /// Every (year, category) with an extracted archive directory, sorted
    pub fn available(&self) -> Vec<EventSource> {
        let mut found: Vec<EventSource> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| entry.file_name().to_str().and_then(parse_archive_stem))
            .collect();
        found.sort_by_key(|source| (source.year, source.source_type));
        found
    }

    /// Event file paths in an archive directory, sorted by file name
    pub fn event_file_paths(&self, year: i32, source_type: SourceType) -> Result<Vec<PathBuf>> {
        let dir = self.archive_dir(year, source_type);
        let pattern = dir.join("*.ev?");
        let options = MatchOptions {
            case_sensitive: false,
            ..Default::default()
        };

        let entries = glob::glob_with(&pattern.to_string_lossy(), options).map_err(|e| {
            RetroError::retrieval(year, source_type, format!("bad glob pattern: {}", e))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|path| is_event_file(path))
            .collect();
        paths.sort();
        Ok(paths)
    }
}

impl ArchiveCache for DirectoryCache {
    fn is_cached(&self, year: i32, source_type: SourceType) -> bool {
        self.archive_dir(year, source_type).is_dir()
    }

    fn load(&self, year: i32, source_type: SourceType) -> Result<Vec<EventFile>> {
        if !self.is_cached(year, source_type) {
            return Err(RetroError::retrieval(
                year,
                source_type,
                format!(
                    "no extracted archive at {}",
                    self.archive_dir(year, source_type).display()
                ),
            ));
        }

        let mut files = Vec::new();
        for path in self.event_file_paths(year, source_type)? {
            let bytes = std::fs::read(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            // Older files carry Latin-1 names; keep going rather than reject.
            let content = String::from_utf8_lossy(&bytes).into_owned();
            files.push(EventFile::new(name, content));
        }

        debug!(
            "Loaded {} event files from {}",
            files.len(),
            self.archive_dir(year, source_type).display()
        );
        Ok(files)
    }
}

fn is_event_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EVENT_FILE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// `2023eve` -> (2023, Season)
pub fn parse_archive_stem(stem: &str) -> Option<EventSource> {
    let digits = stem.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits != 4 {
        return None;
    }
    let year = stem[..digits].parse::<i32>().ok()?;
    let source_type = SourceType::ALL
        .into_iter()
        .find(|st| st.archive_suffix() == &stem[digits..])?;
    Some(EventSource::new(year, source_type))
}
