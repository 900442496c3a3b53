// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for project trees on disk.
//!
//! Two backends implement the same save/load contract: the folder format
//! (directory per entity, JSON metadata plus payload files) and the legacy
//! single-XML document. `ProjectLocation` picks the backend from the shape of
//! the destination. The engine assumes exclusive ownership of the files and
//! directories it manages; another writer mutating them between calls
//! produces unspecified results.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::Project;

pub mod legacy_xml;
pub mod project_folder;
pub mod workspace;

pub(crate) mod xml;

#[cfg(test)]
pub(crate) mod testutil;

pub use legacy_xml::LegacyDocument;
pub use project_folder::ProjectFolder;
pub use workspace::{SkippedProjectRef, WorkspaceLoad};

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Xml {
        path: PathBuf,
        source: quick_xml::Error,
    },
    /// The destination is not a valid project directory: `properties.json`
    /// is missing or unparsable. This is the one document loads cannot
    /// default.
    NotAProjectDir {
        path: PathBuf,
    },
    /// A structured document exists but does not have the expected shape
    /// (e.g. wrong root element).
    InvalidDocument {
        path: PathBuf,
        reason: String,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::Xml { path, source } => write!(f, "xml error at {path:?}: {source}"),
            Self::NotAProjectDir { path } => {
                write!(f, "not a valid project directory (missing or unreadable properties.json) at {path:?}")
            }
            Self::InvalidDocument { path, reason } => {
                write!(f, "invalid document at {path:?}: {reason}")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Xml { source, .. } => Some(source),
            Self::NotAProjectDir { .. } => None,
            Self::InvalidDocument { .. } => None,
            Self::SymlinkRefused { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to
    /// stable storage where possible. Exact guarantees are
    /// platform/filesystem-dependent.
    Durable,
}

/// Maps an arbitrary display name to a filesystem-safe path segment.
///
/// Deterministic and pure: every character outside `[A-Za-z0-9_-]` becomes
/// `_`. Not injective; reconcile disambiguates colliding siblings with a
/// numeric suffix.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Where a project lives on disk, which also selects the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLocation {
    /// Directory-per-entity folder format.
    Directory(PathBuf),
    /// Single legacy interchange document.
    LegacyDocument(PathBuf),
}

impl ProjectLocation {
    /// Classifies a path: an existing directory is the folder format, an
    /// existing file is a legacy document, and a path that does not exist yet
    /// is decided by its `.xml` extension.
    pub fn infer(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory(path)
        } else if path.is_file() {
            Self::LegacyDocument(path)
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("xml")) {
            Self::LegacyDocument(path)
        } else {
            Self::Directory(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::LegacyDocument(path) => path,
        }
    }
}

/// Saves a project to the given location, holding the per-location lock for
/// the whole write.
pub fn save_project(project: &Project, location: &ProjectLocation) -> Result<(), StoreError> {
    let lock = location_lock(location.path());
    let _guard = lock.lock().expect("location lock poisoned");
    match location {
        ProjectLocation::Directory(path) => ProjectFolder::new(path).save_project(project),
        ProjectLocation::LegacyDocument(path) => LegacyDocument::new(path).save_project(project),
    }
}

/// Loads a project from the given location, holding the per-location lock for
/// the whole read. The returned tree has `location` set.
pub fn load_project(location: &ProjectLocation) -> Result<Project, StoreError> {
    let lock = location_lock(location.path());
    let _guard = lock.lock().expect("location lock poisoned");
    match location {
        ProjectLocation::Directory(path) => ProjectFolder::new(path).load_project(),
        ProjectLocation::LegacyDocument(path) => LegacyDocument::new(path).load_project(),
    }
}

static LOCATION_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

/// Process-wide mutex keyed by canonicalized location path. Two overlapping
/// saves of the same location would interleave upserts and prunes; the lock
/// serializes them. Not re-entrant. The table keeps one entry per distinct
/// location for the life of the process; a workbench touches a handful of
/// locations, so there is no eviction.
fn location_lock(path: &Path) -> Arc<Mutex<()>> {
    let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut locks = LOCATION_LOCKS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .expect("location lock table poisoned");
    locks.entry(key).or_default().clone()
}

/// Explicit location-to-loaded-tree map.
///
/// Callers that previously relied on an ambient "loaded projects" global pass
/// a registry by reference instead; the registry itself never touches disk.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    by_location: BTreeMap<PathBuf, Project>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<PathBuf>, project: Project) -> Option<Project> {
        self.by_location.insert(location.into(), project)
    }

    pub fn get(&self, location: &Path) -> Option<&Project> {
        self.by_location.get(location)
    }

    pub fn get_mut(&mut self, location: &Path) -> Option<&mut Project> {
        self.by_location.get_mut(location)
    }

    pub fn evict(&mut self, location: &Path) -> Option<Project> {
        self.by_location.remove(location)
    }

    pub fn locations(&self) -> impl Iterator<Item = &Path> {
        self.by_location.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_location.is_empty()
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Writes `contents` to `path` via a temp file and atomic rename, creating
/// parent directories as needed. Refuses to write through a symlink.
pub(crate) fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    fs::create_dir_all(parent).map_err(|source| StoreError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".apinox.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
