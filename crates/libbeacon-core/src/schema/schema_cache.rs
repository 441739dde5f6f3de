use crate::document::DocumentAst;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

type Result<T> = std::result::Result<T, SchemaCacheError>;

/// Bumped whenever the serialized shape of [`DocumentAst`] changes, so that
/// stale cache files are ignored instead of misread.
pub const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct CachedDocument {
    content_hash: String,
    document: DocumentAst,
    version: u32,
}

/// A file-backed cache of fully built [`DocumentAst`]s, keyed by the hash
/// of the SDL they were built from.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaCache {
    path: PathBuf,
}
impl SchemaCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Deletes the cache file. Returns whether there was one to delete.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(SchemaCacheError::Io {
                message: err.to_string(),
                path: self.path.clone(),
            }),
        }
    }

    /// Returns the cached document if one exists and was built from SDL
    /// hashing to `content_hash`.
    pub fn load(&self, content_hash: &str) -> Result<Option<DocumentAst>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SchemaCacheError::Io {
                message: err.to_string(),
                path: self.path.clone(),
            }),
        };

        let (cached, _) = bincode::serde::decode_from_slice::<CachedDocument, _>(
            &bytes,
            bincode::config::standard(),
        ).map_err(|err| SchemaCacheError::Decode(err.to_string()))?;

        if cached.version != CACHE_FORMAT_VERSION {
            tracing::debug!(
                "Ignoring schema cache at {} with format version {} (expected {})",
                self.path.display(),
                cached.version,
                CACHE_FORMAT_VERSION,
            );
            return Ok(None);
        }
        if cached.content_hash != content_hash {
            tracing::debug!("Ignoring stale schema cache at {}", self.path.display());
            return Ok(None);
        }

        Ok(Some(cached.document))
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Writes `doc` to the cache file, replacing whatever was there.
    pub fn store(&self, doc: &DocumentAst) -> Result<()> {
        let cached = CachedDocument {
            content_hash: doc.content_hash().to_string(),
            document: doc.clone(),
            version: CACHE_FORMAT_VERSION,
        };
        let bytes = bincode::serde::encode_to_vec(&cached, bincode::config::standard())
            .map_err(|err| SchemaCacheError::Encode(err.to_string()))?;

        let io_err = |err: std::io::Error| SchemaCacheError::Io {
            message: err.to_string(),
            path: self.path.clone(),
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, bytes).map_err(io_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_err)?;
        tracing::debug!("Wrote schema cache to {}", self.path.display());
        Ok(())
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaCacheError {
    #[error("Unable to decode cached schema: {0}")]
    Decode(String),

    #[error("Unable to encode schema for caching: {0}")]
    Encode(String),

    #[error("Schema cache i/o error at `{path}`: {message}")]
    Io {
        message: String,
        path: PathBuf,
    },
}
