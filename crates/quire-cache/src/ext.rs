//! Extension trait for [`CacheStore`] with typed convenience methods.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{CacheError, CacheStore};

/// Typed JSON access for [`CacheStore`].
///
/// Implemented as default methods on an extension trait so that
/// [`CacheStore`] stays object-safe with no serde dependency, and
/// implementors only handle raw bytes.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use quire_cache::{CacheStore, CacheStoreExt, NullCache};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Listing { files: Vec<String> }
///
/// let cache = NullCache;
/// cache.set_json(Path::new("/site"), &Listing { files: vec![] }).unwrap();
/// let listing: Option<Listing> = cache.get_json(Path::new("/site"));
/// assert!(listing.is_none());
/// ```
pub trait CacheStoreExt: CacheStore {
    /// Retrieve a JSON-deserialized record.
    ///
    /// Returns `None` when the record is missing or does not deserialize;
    /// a corrupt record is indistinguishable from an absent one.
    fn get_json<T: DeserializeOwned>(&self, dir: &Path) -> Option<T> {
        let bytes = self.get(dir)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Discarding unreadable record");
                None
            }
        }
    }

    /// Serialize `value` as JSON and replace the record for `dir`.
    fn set_json<T: Serialize>(&self, dir: &Path, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.set(dir, &bytes)?;
        Ok(())
    }
}

impl<S: CacheStore + ?Sized> CacheStoreExt for S {}
