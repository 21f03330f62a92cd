//! Create-if-missing helpers for remote storage entities

use std::future::Future;
use std::path::Path;

use crate::storage::ObjectStore;
use crate::Result;

/// Create `name` remotely unless the listing already contains it.
///
/// Returns `true` when `create` ran. Assumes a single caller; nothing guards
/// against a concurrent creator between the listing and the creation.
pub async fn ensure_exists<L, LF, C, CF>(name: &str, list: L, create: C) -> Result<bool>
where
    L: FnOnce() -> LF,
    LF: Future<Output = Result<Vec<String>>>,
    C: FnOnce() -> CF,
    CF: Future<Output = Result<()>>,
{
    let existing = list().await?;
    if existing.iter().any(|n| n == name) {
        return Ok(false);
    }

    create().await?;
    Ok(true)
}

/// Make sure `bucket` exists, creating it when absent.
pub async fn ensure_bucket(store: &dyn ObjectStore, bucket: &str) -> Result<bool> {
    let created = ensure_exists(
        bucket,
        move || store.list_buckets(),
        move || store.create_bucket(bucket),
    )
    .await?;

    if created {
        tracing::info!(bucket, "bucket was not found and has been created");
    } else {
        tracing::info!(bucket, "bucket found, nothing to create");
    }

    Ok(created)
}

/// Upload `local_path` as `bucket/key` unless an object with that key exists.
///
/// Failures are logged rather than returned; the result tells whether the
/// object is present in the bucket afterwards.
pub async fn ensure_uploaded(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    local_path: &Path,
) -> bool {
    let outcome = ensure_exists(
        key,
        move || store.list_objects(bucket),
        move || store.upload_object(bucket, key, local_path),
    )
    .await;

    match outcome {
        Ok(true) => {
            tracing::info!(bucket, key, "uploaded {}", local_path.display());
            true
        }
        Ok(false) => {
            tracing::info!(bucket, key, "object already present, skipping upload");
            true
        }
        Err(e) => {
            tracing::error!(bucket, key, "upload of {} failed: {}", local_path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DigestError;
    use std::cell::{Cell, RefCell};

    #[tokio::test]
    async fn creates_only_when_missing() {
        let remote = RefCell::new(vec!["other".to_string()]);
        let creations = Cell::new(0);
        let (remote, creations) = (&remote, &creations);

        let list = move || async move { Ok(remote.borrow().clone()) };
        let create = move || async move {
            creations.set(creations.get() + 1);
            remote.borrow_mut().push("audio".to_string());
            Ok(())
        };
        assert!(ensure_exists("audio", list, create).await.unwrap());

        let list = move || async move { Ok(remote.borrow().clone()) };
        let create = move || async move {
            creations.set(creations.get() + 1);
            Ok(())
        };
        assert!(!ensure_exists("audio", list, create).await.unwrap());

        assert_eq!(creations.get(), 1);
    }

    #[tokio::test]
    async fn listing_failure_skips_creation() {
        let creations = Cell::new(0);
        let creations = &creations;

        let result = ensure_exists(
            "audio",
            || async { Err(DigestError::Storage("listing denied".to_string())) },
            move || async move {
                creations.set(creations.get() + 1);
                Ok(())
            },
        )
        .await;

        assert!(matches!(result, Err(DigestError::Storage(_))));
        assert_eq!(creations.get(), 0);
    }

    #[tokio::test]
    async fn creation_failure_is_reported() {
        let result = ensure_exists(
            "audio",
            || async { Ok(Vec::new()) },
            || async { Err(DigestError::Storage("bucket name taken".to_string())) },
        )
        .await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("bucket name taken"));
    }
}
