// src/source/loader.rs

use crate::domain::{merge, OrganizationRecord};
use crate::errors::SourceError;
use crate::source::RecordSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// Shared cancel signal for an in-flight load. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Fetches both collections concurrently and merges them.
///
/// A failed fetch (error, non-success payload, or a panicking worker)
/// counts as an empty source. Returns `None` only when `token` was
/// cancelled before the merged dataset could be handed back.
pub fn load_dataset<S>(source: &S, token: &CancellationToken) -> Option<Vec<OrganizationRecord>>
where
    S: RecordSource + ?Sized,
{
    let (orgs, extensions) = thread::scope(|scope| {
        let orgs = scope.spawn(|| source.fetch_organizations());
        let extensions = scope.spawn(|| source.fetch_cbo_extensions());
        (
            or_empty("organizations", joined(orgs.join())),
            or_empty("cbos", joined(extensions.join())),
        )
    });

    if token.is_cancelled() {
        info!("load cancelled, discarding fetched records");
        return None;
    }

    let dataset = merge(&orgs, &extensions);
    info!(
        organizations = orgs.len(),
        cbo_extensions = extensions.len(),
        merged = dataset.len(),
        "directory loaded"
    );
    Some(dataset)
}

fn joined<T>(
    result: thread::Result<Result<Vec<T>, SourceError>>,
) -> Result<Vec<T>, SourceError> {
    result.unwrap_or_else(|_| {
        Err(SourceError::Http {
            endpoint: "worker".into(),
            reason: "fetch thread panicked".into(),
        })
    })
}

fn or_empty<T>(name: &str, result: Result<Vec<T>, SourceError>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!(source = name, error = %e, "fetch failed, continuing without it");
            Vec::new()
        }
    }
}
