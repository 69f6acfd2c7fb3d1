//! One in-flight validation per document.
//!
//! Every validation cycle runs as its own tokio task. Starting a cycle for a
//! document aborts the one already running for it, and a cycle that finishes
//! after being superseded does not publish. The last cycle started is the
//! one whose diagnostics the client sees.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::task::AbortHandle;
use tower_lsp::lsp_types::Url;

/// Identifies one validation cycle for one document.
pub type Generation = u64;

#[derive(Debug)]
struct InFlight {
    generation: Generation,
    handle: Option<AbortHandle>,
}

/// Registry of in-flight validation tasks, keyed by document URI.
#[derive(Debug, Default)]
pub struct ValidationTasks {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_generation: Generation,
    in_flight: HashMap<Url, InFlight>,
}

impl ValidationTasks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        match self.inner.lock() {
            Ok(mut inner) => f(&mut inner),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// Start a new cycle for `uri`, aborting any cycle already running for it.
    pub fn begin(&self, uri: &Url) -> Generation {
        self.with_inner(|inner| {
            inner.next_generation += 1;
            let generation = inner.next_generation;
            let previous = inner.in_flight.insert(
                uri.clone(),
                InFlight {
                    generation,
                    handle: None,
                },
            );
            if let Some(InFlight {
                generation: superseded,
                handle: Some(handle),
            }) = previous
            {
                tracing::debug!(%uri, superseded, generation, "superseding validation");
                handle.abort();
            }
            generation
        })
    }

    /// Attach the task running cycle `generation` so a later cycle can abort it.
    ///
    /// If the cycle has already been superseded the task is aborted at once.
    pub fn attach(&self, uri: &Url, generation: Generation, handle: AbortHandle) {
        self.with_inner(|inner| match inner.in_flight.get_mut(uri) {
            Some(entry) if entry.generation == generation => entry.handle = Some(handle),
            Some(_) => handle.abort(),
            // Already finished.
            None => {}
        })
    }

    /// Whether `generation` is still the latest cycle for `uri`.
    pub fn is_current(&self, uri: &Url, generation: Generation) -> bool {
        self.with_inner(|inner| {
            inner
                .in_flight
                .get(uri)
                .is_some_and(|entry| entry.generation == generation)
        })
    }

    /// Mark cycle `generation` as done. No-op if it was superseded.
    pub fn finish(&self, uri: &Url, generation: Generation) {
        self.with_inner(|inner| {
            if inner
                .in_flight
                .get(uri)
                .is_some_and(|entry| entry.generation == generation)
            {
                inner.in_flight.remove(uri);
            }
        })
    }

    /// Abort whatever cycle is running for `uri`.
    pub fn cancel(&self, uri: &Url) {
        let removed = self.with_inner(|inner| inner.in_flight.remove(uri));
        if let Some(InFlight {
            handle: Some(handle),
            ..
        }) = removed
        {
            handle.abort();
        }
    }

    /// Number of documents with a cycle in flight.
    pub fn len(&self) -> usize {
        self.with_inner(|inner| inner.in_flight.len())
    }

    /// Whether no cycle is in flight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn newer_cycle_supersedes_older() {
        let tasks = ValidationTasks::new();
        let uri = url("file:///foo.ml");

        let first = tasks.begin(&uri);
        let second = tasks.begin(&uri);
        assert!(second > first);
        assert!(!tasks.is_current(&uri, first));
        assert!(tasks.is_current(&uri, second));

        tasks.finish(&uri, first);
        assert!(tasks.is_current(&uri, second));

        tasks.finish(&uri, second);
        assert!(tasks.is_empty());
    }

    #[test]
    fn documents_are_independent() {
        let tasks = ValidationTasks::new();
        let a = url("file:///a.ml");
        let b = url("file:///b.ml");

        let ga = tasks.begin(&a);
        let gb = tasks.begin(&b);
        assert!(tasks.is_current(&a, ga));
        assert!(tasks.is_current(&b, gb));
        assert_eq!(tasks.len(), 2);

        tasks.cancel(&a);
        assert!(!tasks.is_current(&a, ga));
        assert!(tasks.is_current(&b, gb));
    }

    #[tokio::test]
    async fn superseded_task_is_aborted() {
        let tasks = ValidationTasks::new();
        let uri = url("file:///foo.ml");

        let generation = tasks.begin(&uri);
        let slow = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        tasks.attach(&uri, generation, slow.abort_handle());

        tasks.begin(&uri);
        let err = slow.await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn late_attach_of_stale_cycle_aborts() {
        let tasks = ValidationTasks::new();
        let uri = url("file:///foo.ml");

        let stale = tasks.begin(&uri);
        tasks.begin(&uri);

        let slow = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        tasks.attach(&uri, stale, slow.abort_handle());
        assert!(slow.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn cancel_aborts_running_task() {
        let tasks = ValidationTasks::new();
        let uri = url("file:///foo.ml");

        let generation = tasks.begin(&uri);
        let slow = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        tasks.attach(&uri, generation, slow.abort_handle());

        tasks.cancel(&uri);
        assert!(slow.await.unwrap_err().is_cancelled());
        assert!(tasks.is_empty());
    }
}
