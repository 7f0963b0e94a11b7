//! Memoization of pipeline outputs.
//!
//! The pipeline is deterministic for a given source, so repeated requests
//! (several report pages, repeated CLI summary calls in one process) reuse
//! one computed table. The cache is an explicit object, injectable in tests,
//! with a process-wide instance behind [`load_data`].
//!
//! Keys are source identity: the canonicalized file path, or a synthetic tag
//! carrying the generator parameters when no file exists. Entries live for
//! the process lifetime; a file changed on disk after the first load is not
//! noticed. [`PipelineCache::clear`] resets everything for tests.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::types::PipelineOutput;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Memoizes one [`PipelineOutput`] per source identity.
pub struct PipelineCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<PipelineOutput>>>>>,
    computes: AtomicUsize,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            computes: AtomicUsize::new(0),
        }
    }

    /// Return the cached output for `config`'s source, running the pipeline
    /// on first request.
    ///
    /// Concurrent first callers for the same key block on one computation;
    /// the pipeline never runs twice for a key. A failed run leaves the
    /// entry empty, so the next caller retries.
    pub fn get_or_run(&self, config: &PipelineConfig) -> Result<Arc<PipelineOutput>> {
        let key = Self::key_for(config);

        let cell = {
            let mut entries = self.entries.lock();
            entries
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let output = cell.get_or_try_init(|| {
            debug!("Cache miss for '{}', running pipeline", key);
            self.computes.fetch_add(1, Ordering::SeqCst);
            Pipeline::new(config.clone()).run().map(Arc::new)
        })?;

        Ok(Arc::clone(output))
    }

    /// Drop every cached output and reset the compute counter.
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.computes.store(0, Ordering::SeqCst);
    }

    /// How many pipeline runs this cache has performed.
    pub fn computes(&self) -> usize {
        self.computes.load(Ordering::SeqCst)
    }

    /// Source identity for `config`. Falls back to the configured path as
    /// written when canonicalization fails (e.g. the file vanished between
    /// checks).
    fn key_for(config: &PipelineConfig) -> String {
        if config.source_path.exists() {
            std::fs::canonicalize(&config.source_path)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| config.source_path.display().to_string())
        } else {
            // Synthetic output depends only on the generator parameters
            format!(
                "<synthetic:{}:{}>",
                config.synthetic_rows, config.synthetic_seed
            )
        }
    }
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_CACHE: Lazy<PipelineCache> = Lazy::new(PipelineCache::new);

/// The process-wide cache used by [`load_data`].
pub fn global() -> &'static PipelineCache {
    &GLOBAL_CACHE
}

/// One-call entry point: run (or reuse) the pipeline with the default
/// configuration.
pub fn load_data() -> Result<Arc<PipelineOutput>> {
    global().get_or_run(&PipelineConfig::default())
}
