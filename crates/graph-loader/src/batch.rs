//! Batch Committer.
//!
//! Records are partitioned into batches of at most `batch_size` and written
//! one batch at a time; the next write starts only after the previous one
//! returned. A failure leaves every earlier batch committed.

use crate::error::LoadError;
use std::future::Future;
use std::num::NonZeroUsize;
use tracing::{debug, trace};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Position of a batch within its table, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub index: usize,
    pub total: usize,
}

impl std::fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.index, self.total)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchCommitter {
    batch_size: NonZeroUsize,
}

impl Default for BatchCommitter {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::MIN.saturating_add(DEFAULT_BATCH_SIZE - 1),
        }
    }
}

impl BatchCommitter {
    pub fn new(batch_size: usize) -> Result<Self, LoadError> {
        NonZeroUsize::new(batch_size)
            .map(|batch_size| Self { batch_size })
            .ok_or_else(|| LoadError::Config("batch size must be greater than 0".to_string()))
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Number of write calls needed for `records` records.
    pub fn total_batches(&self, records: usize) -> usize {
        records.div_ceil(self.batch_size.get())
    }

    /// Split `items` into consecutive batches. `total` is the expected
    /// number of items and only feeds the reported batch total.
    pub fn batches<I: IntoIterator>(&self, items: I, total: usize) -> Batches<I::IntoIter> {
        Batches {
            inner: items.into_iter(),
            batch_size: self.batch_size.get(),
            index: 0,
            total: self.total_batches(total),
        }
    }

    /// Await one batch write of `records` records. The write is not polled
    /// for an empty batch.
    pub async fn commit<Fut>(
        &self,
        container: &str,
        progress: BatchProgress,
        records: usize,
        write: Fut,
    ) -> Result<(), LoadError>
    where
        Fut: Future<Output = anyhow::Result<()>>,
    {
        if records == 0 {
            trace!("Skipping empty batch {progress} for '{container}'");
            return Ok(());
        }
        debug!("Writing batch {progress} to '{container}' ({records} records)");
        write.await.map_err(|cause| LoadError::Write {
            container: container.to_string(),
            batch: progress.index,
            total: progress.total,
            cause,
        })
    }
}

/// Iterator of batches produced by [`BatchCommitter::batches`].
pub struct Batches<I> {
    inner: I,
    batch_size: usize,
    index: usize,
    total: usize,
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = (BatchProgress, Vec<I::Item>);

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<_> = self.inner.by_ref().take(self.batch_size).collect();
        if batch.is_empty() {
            return None;
        }
        self.index += 1;
        // More input than counted upfront: keep the total honest.
        self.total = self.total.max(self.index);
        Some((
            BatchProgress {
                index: self.index,
                total: self.total,
            },
            batch,
        ))
    }
}
