//! Scoped worker pool for the encode step.
//!
//! Passages are split into fixed-size chunks, fanned out over a bounded task
//! channel to OS threads and reassembled by chunk id. Each worker drives the
//! async provider on a shared Tokio runtime handle. Dropping the pool closes
//! the task channel and joins every worker, so teardown happens on every exit
//! path, including early returns and unwinding.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use domain_embedding::EmbeddingProvider;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::error::{CorpusError, CorpusResult};

pub const DEFAULT_CHUNK_SIZE: usize = 64;

struct EncodeTask {
    batch: u64,
    id: usize,
    texts: Vec<String>,
}

struct EncodeOutcome {
    batch: u64,
    id: usize,
    expected: usize,
    result: CorpusResult<Vec<Vec<f32>>>,
}

/// Default worker count: one per available core.
pub fn default_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

pub struct EncodePool {
    task_tx: Option<Sender<EncodeTask>>,
    result_rx: Receiver<EncodeOutcome>,
    workers: Vec<JoinHandle<()>>,
    chunk_size: usize,
    next_batch: AtomicU64,
}

impl EncodePool {
    /// Spawn `workers` threads. `runtime` must outlive the pool and must not
    /// be the runtime of the calling thread if `encode` is called from async
    /// code; call `encode` from `spawn_blocking` or a plain thread.
    pub fn start(
        provider: Arc<dyn EmbeddingProvider>,
        workers: usize,
        chunk_size: usize,
        runtime: Handle,
    ) -> CorpusResult<Self> {
        if workers == 0 {
            return Err(CorpusError::InvalidPool("workers must be at least 1".into()));
        }
        if chunk_size == 0 {
            return Err(CorpusError::InvalidPool("chunk size must be at least 1".into()));
        }

        let (task_tx, task_rx) = bounded::<EncodeTask>(workers * 2);
        let (result_tx, result_rx) = unbounded::<EncodeOutcome>();

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let provider = Arc::clone(&provider);
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let runtime = runtime.clone();
            let handle = thread::Builder::new()
                .name(format!("encode-{}", worker_id))
                .spawn(move || worker_loop(worker_id, task_rx, result_tx, provider, runtime))?;
            handles.push(handle);
        }

        info!(workers, chunk_size, "Started encode pool");

        Ok(Self {
            task_tx: Some(task_tx),
            result_rx,
            workers: handles,
            chunk_size,
            next_batch: AtomicU64::new(0),
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Embed `passages`, returning one vector per passage in input order.
    ///
    /// Blocks the calling thread. The first failing chunk fails the whole call;
    /// chunks already in flight are drained first so the pool stays usable.
    pub fn encode(&self, passages: &[String]) -> CorpusResult<Vec<Vec<f32>>> {
        if passages.is_empty() {
            return Ok(vec![]);
        }
        let task_tx = self.task_tx.as_ref().ok_or(CorpusError::PoolClosed)?;
        // Outcomes tagged with another batch belong to an earlier, failed call.
        let batch = self.next_batch.fetch_add(1, Ordering::Relaxed);

        let total_chunks = passages.len().div_ceil(self.chunk_size);
        let mut slots: Vec<Option<Vec<Vec<f32>>>> = (0..total_chunks).map(|_| None).collect();
        let mut first_error: Option<CorpusError> = None;
        let mut inflight = 0usize;

        for (id, chunk) in passages.chunks(self.chunk_size).enumerate() {
            if first_error.is_some() {
                break;
            }
            let task = EncodeTask {
                batch,
                id,
                texts: chunk.to_vec(),
            };
            if task_tx.send(task).is_err() {
                first_error.get_or_insert(CorpusError::PoolClosed);
                break;
            }
            inflight += 1;

            while let Ok(outcome) = self.result_rx.try_recv() {
                if outcome.batch == batch {
                    inflight -= 1;
                }
                collect(batch, outcome, &mut slots, &mut first_error);
            }
        }

        while inflight > 0 {
            let Ok(outcome) = self.result_rx.recv() else {
                first_error.get_or_insert(CorpusError::PoolClosed);
                break;
            };
            if outcome.batch == batch {
                inflight -= 1;
            }
            collect(batch, outcome, &mut slots, &mut first_error);
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        let mut embeddings = Vec::with_capacity(passages.len());
        for slot in slots {
            embeddings.extend(slot.ok_or(CorpusError::PoolClosed)?);
        }
        debug!(count = embeddings.len(), chunks = total_chunks, "Encoded passages");
        Ok(embeddings)
    }

    /// Close the task channel and join the workers.
    pub fn stop(mut self) -> CorpusResult<()> {
        let panicked = self.shutdown();
        info!("Stopped encode pool");
        match panicked {
            Some(worker) => Err(CorpusError::WorkerPanic {
                worker,
                message: "worker thread exited abnormally".into(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the id of a worker whose thread could not be joined cleanly.
    fn shutdown(&mut self) -> Option<usize> {
        drop(self.task_tx.take());
        let mut panicked = None;
        for (worker, handle) in self.workers.drain(..).enumerate() {
            if handle.join().is_err() {
                panicked.get_or_insert(worker);
            }
        }
        panicked
    }
}

impl Drop for EncodePool {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            debug!("Encode pool dropped without stop, joining workers");
            if let Some(worker) = self.shutdown() {
                warn!(worker, "Encode worker exited abnormally");
            }
        }
    }
}

fn collect(
    batch: u64,
    outcome: EncodeOutcome,
    slots: &mut [Option<Vec<Vec<f32>>>],
    first_error: &mut Option<CorpusError>,
) {
    if outcome.batch != batch {
        debug!(stale = outcome.batch, batch, chunk = outcome.id, "Discarding stale outcome");
        return;
    }
    let result = outcome.result.and_then(|vectors| {
        if vectors.len() == outcome.expected {
            Ok(vectors)
        } else {
            Err(CorpusError::Invariant(format!(
                "chunk {} returned {} vectors for {} passages",
                outcome.id,
                vectors.len(),
                outcome.expected
            )))
        }
    });

    match result {
        Ok(vectors) => {
            if let Some(slot) = slots.get_mut(outcome.id) {
                *slot = Some(vectors);
            }
        }
        Err(err) => {
            first_error.get_or_insert(err);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn worker_loop(
    worker_id: usize,
    tasks: Receiver<EncodeTask>,
    results: Sender<EncodeOutcome>,
    provider: Arc<dyn EmbeddingProvider>,
    runtime: Handle,
) {
    for EncodeTask { batch, id, texts } in tasks.iter() {
        debug!(worker_id, chunk = id, size = texts.len(), "Encoding chunk");

        let run = catch_unwind(AssertUnwindSafe(|| {
            runtime.block_on(provider.embed_batch(&texts))
        }));
        let result = match run {
            Ok(Ok(vectors)) => Ok(vectors),
            Ok(Err(source)) => Err(CorpusError::Embedding { chunk: id, source }),
            Err(payload) => Err(CorpusError::WorkerPanic {
                worker: worker_id,
                message: panic_message(payload.as_ref()),
            }),
        };

        let outcome = EncodeOutcome {
            batch,
            id,
            expected: texts.len(),
            result,
        };
        if results.send(outcome).is_err() {
            break;
        }
    }
}
