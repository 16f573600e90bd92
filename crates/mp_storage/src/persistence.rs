use mp_core::{ArticleStorage, Error, NormalizedArticle, PersistedArticle, Result};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};

/// Batches waiting behind the one being written.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { count: usize },
    Failed { error: String },
    Disabled,
}

/// Fire-and-forget writer in front of a storage backend.
///
/// Batches are queued to a single worker task and written in submission
/// order. Callers never wait on the write; outcomes are logged and
/// broadcast to whoever subscribed. When the queue is full the batch is
/// dropped and reported as [`SaveOutcome::Failed`].
#[derive(Clone)]
pub struct Persistence {
    storage: Arc<dyn ArticleStorage>,
    queue: mpsc::Sender<Vec<NormalizedArticle>>,
    outcomes: broadcast::Sender<SaveOutcome>,
}

impl Persistence {
    /// Starts the worker. Must be called inside a tokio runtime.
    pub fn spawn(storage: Arc<dyn ArticleStorage>) -> Self {
        Self::spawn_with_capacity(storage, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn spawn_with_capacity(storage: Arc<dyn ArticleStorage>, capacity: usize) -> Self {
        let (queue, mut rx) = mpsc::channel::<Vec<NormalizedArticle>>(capacity.max(1));
        let (outcomes, _) = broadcast::channel(64);

        let worker_storage = Arc::clone(&storage);
        let worker_outcomes = outcomes.clone();
        tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                let outcome = save_batch(worker_storage.as_ref(), &batch).await;
                // No subscribers is fine
                let _ = worker_outcomes.send(outcome);
            }
        });

        Self {
            storage,
            queue,
            outcomes,
        }
    }

    /// Queues a batch and returns immediately.
    pub fn submit(&self, articles: Vec<NormalizedArticle>) {
        if articles.is_empty() {
            return;
        }
        match self.queue.try_send(articles) {
            Ok(()) => {}
            Err(TrySendError::Full(batch)) => {
                error!("❌ Persistence queue full; dropping {} articles", batch.len());
                let _ = self.outcomes.send(SaveOutcome::Failed {
                    error: format!("persistence queue full; dropped {} articles", batch.len()),
                });
            }
            Err(TrySendError::Closed(batch)) => {
                error!("❌ Persistence worker has stopped; dropping {} articles", batch.len());
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveOutcome> {
        self.outcomes.subscribe()
    }

    pub fn storage(&self) -> Arc<dyn ArticleStorage> {
        Arc::clone(&self.storage)
    }

    pub async fn load(&self) -> Result<Vec<PersistedArticle>> {
        self.storage.load().await
    }
}

async fn save_batch(storage: &dyn ArticleStorage, batch: &[NormalizedArticle]) -> SaveOutcome {
    match storage.save(batch).await {
        Ok(()) => {
            info!("💾 Saved {} articles to {}", batch.len(), storage.name());
            SaveOutcome::Saved { count: batch.len() }
        }
        Err(Error::PersistenceDisabled) => {
            info!("💤 Persistence disabled; skipped saving {} articles", batch.len());
            SaveOutcome::Disabled
        }
        Err(e) => {
            error!("❌ Failed to save {} articles to {}: {}", batch.len(), storage.name(), e);
            SaveOutcome::Failed { error: e.to_string() }
        }
    }
}
