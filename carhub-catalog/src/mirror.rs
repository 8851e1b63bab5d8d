//! Live, owner-scoped view for the management dashboard.
//!
//! The collection pushes the owner's full result set on every change and the
//! mirror swaps its list for it. There is no paging and no local mutation:
//! even deletes show up only once the listener reports them.

use std::sync::Arc;

use carhub_blob::ImageAdapter;
use carhub_core::{ListingCollection, ListingId, ListingSummary, QueryFilter};
use futures::future::join_all;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{CatalogError, CatalogResult};
use crate::images::ImageReadinessTracker;

/// What the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorState {
    pub owner_id: Option<String>,
    pub items: Vec<ListingSummary>,
    pub subscribed: bool,
    /// Set when attaching or keeping the listener failed.
    pub error: Option<String>,
    /// Bumped on every applied snapshot or state change.
    pub revision: u64,
}

/// Result of a delete whose record removal succeeded.
#[derive(Debug)]
pub struct DeleteReport {
    pub id: ListingId,
    pub images_deleted: usize,
    /// One entry per image whose blob could not be removed.
    pub blob_failures: Vec<CatalogError>,
}

impl DeleteReport {
    pub fn is_clean(&self) -> bool {
        self.blob_failures.is_empty()
    }
}

struct Listener {
    epoch: u64,
    task: JoinHandle<()>,
}

pub struct CollectionMirror {
    collection: Arc<dyn ListingCollection>,
    images: ImageAdapter,
    state: Arc<watch::Sender<MirrorState>>,
    listener: Mutex<Option<Listener>>,
    // Identifies the current listener; snapshots from older ones are ignored.
    epoch: Arc<Mutex<u64>>,
    tracker: Arc<ImageReadinessTracker>,
}

impl CollectionMirror {
    pub fn new(collection: Arc<dyn ListingCollection>, images: ImageAdapter) -> Self {
        let (state, _) = watch::channel(MirrorState::default());
        Self {
            collection,
            images,
            state: Arc::new(state),
            listener: Mutex::new(None),
            epoch: Arc::new(Mutex::new(0)),
            tracker: Arc::new(ImageReadinessTracker::new()),
        }
    }

    /// Attach a standing listener for `owner_id`'s listings.
    ///
    /// Replaces any previous listener. Must be called from within a tokio
    /// runtime; snapshots are applied by a spawned task.
    pub async fn subscribe(&self, owner_id: &str) -> CatalogResult<()> {
        let epoch = self.release_listener();
        let owner = owner_id.to_string();

        self.state.send_modify(|s| {
            if s.owner_id.as_deref() != Some(owner_id) {
                s.items.clear();
            }
            s.owner_id = Some(owner.clone());
            s.subscribed = false;
            s.error = None;
            s.revision += 1;
        });

        let stream = match self.collection.subscribe(Some(QueryFilter::owner(owner_id))).await {
            Ok(stream) => stream,
            Err(source) => {
                tracing::error!(owner = %owner, error = %source, "listing listener failed to attach");
                self.state.send_modify(|s| {
                    s.items.clear();
                    s.error = Some(source.to_string());
                    s.revision += 1;
                });
                self.tracker.clear();
                return Err(CatalogError::SubscriptionFailure { source });
            }
        };

        let mut listener = self.listener.lock();
        if *self.epoch.lock() != epoch {
            // Another subscribe or unsubscribe won while we were attaching.
            tracing::debug!(owner = %owner, "listener superseded before it started");
            return Ok(());
        }

        self.state.send_modify(|s| {
            s.subscribed = true;
            s.revision += 1;
        });

        let task = tokio::spawn(apply_snapshots(
            stream,
            epoch,
            Arc::clone(&self.epoch),
            Arc::clone(&self.state),
            Arc::clone(&self.tracker),
        ));
        *listener = Some(Listener { epoch, task });
        drop(listener);

        tracing::info!(owner = %owner, "listing listener attached");
        Ok(())
    }

    /// Release the listener. Safe to call any number of times; returns
    /// whether a listener was actually released.
    pub fn unsubscribe(&self) -> bool {
        let had_listener = self.listener.lock().is_some();
        self.release_listener();

        if had_listener {
            self.state.send_modify(|s| {
                s.subscribed = false;
                s.revision += 1;
            });
            tracing::info!("listing listener released");
        }
        had_listener
    }

    /// Forget the owner and the displayed listings.
    pub fn clear(&self) {
        self.state.send_modify(|s| {
            s.owner_id = None;
            s.items.clear();
            s.error = None;
            s.revision += 1;
        });
        self.tracker.clear();
    }

    // Invalidates the current listener and returns the new epoch.
    fn release_listener(&self) -> u64 {
        let epoch = {
            let mut epoch = self.epoch.lock();
            *epoch += 1;
            *epoch
        };
        if let Some(listener) = self.listener.lock().take() {
            tracing::debug!(epoch = listener.epoch, "aborting listing listener");
            listener.task.abort();
        }
        epoch
    }

    /// Delete `item`, then its photos.
    ///
    /// The record goes first; if that fails nothing else happens. Each photo
    /// is then deleted independently and failures are collected in the
    /// report without undoing the record deletion. The displayed list is left
    /// alone: the listener removes the item.
    pub async fn delete(&self, actor_id: &str, item: &ListingSummary) -> CatalogResult<DeleteReport> {
        if item.owner_id != actor_id {
            tracing::warn!(id = %item.id, actor = %actor_id, "delete refused for another owner's listing");
            return Err(CatalogError::Forbidden(format!(
                "listing {} belongs to another owner",
                item.id
            )));
        }

        if let Err(source) = self.collection.delete(&item.id).await {
            tracing::error!(id = %item.id, error = %source, "listing delete failed");
            return Err(CatalogError::DeleteRecordFailure {
                id: item.id.clone(),
                source,
            });
        }
        tracing::info!(id = %item.id, images = item.images.len(), "listing deleted");

        let results = join_all(item.images.iter().map(|image| async move {
            let key = self.images.key_of(image);
            self.images
                .delete(image)
                .await
                .map_err(|source| CatalogError::DeleteBlobFailure { key, source })
        }))
        .await;

        let mut report = DeleteReport {
            id: item.id.clone(),
            images_deleted: 0,
            blob_failures: Vec::new(),
        };
        for result in results {
            match result {
                Ok(()) => report.images_deleted += 1,
                Err(err) => {
                    tracing::warn!(id = %item.id, error = %err, "image left behind");
                    report.blob_failures.push(err);
                }
            }
        }
        Ok(report)
    }

    pub fn state(&self) -> MirrorState {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<ListingSummary> {
        self.state.borrow().items.clone()
    }

    pub fn owner_id(&self) -> Option<String> {
        self.state.borrow().owner_id.clone()
    }

    /// Whether a listener is attached and still delivering.
    pub fn is_subscribed(&self) -> bool {
        self.state.borrow().subscribed
    }

    /// Feed of state changes, starting at the current state.
    pub fn changes(&self) -> watch::Receiver<MirrorState> {
        self.state.subscribe()
    }

    pub fn images(&self) -> &ImageReadinessTracker {
        &self.tracker
    }
}

impl Drop for CollectionMirror {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.get_mut().take() {
            listener.task.abort();
        }
    }
}

async fn apply_snapshots(
    mut stream: carhub_core::SnapshotStream,
    epoch: u64,
    current: Arc<Mutex<u64>>,
    state: Arc<watch::Sender<MirrorState>>,
    tracker: Arc<ImageReadinessTracker>,
) {
    while let Some(event) = stream.next().await {
        if *current.lock() != epoch {
            return;
        }
        match event {
            Ok(items) => {
                tracing::debug!(epoch, count = items.len(), "snapshot applied");
                tracker.retain_only(items.iter().map(|i| &i.id));
                state.send_modify(|s| {
                    s.items = items;
                    s.error = None;
                    s.revision += 1;
                });
            }
            Err(source) => {
                tracing::error!(epoch, error = %source, "listing listener failed");
                tracker.clear();
                state.send_modify(|s| {
                    s.items.clear();
                    s.subscribed = false;
                    s.error = Some(source.to_string());
                    s.revision += 1;
                });
                return;
            }
        }
    }

    if *current.lock() == epoch {
        tracing::info!(epoch, "listing listener stream ended");
        state.send_modify(|s| {
            s.subscribed = false;
            s.revision += 1;
        });
    }
}
