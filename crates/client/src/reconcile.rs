// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local copy of a server-held collection.
//!
//! A reconciler folds a full snapshot and a stream of push events into an
//! ordered, id-keyed collection. Events carry no sequence numbers, so each
//! operation is idempotent instead of ordered:
//!
//! - a duplicate `created` updates in place
//! - an `updated` for an unknown id inserts
//! - a `deleted` for an unknown id does nothing
//!
//! The result is eventually correct after the next full snapshot.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use natura_core::{EventKind, Observation, ObservationStats, PushMessage, Record, RecordId};
use serde::de::DeserializeOwned;

use crate::realtime::{PushTransport, RealtimeChannel};

/// Ordered collection of records keyed by id, newest first.
#[derive(Debug, Clone)]
pub struct CollectionReconciler<R> {
    records: HashMap<RecordId, R>,
    order: VecDeque<RecordId>,
}

impl<R: Record> CollectionReconciler<R> {
    pub fn new() -> Self {
        CollectionReconciler {
            records: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Replace the whole collection with `snapshot`, keeping server order.
    ///
    /// If the snapshot repeats an id, the first occurrence wins.
    pub fn initialize(&mut self, snapshot: impl IntoIterator<Item = R>) {
        self.records.clear();
        self.order.clear();
        for record in snapshot {
            let id = record.id();
            if self.records.contains_key(&id) {
                tracing::debug!(%id, "dropping duplicate id in snapshot");
                continue;
            }
            self.order.push_back(id);
            self.records.insert(id, record);
        }
    }

    /// Insert a new record at the front, or update it if already present.
    pub fn apply_created(&mut self, record: R) {
        let id = record.id();
        if let Some(slot) = self.records.get_mut(&id) {
            tracing::debug!(%id, "created for known id, updating in place");
            *slot = record;
            return;
        }
        self.order.push_front(id);
        self.records.insert(id, record);
    }

    /// Replace a record in place, or insert it if it was never seen.
    pub fn apply_updated(&mut self, record: R) {
        let id = record.id();
        match self.records.get_mut(&id) {
            Some(slot) => *slot = record,
            None => {
                tracing::debug!(%id, "updated for unknown id, inserting");
                self.apply_created(record);
            }
        }
    }

    /// Remove a record. Unknown ids are ignored.
    pub fn apply_deleted(&mut self, id: RecordId) {
        if self.records.remove(&id).is_some() {
            self.order.retain(|known| *known != id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Records in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Ids in collection order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.order.iter().copied().collect()
    }
}

impl<R: Record + Clone> CollectionReconciler<R> {
    /// Apply one push event.
    pub fn apply(&mut self, message: &PushMessage<R>) {
        match message {
            PushMessage::Created { record } => self.apply_created(record.clone()),
            PushMessage::Updated { record } => self.apply_updated(record.clone()),
            PushMessage::Deleted { id } => self.apply_deleted(*id),
        }
    }

    /// Copy of the records in collection order.
    pub fn to_vec(&self) -> Vec<R> {
        self.iter().cloned().collect()
    }
}

impl CollectionReconciler<Observation> {
    /// Observation and species counts for one user.
    pub fn stats_for(&self, user_id: RecordId) -> ObservationStats {
        ObservationStats::for_user(self.iter(), user_id)
    }
}

impl<R: Record> Default for CollectionReconciler<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// A reconciler shared between a push channel and its readers.
pub struct SharedReconciler<R> {
    inner: Arc<Mutex<CollectionReconciler<R>>>,
}

impl<R> Clone for SharedReconciler<R> {
    fn clone(&self) -> Self {
        SharedReconciler {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for SharedReconciler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedReconciler").field(&self.inner).finish()
    }
}

impl<R: Record> SharedReconciler<R> {
    pub fn new() -> Self {
        SharedReconciler {
            inner: Arc::new(Mutex::new(CollectionReconciler::new())),
        }
    }

    /// Replace the collection with a fresh snapshot.
    pub fn initialize(&self, snapshot: impl IntoIterator<Item = R>) {
        self.lock().initialize(snapshot);
    }

    /// Run `f` with the collection locked.
    ///
    /// Do not block inside `f`: push delivery waits on the same lock.
    pub fn with<T>(&self, f: impl FnOnce(&mut CollectionReconciler<R>) -> T) -> T {
        f(&mut self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, CollectionReconciler<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> SharedReconciler<R>
where
    R: Record + Clone + DeserializeOwned + Send + 'static,
{
    /// Apply every event `channel` delivers to this collection.
    ///
    /// Registers one handler per event kind; they are dropped with the
    /// channel's other handlers on disconnect.
    pub fn bind<T: PushTransport + 'static>(&self, channel: &RealtimeChannel<R, T>) {
        for kind in EventKind::ALL {
            let target = self.clone();
            channel.on(kind, move |message| target.lock().apply(message));
        }
    }

    /// Copy of the records in collection order.
    pub fn snapshot(&self) -> Vec<R> {
        self.lock().to_vec()
    }
}

impl SharedReconciler<Observation> {
    pub fn stats_for(&self, user_id: RecordId) -> ObservationStats {
        self.lock().stats_for(user_id)
    }
}

impl<R: Record> Default for SharedReconciler<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
