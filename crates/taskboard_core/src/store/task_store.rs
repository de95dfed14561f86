//! Stateful store wrapping the reducer with persistence and subscriptions.

use super::action::TaskAction;
use super::reducer::{reduce, NoOpReason, Reduction, StoreError};
use crate::model::task::{Task, TaskId};
use crate::persistence::{PersistenceAdapter, PersistenceError, SlotStorage};
use crate::view::{project, ViewQuery};
use log::{debug, info, warn};
use std::sync::Arc;

/// Immutable view of the canonical collection at one point in time.
pub type TaskSnapshot = Arc<[Task]>;

type Subscriber = Box<dyn FnMut(&TaskSnapshot) + Send>;

/// Handle returned by `TaskStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// How startup loading went.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Slot was absent or held an empty array.
    Empty,
    Restored { task_count: usize },
    /// Slot could not be read or parsed; the store started empty.
    Recovered(PersistenceError),
}

/// What a dispatched action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEffect {
    Applied,
    NoOp(NoOpReason),
}

/// Result of one successful `dispatch`.
#[derive(Debug)]
pub struct DispatchReport {
    pub effect: DispatchEffect,
    /// Set when the change applied in memory but could not be saved.
    pub save_error: Option<PersistenceError>,
}

impl DispatchReport {
    pub fn is_applied(&self) -> bool {
        self.effect == DispatchEffect::Applied
    }
}

/// Owner of the canonical task collection.
///
/// All mutations go through `dispatch`, which takes `&mut self`; a subscriber
/// callback therefore cannot re-enter the store while a change is being
/// broadcast.
pub struct TaskStore<S: SlotStorage> {
    tasks: TaskSnapshot,
    persistence: PersistenceAdapter<S>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: SlotStorage> TaskStore<S> {
    /// Loads the persisted collection and returns a ready store.
    ///
    /// Load failures never abort startup: the store starts empty and the
    /// failure comes back as `LoadOutcome::Recovered`. The unreadable slot is
    /// left as-is until the first applied change overwrites it.
    pub fn open(persistence: PersistenceAdapter<S>) -> (Self, LoadOutcome) {
        let (tasks, outcome) = match persistence.load() {
            Ok(tasks) if tasks.is_empty() => (Vec::new(), LoadOutcome::Empty),
            Ok(tasks) => {
                let task_count = tasks.len();
                (tasks, LoadOutcome::Restored { task_count })
            }
            Err(err) => {
                warn!(
                    "event=store_open module=store status=recovered slot={} error={err}",
                    persistence.slot_key()
                );
                (Vec::new(), LoadOutcome::Recovered(err))
            }
        };

        info!(
            "event=store_open module=store status=ok slot={} task_count={}",
            persistence.slot_key(),
            tasks.len()
        );

        let store = Self {
            tasks: tasks.into(),
            persistence,
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        (store, outcome)
    }

    /// Current canonical collection.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Cheap shared handle to the current collection.
    pub fn snapshot(&self) -> TaskSnapshot {
        Arc::clone(&self.tasks)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Filtered and sorted presentation list, recomputed on demand.
    pub fn project(&self, query: ViewQuery) -> Vec<Task> {
        project(&self.tasks, query)
    }

    pub fn slot_key(&self) -> &str {
        self.persistence.slot_key()
    }

    /// Registers `callback` to receive every new snapshot after a change.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&TaskSnapshot) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        debug!(
            "event=store_subscribe module=store status=ok subscriber_count={}",
            self.subscribers.len()
        );
        id
    }

    /// Drops a subscription. Returns `false` when it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        before != self.subscribers.len()
    }

    /// Applies one action: reduce, swap snapshot, save, notify.
    ///
    /// No-ops skip saving and notification.
    ///
    /// # Errors
    /// - `StoreError::InvalidReorder` when a reorder is not a permutation;
    ///   state is left untouched.
    pub fn dispatch(&mut self, action: TaskAction) -> Result<DispatchReport, StoreError> {
        let action_name = action.name();

        let next = match reduce(&self.tasks, action) {
            Ok(Reduction::Changed(next)) => next,
            Ok(Reduction::Unchanged(reason)) => {
                let NoOpReason::NotFound(id) = reason;
                debug!(
                    "event=store_dispatch module=store status=noop action={action_name} reason=not_found task_id={id}"
                );
                return Ok(DispatchReport {
                    effect: DispatchEffect::NoOp(reason),
                    save_error: None,
                });
            }
            Err(err) => {
                warn!(
                    "event=store_dispatch module=store status=rejected action={action_name} error={err}"
                );
                return Err(err);
            }
        };

        self.tasks = next.into();
        let save_error = self.persistence.save(&self.tasks).err();

        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.tasks);
        }

        info!(
            "event=store_dispatch module=store status=ok action={action_name} task_count={} saved={}",
            self.tasks.len(),
            save_error.is_none()
        );

        Ok(DispatchReport {
            effect: DispatchEffect::Applied,
            save_error,
        })
    }

    pub fn add(&mut self, task: Task) -> Result<DispatchReport, StoreError> {
        self.dispatch(TaskAction::Add(task))
    }

    pub fn update(&mut self, task: Task) -> Result<DispatchReport, StoreError> {
        self.dispatch(TaskAction::Update(task))
    }

    pub fn delete(&mut self, id: TaskId) -> Result<DispatchReport, StoreError> {
        self.dispatch(TaskAction::Delete(id))
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> Result<DispatchReport, StoreError> {
        self.dispatch(TaskAction::ToggleComplete(id))
    }

    pub fn reorder(&mut self, order: Vec<Task>) -> Result<DispatchReport, StoreError> {
        self.dispatch(TaskAction::Reorder(order))
    }

    /// Explicit teardown: drops subscribers and hands back the backend.
    pub fn close(self) -> S {
        info!(
            "event=store_close module=store status=ok task_count={} subscriber_count={}",
            self.tasks.len(),
            self.subscribers.len()
        );
        self.persistence.into_storage()
    }
}
