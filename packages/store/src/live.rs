//! # Live queries
//!
//! A live query re-delivers its result whenever the matching data changes. The UI
//! only sees the [`NotesDb`] contract: `subscribe` hands back the initial snapshot
//! plus a [`Subscription`] guard, and the `on_change` callback fires with every
//! later snapshot until the guard is cancelled or dropped.
//!
//! [`LiveQueries`] is the subscriber registry shared by the implementations
//! ([`crate::MemoryStore`] in this crate, the HTTP client in `api`). It remembers
//! the last snapshot handed to each subscriber and suppresses identical
//! re-deliveries, so polling implementations can publish unconditionally.
//! Every query run is stamped with a [`Ticket`] when it starts; a result whose
//! ticket is older than one already delivered is dropped, so overlapping
//! refreshes never roll a subscriber back to an earlier snapshot.
//!
//! Everything here is single-threaded: callbacks are `'static` but not `Send`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::models::Note;
use crate::tx::TxStep;

/// Server-side filter for the notes query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotesFilter {
    /// Only notes whose `createdBy` equals this id.
    pub created_by: Option<String>,
}

impl NotesFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn created_by(user_id: impl Into<String>) -> Self {
        Self {
            created_by: Some(user_id.into()),
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        match &self.created_by {
            Some(id) => &note.created_by == id,
            None => true,
        }
    }
}

/// Capability the notes view depends on.
pub trait NotesDb {
    /// Start a live query. Returns the current snapshot and a guard; `on_change`
    /// receives every subsequent snapshot that differs from the previous one.
    fn subscribe(
        &self,
        filter: NotesFilter,
        on_change: impl Fn(&[Note]) + 'static,
    ) -> impl std::future::Future<Output = Result<(Vec<Note>, Subscription)>>;

    /// Apply all steps atomically.
    fn transact(&self, steps: Vec<TxStep>) -> impl std::future::Future<Output = Result<()>>;
}

/// Cancel handle for a live query. Dropping it cancels too.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to release.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

type Callback = Rc<dyn Fn(&[Note])>;

struct Entry {
    filter: NotesFilter,
    last: Option<Vec<Note>>,
    /// Stamp of the freshest query result seen so far.
    seen: u64,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    next_stamp: u64,
    entries: BTreeMap<u64, Entry>,
}

impl Registry {
    fn stamp(&mut self) -> u64 {
        self.next_stamp += 1;
        self.next_stamp
    }
}

/// One query run for one subscriber, ordered by when it started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    stamp: u64,
}

impl Ticket {
    /// The subscriber this run belongs to.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Registry of live subscribers.
#[derive(Clone, Default)]
pub struct LiveQueries {
    inner: Rc<RefCell<Registry>>,
}

impl LiveQueries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber whose first snapshot is `initial`.
    pub fn register(
        &self,
        filter: NotesFilter,
        initial: Option<Vec<Note>>,
        on_change: impl Fn(&[Note]) + 'static,
    ) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            let seen = registry.stamp();
            registry.entries.insert(
                id,
                Entry {
                    filter,
                    last: initial,
                    seen,
                    callback: Rc::new(on_change),
                },
            );
            id
        };
        let weak: Weak<RefCell<Registry>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.remove(&id);
            }
        })
    }

    /// Start a query run for every active subscriber: a fresh ticket and the
    /// filter to run.
    pub fn filters(&self) -> Vec<(Ticket, NotesFilter)> {
        let mut registry = self.inner.borrow_mut();
        let stamp = registry.stamp();
        registry
            .entries
            .iter()
            .map(|(id, entry)| (Ticket { id: *id, stamp }, entry.filter.clone()))
            .collect()
    }

    /// Hand `notes` to the ticket's subscriber if it differs from what it saw
    /// last. Results from a run older than one already delivered are dropped.
    /// Returns whether the callback ran.
    pub fn deliver(&self, ticket: Ticket, notes: Vec<Note>) -> bool {
        let callback = {
            let mut registry = self.inner.borrow_mut();
            let Some(entry) = registry.entries.get_mut(&ticket.id) else {
                return false;
            };
            if ticket.stamp < entry.seen {
                tracing::debug!("Dropping out-of-date result for live query {}", ticket.id);
                return false;
            }
            entry.seen = ticket.stamp;
            if entry.last.as_ref() == Some(&notes) {
                return false;
            }
            entry.last = Some(notes.clone());
            entry.callback.clone()
        };
        // Borrow released: the callback may subscribe or cancel.
        callback(&notes);
        true
    }

    /// Filter the full collection for each subscriber and deliver.
    pub fn publish(&self, all: &[Note]) {
        for (ticket, filter) in self.filters() {
            let matching = all.iter().filter(|n| filter.matches(n)).cloned().collect();
            self.deliver(ticket, matching);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every subscriber. Outstanding guards become no-ops.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn note(id: &str, by: &str, at: i64) -> Note {
        Note {
            id: id.to_string(),
            body: format!("body {id}"),
            created_by: by.to_string(),
            created_at: at,
        }
    }

    #[test]
    fn test_filter_matches_owner() {
        let filter = NotesFilter::created_by("u1");
        assert!(filter.matches(&note("a", "u1", 1)));
        assert!(!filter.matches(&note("b", "u2", 1)));
        assert!(NotesFilter::all().matches(&note("b", "u2", 1)));
    }

    #[test]
    fn test_publish_skips_unchanged_snapshots() {
        let live = LiveQueries::new();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let _sub = live.register(NotesFilter::created_by("u1"), Some(vec![]), move |_| {
            seen.set(seen.get() + 1);
        });

        // Only another user's note: filtered snapshot is still empty.
        live.publish(&[note("x", "u2", 1)]);
        assert_eq!(calls.get(), 0);

        live.publish(&[note("a", "u1", 1), note("x", "u2", 1)]);
        assert_eq!(calls.get(), 1);

        live.publish(&[note("a", "u1", 1)]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_overlapping_runs_never_roll_back() {
        let live = LiveQueries::new();
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let record = seen.clone();
        let _sub = live.register(NotesFilter::created_by("u1"), Some(vec![]), move |notes| {
            record.borrow_mut().push(notes.len());
        });

        // A poll starts, then a write lands and its refresh finishes first.
        let (poll, _) = live.filters().remove(0);
        let (after_write, _) = live.filters().remove(0);
        assert!(live.deliver(after_write, vec![note("a", "u1", 1)]));

        // The slower poll finishes with the pre-write snapshot.
        assert!(!live.deliver(poll, vec![]));
        assert_eq!(*seen.borrow(), vec![1]);

        // A later run still goes through.
        let (next, _) = live.filters().remove(0);
        assert!(live.deliver(next, vec![note("a", "u1", 1), note("b", "u1", 2)]));
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_cancel_and_drop_release_subscriber() {
        let live = LiveQueries::new();
        let first = live.register(NotesFilter::all(), None, |_| {});
        let second = live.register(NotesFilter::all(), None, |_| {});
        assert_eq!(live.len(), 2);

        first.cancel();
        assert_eq!(live.len(), 1);

        drop(second);
        assert!(live.is_empty());
    }

    #[test]
    fn test_callback_may_cancel_itself() {
        let live = LiveQueries::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let sub = live.register(NotesFilter::all(), None, move |_| {
            inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        live.publish(&[note("a", "u1", 1)]);
        assert!(live.is_empty());
    }

    #[test]
    fn test_guard_outliving_registry_is_harmless() {
        let sub = {
            let live = LiveQueries::new();
            live.register(NotesFilter::all(), None, |_| {})
        };
        sub.cancel();
    }
}
