//! Optimistic mutations with per-key ordering and rollback.
//!
//! A mutation is applied to local state immediately ([`PendingMutations::begin`]),
//! the caller performs the remote call with the returned [`Ticket`], and hands
//! the outcome back to [`PendingMutations::settle`]. Tickets for the same key
//! are sequence-numbered; only the newest one may touch state when it settles.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// State that can be read and written per key.
pub trait Optimistic<K> {
    type Value: Clone + PartialEq;

    fn current(&self, key: &K) -> Self::Value;
    fn apply(&mut self, key: &K, value: Self::Value);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K, V> {
    pub key: K,
    pub seq: u64,
    /// Value before this mutation was applied.
    pub previous: V,
    /// Value this mutation applied locally.
    pub applied: V,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement<V> {
    /// Newest mutation for its key succeeded; local state already matches.
    Confirmed,
    /// Newest mutation succeeded but the server reported a different value,
    /// which is now applied.
    Reconciled(V),
    /// Newest mutation failed; the pre-mutation value is restored.
    RolledBack(V),
    /// A newer mutation for the same key was issued after this one.
    Stale,
}

#[derive(Debug, Default)]
struct InFlight {
    latest: u64,
    /// Sequence numbers of this key's unsettled tickets.
    outstanding: HashSet<u64>,
}

#[derive(Debug)]
pub struct PendingMutations<K> {
    next_seq: u64,
    in_flight: HashMap<K, InFlight>,
}

impl<K> Default for PendingMutations<K> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            in_flight: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> PendingMutations<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `change` to the current value of `key` and track the mutation.
    pub fn begin<S, F>(&mut self, state: &mut S, key: K, change: F) -> Ticket<K, S::Value>
    where
        S: Optimistic<K>,
        F: FnOnce(&S::Value) -> S::Value,
    {
        let previous = state.current(&key);
        let applied = change(&previous);
        state.apply(&key, applied.clone());

        self.next_seq += 1;
        let seq = self.next_seq;
        let entry = self.in_flight.entry(key.clone()).or_default();
        entry.latest = seq;
        entry.outstanding.insert(seq);

        Ticket { key, seq, previous, applied }
    }

    /// Settle a mutation with the remote outcome. `Ok(Some(v))` means the
    /// server reported the resulting value.
    pub fn settle<S, E>(
        &mut self,
        state: &mut S,
        ticket: &Ticket<K, S::Value>,
        outcome: &Result<Option<S::Value>, E>,
    ) -> Settlement<S::Value>
    where
        S: Optimistic<K>,
    {
        // A ticket issued before a `clear` is no longer tracked, even when a
        // newer ticket for the same key is.
        let Some(entry) = self.in_flight.get_mut(&ticket.key) else {
            return Settlement::Stale;
        };
        if !entry.outstanding.remove(&ticket.seq) {
            return Settlement::Stale;
        }
        let is_latest = entry.latest == ticket.seq;
        if entry.outstanding.is_empty() {
            self.in_flight.remove(&ticket.key);
        }
        if !is_latest {
            return Settlement::Stale;
        }

        match outcome {
            Ok(None) => Settlement::Confirmed,
            Ok(Some(reported)) => {
                if state.current(&ticket.key) == *reported {
                    Settlement::Confirmed
                } else {
                    state.apply(&ticket.key, reported.clone());
                    Settlement::Reconciled(reported.clone())
                }
            }
            Err(_) => {
                state.apply(&ticket.key, ticket.previous.clone());
                Settlement::RolledBack(ticket.previous.clone())
            }
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.in_flight.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Forget every in-flight mutation. Their tickets settle as stale.
    pub fn clear(&mut self) {
        self.in_flight.clear();
    }
}
