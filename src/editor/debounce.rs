//! Keyed debounce on tokio timers.
//!
//! Each key has its own quiet period. Pushing a value restarts that key's
//! timer; when the timer runs out the last value is emitted on the channel
//! returned by [`Debouncer::new`]. Emissions must be passed back through
//! [`Debouncer::accept`], which drops any that were overtaken by a newer push.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Emission<K, V> {
    key: K,
    seq: u64,
    value: V,
}

pub struct Debouncer<K, V> {
    quiet: Duration,
    seq: u64,
    timers: HashMap<K, (u64, JoinHandle<()>)>,
    tx: mpsc::UnboundedSender<Emission<K, V>>,
}

impl<K, V> Debouncer<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<Emission<K, V>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            quiet,
            seq: 0,
            timers: HashMap::new(),
            tx,
        };
        (debouncer, rx)
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record a new value for `key`, restarting its timer.
    pub fn push(&mut self, key: K, value: V) {
        if let Some((_, timer)) = self.timers.remove(&key) {
            timer.abort();
        }

        self.seq += 1;
        let seq = self.seq;
        let quiet = self.quiet;
        let tx = self.tx.clone();
        let emit_key = key.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let _ = tx.send(Emission { key: emit_key, seq, value });
        });
        self.timers.insert(key, (seq, timer));
    }

    /// Accept an emission from the channel. Returns `None` if a newer value
    /// was pushed for the same key after this one was sent.
    pub fn accept(&mut self, emission: Emission<K, V>) -> Option<(K, V)> {
        match self.timers.get(&emission.key) {
            Some((seq, _)) if *seq == emission.seq => {
                self.timers.remove(&emission.key);
                Some((emission.key, emission.value))
            }
            _ => None,
        }
    }

    pub fn is_waiting(&self, key: &K) -> bool {
        self.timers.contains_key(key)
    }

    /// Drop every pending value without emitting it.
    pub fn cancel_all(&mut self) {
        for (_, (_, timer)) in self.timers.drain() {
            timer.abort();
        }
    }
}

impl<K, V> Drop for Debouncer<K, V> {
    fn drop(&mut self) {
        for (_, (_, timer)) in self.timers.drain() {
            timer.abort();
        }
    }
}
