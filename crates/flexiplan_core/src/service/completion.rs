//! Optimistic completion synchronization.
//!
//! # Responsibility
//! - Flip an activity's `completed` flag locally before the network call.
//! - Send exactly one remote write per toggle and revert on failure.
//!
//! # Invariants
//! - The local flip strictly precedes the remote request of the same toggle.
//! - A stale row (activity gone from the cache) never reaches the remote.
//! - Toggles of one activity are tracked by ticket; only the newest toggle
//!   may revert the flag, and it reverts to the last value the server
//!   confirmed.
//! - A toggle never writes into a week that replaced the one it flipped;
//!   its rollback is dropped as stale.
//! - No retries.

use crate::cache::SharedRoutineCache;
use crate::model::activity::ActivityKey;
use crate::projection::DisplayedTask;
use crate::remote::{CompletionUpdate, RoutineRemote};
use crate::service::error::{RoutineError, RoutineResult};
use crate::service::lock;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy)]
struct InFlight {
    generation: u64,
    latest_ticket: u64,
    confirmed: bool,
    confirmed_ticket: u64,
    pending: u32,
}

#[derive(Debug, Default)]
struct Tickets {
    next: u64,
    by_key: HashMap<ActivityKey, InFlight>,
}

/// Applies optimistic completion toggles against the shared cache.
pub struct CompletionSynchronizer {
    remote: Arc<dyn RoutineRemote>,
    cache: SharedRoutineCache,
    tickets: Mutex<Tickets>,
}

impl CompletionSynchronizer {
    pub fn new(remote: Arc<dyn RoutineRemote>, cache: SharedRoutineCache) -> Self {
        Self {
            remote,
            cache,
            tickets: Mutex::new(Tickets::default()),
        }
    }

    /// Number of activities with a completion write still in flight.
    pub fn in_flight(&self) -> usize {
        lock(&self.tickets).by_key.len()
    }

    /// Toggles the completion flag behind `task`.
    ///
    /// Returns the new flag value once the server accepted it.
    ///
    /// # Errors
    /// - `StaleProjection` / `NotLoaded` when the row no longer maps to the
    ///   cache; nothing is sent.
    /// - `RemoteMutation` when the write failed; the flag was reverted.
    pub async fn toggle(&self, task: &DisplayedTask) -> RoutineResult<bool> {
        let key = task.key();
        let (target, ticket, generation) = self.apply_local(&key)?;
        let update = CompletionUpdate {
            day: key.day,
            activity_name: key.name.clone(),
            activity_type: key.kind,
            completed: target,
        };

        match self.remote.set_activity_completion(&update).await {
            Ok(()) => {
                self.confirm(&key, ticket, generation, target);
                info!(
                    "event=completion_toggle module=service status=ok day={} type={} completed={}",
                    key.day,
                    key.kind.as_str(),
                    target
                );
                Ok(target)
            }
            Err(err) => {
                let reverted_to = self.revert(&key, ticket, generation);
                warn!(
                    "event=completion_toggle module=service status=error day={} type={} reverted_to={:?} error={}",
                    key.day,
                    key.kind.as_str(),
                    reverted_to,
                    err
                );
                Err(RoutineError::RemoteMutation(err))
            }
        }
    }

    fn apply_local(&self, key: &ActivityKey) -> RoutineResult<(bool, u64, u64)> {
        let mut tickets = lock(&self.tickets);
        let (previous, generation) = self.cache.write(|cache| {
            let previous = cache.completed(key)?;
            cache.set_completed(key, !previous)?;
            Ok::<_, RoutineError>((previous, cache.generation()))
        })?;

        tickets.next += 1;
        let ticket = tickets.next;
        let entry = tickets.by_key.entry(key.clone()).or_insert(InFlight {
            generation,
            latest_ticket: ticket,
            confirmed: previous,
            confirmed_ticket: 0,
            pending: 0,
        });
        if entry.generation != generation {
            // The week was replaced; older confirmations describe the old week.
            entry.generation = generation;
            entry.confirmed = previous;
            entry.confirmed_ticket = 0;
        }
        entry.latest_ticket = ticket;
        entry.pending += 1;
        debug!(
            "event=completion_local module=service status=applied ticket={} pending={}",
            ticket, entry.pending
        );
        Ok((!previous, ticket, generation))
    }

    fn confirm(&self, key: &ActivityKey, ticket: u64, generation: u64, value: bool) {
        let mut tickets = lock(&self.tickets);
        if let Some(entry) = tickets.by_key.get_mut(key) {
            if entry.generation == generation && ticket > entry.confirmed_ticket {
                entry.confirmed = value;
                entry.confirmed_ticket = ticket;
            }
        }
        release(&mut tickets, key);
    }

    /// Reverts the flag when `ticket` is the newest toggle of `key`.
    ///
    /// Returns the restored value, or `None` when a newer toggle owns the
    /// flag, the week was replaced or the activity vanished from the cache.
    fn revert(&self, key: &ActivityKey, ticket: u64, generation: u64) -> Option<bool> {
        let mut tickets = lock(&self.tickets);
        let restored = match tickets.by_key.get(key) {
            Some(entry) if entry.latest_ticket == ticket => {
                let confirmed = entry.confirmed;
                let written = self.cache.write(|cache| {
                    if cache.generation() != generation {
                        return Ok(false);
                    }
                    cache.set_completed(key, confirmed).map(|_| true)
                });
                match written {
                    Ok(true) => Some(confirmed),
                    Ok(false) => {
                        debug!(
                            "event=completion_revert module=service status=skipped reason=stale_generation ticket={}",
                            ticket
                        );
                        None
                    }
                    Err(err) => {
                        debug!(
                            "event=completion_revert module=service status=skipped reason={}",
                            err
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        release(&mut tickets, key);
        restored
    }
}

fn release(tickets: &mut Tickets, key: &ActivityKey) {
    let finished = match tickets.by_key.get_mut(key) {
        Some(entry) => {
            entry.pending = entry.pending.saturating_sub(1);
            entry.pending == 0
        }
        None => false,
    };
    if finished {
        tickets.by_key.remove(key);
    }
}
