//! In-memory weekly routine cache.
//!
//! # Responsibility
//! - Hold the single session copy of the current week.
//! - Distinguish "never loaded" from "loaded but empty".
//! - Offer whole-week replacement and single-flag completion writes.
//!
//! # Invariants
//! - `replace` swaps the full week; no API merges days or fields.
//! - `set_completed` only touches the `completed` flag of matching records.
//! - `revision` increases on every successful mutation.
//! - `generation` increases only on `replace`; writes prepared against an
//!   older generation must not be applied.
//! - Multi-threaded callers go through `SharedRoutineCache`; a lock is never
//!   held across a network await.

use crate::model::activity::{ActivityKey, ActivityRecord};
use crate::model::routine::WeeklyRoutine;
use crate::model::weekday::Weekday;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type CacheResult<T> = Result<T, CacheError>;

/// Local cache lookup/mutation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No routine has been loaded in this session yet.
    Unloaded,
    /// The addressed activity is not part of the cached week.
    RecordNotFound(ActivityKey),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unloaded => write!(f, "no routine loaded"),
            Self::RecordNotFound(key) => write!(
                f,
                "activity not found: day={} type={}",
                key.day,
                key.kind.as_str()
            ),
        }
    }
}

impl Error for CacheError {}

/// Session cache for the current week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyRoutineCache {
    routine: Option<WeeklyRoutine>,
    revision: u64,
    generation: u64,
}

impl WeeklyRoutineCache {
    /// Creates an absent cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a routine has been loaded at least once.
    pub fn is_loaded(&self) -> bool {
        self.routine.is_some()
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of whole-week replacements so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Atomically substitutes the whole week.
    pub fn replace(&mut self, routine: WeeklyRoutine) {
        self.routine = Some(routine);
        self.revision += 1;
        self.generation += 1;
    }

    /// Activities of `day`; empty for a loaded day without activities.
    pub fn get(&self, day: Weekday) -> CacheResult<&[ActivityRecord]> {
        self.routine
            .as_ref()
            .map(|routine| routine.day(day))
            .ok_or(CacheError::Unloaded)
    }

    /// Full cached week.
    pub fn routine(&self) -> CacheResult<&WeeklyRoutine> {
        self.routine.as_ref().ok_or(CacheError::Unloaded)
    }

    /// Current completion flag of the record addressed by `key`.
    pub fn completed(&self, key: &ActivityKey) -> CacheResult<bool> {
        self.routine()?
            .find(key)
            .map(|record| record.completed)
            .ok_or_else(|| CacheError::RecordNotFound(key.clone()))
    }

    /// Writes `value` into every record addressed by `key`.
    ///
    /// The server stores one completion per `(day, name, type)`, so duplicated
    /// entries of one activity are kept in step. Returns the number of records
    /// written.
    pub fn set_completed(&mut self, key: &ActivityKey, value: bool) -> CacheResult<usize> {
        let routine = self.routine.as_mut().ok_or(CacheError::Unloaded)?;
        let mut written = 0;
        for record in routine.matching_mut(key) {
            record.completed = value;
            written += 1;
        }
        if written == 0 {
            return Err(CacheError::RecordNotFound(key.clone()));
        }
        self.revision += 1;
        Ok(written)
    }
}

/// Cloneable handle guarding one cache behind a mutex.
#[derive(Debug, Clone, Default)]
pub struct SharedRoutineCache {
    inner: Arc<Mutex<WeeklyRoutineCache>>,
}

impl SharedRoutineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with shared access; the lock is released before returning.
    pub fn read<T>(&self, f: impl FnOnce(&WeeklyRoutineCache) -> T) -> T {
        f(&self.lock())
    }

    /// Runs `f` with exclusive access; the lock is released before returning.
    pub fn write<T>(&self, f: impl FnOnce(&mut WeeklyRoutineCache) -> T) -> T {
        f(&mut self.lock())
    }

    /// Copy of the current cache state.
    pub fn snapshot(&self) -> WeeklyRoutineCache {
        self.read(|cache| cache.clone())
    }

    fn lock(&self) -> MutexGuard<'_, WeeklyRoutineCache> {
        // Mutations are single assignments; a poisoned guard still holds a whole week.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheError, SharedRoutineCache, WeeklyRoutineCache};
    use crate::model::activity::{ActivityKey, ActivityRecord, ActivityType};
    use crate::model::routine::WeeklyRoutine;
    use crate::model::weekday::Weekday;

    fn week_with_walk() -> WeeklyRoutine {
        WeeklyRoutine::from_days([(
            Weekday::Monday,
            vec![ActivityRecord::new("Walk", ActivityType::Hobby, "08:00", "08:30")],
        )])
    }

    #[test]
    fn absent_cache_is_distinct_from_empty_day() {
        let mut cache = WeeklyRoutineCache::new();
        assert_eq!(cache.get(Weekday::Sunday), Err(CacheError::Unloaded));

        cache.replace(week_with_walk());
        assert!(cache.get(Weekday::Sunday).expect("loaded").is_empty());
    }

    #[test]
    fn set_completed_flips_only_the_addressed_record() {
        let mut cache = WeeklyRoutineCache::new();
        cache.replace(week_with_walk());
        let before = cache.revision();

        let key = ActivityKey::new(Weekday::Monday, "Walk", ActivityType::Hobby);
        assert_eq!(cache.set_completed(&key, true).expect("record exists"), 1);
        assert_eq!(cache.completed(&key), Ok(true));
        assert!(cache.revision() > before);
    }

    #[test]
    fn only_replace_advances_generation() {
        let mut cache = WeeklyRoutineCache::new();
        assert_eq!(cache.generation(), 0);
        cache.replace(week_with_walk());
        assert_eq!(cache.generation(), 1);

        let key = ActivityKey::new(Weekday::Monday, "Walk", ActivityType::Hobby);
        cache.set_completed(&key, true).expect("record exists");
        assert_eq!(cache.generation(), 1);

        cache.replace(week_with_walk());
        assert_eq!(cache.generation(), 2);
    }

    #[test]
    fn set_completed_reports_missing_record_without_mutation() {
        let mut cache = WeeklyRoutineCache::new();
        cache.replace(week_with_walk());
        let before = cache.clone();

        let key = ActivityKey::new(Weekday::Monday, "Walk", ActivityType::Task);
        let err = cache
            .set_completed(&key, true)
            .expect_err("type mismatch must not match");
        assert_eq!(err, CacheError::RecordNotFound(key));
        assert_eq!(cache, before);
    }

    #[test]
    fn shared_cache_snapshot_is_detached() {
        let shared = SharedRoutineCache::new();
        shared.write(|cache| cache.replace(week_with_walk()));
        let snapshot = shared.snapshot();

        shared.write(|cache| cache.replace(WeeklyRoutine::empty()));
        assert_eq!(snapshot.get(Weekday::Monday).expect("loaded").len(), 1);
        assert!(shared.read(|cache| cache.get(Weekday::Monday).expect("loaded").is_empty()));
    }
}
