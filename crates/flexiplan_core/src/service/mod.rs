//! Routine use-case services.
//!
//! # Responsibility
//! - Orchestrate cache, cursor and remote calls into UI-level operations.
//! - Keep UI/FFI layers decoupled from wire and transport details.
//!
//! # Invariants
//! - Every failure is converted to `RoutineError` at this boundary.
//! - Owned state (cache, cursor, off-day switch) is consistent after any
//!   failure.

pub mod analytics;
pub mod completion;
pub mod error;
pub mod regeneration;
pub mod session;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
