//! Domain model for the weekly routine projection.
//!
//! # Responsibility
//! - Define the canonical records shared by cache, cursor and projection.
//! - Keep a loaded week in a closed seven-day shape.
//!
//! # Invariants
//! - Days are addressed by `Weekday`, never by free-form strings.
//! - A loaded week always carries all seven days.

pub mod activity;
pub mod routine;
pub mod weekday;
