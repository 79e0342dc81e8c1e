//! Temporal scheduling core for a personal knowledge/task-management suite.
//!
//! Decides *when* recurring work resurfaces:
//! - SM-2 spaced-repetition scheduling for flashcards and lesson reviews
//! - Next-occurrence computation and successor spawning for recurring tasks
//! - Due-queue selection (oldest overdue first, session-capped)
//!
//! The schedulers are pure state-transition functions over a small record
//! plus an injected clock; the [`db::Database`] store wraps them in a
//! per-record versioned read-compute-write cycle so concurrent ratings or
//! completions retry instead of overwriting each other.

pub mod algorithm;
pub mod clock;
pub mod config;
pub mod db;
pub mod models;
pub mod queue;
pub mod recurrence;

// Re-exports
pub use algorithm::Sm2;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AlgorithmConfig, Config, SessionConfig};
pub use db::{Database, DbError, DbResult};
pub use models::{
    EnergyLevel, Frequency, Priority, Quality, Rating, RecurrenceRule, RecurringTask, ReviewItem,
    ReviewItemId, ReviewKind, ReviewState, ReviewStats, Schedulable, ScheduleError, TaskId,
    TaskStatus,
};
pub use queue::select_due;
pub use recurrence::{complete_occurrence, next_occurrence, CompletedOccurrence};
