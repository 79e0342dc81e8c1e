//! Data models for the scheduling core.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique review item identifier.
pub type ReviewItemId = Uuid;
/// Unique task identifier.
pub type TaskId = Uuid;
/// Unique project identifier.
pub type ProjectId = Uuid;

/// Interval (in days) past which an item counts as mature.
pub const MATURE_INTERVAL_DAYS: i64 = 21;

/// Errors from calling a scheduler with invalid input.
///
/// These are caller contract violations, rejected at the boundary. The pure
/// functions themselves have no failure modes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("quality rating {0} outside 0..=5")]
    InvalidQuality(u8),
    #[error("task {0} is not recurring")]
    NotRecurring(TaskId),
    #[error("task {0} is already completed")]
    AlreadyCompleted(TaskId),
    #[error("recurring task {0} has no recurrence rule")]
    MissingRule(TaskId),
}

/// Ordinal rating of one recall attempt, 0 (total failure) to 5 (perfect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Complete blackout.
    Blackout,
    /// Incorrect, answer not recognized.
    Incorrect,
    /// Incorrect, but the answer felt familiar.
    Familiar,
    /// Correct, with serious difficulty.
    Difficult,
    /// Correct after some hesitation.
    Good,
    /// Perfect recall.
    Perfect,
}

impl Quality {
    /// Numeric value on the 0-5 scale.
    pub fn value(&self) -> u8 {
        match self {
            Quality::Blackout => 0,
            Quality::Incorrect => 1,
            Quality::Familiar => 2,
            Quality::Difficult => 3,
            Quality::Good => 4,
            Quality::Perfect => 5,
        }
    }

    /// Quality 3 is the pass/fail boundary; 3 counts as a pass.
    pub fn is_pass(&self) -> bool {
        self.value() >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = ScheduleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Quality::Blackout),
            1 => Ok(Quality::Incorrect),
            2 => Ok(Quality::Familiar),
            3 => Ok(Quality::Difficult),
            4 => Ok(Quality::Good),
            5 => Ok(Quality::Perfect),
            other => Err(ScheduleError::InvalidQuality(other)),
        }
    }
}

/// Coarse four-level rating used by the review UI.
///
/// Mapped onto the 0-5 [`Quality`] scale here, at the boundary; the
/// scheduler itself only ever sees `Quality`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Complete failure, see again soon.
    Again,
    /// Difficult recall.
    Hard,
    /// Normal recall.
    Good,
    /// Effortless recall.
    Easy,
}

impl Rating {
    /// Map to the ordinal quality scale: again->1, hard->2, good->4, easy->5.
    pub fn quality(&self) -> Quality {
        match self {
            Rating::Again => Quality::Incorrect,
            Rating::Hard => Quality::Familiar,
            Rating::Good => Quality::Good,
            Rating::Easy => Quality::Perfect,
        }
    }

    /// Get display name.
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

/// Scheduling state of one reviewable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Days until the next review. Never negative.
    pub interval: i64,
    /// Growth multiplier, floored at 1.3.
    pub ease_factor: f64,
    /// Consecutive successful reviews; reset to 0 on failure.
    pub repetitions: u32,
    /// When the item was last rated. None before the first review.
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// When the item next comes due.
    pub next_due_at: DateTime<Utc>,
}

impl ReviewState {
    /// Initial state for a newly reviewable item: due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            interval: 0,
            ease_factor: 2.5,
            repetitions: 0,
            last_reviewed_at: None,
            next_due_at: now,
        }
    }

    /// Check if due for review.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due_at <= now
    }

    /// Items with long intervals count as learned for stats purposes.
    pub fn is_mature(&self) -> bool {
        self.interval > MATURE_INTERVAL_DAYS
    }
}

/// What kind of content a review item tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// A front/back flashcard.
    Card,
    /// A completed lesson resurfacing for recall.
    Lesson,
}

/// A reviewable item: a flashcard or a lesson-progress record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: ReviewItemId,
    pub kind: ReviewKind,
    /// Card front, or lesson title.
    pub front: String,
    /// Card back. None for lessons.
    pub back: Option<String>,
    /// Owning lesson, when the item tracks lesson progress.
    pub lesson_id: Option<Uuid>,
    pub state: ReviewState,
    pub created_at: DateTime<Utc>,
}

impl ReviewItem {
    /// Create a new flashcard, due immediately.
    pub fn new_card(
        front: impl Into<String>,
        back: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ReviewKind::Card,
            front: front.into(),
            back: Some(back.into()),
            lesson_id: None,
            state: ReviewState::new(now),
            created_at: now,
        }
    }

    /// Create a lesson-progress item, due immediately.
    pub fn new_lesson(title: impl Into<String>, lesson_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ReviewKind::Lesson,
            front: title.into(),
            back: None,
            lesson_id: Some(lesson_id),
            state: ReviewState::new(now),
            created_at: now,
        }
    }
}

/// How often a recurring task repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Parse a stored frequency string.
    ///
    /// Older application versions stored free-text values here, so anything
    /// unrecognized falls back to `Daily` instead of failing hard.
    pub fn parse(s: &str) -> Frequency {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            other => {
                tracing::warn!(frequency = other, "unknown recurrence frequency, using daily");
                Frequency::Daily
            }
        }
    }

    /// Get display name.
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

/// Recurrence rule: pure value, no mutable state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// The date the current occurrence is anchored on. Successor rules
    /// carry the successor's due date here.
    pub anchor: NaiveDate,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency, anchor: NaiveDate) -> Self {
        Self { frequency, anchor }
    }
}

/// GTD-style task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Captured, not yet processed.
    #[default]
    Inbox,
    /// Ready to act on.
    Next,
    /// Blocked on someone or something else.
    Waiting,
    /// Completed. Terminal.
    Done,
    /// Deferred indefinitely.
    Someday,
    /// Stale someday item moved out of the active lists.
    Archived,
}

impl TaskStatus {
    /// Get display name.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Inbox => "Inbox",
            TaskStatus::Next => "Next",
            TaskStatus::Waiting => "Waiting",
            TaskStatus::Done => "Done",
            TaskStatus::Someday => "Someday",
            TaskStatus::Archived => "Archived",
        }
    }
}

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Get display name.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

/// How much energy a task demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

/// A task, possibly recurring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTask {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub energy_level: Option<EnergyLevel>,
    pub estimated_mins: Option<u32>,
    pub project_id: Option<ProjectId>,
    /// Whether completing this instance should spawn a successor. Cleared
    /// on completion so an instance can never spawn twice.
    pub is_recurring: bool,
    pub rule: Option<RecurrenceRule>,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringTask {
    /// Create a one-off inbox task.
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            status: TaskStatus::default(),
            energy_level: None,
            estimated_mins: None,
            project_id: None,
            is_recurring: false,
            rule: None,
            due_date: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Make the task recur, anchored on its due date (or creation day).
    pub fn with_recurrence(mut self, frequency: Frequency) -> Self {
        let anchor = self
            .due_date
            .unwrap_or_else(|| self.created_at.date_naive());
        self.is_recurring = true;
        self.rule = Some(RecurrenceRule::new(frequency, anchor));
        self
    }

    /// Set the due date.
    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Check whether completing this task should spawn a successor.
    pub fn can_recur(&self) -> bool {
        self.is_recurring && self.status != TaskStatus::Done
    }
}

/// Anything with a scheduled due instant.
pub trait Schedulable {
    /// When the item next comes due. None means never.
    fn next_due_at(&self) -> Option<DateTime<Utc>>;
}

impl Schedulable for ReviewItem {
    fn next_due_at(&self) -> Option<DateTime<Utc>> {
        Some(self.state.next_due_at)
    }
}

impl Schedulable for RecurringTask {
    fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.due_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// Review collection statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewStats {
    /// Items due now.
    pub due: usize,
    /// All items.
    pub total: usize,
    /// Items with interval past the maturity threshold.
    pub mature: usize,
}

impl ReviewStats {
    /// Percentage of items that are mature, 0-100.
    pub fn mastery_score(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.mature as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}
