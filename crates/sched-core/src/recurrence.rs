//! Recurring task regeneration.
//!
//! Completing a recurring task never reschedules the completed record.
//! Instead the completed instance becomes terminal (`is_recurring` cleared)
//! and exactly one successor is materialized carrying the rule forward.

use crate::models::{Frequency, RecurrenceRule, RecurringTask, ScheduleError, TaskStatus};
use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use uuid::Uuid;

/// The pair produced by completing one occurrence.
#[derive(Debug, Clone)]
pub struct CompletedOccurrence {
    /// The original task, marked done and no longer recurring.
    pub completed: RecurringTask,
    /// The newly materialized next occurrence.
    pub successor: RecurringTask,
}

/// The next due date after `from` under `rule`.
///
/// Monthly recurrence is calendar arithmetic, not a fixed 30-day offset:
/// day-of-month overflow clamps to the last valid day of the target month
/// (Jan 31 -> Feb 29 in a leap year, Feb 28 otherwise).
pub fn next_occurrence(rule: &RecurrenceRule, from: NaiveDate) -> NaiveDate {
    match rule.frequency {
        Frequency::Daily => from + Duration::days(1),
        Frequency::Weekly => from + Duration::days(7),
        Frequency::Monthly => {
            // None only at the end of chrono's date range.
            from.checked_add_months(Months::new(1)).unwrap_or(from)
        }
    }
}

/// Complete one occurrence of a recurring task and materialize its
/// successor.
///
/// The successor copies the descriptive fields, keeps the rule, lands in
/// `Next` (ready to act on, not re-queued to the inbox), and is due at
/// [`next_occurrence`] from the task's current due date, or from the
/// completion day when no due date was set.
///
/// Preconditions are rejected with a descriptive error: the task must be
/// recurring, not yet completed, and carry a rule. Callers are responsible
/// for invoking this at most once per completion event; the store enforces
/// that with a conditional write.
pub fn complete_occurrence(
    task: &RecurringTask,
    now: DateTime<Utc>,
) -> Result<CompletedOccurrence, ScheduleError> {
    if !task.is_recurring {
        return Err(ScheduleError::NotRecurring(task.id));
    }
    if task.status == TaskStatus::Done {
        return Err(ScheduleError::AlreadyCompleted(task.id));
    }
    let rule = task.rule.ok_or(ScheduleError::MissingRule(task.id))?;

    let anchor = task.due_date.unwrap_or_else(|| now.date_naive());
    let next_due = next_occurrence(&rule, anchor);

    let completed = RecurringTask {
        status: TaskStatus::Done,
        is_recurring: false,
        completed_at: Some(now),
        updated_at: now,
        ..task.clone()
    };

    let successor = RecurringTask {
        id: Uuid::new_v4(),
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority,
        status: TaskStatus::Next,
        energy_level: task.energy_level,
        estimated_mins: task.estimated_mins,
        project_id: task.project_id,
        is_recurring: true,
        rule: Some(RecurrenceRule::new(rule.frequency, next_due)),
        due_date: Some(next_due),
        completed_at: None,
        created_at: now,
        updated_at: now,
    };

    Ok(CompletedOccurrence {
        completed,
        successor,
    })
}
