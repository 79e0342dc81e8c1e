//! SQLite store and scheduling orchestration.
//!
//! The schedulers themselves are pure; this module owns the
//! read-compute-write cycle around them. Every mutable row carries a
//! `version` counter and updates are conditional on the version read, so a
//! concurrent writer makes the write fail cleanly and the whole cycle
//! retries instead of overwriting. That conditional write is also what
//! guarantees a completed recurring task spawns exactly one successor.

use crate::algorithm::Sm2;
use crate::clock::Clock;
use crate::models::{
    EnergyLevel, Frequency, Priority, Quality, Rating, RecurrenceRule, RecurringTask, ReviewItem,
    ReviewItemId, ReviewKind, ReviewState, ReviewStats, ScheduleError, TaskId, TaskStatus,
    MATURE_INTERVAL_DAYS,
};
use crate::recurrence::{complete_occurrence, CompletedOccurrence};
use chrono::{DateTime, Months, NaiveDate, Utc};
use rusqlite::{params, Connection, Result as SqlResult};
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Attempts at a read-compute-write cycle before giving up.
const MAX_RETRIES: u32 = 3;

/// Someday tasks untouched this long get archived.
const STALE_SOMEDAY_MONTHS: u32 = 6;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Concurrent modification: {0}")]
    Conflict(String),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type DbResult<T> = Result<T, DbError>;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> DbResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS review_items (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                front TEXT NOT NULL,
                back TEXT,
                lesson_id TEXT,
                interval INTEGER NOT NULL,
                ease_factor REAL NOT NULL,
                repetitions INTEGER NOT NULL,
                last_reviewed_at TEXT,
                next_due_at TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                priority TEXT NOT NULL,
                status TEXT NOT NULL,
                energy_level TEXT,
                estimated_mins INTEGER,
                project_id TEXT,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                frequency TEXT,
                anchor TEXT,
                due_date TEXT,
                completed_at TEXT,
                version INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_review_due ON review_items(next_due_at);
            CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
            CREATE INDEX IF NOT EXISTS idx_tasks_due ON tasks(due_date);
            "#,
        )?;
        Ok(())
    }

    // Review item operations

    pub fn insert_review_item(&self, item: &ReviewItem) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO review_items
                (id, kind, front, back, lesson_id, interval, ease_factor, repetitions,
                 last_reviewed_at, next_due_at, version, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11)",
            params![
                item.id.to_string(),
                kind_str(item.kind),
                item.front,
                item.back,
                item.lesson_id.map(|id| id.to_string()),
                item.state.interval,
                item.state.ease_factor,
                item.state.repetitions,
                item.state.last_reviewed_at.map(|t| t.to_rfc3339()),
                item.state.next_due_at.to_rfc3339(),
                item.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_review_item(&self, id: ReviewItemId) -> DbResult<Option<ReviewItem>> {
        Ok(self.load_review_versioned(id)?.map(|(item, _)| item))
    }

    pub fn delete_review_item(&self, id: ReviewItemId) -> DbResult<()> {
        self.conn
            .execute("DELETE FROM review_items WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    /// The review queue: items due at `now`, oldest overdue first, capped.
    pub fn due_reviews(&self, now: DateTime<Utc>, limit: usize) -> DbResult<Vec<ReviewItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM review_items WHERE next_due_at <= ?1
             ORDER BY next_due_at ASC LIMIT ?2",
        )?;
        let items = stmt
            .query_map(params![now.to_rfc3339(), limit as i64], |row| {
                Ok(parse_review_row(row)?.0)
            })?
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(items)
    }

    pub fn review_stats(&self, now: DateTime<Utc>) -> DbResult<ReviewStats> {
        let mut stmt = self.conn.prepare(
            "SELECT
                COUNT(*) AS total,
                SUM(CASE WHEN next_due_at <= ?1 THEN 1 ELSE 0 END) AS due,
                SUM(CASE WHEN interval > ?2 THEN 1 ELSE 0 END) AS mature
             FROM review_items",
        )?;
        let stats = stmt.query_row(
            params![now.to_rfc3339(), MATURE_INTERVAL_DAYS],
            |row| {
                Ok(ReviewStats {
                    total: row.get::<_, i64>(0)? as usize,
                    due: row.get::<_, Option<i64>>(1)?.unwrap_or(0) as usize,
                    mature: row.get::<_, Option<i64>>(2)?.unwrap_or(0) as usize,
                })
            },
        )?;
        Ok(stats)
    }

    /// Rate one recall attempt and persist the rescheduled state.
    ///
    /// Load, pure compute, conditional write; a version mismatch retries the
    /// whole cycle instead of overwriting. Returns the updated item.
    pub fn record_review(
        &self,
        id: ReviewItemId,
        quality: Quality,
        algo: &Sm2,
        clock: &dyn Clock,
    ) -> DbResult<ReviewItem> {
        for attempt in 0..MAX_RETRIES {
            let (mut item, version) = self
                .load_review_versioned(id)?
                .ok_or_else(|| DbError::NotFound(format!("review item {id}")))?;

            item.state = algo.next_review(&item.state, quality, clock.now());

            if self.try_write_review_state(id, &item.state, version)? {
                return Ok(item);
            }
            debug!(item = %id, attempt, "review state changed concurrently, retrying");
        }
        Err(DbError::Conflict(format!(
            "review item {id} kept changing concurrently"
        )))
    }

    /// [`Database::record_review`] for the coarse four-level UI rating.
    pub fn record_rating(
        &self,
        id: ReviewItemId,
        rating: Rating,
        algo: &Sm2,
        clock: &dyn Clock,
    ) -> DbResult<ReviewItem> {
        self.record_review(id, rating.quality(), algo, clock)
    }

    fn load_review_versioned(
        &self,
        id: ReviewItemId,
    ) -> DbResult<Option<(ReviewItem, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM review_items WHERE id = ?1")?;
        let row = stmt.query_row(params![id.to_string()], |row| Ok(parse_review_row(row)?));

        match row {
            Ok(pair) => Ok(Some(pair)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn try_write_review_state(
        &self,
        id: ReviewItemId,
        state: &ReviewState,
        expected_version: i64,
    ) -> DbResult<bool> {
        let changed = self.conn.execute(
            "UPDATE review_items SET
                interval = ?2, ease_factor = ?3, repetitions = ?4,
                last_reviewed_at = ?5, next_due_at = ?6, version = version + 1
             WHERE id = ?1 AND version = ?7",
            params![
                id.to_string(),
                state.interval,
                state.ease_factor,
                state.repetitions,
                state.last_reviewed_at.map(|t| t.to_rfc3339()),
                state.next_due_at.to_rfc3339(),
                expected_version,
            ],
        )?;
        Ok(changed == 1)
    }

    // Task operations

    pub fn insert_task(&self, task: &RecurringTask) -> DbResult<()> {
        insert_task_inner(&self.conn, task)?;
        Ok(())
    }

    pub fn get_task(&self, id: TaskId) -> DbResult<Option<RecurringTask>> {
        Ok(self.load_task_versioned(id)?.map(|(task, _)| task))
    }

    pub fn delete_task(&self, id: TaskId) -> DbResult<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    pub fn list_tasks(&self, status: TaskStatus) -> DbResult<Vec<RecurringTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM tasks WHERE status = ?1 ORDER BY created_at DESC",
        )?;
        let tasks = stmt
            .query_map(params![status_str(status)], |row| {
                Ok(parse_task_row(row)?.0)
            })?
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Open tasks due on or before `today`, oldest due date first.
    pub fn due_tasks(&self, today: NaiveDate, limit: usize) -> DbResult<Vec<RecurringTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM tasks
             WHERE due_date IS NOT NULL AND due_date <= ?1
               AND status NOT IN ('done', 'archived')
             ORDER BY due_date ASC LIMIT ?2",
        )?;
        let tasks = stmt
            .query_map(params![today.to_string(), limit as i64], |row| {
                Ok(parse_task_row(row)?.0)
            })?
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Complete one occurrence of a recurring task and persist both sides.
    ///
    /// The original flips to done/non-recurring and the successor is
    /// inserted in the same transaction, conditional on the version read, so
    /// two racing completions cannot both spawn a successor: the loser's
    /// reload sees a completed task and gets the precondition error.
    pub fn complete_task(&self, id: TaskId, clock: &dyn Clock) -> DbResult<CompletedOccurrence> {
        for attempt in 0..MAX_RETRIES {
            let (task, version) = self
                .load_task_versioned(id)?
                .ok_or_else(|| DbError::NotFound(format!("task {id}")))?;

            let pair = complete_occurrence(&task, clock.now())?;

            let tx = self.conn.unchecked_transaction()?;
            let changed = tx.execute(
                "UPDATE tasks SET
                    status = 'done', is_recurring = 0, completed_at = ?2,
                    updated_at = ?2, version = version + 1
                 WHERE id = ?1 AND version = ?3",
                params![
                    id.to_string(),
                    pair.completed.updated_at.to_rfc3339(),
                    version,
                ],
            )?;
            if changed == 1 {
                insert_task_inner(&tx, &pair.successor)?;
                tx.commit()?;
                return Ok(pair);
            }
            drop(tx);
            debug!(task = %id, attempt, "task changed concurrently, retrying completion");
        }
        Err(DbError::Conflict(format!(
            "task {id} kept changing concurrently"
        )))
    }

    /// Move Someday tasks untouched for six months to Archived.
    ///
    /// Returns how many tasks were archived.
    pub fn archive_stale_someday(&self, now: DateTime<Utc>) -> DbResult<usize> {
        let cutoff = now
            .checked_sub_months(Months::new(STALE_SOMEDAY_MONTHS))
            .unwrap_or(now);
        let changed = self.conn.execute(
            "UPDATE tasks SET status = 'archived', updated_at = ?1, version = version + 1
             WHERE status = 'someday' AND updated_at < ?2",
            params![now.to_rfc3339(), cutoff.to_rfc3339()],
        )?;
        Ok(changed)
    }

    fn load_task_versioned(&self, id: TaskId) -> DbResult<Option<(RecurringTask, i64)>> {
        let mut stmt = self.conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;
        let row = stmt.query_row(params![id.to_string()], |row| Ok(parse_task_row(row)?));

        match row {
            Ok(pair) => Ok(Some(pair)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn insert_task_inner(conn: &Connection, task: &RecurringTask) -> SqlResult<()> {
    conn.execute(
        "INSERT INTO tasks
            (id, title, description, priority, status, energy_level, estimated_mins,
             project_id, is_recurring, frequency, anchor, due_date, completed_at,
             version, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 0, ?14, ?15)",
        params![
            task.id.to_string(),
            task.title,
            task.description,
            priority_str(task.priority),
            status_str(task.status),
            task.energy_level.map(energy_str),
            task.estimated_mins,
            task.project_id.map(|id| id.to_string()),
            task.is_recurring,
            task.rule.map(|r| frequency_str(r.frequency)),
            task.rule.map(|r| r.anchor.to_string()),
            task.due_date.map(|d| d.to_string()),
            task.completed_at.map(|t| t.to_rfc3339()),
            task.created_at.to_rfc3339(),
            task.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn kind_str(kind: ReviewKind) -> &'static str {
    match kind {
        ReviewKind::Card => "card",
        ReviewKind::Lesson => "lesson",
    }
}

fn status_str(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Inbox => "inbox",
        TaskStatus::Next => "next",
        TaskStatus::Waiting => "waiting",
        TaskStatus::Done => "done",
        TaskStatus::Someday => "someday",
        TaskStatus::Archived => "archived",
    }
}

fn priority_str(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
        Priority::Urgent => "urgent",
    }
}

fn energy_str(energy: EnergyLevel) -> &'static str {
    match energy {
        EnergyLevel::Low => "low",
        EnergyLevel::Medium => "medium",
        EnergyLevel::High => "high",
    }
}

fn frequency_str(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Daily => "daily",
        Frequency::Weekly => "weekly",
        Frequency::Monthly => "monthly",
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_review_row(row: &rusqlite::Row) -> SqlResult<(ReviewItem, i64)> {
    let id_str: String = row.get("id")?;
    let kind_str: String = row.get("kind")?;
    let lesson_str: Option<String> = row.get("lesson_id")?;
    let last_str: Option<String> = row.get("last_reviewed_at")?;
    let due_str: String = row.get("next_due_at")?;
    let created_str: String = row.get("created_at")?;
    let version: i64 = row.get("version")?;

    let kind = match kind_str.as_str() {
        "lesson" => ReviewKind::Lesson,
        _ => ReviewKind::Card,
    };

    let item = ReviewItem {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        kind,
        front: row.get("front")?,
        back: row.get("back")?,
        lesson_id: lesson_str.and_then(|s| Uuid::parse_str(&s).ok()),
        state: ReviewState {
            interval: row.get("interval")?,
            ease_factor: row.get("ease_factor")?,
            repetitions: row.get("repetitions")?,
            last_reviewed_at: last_str.map(|s| parse_datetime(&s)),
            next_due_at: parse_datetime(&due_str),
        },
        created_at: parse_datetime(&created_str),
    };
    Ok((item, version))
}

fn parse_task_row(row: &rusqlite::Row) -> SqlResult<(RecurringTask, i64)> {
    let id_str: String = row.get("id")?;
    let priority_str: String = row.get("priority")?;
    let status_str: String = row.get("status")?;
    let energy_str: Option<String> = row.get("energy_level")?;
    let project_str: Option<String> = row.get("project_id")?;
    let frequency_str: Option<String> = row.get("frequency")?;
    let anchor_str: Option<String> = row.get("anchor")?;
    let due_str: Option<String> = row.get("due_date")?;
    let completed_str: Option<String> = row.get("completed_at")?;
    let created_str: String = row.get("created_at")?;
    let updated_str: String = row.get("updated_at")?;
    let version: i64 = row.get("version")?;

    let priority = match priority_str.as_str() {
        "low" => Priority::Low,
        "high" => Priority::High,
        "urgent" => Priority::Urgent,
        _ => Priority::Medium,
    };
    let status = match status_str.as_str() {
        "next" => TaskStatus::Next,
        "waiting" => TaskStatus::Waiting,
        "done" => TaskStatus::Done,
        "someday" => TaskStatus::Someday,
        "archived" => TaskStatus::Archived,
        _ => TaskStatus::Inbox,
    };
    let energy_level = energy_str.map(|s| match s.as_str() {
        "low" => EnergyLevel::Low,
        "high" => EnergyLevel::High,
        _ => EnergyLevel::Medium,
    });

    let created_at = parse_datetime(&created_str);
    let due_date = due_str.and_then(|s| s.parse::<NaiveDate>().ok());
    let rule = frequency_str.map(|f| {
        let anchor = anchor_str
            .and_then(|s| s.parse::<NaiveDate>().ok())
            .or(due_date)
            .unwrap_or_else(|| created_at.date_naive());
        RecurrenceRule::new(Frequency::parse(&f), anchor)
    });

    let task = RecurringTask {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        title: row.get("title")?,
        description: row.get("description")?,
        priority,
        status,
        energy_level,
        estimated_mins: row.get("estimated_mins")?,
        project_id: project_str.and_then(|s| Uuid::parse_str(&s).ok()),
        is_recurring: row.get("is_recurring")?,
        rule,
        due_date,
        completed_at: completed_str.map(|s| parse_datetime(&s)),
        created_at,
        updated_at: parse_datetime(&updated_str),
    };
    Ok((task, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::Quality;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_review_item_roundtrip() {
        let db = Database::in_memory().unwrap();
        let item = ReviewItem::new_card("What is ACID?", "Atomicity...", t0());
        db.insert_review_item(&item).unwrap();

        let loaded = db.get_review_item(item.id).unwrap().unwrap();
        assert_eq!(loaded.front, "What is ACID?");
        assert_eq!(loaded.state, item.state);
    }

    #[test]
    fn test_record_review_persists_new_state() {
        let db = Database::in_memory().unwrap();
        let clock = FixedClock::new(t0());
        let algo = Sm2::default();

        let item = ReviewItem::new_card("q", "a", t0());
        db.insert_review_item(&item).unwrap();

        let updated = db
            .record_review(item.id, Quality::Good, &algo, &clock)
            .unwrap();
        assert_eq!(updated.state.repetitions, 1);
        assert_eq!(updated.state.interval, 1);

        let reloaded = db.get_review_item(item.id).unwrap().unwrap();
        assert_eq!(reloaded.state, updated.state);
    }

    #[test]
    fn test_record_review_missing_item() {
        let db = Database::in_memory().unwrap();
        let clock = FixedClock::new(t0());
        let err = db
            .record_review(Uuid::new_v4(), Quality::Good, &Sm2::default(), &clock)
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn test_conditional_write_detects_stale_version() {
        let db = Database::in_memory().unwrap();
        let item = ReviewItem::new_card("q", "a", t0());
        db.insert_review_item(&item).unwrap();

        // A write conditioned on a version that was already consumed fails.
        assert!(db
            .try_write_review_state(item.id, &item.state, 0)
            .unwrap());
        assert!(!db
            .try_write_review_state(item.id, &item.state, 0)
            .unwrap());
        assert!(db
            .try_write_review_state(item.id, &item.state, 1)
            .unwrap());
    }

    #[test]
    fn test_due_reviews_order_and_limit() {
        let db = Database::in_memory().unwrap();
        for offset in [-3i64, -1, 1] {
            let mut item = ReviewItem::new_card("q", "a", t0());
            item.state.next_due_at = t0() + chrono::Duration::days(offset);
            db.insert_review_item(&item).unwrap();
        }

        let due = db.due_reviews(t0(), 10).unwrap();
        assert_eq!(due.len(), 2);
        assert!(due[0].state.next_due_at < due[1].state.next_due_at);

        let capped = db.due_reviews(t0(), 1).unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(
            capped[0].state.next_due_at,
            t0() - chrono::Duration::days(3)
        );
    }

    #[test]
    fn test_review_stats() {
        let db = Database::in_memory().unwrap();

        let mut mature = ReviewItem::new_card("q", "a", t0());
        mature.state.interval = 30;
        mature.state.next_due_at = t0() + chrono::Duration::days(10);
        db.insert_review_item(&mature).unwrap();

        let due = ReviewItem::new_card("q2", "a2", t0());
        db.insert_review_item(&due).unwrap();

        let stats = db.review_stats(t0()).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.due, 1);
        assert_eq!(stats.mature, 1);
        assert_eq!(stats.mastery_score(), 50);
    }

    #[test]
    fn test_complete_task_spawns_exactly_one_successor() {
        let db = Database::in_memory().unwrap();
        let clock = FixedClock::new(t0());

        let task = RecurringTask::new("Water plants", t0())
            .with_due_date(date(2024, 5, 1))
            .with_recurrence(Frequency::Daily);
        db.insert_task(&task).unwrap();

        let pair = db.complete_task(task.id, &clock).unwrap();
        assert_eq!(pair.successor.due_date, Some(date(2024, 5, 2)));

        let original = db.get_task(task.id).unwrap().unwrap();
        assert_eq!(original.status, TaskStatus::Done);
        assert!(!original.is_recurring);

        let stored = db.get_task(pair.successor.id).unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Next);
        assert!(stored.is_recurring);

        // Second completion of the same instance is a precondition error,
        // not a second successor.
        let err = db.complete_task(task.id, &clock).unwrap_err();
        assert!(matches!(
            err,
            DbError::Schedule(ScheduleError::NotRecurring(_))
        ));
        assert_eq!(db.list_tasks(TaskStatus::Next).unwrap().len(), 1);
    }

    #[test]
    fn test_complete_non_recurring_task_rejected() {
        let db = Database::in_memory().unwrap();
        let clock = FixedClock::new(t0());
        let task = RecurringTask::new("One-off", t0());
        db.insert_task(&task).unwrap();

        let err = db.complete_task(task.id, &clock).unwrap_err();
        assert!(matches!(
            err,
            DbError::Schedule(ScheduleError::NotRecurring(_))
        ));
    }

    #[test]
    fn test_due_tasks_excludes_done() {
        let db = Database::in_memory().unwrap();

        let open = RecurringTask::new("Open", t0())
            .with_due_date(date(2024, 4, 28))
            .with_status(TaskStatus::Next);
        let done = RecurringTask::new("Done", t0())
            .with_due_date(date(2024, 4, 20))
            .with_status(TaskStatus::Done);
        let future = RecurringTask::new("Future", t0()).with_due_date(date(2024, 6, 1));
        db.insert_task(&open).unwrap();
        db.insert_task(&done).unwrap();
        db.insert_task(&future).unwrap();

        let due = db.due_tasks(date(2024, 5, 1), 10).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "Open");
    }

    #[test]
    fn test_archive_stale_someday() {
        let db = Database::in_memory().unwrap();

        let stale = RecurringTask::new("Old idea", t0() - chrono::Duration::days(365))
            .with_status(TaskStatus::Someday);
        let fresh = RecurringTask::new("New idea", t0()).with_status(TaskStatus::Someday);
        db.insert_task(&stale).unwrap();
        db.insert_task(&fresh).unwrap();

        let archived = db.archive_stale_someday(t0()).unwrap();
        assert_eq!(archived, 1);
        assert_eq!(
            db.get_task(stale.id).unwrap().unwrap().status,
            TaskStatus::Archived
        );
        assert_eq!(
            db.get_task(fresh.id).unwrap().unwrap().status,
            TaskStatus::Someday
        );
    }

    #[test]
    fn test_task_rule_roundtrip_with_legacy_frequency() {
        let db = Database::in_memory().unwrap();
        let task = RecurringTask::new("Report", t0())
            .with_due_date(date(2024, 5, 31))
            .with_recurrence(Frequency::Monthly);
        db.insert_task(&task).unwrap();

        // Simulate a legacy free-text frequency left by an older version.
        db.conn
            .execute(
                "UPDATE tasks SET frequency = 'FORTNIGHTLY' WHERE id = ?1",
                params![task.id.to_string()],
            )
            .unwrap();

        let loaded = db.get_task(task.id).unwrap().unwrap();
        // Unknown frequency falls back to daily instead of failing.
        assert_eq!(loaded.rule.unwrap().frequency, Frequency::Daily);
    }
}
