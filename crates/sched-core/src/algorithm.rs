//! Spaced repetition review scheduling (SM-2).

use crate::models::{Quality, ReviewState};
use chrono::{DateTime, Duration, Utc};

/// SM-2 scheduler (SuperMemo/Anki classic).
///
/// Pure state transition: [`Sm2::next_review`] takes the previous
/// [`ReviewState`] plus one [`Quality`] rating and returns the new state.
/// Nothing is mutated and no clock is read; "now" comes in as an argument.
#[derive(Debug, Clone)]
pub struct Sm2 {
    /// Ease factor for brand-new items.
    pub initial_ease: f64,
    /// Floor the ease factor can never drop below.
    pub min_ease: f64,
    /// Global multiplier on growth intervals; 1.0 is stock SM-2.
    pub interval_modifier: f64,
    /// Pin due instants to this UTC hour so reviews don't flap across
    /// timezone boundaries or land late at night. None keeps the raw
    /// review-time-plus-interval instant.
    pub due_hour: Option<u32>,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            min_ease: 1.3,
            interval_modifier: 1.0,
            due_hour: Some(4),
        }
    }
}

impl Sm2 {
    /// Initial state for a newly reviewable item: due immediately.
    pub fn initial_state(&self, now: DateTime<Utc>) -> ReviewState {
        ReviewState {
            ease_factor: self.initial_ease,
            ..ReviewState::new(now)
        }
    }

    /// Compute the state after rating one recall attempt.
    ///
    /// Quality below 3 is a failure: repetitions reset and the item comes
    /// back in one day. Quality 3 and up passes: the interval steps through
    /// 1 day, then 6, then grows by the ease factor. The ease factor is
    /// adjusted on every call, pass or fail, and clamped at `min_ease`.
    pub fn next_review(
        &self,
        state: &ReviewState,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> ReviewState {
        let shortfall = 5.0 - quality.value() as f64;
        let mut ease = state.ease_factor + (0.1 - shortfall * (0.08 + shortfall * 0.02));
        if ease < self.min_ease {
            ease = self.min_ease;
        }

        let (interval, repetitions) = if quality.is_pass() {
            let interval = match state.repetitions {
                0 => 1,
                1 => 6,
                _ => ((state.interval as f64 * ease * self.interval_modifier).round() as i64)
                    .max(1),
            };
            (interval, state.repetitions + 1)
        } else {
            (1, 0)
        };

        ReviewState {
            interval,
            ease_factor: ease,
            repetitions,
            last_reviewed_at: Some(now),
            next_due_at: self.normalize_due(now + Duration::days(interval)),
        }
    }

    fn normalize_due(&self, due: DateTime<Utc>) -> DateTime<Utc> {
        match self.due_hour {
            Some(hour) => due
                .date_naive()
                .and_hms_opt(hour, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or(due),
            None => due,
        }
    }
}
