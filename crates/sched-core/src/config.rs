//! Configuration for the scheduling core.

use crate::algorithm::Sm2;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub algorithm: AlgorithmConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sched-core")
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn db_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sched-core")
            .map(|d| d.data_dir().join("schedule.db"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    #[serde(default = "default_initial_ease")]
    pub initial_ease: f64,
    #[serde(default = "default_min_ease")]
    pub min_ease: f64,
    #[serde(default = "default_interval_modifier")]
    pub interval_modifier: f64,
    /// UTC hour due instants are pinned to; absent disables normalization.
    #[serde(default = "default_due_hour")]
    pub due_hour: Option<u32>,
}

fn default_initial_ease() -> f64 { 2.5 }
fn default_min_ease() -> f64 { 1.3 }
fn default_interval_modifier() -> f64 { 1.0 }
fn default_due_hour() -> Option<u32> { Some(4) }

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            min_ease: 1.3,
            interval_modifier: 1.0,
            due_hour: Some(4),
        }
    }
}

impl AlgorithmConfig {
    pub fn to_sm2(&self) -> Sm2 {
        Sm2 {
            initial_ease: self.initial_ease,
            min_ease: self.min_ease,
            interval_modifier: self.interval_modifier,
            due_hour: self.due_hour,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Flashcards per review session.
    #[serde(default = "default_review_limit")]
    pub review_limit: usize,
    /// Lesson reviews per session.
    #[serde(default = "default_lesson_limit")]
    pub lesson_review_limit: usize,
}

fn default_review_limit() -> usize { 20 }
fn default_lesson_limit() -> usize { 50 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            review_limit: 20,
            lesson_review_limit: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.algorithm.initial_ease, 2.5);
        assert_eq!(config.algorithm.due_hour, Some(4));
        assert_eq!(config.session.review_limit, 20);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [session]
            review_limit = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.session.review_limit, 5);
        assert_eq!(config.session.lesson_review_limit, 50);
        assert_eq!(config.algorithm.min_ease, 1.3);
    }

    #[test]
    fn test_to_sm2() {
        let config = AlgorithmConfig {
            interval_modifier: 0.8,
            due_hour: None,
            ..AlgorithmConfig::default()
        };
        let algo = config.to_sm2();
        assert_eq!(algo.interval_modifier, 0.8);
        assert_eq!(algo.due_hour, None);
    }
}
