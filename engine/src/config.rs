//! Configuration for the analysis pipeline.
//!
//! Provides a strongly-typed configuration with sensible defaults. Hosts
//! deserialize it from their own settings source.

use crate::error::EngineError;
use crate::solvency::MINIMUM_RESERVE_RATIO;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Most calendar years a filled timeline may span.
pub const MAX_TIMELINE_YEARS: i64 = 500;

/// Engine configuration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Share of the total property worth the reserve must hold to count as
    /// healthy.
    #[serde(default = "default_minimum_reserve_ratio")]
    pub minimum_reserve_ratio: f64,

    /// Keep tasks already inspected as done in grouped views.
    #[serde(default)]
    pub show_done_tasks: bool,

    /// Inclusive year range the timeline always covers, empty years included.
    /// Read from `[2024, 2054]` or `"2024-2054"`.
    #[serde(default, deserialize_with = "year_range")]
    pub fill_timeline_range: Option<(i32, i32)>,
}

impl EngineConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidConfiguration` for a negative or
    /// non-finite reserve ratio, or a year range that is reversed or spans
    /// more than [`MAX_TIMELINE_YEARS`].
    pub fn validate(&self) -> Result<&Self, EngineError> {
        if !self.minimum_reserve_ratio.is_finite() || self.minimum_reserve_ratio < 0.0 {
            return Err(EngineError::InvalidConfiguration {
                key: "minimum_reserve_ratio".to_string(),
                value: self.minimum_reserve_ratio.to_string(),
            });
        }

        if let Some((first, last)) = self.fill_timeline_range {
            if first > last || i64::from(last) - i64::from(first) >= MAX_TIMELINE_YEARS {
                return Err(EngineError::InvalidConfiguration {
                    key: "fill_timeline_range".to_string(),
                    value: format!("{first}-{last}"),
                });
            }
        }

        Ok(self)
    }

    /// Returns a builder for creating configuration.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minimum_reserve_ratio: default_minimum_reserve_ratio(),
            show_done_tasks: false,
            fill_timeline_range: None,
        }
    }
}

/// Builder for constructing `EngineConfig`.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    minimum_reserve_ratio: Option<f64>,
    show_done_tasks: Option<bool>,
    fill_timeline_range: Option<(i32, i32)>,
}

impl EngineConfigBuilder {
    /// Sets the minimum reserve ratio.
    #[must_use]
    pub const fn minimum_reserve_ratio(mut self, ratio: f64) -> Self {
        self.minimum_reserve_ratio = Some(ratio);
        self
    }

    /// Sets whether done tasks stay visible.
    #[must_use]
    pub const fn show_done_tasks(mut self, show: bool) -> Self {
        self.show_done_tasks = Some(show);
        self
    }

    /// Sets the year range the timeline always covers.
    #[must_use]
    pub const fn fill_timeline_range(mut self, first: i32, last: i32) -> Self {
        self.fill_timeline_range = Some((first, last));
        self
    }

    /// Builds the configuration, validating all values.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidConfiguration` if validation fails.
    pub fn build(self) -> Result<EngineConfig, EngineError> {
        let mut config = EngineConfig::default();

        if let Some(v) = self.minimum_reserve_ratio {
            config.minimum_reserve_ratio = v;
        }
        if let Some(v) = self.show_done_tasks {
            config.show_done_tasks = v;
        }
        if self.fill_timeline_range.is_some() {
            config.fill_timeline_range = self.fill_timeline_range;
        }

        config.validate()?;
        Ok(config)
    }
}

fn default_minimum_reserve_ratio() -> f64 {
    MINIMUM_RESERVE_RATIO
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawYearRange {
    Pair(i32, i32),
    Text(String),
}

fn year_range<'de, D>(deserializer: D) -> Result<Option<(i32, i32)>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawYearRange>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawYearRange::Pair(first, last)) => Ok(Some((first, last))),
        Some(RawYearRange::Text(text)) => parse_year_range(&text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid year range '{text}'"))),
    }
}

/// Parses `"2024-2054"` into `(2024, 2054)`.
fn parse_year_range(text: &str) -> Option<(i32, i32)> {
    let (first, last) = text.split_once('-')?;
    Some((first.trim().parse().ok()?, last.trim().parse().ok()?))
}
