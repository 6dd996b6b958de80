//! Host-supplied rendering configuration.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::drag::DragOptions;
use crate::error::{Result, TimelineError};
use crate::geometry::{ClampPolicy, Scale};
use crate::model::Window;

/// Settings that shape layout and dragging but are not part of the data.
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Anchor day for week ticks and `day_of_week`.
    #[serde(with = "weekday_name")]
    pub week_start: Weekday,
    pub scale: Scale,
    pub clamp: ClampPolicy,
    /// Snap drag previews to whole days.
    pub snap: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            scale: Scale::default(),
            clamp: ClampPolicy::Unclamped,
            snap: true,
        }
    }
}

impl TimelineConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidConfig` for malformed JSON or invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TimelineConfig =
            serde_json::from_str(json).map_err(|e| TimelineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `TimelineError::InvalidConfig` when `px_per_day` is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<()> {
        self.scale.validate()
    }

    /// Drag parameters matching this config's scale and clamp policy over `window`.
    pub fn drag_options(&self, window: &Window) -> DragOptions {
        let options = DragOptions::new(self.scale.px_per_day(window)).with_snap(self.snap);
        match self.clamp {
            ClampPolicy::Clamped => options.clamped_to(*window),
            ClampPolicy::Unclamped => options,
        }
    }
}

/// (De)serialize a weekday as its lower-case English name ("sunday").
/// Deserialization also accepts chrono's abbreviations ("Mon").
mod weekday_name {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        let name = match day {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        };
        serializer.serialize_str(name)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        crate::date::parse_week_start(&raw).map_err(serde::de::Error::custom)
    }
}
