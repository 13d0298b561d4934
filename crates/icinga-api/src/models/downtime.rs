use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled downtime, as returned by `/v1/objects/downtimes`.
///
/// Timestamps are Unix seconds with a fractional part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Downtime {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub host_name: String,
    /// Empty for host downtimes.
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: f64,
    #[serde(default)]
    pub entry_time: f64,
    /// Only meaningful for flexible (non-fixed) downtimes.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub fixed: bool,
}

impl Downtime {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.start_time)
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.end_time)
    }

    pub fn is_service_downtime(&self) -> bool {
        !self.service_name.is_empty()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn timestamp(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
