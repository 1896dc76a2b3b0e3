//! Grouping dimensions and composite group keys.

use crate::record::MergedRecord;
use chrono::Datelike;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A column a dataset can be partitioned by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Campaign,
    Channel,
    Location,
    Segment,
    /// Derived from the row date (`monday` .. `sunday`).
    DayOfWeek,
}

impl Dimension {
    pub const ALL: &'static [Dimension] = &[
        Dimension::Campaign,
        Dimension::Channel,
        Dimension::Location,
        Dimension::Segment,
        Dimension::DayOfWeek,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Campaign => "campaign",
            Dimension::Channel => "channel",
            Dimension::Location => "location",
            Dimension::Segment => "segment",
            Dimension::DayOfWeek => "day_of_week",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_ascii_lowercase();
        let needle = match needle.as_str() {
            "campaign_id" => "campaign",
            "weekday" | "day" => "day_of_week",
            other => other,
        };
        Self::ALL.iter().copied().find(|d| d.as_str() == needle)
    }

    /// The value this dimension takes on a row.
    pub fn value_of(self, record: &MergedRecord) -> Option<String> {
        match self {
            Dimension::Campaign => record.campaign_id.clone(),
            Dimension::Channel => record.channel.clone(),
            Dimension::Location => record.location.clone(),
            Dimension::Segment => record.segment.clone(),
            Dimension::DayOfWeek => Some(weekday_name(record.date.weekday()).to_string()),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn weekday_name(day: chrono::Weekday) -> &'static str {
    match day {
        chrono::Weekday::Mon => "monday",
        chrono::Weekday::Tue => "tuesday",
        chrono::Weekday::Wed => "wednesday",
        chrono::Weekday::Thu => "thursday",
        chrono::Weekday::Fri => "friday",
        chrono::Weekday::Sat => "saturday",
        chrono::Weekday::Sun => "sunday",
    }
}

/// One `dimension=value` component of a group key. A `None` value means
/// the rows in the group lack that dimension.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct KeyPart {
    pub dimension: Dimension,
    pub value: Option<String>,
}

/// Identity of a KPI group. The empty key is the overall (ungrouped) group.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct GroupKey {
    pub parts: Vec<KeyPart>,
}

impl GroupKey {
    pub fn overall() -> Self {
        Self::default()
    }

    pub fn single(dimension: Dimension, value: impl Into<String>) -> Self {
        Self {
            parts: vec![KeyPart {
                dimension,
                value: Some(value.into()),
            }],
        }
    }

    /// Key of `record` under the given dimensions, in the given order.
    pub fn from_record(dimensions: &[Dimension], record: &MergedRecord) -> Self {
        Self {
            parts: dimensions
                .iter()
                .map(|d| KeyPart {
                    dimension: *d,
                    value: d.value_of(record),
                })
                .collect(),
        }
    }

    pub fn is_overall(&self) -> bool {
        self.parts.is_empty()
    }

    /// The channel name when this key is exactly one channel.
    pub fn single_channel(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [KeyPart {
                dimension: Dimension::Channel,
                value: Some(v),
            }] => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn dimensions(&self) -> Vec<Dimension> {
        self.parts.iter().map(|p| p.dimension).collect()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parts.is_empty() {
            return f.write_str("overall");
        }
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            match &part.value {
                Some(v) => write!(f, "{}={}", part.dimension, v)?,
                None => write!(f, "{}=(none)", part.dimension)?,
            }
        }
        Ok(())
    }
}
