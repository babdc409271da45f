//! Enumeration types for the Moodmap emotional weather map.
//!
//! Every closed vocabulary in the system lives here: the ten emotion
//! categories a user can broadcast, the three address granularities the
//! map can cluster at, and the reasons a cluster recomputation can fire.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Emotion categories
// ---------------------------------------------------------------------------

/// The emotion a user reports, rendered on the map as a weather condition.
///
/// The discriminant order is the stable numeric code used by older
/// clients (`0..=9`). Never reorder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EmotionCategory {
    /// Happiness, delight.
    Joy,
    /// Anticipation, a fluttering heart.
    Excitement,
    /// Peace, contentment.
    Calm,
    /// Thankfulness toward someone or something.
    Gratitude,
    /// Being caught off guard.
    Surprise,
    /// Sorrow, feeling down.
    Sadness,
    /// Isolation, missing someone.
    Loneliness,
    /// Unease about what comes next.
    Anxiety,
    /// Fright, dread.
    Fear,
    /// Irritation, rage.
    Anger,
}

/// Presentation attributes for one emotion category.
struct EmotionStyle {
    label_ko: &'static str,
    label_en: &'static str,
    weather_icon: &'static str,
    color_hex: &'static str,
}

impl EmotionCategory {
    /// All categories in code order.
    pub const ALL: [Self; 10] = [
        Self::Joy,
        Self::Excitement,
        Self::Calm,
        Self::Gratitude,
        Self::Surprise,
        Self::Sadness,
        Self::Loneliness,
        Self::Anxiety,
        Self::Fear,
        Self::Anger,
    ];

    /// Stable numeric code (`0..=9`).
    pub const fn code(self) -> u8 {
        match self {
            Self::Joy => 0,
            Self::Excitement => 1,
            Self::Calm => 2,
            Self::Gratitude => 3,
            Self::Surprise => 4,
            Self::Sadness => 5,
            Self::Loneliness => 6,
            Self::Anxiety => 7,
            Self::Fear => 8,
            Self::Anger => 9,
        }
    }

    const fn style(self) -> EmotionStyle {
        match self {
            Self::Joy => EmotionStyle {
                label_ko: "기쁨",
                label_en: "joy",
                weather_icon: "sunny",
                color_hex: "#FFC93C",
            },
            Self::Excitement => EmotionStyle {
                label_ko: "설렘",
                label_en: "excitement",
                weather_icon: "rainbow",
                color_hex: "#FF8FAB",
            },
            Self::Calm => EmotionStyle {
                label_ko: "평온",
                label_en: "calm",
                weather_icon: "partly_cloudy",
                color_hex: "#8FD6B4",
            },
            Self::Gratitude => EmotionStyle {
                label_ko: "감사",
                label_en: "gratitude",
                weather_icon: "sunrise",
                color_hex: "#F9A03F",
            },
            Self::Surprise => EmotionStyle {
                label_ko: "놀람",
                label_en: "surprise",
                weather_icon: "lightning",
                color_hex: "#B388EB",
            },
            Self::Sadness => EmotionStyle {
                label_ko: "슬픔",
                label_en: "sadness",
                weather_icon: "rain",
                color_hex: "#5B8DEF",
            },
            Self::Loneliness => EmotionStyle {
                label_ko: "외로움",
                label_en: "loneliness",
                weather_icon: "snow",
                color_hex: "#A0B4C8",
            },
            Self::Anxiety => EmotionStyle {
                label_ko: "불안",
                label_en: "anxiety",
                weather_icon: "wind",
                color_hex: "#9AA5B1",
            },
            Self::Fear => EmotionStyle {
                label_ko: "두려움",
                label_en: "fear",
                weather_icon: "fog",
                color_hex: "#6C5B7B",
            },
            Self::Anger => EmotionStyle {
                label_ko: "분노",
                label_en: "anger",
                weather_icon: "thunderstorm",
                color_hex: "#E63946",
            },
        }
    }

    /// Korean display label.
    pub const fn label_ko(self) -> &'static str {
        self.style().label_ko
    }

    /// English display label (same as the serialized name).
    pub const fn label_en(self) -> &'static str {
        self.style().label_en
    }

    /// Weather icon name the frontend maps to an asset.
    pub const fn weather_icon(self) -> &'static str {
        self.style().weather_icon
    }

    /// Pin colour as `#RRGGBB`.
    pub const fn color_hex(self) -> &'static str {
        self.style().color_hex
    }
}

impl core::fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label_en())
    }
}

/// A numeric emotion code outside `0..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion code: {0}")]
pub struct EmotionCodeError(pub u8);

impl TryFrom<u8> for EmotionCategory {
    type Error = EmotionCodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.code() == code)
            .ok_or(EmotionCodeError(code))
    }
}

// ---------------------------------------------------------------------------
// Granularity
// ---------------------------------------------------------------------------

/// Address-hierarchy depth that clusters are grouped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Granularity {
    /// Top-level administrative region (시/도). Level 1.
    Region,
    /// District within a region (시/군/구). Level 2.
    District,
    /// Neighbourhood within a district (읍/면/동). Level 3.
    Neighborhood,
}

impl Granularity {
    /// Numeric level: 1, 2, or 3.
    pub const fn level(self) -> u8 {
        match self {
            Self::Region => 1,
            Self::District => 2,
            Self::Neighborhood => 3,
        }
    }

    /// Number of address levels that participate in the cluster key.
    pub const fn depth(self) -> usize {
        match self {
            Self::Region => 1,
            Self::District => 2,
            Self::Neighborhood => 3,
        }
    }
}

impl core::fmt::Display for Granularity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Region => f.write_str("region"),
            Self::District => f.write_str("district"),
            Self::Neighborhood => f.write_str("neighborhood"),
        }
    }
}

/// A granularity level outside `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("granularity level must be 1, 2, or 3 (got {0})")]
pub struct GranularityLevelError(pub u8);

impl TryFrom<u8> for Granularity {
    type Error = GranularityLevelError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Region),
            2 => Ok(Self::District),
            3 => Ok(Self::Neighborhood),
            other => Err(GranularityLevelError(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Recompute triggers
// ---------------------------------------------------------------------------

/// The transition that caused a cluster recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RecomputeTrigger {
    /// A fresh snapshot replaced the whole working set.
    Replace,
    /// One live observation was appended.
    Append,
    /// The zoom level crossed a granularity threshold.
    Regranularity,
}
