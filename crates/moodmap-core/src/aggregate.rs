//! Per-group emotion aggregation.
//!
//! A cluster's colour is its dominant emotion. Tallies and the winner are
//! built together in one pass over the group in input order. After each
//! observation is counted, its category replaces the running best if it
//! now has:
//!
//! 1. strictly more observations, or
//! 2. as many observations and a strictly higher summed intensity.
//!
//! Anything else keeps the incumbent. A category that pulls ahead and is
//! later caught on both count and intensity therefore stays dominant.

use moodmap_types::{EmotionCategory, EmotionTally, Observation};

/// The winning category of a group and its tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominantEmotion {
    /// The winning category.
    pub emotion: EmotionCategory,
    /// How many observations reported it.
    pub count: u32,
    /// Sum of their intensities.
    pub total_intensity: u32,
}

impl From<EmotionTally> for DominantEmotion {
    fn from(tally: EmotionTally) -> Self {
        Self {
            emotion: tally.emotion,
            count: tally.count,
            total_intensity: tally.total_intensity,
        }
    }
}

/// Everything the cluster builder needs from one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionSummary {
    /// Winner under the running count-then-intensity rule.
    pub dominant: DominantEmotion,
    /// Mean intensity over every observation, rounded half-up.
    pub average_intensity: u8,
    /// Per-category tallies in first-seen order.
    pub breakdown: Vec<EmotionTally>,
}

/// Whether `candidate` displaces `incumbent` as the running best.
fn beats(candidate: EmotionTally, incumbent: EmotionTally) -> bool {
    candidate.count > incumbent.count
        || (candidate.count == incumbent.count
            && candidate.total_intensity > incumbent.total_intensity)
}

/// One pass: per-category tallies in first-seen order, plus the running best.
fn accumulate(observations: &[Observation]) -> (Vec<EmotionTally>, Option<EmotionTally>) {
    let mut tallies: Vec<EmotionTally> = Vec::new();
    // Refreshed whenever the best category itself is counted, so it always
    // holds that category's current totals.
    let mut best: Option<EmotionTally> = None;

    for obs in observations {
        let intensity = u32::from(obs.intensity.get());
        let current = if let Some(entry) = tallies.iter_mut().find(|t| t.emotion == obs.emotion) {
            entry.count = entry.count.saturating_add(1);
            entry.total_intensity = entry.total_intensity.saturating_add(intensity);
            *entry
        } else {
            let entry = EmotionTally {
                emotion: obs.emotion,
                count: 1,
                total_intensity: intensity,
            };
            tallies.push(entry);
            entry
        };

        if best.is_none_or(|incumbent| beats(current, incumbent)) {
            best = Some(current);
        }
    }

    (tallies, best)
}

/// Count and sum intensities per category, in first-seen order.
pub fn tally(observations: &[Observation]) -> Vec<EmotionTally> {
    accumulate(observations).0
}

/// The dominant emotion of a group, or `None` for an empty group.
pub fn dominant(observations: &[Observation]) -> Option<DominantEmotion> {
    accumulate(observations).1.map(DominantEmotion::from)
}

/// Mean intensity rounded half-up, or `None` for an empty group.
pub fn average_intensity(observations: &[Observation]) -> Option<u8> {
    let n = u64::try_from(observations.len()).ok()?;
    if n == 0 {
        return None;
    }
    let sum: u64 = observations
        .iter()
        .map(|o| u64::from(o.intensity.get()))
        .fold(0, u64::saturating_add);
    // round(sum / n) == floor((2 * sum + n) / (2 * n))
    let numerator = sum.checked_mul(2)?.checked_add(n)?;
    let denominator = n.checked_mul(2)?;
    let mean = numerator.checked_div(denominator)?;
    Some(u8::try_from(mean).unwrap_or(u8::MAX))
}

/// Tally, pick the winner, and average in one call.
pub fn summarize(observations: &[Observation]) -> Option<EmotionSummary> {
    let (breakdown, best) = accumulate(observations);
    let dominant = DominantEmotion::from(best?);
    let average_intensity = average_intensity(observations)?;
    Some(EmotionSummary {
        dominant,
        average_intensity,
        breakdown,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use moodmap_types::{Intensity, UserId};

    use super::*;

    fn obs(emotion: EmotionCategory, intensity: u8) -> Observation {
        Observation {
            user_id: UserId::new(),
            emotion,
            intensity: Intensity::new(intensity).unwrap(),
            address: "서울".to_owned(),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_group_has_no_dominant() {
        assert!(dominant(&[]).is_none());
        assert!(average_intensity(&[]).is_none());
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn majority_wins() {
        let group = [
            obs(EmotionCategory::Joy, 5),
            obs(EmotionCategory::Joy, 3),
            obs(EmotionCategory::Sadness, 9),
        ];
        let d = dominant(&group).unwrap();
        assert_eq!(d.emotion, EmotionCategory::Joy);
        assert_eq!(d.count, 2);
        assert_eq!(d.total_intensity, 8);
    }

    #[test]
    fn count_tie_broken_by_intensity() {
        let group = [obs(EmotionCategory::Joy, 1), obs(EmotionCategory::Sadness, 10)];
        assert_eq!(dominant(&group).unwrap().emotion, EmotionCategory::Sadness);

        let reversed = [obs(EmotionCategory::Sadness, 10), obs(EmotionCategory::Joy, 1)];
        assert_eq!(dominant(&reversed).unwrap().emotion, EmotionCategory::Sadness);
    }

    #[test]
    fn full_tie_keeps_first_seen() {
        let group = [obs(EmotionCategory::Anger, 4), obs(EmotionCategory::Calm, 4)];
        assert_eq!(dominant(&group).unwrap().emotion, EmotionCategory::Anger);

        let reversed = [obs(EmotionCategory::Calm, 4), obs(EmotionCategory::Anger, 4)];
        assert_eq!(dominant(&reversed).unwrap().emotion, EmotionCategory::Calm);
    }

    #[test]
    fn category_that_pulled_ahead_keeps_a_later_full_tie() {
        let group = [
            obs(EmotionCategory::Anger, 5),
            obs(EmotionCategory::Joy, 5),
            obs(EmotionCategory::Joy, 5),
            obs(EmotionCategory::Anger, 5),
        ];
        let d = dominant(&group).unwrap();
        assert_eq!(d.emotion, EmotionCategory::Joy);
        assert_eq!(d.count, 2);
        assert_eq!(d.total_intensity, 10);

        let interleaved = [
            obs(EmotionCategory::Fear, 2),
            obs(EmotionCategory::Joy, 2),
            obs(EmotionCategory::Joy, 2),
            obs(EmotionCategory::Fear, 2),
        ];
        assert_eq!(dominant(&interleaved).unwrap().emotion, EmotionCategory::Joy);
    }

    #[test]
    fn lead_changes_hands_as_tallies_grow() {
        let group = [
            obs(EmotionCategory::Joy, 3),
            obs(EmotionCategory::Sadness, 9),
            obs(EmotionCategory::Joy, 3),
            obs(EmotionCategory::Sadness, 1),
        ];
        let d = dominant(&group).unwrap();
        assert_eq!(d.emotion, EmotionCategory::Sadness);
        assert_eq!(d.total_intensity, 10);
    }

    #[test]
    fn incumbent_is_compared_at_its_current_totals() {
        // Joy reaches (2, 10) before Calm catches up to (2, 10).
        let group = [
            obs(EmotionCategory::Joy, 5),
            obs(EmotionCategory::Joy, 5),
            obs(EmotionCategory::Calm, 9),
            obs(EmotionCategory::Calm, 1),
        ];
        assert_eq!(dominant(&group).unwrap().emotion, EmotionCategory::Joy);
    }

    #[test]
    fn summary_agrees_with_dominant() {
        let group = [
            obs(EmotionCategory::Anger, 5),
            obs(EmotionCategory::Joy, 5),
            obs(EmotionCategory::Joy, 5),
            obs(EmotionCategory::Anger, 5),
        ];
        let summary = summarize(&group).unwrap();
        assert_eq!(Some(summary.dominant), dominant(&group));
        assert_eq!(summary.breakdown.first().unwrap().emotion, EmotionCategory::Anger);
    }

    #[test]
    fn tally_preserves_first_seen_order() {
        let group = [
            obs(EmotionCategory::Surprise, 1),
            obs(EmotionCategory::Joy, 2),
            obs(EmotionCategory::Surprise, 3),
        ];
        let t = tally(&group);
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].emotion, EmotionCategory::Surprise);
        assert_eq!(t[0].count, 2);
        assert_eq!(t[0].total_intensity, 4);
        assert_eq!(t[1].emotion, EmotionCategory::Joy);
    }

    #[test]
    fn average_rounds_half_up() {
        // 17 / 3 = 5.67
        let a = [
            obs(EmotionCategory::Joy, 5),
            obs(EmotionCategory::Joy, 3),
            obs(EmotionCategory::Sadness, 9),
        ];
        assert_eq!(average_intensity(&a), Some(6));
        // 3 / 2 = 1.5
        let b = [obs(EmotionCategory::Joy, 1), obs(EmotionCategory::Joy, 2)];
        assert_eq!(average_intensity(&b), Some(2));
        // 5 / 4 = 1.25
        let c = [
            obs(EmotionCategory::Joy, 1),
            obs(EmotionCategory::Joy, 1),
            obs(EmotionCategory::Joy, 1),
            obs(EmotionCategory::Joy, 2),
        ];
        assert_eq!(average_intensity(&c), Some(1));
    }

    #[test]
    fn average_covers_every_category() {
        let group = [obs(EmotionCategory::Joy, 10), obs(EmotionCategory::Anger, 2)];
        let summary = summarize(&group).unwrap();
        assert_eq!(summary.dominant.emotion, EmotionCategory::Joy);
        assert_eq!(summary.average_intensity, 6);
        assert_eq!(summary.breakdown.len(), 2);
    }
}
