//! Wheel segment layout
//!
//! Turns the roster into the ordered list of wedges painted on the wheel.
//! Weighting is expressed by duplication: a participant with draw weight 2
//! gets two wedges carrying the same number. The layout is shuffled, then a
//! single best-effort pass tries to keep equal numbers from sitting side by
//! side. Nothing downstream may rely on that pass having succeeded.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    is_eligible, Blacklist, DrawNumber, Participant, SegmentColor, WheelSegment, WonNumbers,
};
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy)]
struct RawSegment {
    value: DrawNumber,
    is_blacklisted: bool,
}

/// Builds wheel layouts with a fixed color palette
#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    palette: Vec<SegmentColor>,
}

impl SegmentBuilder {
    pub fn new(palette: Vec<SegmentColor>) -> Self {
        let palette = if palette.is_empty() {
            SegmentColor::default_palette()
        } else {
            palette
        };
        Self { palette }
    }

    pub fn palette(&self) -> &[SegmentColor] {
        &self.palette
    }

    /// Build a fresh layout. Every participant that has not won yet appears,
    /// blacklisted ones included (flagged, never drawn).
    ///
    /// An empty result means there is nothing to paint; the renderer shows a
    /// placeholder instead of dividing the circle by zero.
    pub fn build(
        &self,
        participants: &[Participant],
        blacklist: &Blacklist,
        won: &WonNumbers,
        rng: &mut dyn RandomSource,
    ) -> Vec<WheelSegment> {
        let mut raw: Vec<RawSegment> = Vec::new();

        for participant in participants {
            if won.contains(participant.number) {
                continue;
            }
            let segment = RawSegment {
                value: participant.number,
                is_blacklisted: blacklist.contains(participant.number),
            };
            for _ in 0..participant.draw_weight() {
                raw.push(segment);
            }
        }

        shuffle(&mut raw, rng);
        let collisions = spread_duplicates(&mut raw);

        debug!(
            segments = raw.len(),
            residual_collisions = collisions,
            "Built wheel layout"
        );

        raw.into_iter()
            .enumerate()
            .map(|(index, seg)| {
                let color = &self.palette[index % self.palette.len()];
                WheelSegment {
                    text: seg.value.to_string(),
                    value: seg.value,
                    is_blacklisted: seg.is_blacklisted,
                    color: color.fill.clone(),
                    text_color: color.text.clone(),
                }
            })
            .collect()
    }
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self::new(SegmentColor::default_palette())
    }
}

/// Convenience wrapper using the default palette
pub fn build_segments(
    participants: &[Participant],
    blacklist: &Blacklist,
    won: &WonNumbers,
    rng: &mut dyn RandomSource,
) -> Vec<WheelSegment> {
    SegmentBuilder::default().build(participants, blacklist, won, rng)
}

/// Unbiased in-place Fisher-Yates
fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// One forward pass over every boundary (wrapping). When a wedge and its
/// successor share a value, look ahead from two past the successor for a
/// different value and swap it in. Returns the number of boundaries that
/// still carry equal values afterwards.
fn spread_duplicates(raw: &mut [RawSegment]) -> usize {
    let len = raw.len();
    if len > 2 {
        for i in 0..len {
            let next = (i + 1) % len;
            let current = raw[i].value;
            if current != raw[next].value {
                continue;
            }
            for k in 2..len - 1 {
                let candidate = (next + k) % len;
                if raw[candidate].value != current {
                    raw.swap(next, candidate);
                    break;
                }
            }
        }
    }
    adjacent_collisions_by(raw, |s| s.value)
}

fn adjacent_collisions_by<T>(items: &[T], value: impl Fn(&T) -> DrawNumber) -> usize {
    let len = items.len();
    if len < 2 {
        return 0;
    }
    (0..len)
        .filter(|&i| value(&items[i]) == value(&items[(i + 1) % len]))
        .count()
}

/// Boundaries (including the wrap-around one) where neighbours share a value
pub fn adjacent_collisions(segments: &[WheelSegment]) -> usize {
    adjacent_collisions_by(segments, |s| s.value)
}

/// Indices of every wedge carrying `value`
pub fn target_indices(segments: &[WheelSegment], value: DrawNumber) -> Vec<usize> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, s)| s.value == value)
        .map(|(i, _)| i)
        .collect()
}

/// Pick one of the wedges carrying `value`, uniformly
pub fn pick_target_index(
    segments: &[WheelSegment],
    value: DrawNumber,
    rng: &mut dyn RandomSource,
) -> Option<usize> {
    let indices = target_indices(segments, value);
    if indices.is_empty() {
        return None;
    }
    Some(indices[rng.index(indices.len())])
}

/// Wedge count per value
pub fn segment_counts(segments: &[WheelSegment]) -> BTreeMap<DrawNumber, usize> {
    let mut counts = BTreeMap::new();
    for segment in segments {
        *counts.entry(segment.value).or_insert(0) += 1;
    }
    counts
}

/// Wedges that can actually be drawn. A senior staff member counts twice.
pub fn drawable_segments(segments: &[WheelSegment]) -> usize {
    segments.iter().filter(|s| !s.is_blacklisted).count()
}

/// Expected wedge count for a roster, used by invariant checks
pub fn expected_segment_count(participants: &[Participant], won: &WonNumbers) -> usize {
    participants
        .iter()
        .filter(|p| !won.contains(p.number))
        .map(Participant::draw_weight)
        .sum()
}

/// Expected drawable count, i.e. the weighted pool size
pub fn expected_pool_size(participants: &[Participant], blacklist: &Blacklist, won: &WonNumbers) -> usize {
    participants
        .iter()
        .filter(|p| is_eligible(p, blacklist, won))
        .map(Participant::draw_weight)
        .sum()
}
