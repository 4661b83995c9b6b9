/*!
 * Derived operations over cue lists: ordering, lookup of the cues active at a
 * playback position, and grouping of cues that share the same timing.
 */

use std::collections::HashMap;

use crate::subtitle_model::Cue;

/// Cues sharing one `(start, end)` pair, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueGroup<'a> {
    pub start_time: u64,
    pub end_time: u64,
    pub cues: Vec<&'a Cue>,
}

/// Stable in-place sort by start time; equal starts keep their relative order
pub fn sort_by_start_time(cues: &mut [Cue]) {
    cues.sort_by_key(|cue| cue.start_time);
}

/// Sorted copy, see [`sort_by_start_time`]
pub fn sorted_by_start_time(cues: &[Cue]) -> Vec<Cue> {
    let mut sorted = cues.to_vec();
    sort_by_start_time(&mut sorted);
    sorted
}

/// Cues where `start_time <= position_ms <= end_time`. Overlapping cues are
/// all returned, in document order.
pub fn active_cues(cues: &[Cue], position_ms: u64) -> Vec<&Cue> {
    cues.iter().filter(|cue| cue.is_active_at(position_ms)).collect()
}

/// Indices of the cues returned by [`active_cues`]
pub fn active_cue_indices(cues: &[Cue], position_ms: u64) -> Vec<usize> {
    cues.iter()
        .enumerate()
        .filter(|(_, cue)| cue.is_active_at(position_ms))
        .map(|(index, _)| index)
        .collect()
}

/// Group cues with identical timing, groups ordered by first appearance
pub fn group_by_time(cues: &[Cue]) -> Vec<CueGroup<'_>> {
    let mut groups: Vec<CueGroup<'_>> = Vec::new();
    let mut positions: HashMap<(u64, u64), usize> = HashMap::new();

    for cue in cues {
        let key = (cue.start_time, cue.end_time);
        match positions.get(&key) {
            Some(&position) => groups[position].cues.push(cue),
            None => {
                positions.insert(key, groups.len());
                groups.push(CueGroup {
                    start_time: cue.start_time,
                    end_time: cue.end_time,
                    cues: vec![cue],
                });
            }
        }
    }

    groups
}
