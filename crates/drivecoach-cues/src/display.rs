//! Projection of the live registry into what a user interface should show.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::cue::{CueName, CueRegistry};

/// A cue as handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayCue {
    /// Which cue.
    #[serde(rename = "cue")]
    pub name: CueName,
    /// Smoothed severity in `[0, 1]`.
    pub level: f64,
    /// Clock time at which the projection was taken.
    #[serde(rename = "t_emit")]
    pub emitted_at: f64,
}

/// Picks the top cues by severity.
///
/// Ties on level are broken by [`CueName`] declaration order so the output
/// is reproducible.
#[derive(Debug, Clone, Copy)]
pub struct DisplayCueSelector {
    max_cues: usize,
}

impl DisplayCueSelector {
    /// Create a selector that surfaces at most `max_cues` entries.
    #[must_use]
    pub fn new(max_cues: usize) -> Self {
        Self { max_cues }
    }

    /// Live cues at `now`, most severe first, truncated to the limit.
    ///
    /// Expired entries are skipped whether or not they have been pruned.
    #[must_use]
    pub fn select(&self, registry: &CueRegistry, now: f64) -> Vec<DisplayCue> {
        let mut cues: Vec<DisplayCue> = registry
            .iter_active(now)
            .map(|cue| DisplayCue {
                name: cue.name,
                level: cue.level,
                emitted_at: now,
            })
            .collect();
        cues.sort_by(by_severity);
        cues.truncate(self.max_cues);
        cues
    }
}

fn by_severity(a: &DisplayCue, b: &DisplayCue) -> Ordering {
    b.level.total_cmp(&a.level).then_with(|| a.name.cmp(&b.name))
}
