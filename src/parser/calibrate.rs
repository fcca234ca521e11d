//! Line-spacing calibration over the preloaded window.
//!
//! Calibration runs once per document before segmentation. It first trims
//! anomalously long blank runs (scan artifacts, page padding) so they do not
//! skew the estimate, then samples the middle of the window to infer how
//! many physical lines make up one logical line and whether paragraph ends
//! must be sensed from line lengths.

use std::collections::VecDeque;

use crate::model::{Line, LineSpacingProfile};

use super::classify::ends_with_independent_punctuation;

/// Blank runs longer than this are collapsed before sampling.
pub const MAX_BLANK_RUN: usize = 5;

/// Above this fraction of punctuation-terminated lines, every physical line
/// is taken to be a paragraph of its own.
pub const ENDING_PUNCTUATION_THRESHOLD: f64 = 0.85;

/// Below this normalized lines-per-line ratio, blank lines do not mark
/// paragraph ends and lengths must be sensed.
pub const PARAGRAPH_SENSING_THRESHOLD: f64 = 1.04;

/// Collapses long blank-line runs in a preloaded window.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankRunCollapser;

impl BlankRunCollapser {
    /// Create a new collapser.
    pub fn new() -> Self {
        Self
    }

    /// Collapse every run of more than [`MAX_BLANK_RUN`] blank lines.
    ///
    /// Each such run is truncated to the running average of physical lines
    /// per non-blank line seen so far (at least one line), deleting from the
    /// tail of the run. The first blank of the run counts as ordinary spacing
    /// in that average; the rest of the run does not. Runs before the first
    /// non-blank line and a run still open at the end of the window are left
    /// alone.
    ///
    /// Returns the number of lines removed.
    pub fn collapse(&self, lines: &mut VecDeque<Line>) -> usize {
        let mut removed = 0;
        let mut seen_total = 0usize;
        let mut seen_non_blank = 0usize;
        let mut run = 0usize;
        let mut i = 0;

        while i < lines.len() {
            if lines[i].is_blank() {
                run += 1;
                i += 1;
                continue;
            }

            if run > MAX_BLANK_RUN && seen_non_blank > 0 {
                let average = (seen_total + 1) as f64 / seen_non_blank as f64;
                let keep = (average.floor() as usize).max(1);
                if keep < run {
                    let excess = run - keep;
                    let run_end = i;
                    lines.drain(run_end - excess..run_end);
                    // Resume at the same non-blank line, now shifted left
                    i -= excess;
                    removed += excess;
                    run = keep;
                }
            }

            // Leading blanks say nothing about spacing
            seen_total += if seen_non_blank == 0 { 1 } else { run + 1 };
            seen_non_blank += 1;
            run = 0;
            i += 1;
        }

        if removed > 0 {
            log::debug!("Collapsed {} excess blank lines", removed);
        }
        removed
    }
}

/// Counts gathered from the sampling sub-window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStatistics {
    /// Lines in the sub-window, blanks included
    pub total: usize,
    /// Non-blank lines
    pub non_blank: usize,
    /// Non-blank lines ending in independent punctuation
    pub ending_punctuation: usize,
}

/// Infers a [`LineSpacingProfile`] from a window of lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineStatisticsSampler;

impl LineStatisticsSampler {
    /// Create a new sampler.
    pub fn new() -> Self {
        Self
    }

    /// Count lines in the sampling sub-window.
    ///
    /// The first quarter of the window is skipped and the next two thirds
    /// of the window length are sampled, which keeps front matter and a
    /// possibly truncated tail out of the estimate.
    pub fn sample<'a, I>(&self, lines: I) -> LineStatistics
    where
        I: IntoIterator<Item = &'a Line>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = lines.into_iter();
        let len = iter.len();
        let skip = len / 4;
        let take = len * 2 / 3;

        let mut stats = LineStatistics::default();
        for line in iter.skip(skip).take(take) {
            stats.total += 1;
            if !line.is_blank() {
                stats.non_blank += 1;
                if ends_with_independent_punctuation(&line.text) {
                    stats.ending_punctuation += 1;
                }
            }
        }
        stats
    }

    /// Derive the spacing profile from sampled counts.
    pub fn profile(&self, stats: &LineStatistics) -> LineSpacingProfile {
        if stats.non_blank == 0 {
            return LineSpacingProfile::SINGLE;
        }

        let non_blank = stats.non_blank as f64;
        let ending_fraction = stats.ending_punctuation as f64 / non_blank;

        let line_spacing = if ending_fraction > ENDING_PUNCTUATION_THRESHOLD {
            1
        } else {
            // Truncate: a fractional excess is not another spacing line
            (stats.total / stats.non_blank).max(1)
        };

        let normalized = (stats.total - stats.non_blank * (line_spacing - 1)) as f64 / non_blank;
        let paragraph_sensing = normalized < PARAGRAPH_SENSING_THRESHOLD;

        log::debug!(
            "Calibrated from {} lines ({} non-blank, {:.2} punctuated): spacing {}, normalized {:.3}, sensing {}",
            stats.total,
            stats.non_blank,
            ending_fraction,
            line_spacing,
            normalized,
            paragraph_sensing
        );

        LineSpacingProfile::new(line_spacing, paragraph_sensing)
    }

    /// Sample a window and derive its profile.
    pub fn calibrate<'a, I>(&self, lines: I) -> LineSpacingProfile
    where
        I: IntoIterator<Item = &'a Line>,
        I::IntoIter: ExactSizeIterator,
    {
        self.profile(&self.sample(lines))
    }
}
