//! Header and footer location over a segmented document.
//!
//! No single marker reliably ends an etext header, so one front-to-back scan
//! records several candidates and a fixed policy picks among them:
//!
//! 1. an explicit `*** START OF THE PROJECT GUTENBERG ...` line wins outright;
//! 2. otherwise the first bare `***` divider in the first half of the
//!    document, unless a donation appeal ("money" marker) lies more than
//!    [`DIVIDER_MONEY_GAP`] blocks away from it, in which case the appeal is
//!    used; without a divider the appeal is used on its own;
//! 3. otherwise the header ends just before a `Produced by` credit;
//! 4. otherwise the header is the whole document.
//!
//! The footer is found by scanning backward for the closing "End of the
//! Project Gutenberg ..." line.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::{contains_project, is_end_marker};
use crate::model::{Block, Boundary, Envelope};

/// Fewer remaining blocks than this, with no candidate seen, ends the scan.
pub const PROXIMITY_BLOCKS: usize = 4;

/// Largest accepted distance between the divider and the money marker.
pub const DIVIDER_MONEY_GAP: usize = 50;

static HEADER_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\W*\*{3}\s*start\s+of\s+(?:the|this)\s+project\s*gutenb[eu]rg").unwrap()
});

static DIVIDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\s*\*\s*\*$").unwrap());

static MONEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)we\s+need\s+your\s+donations|donations\s+are\s+tax[\s-]+deductible|send\s+(?:us\s+)?(?:a\s+)?donations?\b|\bask\s+for\s+donations").unwrap()
});

static START_OF_WORK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\W*(?:produced|prepared)\s+by\b").unwrap());

static SMALL_PRINT_START_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)legal\s+small\s+print|small\s+print!").unwrap());

static SMALL_PRINT_END_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\s*end\s*\*\s*the\s+small\s+print").unwrap());

/// Candidate positions found during the header scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderMarkers {
    /// Explicit header-end marker block
    pub explicit_end: Option<usize>,
    /// First bare divider paragraph
    pub divider: Option<usize>,
    /// First donation appeal
    pub money: Option<usize>,
    /// First production credit
    pub start_of_work: Option<usize>,
    /// First small-print opening
    pub small_print_start: Option<usize>,
    /// First small-print closing after its opening
    pub small_print_end: Option<usize>,
}

impl HeaderMarkers {
    fn has_candidate(&self) -> bool {
        self.divider.is_some() || self.money.is_some() || self.start_of_work.is_some()
    }
}

/// Locates the boilerplate envelope of an etext.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryLocator;

impl BoundaryLocator {
    /// Create a new locator.
    pub fn new() -> Self {
        Self
    }

    /// Locate header, small print and footer.
    ///
    /// A document that never names the project has no envelope.
    pub fn locate(&self, blocks: &[Block]) -> Envelope {
        let mentions_project = blocks
            .iter()
            .any(|b| b.lines().iter().any(|l| contains_project(&l.text)));
        if !mentions_project {
            log::debug!("No project token found; no envelope");
            return Envelope::default();
        }

        let markers = self.scan_header(blocks);
        let header_end = self.header_end(&markers, blocks.len());
        let footer = self.locate_footer(blocks, header_end);

        let small_print = match (markers.small_print_start, markers.small_print_end) {
            (Some(start), Some(end)) if start >= header_end => {
                let boundary = Boundary::new(start, end + 1);
                let overlaps_footer = footer.is_some_and(|f| boundary.end > f.start);
                (!overlaps_footer).then_some(boundary)
            }
            _ => None,
        };

        let envelope = Envelope {
            header: (header_end > 0).then(|| Boundary::new(0, header_end)),
            small_print,
            footer,
        };
        log::debug!("Located envelope {:?} from {:?}", envelope, markers);
        envelope
    }

    /// Record candidate markers in one front-to-back pass.
    pub fn scan_header(&self, blocks: &[Block]) -> HeaderMarkers {
        let mut markers = HeaderMarkers::default();
        let n = blocks.len();

        for (i, block) in blocks.iter().enumerate() {
            let lines = block.lines();

            if lines.iter().any(|l| HEADER_END_REGEX.is_match(l.trimmed())) {
                markers.explicit_end = Some(i);
                break;
            }

            if n - i < PROXIMITY_BLOCKS && !markers.has_candidate() {
                break;
            }

            if markers.divider.is_none() && is_divider(block) {
                markers.divider = Some(i);
            }
            if markers.money.is_none() && lines.iter().any(|l| MONEY_REGEX.is_match(&l.text)) {
                markers.money = Some(i);
            }
            if markers.start_of_work.is_none()
                && lines.iter().any(|l| START_OF_WORK_REGEX.is_match(&l.text))
            {
                markers.start_of_work = Some(i);
            }

            if lines.iter().any(|l| SMALL_PRINT_END_REGEX.is_match(&l.text)) {
                if markers.small_print_start.is_some() && markers.small_print_end.is_none() {
                    markers.small_print_end = Some(i);
                }
            } else if markers.small_print_start.is_none()
                && lines.iter().any(|l| SMALL_PRINT_START_REGEX.is_match(&l.text))
            {
                markers.small_print_start = Some(i);
            }
        }
        markers
    }

    /// Exclusive end of the header for a document of `n` blocks.
    pub fn header_end(&self, markers: &HeaderMarkers, n: usize) -> usize {
        if let Some(i) = markers.explicit_end {
            return i + 1;
        }

        let divider = markers.divider.filter(|&d| d * 2 < n);
        match (divider, markers.money) {
            (Some(d), Some(m)) if d.abs_diff(m) > DIVIDER_MONEY_GAP => m + 1,
            (Some(d), _) => d + 1,
            (None, Some(m)) => m + 1,
            (None, None) => markers.start_of_work.unwrap_or(n),
        }
    }

    /// Backward scan for the closing marker, never crossing `header_end`.
    pub fn locate_footer(&self, blocks: &[Block], header_end: usize) -> Option<Boundary> {
        let n = blocks.len();
        (header_end.min(n)..n)
            .rev()
            .find(|&i| blocks[i].lines().iter().any(|l| is_end_marker(&l.text)))
            .map(|i| Boundary::new(i, n))
    }
}

fn is_divider(block: &Block) -> bool {
    match block.lines() {
        [line] => DIVIDER_REGEX.is_match(line.trimmed()),
        _ => false,
    }
}
