//! Paragraph segmentation state machine.
//!
//! Each call to [`ParagraphSegmenter::next_block`] walks three states:
//! seeking the first content line, accumulating lines until a closing
//! condition holds, and emitting the finished block. Lines that belong to the
//! next block are pushed back into the [`LineBuffer`] rather than held here.

use std::io;

use crate::error::Result;
use crate::model::{Block, HeadingKind, Line, LineSpacingProfile};

use super::buffer::LineBuffer;
use super::classify::{ends_with_independent_punctuation, starts_with_left_quote, LineClassifier};

/// Under paragraph sensing, a line shorter than this fraction of the running
/// average length ends its paragraph.
pub const SHORT_LINE_RATIO: f64 = 0.75;

/// Under paragraph sensing, a punctuated line shorter than this fraction of
/// the running average length probably ends its paragraph.
pub const PUNCTUATED_SHORT_LINE_RATIO: f64 = 0.85;

/// Splits a line stream into paragraph, heading and break blocks.
pub struct ParagraphSegmenter<'a, C: LineClassifier + ?Sized> {
    classifier: &'a C,
    profile: LineSpacingProfile,
}

/// Why accumulation stopped after a content line.
enum Step {
    Continue,
    Close,
}

/// Lines gathered for the block under construction.
struct Accumulator {
    kind: HeadingKind,
    lines: Vec<Line>,
    total_len: usize,
}

impl Accumulator {
    fn new(kind: HeadingKind, first: Line) -> Self {
        let total_len = first.trimmed_len();
        Self {
            kind,
            lines: vec![first],
            total_len,
        }
    }

    fn accept(&mut self, line: Line) {
        self.total_len += line.trimmed_len();
        self.lines.push(line);
    }

    fn average_len(&self) -> f64 {
        self.total_len as f64 / self.lines.len() as f64
    }

    fn emit(self) -> Option<Block> {
        if self.lines.is_empty() {
            None
        } else if self.kind.is_heading() {
            Some(Block::Heading {
                kind: self.kind,
                lines: self.lines,
            })
        } else {
            Some(Block::Paragraph { lines: self.lines })
        }
    }
}

impl<'a, C: LineClassifier + ?Sized> ParagraphSegmenter<'a, C> {
    /// Create a segmenter for a calibrated document.
    pub fn new(classifier: &'a C, profile: LineSpacingProfile) -> Self {
        Self {
            classifier,
            profile,
        }
    }

    /// The spacing profile in use.
    pub fn profile(&self) -> LineSpacingProfile {
        self.profile
    }

    /// Segment everything left in the buffer.
    pub fn segment<I>(&self, buffer: &mut LineBuffer<I>) -> Result<Vec<Block>>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut blocks = Vec::new();
        while let Some(block) = self.next_block(buffer)? {
            blocks.push(block);
        }
        log::debug!("Segmented {} blocks", blocks.len());
        Ok(blocks)
    }

    /// Produce the next block, or `None` when the input is exhausted.
    pub fn next_block<I>(&self, buffer: &mut LineBuffer<I>) -> Result<Option<Block>>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let Some(first) = self.seek_start(buffer)? else {
            return Ok(None);
        };

        if self.classifier.is_break(&first.text) {
            return Ok(Some(Block::Break { line: first }));
        }

        let kind = self.heading_kind(&first.text);
        let mut block = Accumulator::new(kind, first);
        self.accumulate(buffer, &mut block)?;
        Ok(block.emit())
    }

    fn seek_start<I>(&self, buffer: &mut LineBuffer<I>) -> Result<Option<Line>>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        while let Some(line) = buffer.pull()? {
            if line.is_blank() {
                continue;
            }
            if self.profile.paragraph_sensing && self.classifier.is_page_number(&line.text) {
                log::debug!("Dropped page number at line {}", line.number);
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    fn accumulate<I>(&self, buffer: &mut LineBuffer<I>, block: &mut Accumulator) -> Result<()>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        // Physical line position within the current logical line
        let mut line_number = 2;

        while let Some(line) = buffer.pull()? {
            if line.is_blank() {
                if line_number > self.profile.line_spacing {
                    break;
                }
                line_number += 1;
                continue;
            }

            if self.classifier.is_break(&line.text) {
                buffer.push_back(line);
                break;
            }

            if block.kind.is_heading() && self.heading_kind(&line.text) != block.kind {
                buffer.push_back(line);
                break;
            }

            match self.sense(buffer, block, line)? {
                Step::Continue => line_number = 2,
                Step::Close => break,
            }
        }
        Ok(())
    }

    /// Accept a content line into a block, applying the length heuristics
    /// when paragraph ends have to be sensed.
    fn sense<I>(
        &self,
        buffer: &mut LineBuffer<I>,
        block: &mut Accumulator,
        line: Line,
    ) -> Result<Step>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        if !self.profile.paragraph_sensing || block.kind.is_heading() {
            block.accept(line);
            return Ok(Step::Continue);
        }

        if self.classifier.is_page_number(&line.text) {
            log::debug!("Dropped page number at line {}", line.number);
            return Ok(Step::Continue);
        }

        if starts_with_left_quote(&line.text) {
            buffer.push_back(line);
            return Ok(Step::Close);
        }

        let average = block.average_len();
        let len = line.trimmed_len() as f64;

        if len < average * SHORT_LINE_RATIO {
            block.accept(line);
            return Ok(Step::Close);
        }

        if len < average * PUNCTUATED_SHORT_LINE_RATIO
            && ends_with_independent_punctuation(&line.text)
        {
            block.accept(line);
            return match buffer.pull()? {
                Some(next) if !next.is_blank() && self.classifier.is_page_number(&next.text) => {
                    log::debug!("Dropped page number at line {}", next.number);
                    Ok(Step::Continue)
                }
                Some(next) => {
                    buffer.push_back(next);
                    Ok(Step::Close)
                }
                None => Ok(Step::Close),
            };
        }

        block.accept(line);
        Ok(Step::Continue)
    }

    /// Heading kind used for block grouping; all-capitals titles are too
    /// unreliable to start a heading block on their own.
    fn heading_kind(&self, text: &str) -> HeadingKind {
        match self.classifier.classify_heading(text) {
            HeadingKind::Title => HeadingKind::None,
            kind => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::classify::DefaultLineClassifier;
    use std::io::Cursor;

    fn segment(text: &str, profile: LineSpacingProfile) -> Vec<Block> {
        let classifier = DefaultLineClassifier::new();
        let mut buffer = LineBuffer::from_reader(Cursor::new(text.as_bytes().to_vec()));
        ParagraphSegmenter::new(&classifier, profile)
            .segment(&mut buffer)
            .unwrap()
    }

    fn texts(blocks: &[Block]) -> Vec<Vec<String>> {
        blocks
            .iter()
            .map(|b| b.lines().iter().map(|l| l.text.clone()).collect())
            .collect()
    }

    /// A run of `len` letters broken by spaces, with no terminal punctuation.
    fn prose(len: usize) -> String {
        (0..len)
            .map(|i| if i % 5 == 4 && i + 1 < len { ' ' } else { 'a' })
            .collect()
    }

    fn sentence(len: usize) -> String {
        format!("{}.", prose(len - 1))
    }

    const SENSING: LineSpacingProfile = LineSpacingProfile {
        line_spacing: 1,
        paragraph_sensing: true,
    };

    #[test]
    fn test_single_spacing_blank_closes() {
        let blocks = segment("one\ntwo\n\nthree\n", LineSpacingProfile::SINGLE);
        assert_eq!(texts(&blocks), vec![vec!["one", "two"], vec!["three"]]);
    }

    #[test]
    fn test_double_spacing_tolerates_one_blank() {
        let profile = LineSpacingProfile::new(2, false);
        let blocks = segment("one\n\ntwo\n\n\nthree\n", profile);
        assert_eq!(texts(&blocks), vec![vec!["one", "two"], vec!["three"]]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(segment("", LineSpacingProfile::SINGLE).is_empty());
        assert!(segment("\n\n   \n", LineSpacingProfile::SINGLE).is_empty());
    }

    #[test]
    fn test_break_first_is_emitted_alone() {
        let blocks = segment("**********\nafter\n", LineSpacingProfile::SINGLE);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_break());
        assert!(blocks[1].is_paragraph());
    }

    #[test]
    fn test_break_inside_paragraph_is_deferred() {
        let blocks = segment("before\n* * * * * * * * * *\nafter\n", LineSpacingProfile::SINGLE);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].plain_text(), "before");
        assert!(blocks[1].is_break());
        assert_eq!(blocks[2].plain_text(), "after");
    }

    #[test]
    fn test_heading_then_body_splits() {
        let blocks = segment("CHAPTER I\nIt was a dark night.\n", LineSpacingProfile::SINGLE);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].heading_kind(), HeadingKind::Chapter);
        assert!(blocks[1].is_paragraph());
    }

    #[test]
    fn test_body_continues_through_heading_like_line() {
        let text = "my heart was full of sorrow and\nI Saw the river in the morning light\n";
        let blocks = segment(text, LineSpacingProfile::SINGLE);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_paragraph());
        assert_eq!(blocks[0].lines().len(), 2);
    }

    #[test]
    fn test_capitals_title_is_body_text() {
        let blocks = segment("EVANGELINE\nA TALE OF ACADIE\n", LineSpacingProfile::SINGLE);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_paragraph());
        assert_eq!(blocks[0].lines().len(), 2);
    }

    #[test]
    fn test_sensing_short_line_closes() {
        let text = format!("{}\n{}\n{}\n{}\n", prose(60), prose(60), prose(40), prose(60));
        let blocks = segment(&text, SENSING);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines().len(), 3);
        assert_eq!(blocks[1].lines().len(), 1);
    }

    #[test]
    fn test_sensing_punctuated_line_peeks_past_page_number() {
        let text = format!("{}\n{}\n{}\n42\n{}\n", prose(60), prose(60), sentence(48), prose(60));
        let blocks = segment(&text, SENSING);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines().len(), 4);
        assert!(blocks[0].lines().iter().all(|l| l.text != "42"));
    }

    #[test]
    fn test_sensing_punctuated_line_closes_before_text() {
        let text = format!("{}\n{}\n{}\n{}\n", prose(60), prose(60), sentence(48), prose(60));
        let blocks = segment(&text, SENSING);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines().len(), 3);
    }

    #[test]
    fn test_sensing_drops_page_numbers() {
        let text = format!("17\n{}\n[Page 18]\n{}\n", prose(60), prose(60));
        let blocks = segment(&text, SENSING);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines().len(), 2);
    }

    #[test]
    fn test_sensing_quote_opens_new_paragraph() {
        let text = format!(
            "{}\n\"Quoted speech begins here and goes on,\"\n{}\n",
            prose(60),
            prose(60)
        );
        let blocks = segment(&text, SENSING);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines().len(), 1);
        assert!(blocks[1].plain_text().starts_with('"'));
    }

    #[test]
    fn test_page_number_kept_without_sensing() {
        let blocks = segment("42\n", LineSpacingProfile::SINGLE);
        assert_eq!(texts(&blocks), vec![vec!["42"]]);
    }
}
