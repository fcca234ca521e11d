//! Integration tests for line segmentation.

use std::io::Cursor;

use untxt::model::HeadingKind;
use untxt::{
    parse_str, Block, DefaultLineClassifier, LineBuffer, LineClassifier, LineSpacingProfile,
    ParagraphSegmenter, TextParser,
};

fn segment(text: &str, profile: LineSpacingProfile) -> Vec<Block> {
    let classifier = DefaultLineClassifier::new();
    let mut buffer = LineBuffer::from_reader(Cursor::new(text.as_bytes().to_vec()));
    ParagraphSegmenter::new(&classifier, profile)
        .segment(&mut buffer)
        .unwrap()
}

fn first_lines(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|b| b.lines()[0].trimmed()).collect()
}

#[test]
fn test_pushback_round_trip() {
    let mut buffer = LineBuffer::from_reader(Cursor::new(b"alpha\nbeta\n".to_vec()));

    let first = buffer.pull().unwrap().unwrap();
    assert_eq!(first.number, 1);
    buffer.push_back(first.clone());

    assert_eq!(buffer.pull().unwrap(), Some(first));
    assert_eq!(buffer.pull().unwrap().unwrap().text, "beta");
    assert_eq!(buffer.pull().unwrap(), None);
    assert_eq!(buffer.lines_read(), 2);
}

#[test]
fn test_single_blank_closes_single_spaced_paragraph() {
    let text = "It was a dark night.\nThe rain fell.\n\nMorning came at last.\n";
    let blocks = segment(text, LineSpacingProfile::SINGLE);

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].lines().len(), 2);
    assert_eq!(first_lines(&blocks), vec!["It was a dark night.", "Morning came at last."]);
}

#[test]
fn test_double_spacing_needs_two_blanks() {
    let text = "It was a dark night\n\nand the rain fell\n\n\nMorning came at last\n";
    let blocks = segment(text, LineSpacingProfile::new(2, false));

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].plain_text(), "It was a dark night\nand the rain fell");
    assert_eq!(blocks[1].plain_text(), "Morning came at last");
}

#[test]
fn test_heading_change_splits_without_blank_line() {
    let text = "CHAPTER I\nIt was a dark and stormy night.\n";
    let blocks = segment(text, LineSpacingProfile::SINGLE);

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].heading_kind(), HeadingKind::Chapter);
    assert!(blocks[1].is_paragraph());
}

#[test]
fn test_break_line_stands_alone() {
    let text = "The first part ends here.\n* * * * * * * * * *\nThe second part begins.\n";
    let blocks = segment(text, LineSpacingProfile::SINGLE);

    assert_eq!(blocks.len(), 3);
    assert!(blocks[1].is_break());
}

#[test]
fn test_short_decorative_run_is_not_a_break() {
    let text = "The first part ends here.\n*****\nThe second part begins.\n";
    let blocks = segment(text, LineSpacingProfile::SINGLE);

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].lines().len(), 3);
}

#[test]
fn test_sensing_splits_on_short_line_and_drops_page_numbers() {
    let text = "\
The boat drifted slowly along the bank while the children watched
the herons wading in the shallows and the sun went down behind
42
the hills at last.
Next morning the river was grey and the boat had been pulled ashore
by someone who had come in the night and left no trace behind them
";
    let blocks = segment(text, LineSpacingProfile::new(1, true));

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].lines().len(), 3);
    assert!(!blocks[0].plain_text().contains("42"));
    assert!(blocks[1].plain_text().starts_with("Next morning"));
}

#[test]
fn test_calibration_of_blank_separated_paragraphs() {
    let paragraph = "The sun rose.\nThe birds sang.\nThe day began.\n\n";
    let doc = parse_str(&paragraph.repeat(10)).unwrap();

    assert_eq!(doc.profile, LineSpacingProfile::SINGLE);
    assert_eq!(doc.blocks.len(), 10);
    assert!(doc.blocks.iter().all(|b| b.lines().len() == 3));
}

#[test]
fn test_calibration_of_double_spaced_text() {
    let line = "and so the long grey road wound on across the moor\n\n";
    let doc = parse_str(&line.repeat(30)).unwrap();

    assert_eq!(doc.profile.line_spacing, 2);
}

#[test]
fn test_collapsed_blank_runs_keep_paragraphs_apart() {
    let text = format!(
        "{}{}{}",
        "The first paragraph ends.\n",
        "\n".repeat(12),
        "The second paragraph follows.\n"
    );
    let doc = parse_str(&text).unwrap();

    assert_eq!(doc.blocks.len(), 2);
}

/// Treats section signs as chapter markers.
struct SectionClassifier;

impl LineClassifier for SectionClassifier {
    fn classify_heading(&self, line: &str) -> HeadingKind {
        if line.trim_start().starts_with('\u{a7}') {
            HeadingKind::Chapter
        } else {
            HeadingKind::None
        }
    }

    fn is_break(&self, _line: &str) -> bool {
        false
    }

    fn is_page_number(&self, _line: &str) -> bool {
        false
    }
}

#[test]
fn test_custom_classifier() {
    let text = "\u{a7} 1\nAll persons born here are citizens.\n\nCHAPTER II\n";
    let doc = TextParser::from_str(text)
        .with_classifier(Box::new(SectionClassifier))
        .parse()
        .unwrap();

    let kinds: Vec<HeadingKind> = doc.blocks.iter().map(Block::heading_kind).collect();
    assert_eq!(
        kinds,
        vec![HeadingKind::Chapter, HeadingKind::None, HeadingKind::None]
    );
}
