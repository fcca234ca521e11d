//! Plain-text parsing module.
//!
//! Lines flow from a [`LineBuffer`] through calibration into the
//! [`ParagraphSegmenter`]; [`TextParser`] wires the stages together.

mod buffer;
mod calibrate;
mod classify;
mod options;
mod segmenter;
mod text_parser;

pub use buffer::{LineBuffer, DEFAULT_PRELOAD_LINES};
pub use calibrate::{
    BlankRunCollapser, LineStatistics, LineStatisticsSampler, ENDING_PUNCTUATION_THRESHOLD,
    MAX_BLANK_RUN, PARAGRAPH_SENSING_THRESHOLD,
};
pub use classify::{
    ends_with_dependent_punctuation, ends_with_independent_punctuation, is_decorative,
    punctuation_kind, starts_with_left_quote, trailing_punctuation, DefaultLineClassifier,
    LineClassifier, Punctuation, BREAK_MIN_LEN, DECORATIVE_CHARS,
};
pub use options::{ErrorMode, ExtractMode, ParseOptions};
pub use segmenter::{ParagraphSegmenter, PUNCTUATED_SHORT_LINE_RATIO, SHORT_LINE_RATIO};
pub use text_parser::TextParser;
