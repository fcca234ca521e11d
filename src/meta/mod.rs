//! Etext envelope location and metadata extraction.
//!
//! Works on an already segmented document: [`BoundaryLocator`] finds the
//! boilerplate header and footer, and [`MetadataExtractor`] reads title,
//! author, description and language out of the header.

mod boundary;
mod extract;
mod header;
mod property;
mod tidy;
mod tokens;

pub use boundary::{BoundaryLocator, HeaderMarkers, DIVIDER_MONEY_GAP, PROXIMITY_BLOCKS};
pub use extract::{
    author, description, ebook_number, language, release_date, title, MetadataExtractor, Rule,
    AUTHOR_RULES, MAX_BY_LINE_LEN, TITLE_RULES,
};
pub use header::{HeaderLine, HeaderText};
pub use property::{property, property_value, trim_decorative};
pub use tidy::{tidy, tidy_author, tidy_title};
pub use tokens::{contains_project, find_work_token, is_end_marker, WorkToken, WORK_TOKEN_WINDOW};
