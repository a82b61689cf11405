//! HTML field extraction for certificate pages
//!
//! This module locates the two fields a certificate page carries:
//! - The card name, in the main heading (`h2` styled `sm:text-2xl`)
//! - The grade, in the gold grade bar (`div` styled `w-3/4` and `bg-gold`)

use scraper::{Html, Selector};
use thiserror::Error;

const CARD_NAME_SELECTOR: &str = r#"h2[class*="sm:text-2xl"]"#;
const GRADE_SELECTOR: &str = r#"div[class*="w-3/4"][class*="bg-gold"]"#;

/// Fields extracted from a certificate page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    /// Card name with internal whitespace collapsed
    pub card_name: String,

    /// Grade text with surrounding whitespace trimmed
    pub grade: String,
}

/// Reasons a loaded page could not yield both fields
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("card name heading not found")]
    MissingCardName,

    #[error("grade bar not found")]
    MissingGrade,

    #[error("invalid selector {selector}: {message}")]
    Selector { selector: String, message: String },
}

/// Extracts the card name and grade from a certificate page
///
/// Only the first matching element is used for each field.
///
/// # Example
///
/// ```
/// use cert_lookup::crawler::extract_card_fields;
///
/// let html = r#"<h2 class="text-xl sm:text-2xl">  Pikachu
///     Illustrator </h2><div class="w-3/4 bg-gold"> GEM MINT 10 </div>"#;
/// let fields = extract_card_fields(html).unwrap();
/// assert_eq!(fields.card_name, "Pikachu Illustrator");
/// assert_eq!(fields.grade, "GEM MINT 10");
/// ```
pub fn extract_card_fields(html: &str) -> Result<CardFields, ExtractionError> {
    let document = Html::parse_document(html);

    let card_name = first_text(&document, CARD_NAME_SELECTOR)?
        .map(|text| collapse_whitespace(&text))
        .ok_or(ExtractionError::MissingCardName)?;

    let grade = first_text(&document, GRADE_SELECTOR)?
        .map(|text| text.trim().to_string())
        .ok_or(ExtractionError::MissingGrade)?;

    Ok(CardFields { card_name, grade })
}

/// Returns the text content of the first element matching `selector`
fn first_text(document: &Html, selector: &str) -> Result<Option<String>, ExtractionError> {
    let parsed = Selector::parse(selector).map_err(|e| ExtractionError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })?;

    Ok(document
        .select(&parsed)
        .next()
        .map(|element| element.text().collect::<String>()))
}

/// Collapses runs of whitespace into single spaces and trims the ends
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
