//! Text extraction from HTML

use scraper::Html;
use scraper::Selector;

use crate::errors::OwlError;
use crate::errors::Result;
use crate::models::TaggedText;

/// Text of every element named in `tags`, in document order
///
/// Each element's text nodes are trimmed and joined by a single space;
/// elements without text are skipped.
pub fn extract_tagged(html: &str, tags: &[String]) -> Result<Vec<TaggedText>> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }
    let selector = Selector::parse(&tags.join(", "))
        .map_err(|e| OwlError::ScrapeError(format!("Invalid tag list {tags:?}: {e}")))?;

    let document = Html::parse_document(html);
    let extracted = document
        .select(&selector)
        .filter_map(|element| {
            let text = element
                .text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if text.is_empty() {
                None
            } else {
                Some(TaggedText {
                    tag: element.value().name().to_string(),
                    text,
                })
            }
        })
        .collect();

    Ok(extracted)
}

/// Page content stored in the corpus: extracted texts joined by a space
pub fn page_content(tagged: &[TaggedText]) -> String {
    tagged
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
