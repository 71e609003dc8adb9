//! FAQ mode: question/answer pairs built from the site's headings and paragraphs
//!
//! Raw text lines (`H1: ...`, `P: ...`) are grouped into sections, the language
//! model phrases one natural question per section, and user questions are
//! matched against those questions by string similarity.

pub mod similarity;

use std::cmp::Ordering;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::errors::Result;
use crate::llm::prompts::build_faq_question_prompt;
use crate::llm::prompts::FAQ_FALLBACK_MESSAGE;
use crate::llm::AnswerGenerator;
use crate::models::FaqEntry;
use crate::models::Section;
use crate::storage;

/// Minimum similarity for a FAQ question to count as a match
pub const DEFAULT_FAQ_CUTOFF: f64 = 0.5;

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^H\d:\s*(.*)$").expect("valid header regex"))
}

fn paragraph_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^P:\s*(.*)$").expect("valid paragraph regex"))
}

fn numbered_list_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?:^|\s)\d+\.(?:\s+|$)").expect("valid list regex"))
}

/// Group raw text lines into sections
///
/// A header line opens a new section; paragraph lines are appended to the
/// current one. Numbered-list markers are removed first. Sections without any
/// paragraph, and paragraphs before the first header, are dropped.
pub fn sectionize<'a, I>(lines: I) -> Vec<Section>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sections = Vec::new();
    let mut current: Option<String> = None;
    let mut paragraphs: Vec<String> = Vec::new();

    let mut flush = |heading: Option<String>, paragraphs: &mut Vec<String>| {
        if let Some(heading) = heading {
            if !paragraphs.is_empty() {
                sections.push(Section {
                    section: heading,
                    content: paragraphs.join(" "),
                });
            }
        }
        paragraphs.clear();
    };

    for line in lines {
        let line = numbered_list_pattern().replace_all(line.trim(), " ");
        let line = line.trim();

        if let Some(caps) = header_pattern().captures(line) {
            flush(current.take(), &mut paragraphs);
            current = Some(caps[1].trim().to_string());
            continue;
        }
        if let Some(caps) = paragraph_pattern().captures(line) {
            let text = caps[1].trim();
            if current.is_some() && !text.is_empty() {
                paragraphs.push(text.to_string());
            }
        }
    }
    flush(current.take(), &mut paragraphs);

    sections
}

/// Ask the generator for one natural question per section
///
/// The section content becomes the answer. Any generation failure aborts.
pub async fn generate_faqs<G>(sections: &[Section], generator: &G) -> Result<Vec<FaqEntry>>
where
    G: AnswerGenerator + ?Sized,
{
    let mut faqs = Vec::with_capacity(sections.len());
    for (idx, section) in sections.iter().enumerate() {
        info!("Generating FAQ {}/{}: {}", idx + 1, sections.len(), section.section);
        let prompt = build_faq_question_prompt(&section.section, &section.content);
        let question = generator.complete(&prompt).await?;
        faqs.push(FaqEntry {
            question: question.trim().to_string(),
            answer: section.content.clone(),
        });
    }
    Ok(faqs)
}

pub fn load_faqs(path: &Path) -> Result<Vec<FaqEntry>> {
    Ok(storage::load_json(path)?.unwrap_or_default())
}

pub fn save_faqs(path: &Path, faqs: &[FaqEntry]) -> Result<()> {
    storage::save_json(path, faqs)
}

/// FAQ whose question is most similar to `question`, if any reaches `cutoff`
///
/// Similarity is measured from the stored question towards the user's one.
/// Equal scores go to the lexicographically greater question; identical
/// questions resolve to the earliest entry.
pub fn best_match<'a>(question: &str, faqs: &'a [FaqEntry], cutoff: f64) -> Option<&'a FaqEntry> {
    let mut best: Option<(f64, &FaqEntry)> = None;
    for faq in faqs {
        let score = similarity::ratio(&faq.question, question);
        if score < cutoff {
            continue;
        }
        let better = best.map_or(true, |(top, current)| match score.total_cmp(&top) {
            Ordering::Greater => true,
            Ordering::Equal => faq.question > current.question,
            Ordering::Less => false,
        });
        if better {
            best = Some((score, faq));
        }
    }
    best.map(|(_, faq)| faq)
}

/// Answer text for `question`, or the hand-off message
pub fn best_answer<'a>(question: &str, faqs: &'a [FaqEntry], cutoff: f64) -> &'a str {
    best_match(question, faqs, cutoff).map_or(FAQ_FALLBACK_MESSAGE, |faq| faq.answer.as_str())
}

/// Stored FAQs plus the similarity cutoff used to answer from them
pub struct FaqMatcher {
    faqs: Vec<FaqEntry>,
    cutoff: f64,
}

impl FaqMatcher {
    pub fn new(faqs: Vec<FaqEntry>) -> Self {
        Self::with_cutoff(faqs, DEFAULT_FAQ_CUTOFF)
    }

    pub fn with_cutoff(faqs: Vec<FaqEntry>, cutoff: f64) -> Self {
        Self { faqs, cutoff }
    }

    pub fn len(&self) -> usize {
        self.faqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faqs.is_empty()
    }

    pub fn answer(&self, question: &str) -> &str {
        best_answer(question, &self.faqs, self.cutoff)
    }
}
