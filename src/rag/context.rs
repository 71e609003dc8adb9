//! Context assembly from retrieved passages

use super::RetrievedPassage;

/// Joins admitted passages into the context handed to the language model
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    /// Every passage content in the given (nearest-first) order, one per line
    #[must_use]
    pub fn assemble(&self, passages: &[RetrievedPassage]) -> String {
        passages
            .iter()
            .map(|p| p.record.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorpusRecord;

    fn passage(id: usize, content: &str) -> RetrievedPassage {
        RetrievedPassage {
            id,
            distance: id as f32 * 0.1,
            record: CorpusRecord::new(format!("https://site/{id}"), content),
        }
    }

    #[test]
    fn test_assemble_joins_with_newlines() {
        let passages = vec![passage(0, "alpha"), passage(1, "beta"), passage(2, "gamma")];
        assert_eq!(ContextAssembler.assemble(&passages), "alpha\nbeta\ngamma");
    }

    #[test]
    fn test_assemble_keeps_every_passage() {
        let long = "x".repeat(50_000);
        let passages = vec![passage(0, &long), passage(1, "tail")];
        let context = ContextAssembler.assemble(&passages);
        assert!(context.ends_with("\ntail"));
        assert_eq!(context.len(), 50_000 + 5);
    }

    #[test]
    fn test_assemble_empty() {
        assert_eq!(ContextAssembler.assemble(&[]), "");
    }
}
