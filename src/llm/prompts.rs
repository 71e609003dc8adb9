//! Prompt templates

/// Reply used when no indexed passage is close enough to the question
pub const CLARIFICATION_MESSAGE: &str =
    "I couldn't find an exact answer on the website, but I can try to help! Could you clarify?";

/// Reply used when the FAQ matcher finds no close question
pub const FAQ_FALLBACK_MESSAGE: &str =
    "I'm not sure about that. Would you like me to connect you to a human?";

/// Reply printed by the shell when answering fails unexpectedly
pub const APOLOGY_MESSAGE: &str =
    "Sorry, something went wrong while answering that. Please try again.";

/// Build the retrieval-augmented answer prompt
pub fn build_rag_prompt(question: &str, context: &str) -> String {
    format!(
        r"You are a helpful assistant. Answer the following question based on the provided context:
Context: {context}
Question: {question}"
    )
}

/// Build the prompt that turns a page section into a natural FAQ question
pub fn build_faq_question_prompt(section: &str, content: &str) -> String {
    format!(
        r"Convert the following text with this structure:

Topic: {section}
Description: {content}

Provide a natural-sounding question that someone might ask based on this information."
    )
}
