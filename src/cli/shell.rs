//! Line-based chat loop shared by RAG chat and FAQ chat

use std::io::BufRead;
use std::io::Write;

use async_trait::async_trait;
use tracing::error;

use crate::config::ChatConfig;
use crate::faq::FaqMatcher;
use crate::llm::prompts::APOLOGY_MESSAGE;
use crate::rag::ChatService;
use crate::Result;

pub const PROMPT: &str = "You: ";
pub const EXIT_COMMAND: &str = "exit";

/// Anything that can answer one shell question
#[async_trait]
pub trait Responder: Send {
    async fn respond(&mut self, question: &str) -> Result<String>;
}

#[async_trait]
impl Responder for ChatService {
    async fn respond(&mut self, question: &str) -> Result<String> {
        Ok(self.ask(question).await?.text)
    }
}

#[async_trait]
impl Responder for FaqMatcher {
    async fn respond(&mut self, question: &str) -> Result<String> {
        Ok(self.answer(question).to_string())
    }
}

/// Counters for one shell session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShellSummary {
    pub answered: usize,
    pub failed: usize,
}

/// Read questions from `input` until `exit` or end of input
///
/// Each non-blank line is answered through `responder`, exactly as typed
/// (without the line terminator). A failed answer is logged and replaced by
/// an apology; the loop keeps going.
pub async fn run_shell<S, R, W>(
    responder: &mut S,
    input: R,
    output: &mut W,
    chat: &ChatConfig,
) -> Result<ShellSummary>
where
    S: Responder + ?Sized,
    R: BufRead,
    W: Write,
{
    let bot = &chat.bot_name;
    let mut summary = ShellSummary::default();

    writeln!(
        output,
        "{bot}: Hi there! I'm {bot}, your assistant for all things {}.",
        chat.site_name
    )?;
    writeln!(
        output,
        "Ask me anything, and I'll do my best to help! Type '{EXIT_COMMAND}' to stop."
    )?;

    let mut lines = input.lines();
    loop {
        write!(output, "\n{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        // The question is passed on verbatim; trimming only decides commands
        let question = line?;
        let command = question.trim();

        if command.is_empty() {
            continue;
        }
        if command.eq_ignore_ascii_case(EXIT_COMMAND) {
            writeln!(output, "{bot}: Goodbye! Have a great day!")?;
            break;
        }

        match responder.respond(&question).await {
            Ok(answer) => {
                summary.answered += 1;
                writeln!(output, "{bot}: {answer}")?;
            }
            Err(e) => {
                summary.failed += 1;
                error!("Failed to answer {:?}: {}", question, e);
                writeln!(output, "{bot}: {APOLOGY_MESSAGE}")?;
            }
        }
    }

    Ok(summary)
}
