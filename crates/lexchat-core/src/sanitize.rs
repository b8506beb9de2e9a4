//! Response sanitizing.
//!
//! Reasoning models wrap their internal deliberation in `<think>` blocks.
//! The sanitizer removes those blocks and tidies whitespace so that only the
//! final answer is shown and stored. Sanitizing twice gives the same text as
//! sanitizing once.

use regex::Regex;

use lexchat_types::config::UnterminatedThink;

const THINK_OPEN: &str = "<think>";

/// Compiled sanitizing rules. Build once and clone freely.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    think_block: Regex,
    blank_lines: Regex,
    unterminated: UnterminatedThink,
}

impl Sanitizer {
    pub fn new(unterminated: UnterminatedThink) -> Result<Self, regex::Error> {
        Ok(Self {
            think_block: Regex::new(r"(?s)<think>.*?</think>")?,
            blank_lines: Regex::new(r"\r?\n(?:[ \t]*\r?\n)+")?,
            unterminated,
        })
    }

    /// Strip reasoning blocks, collapse blank-line runs, and trim.
    pub fn sanitize(&self, raw: &str) -> String {
        // Removing one block can splice the halves of another marker back
        // together, so repeat until nothing changes.
        let mut text = raw.to_string();
        loop {
            let next = self.think_block.replace_all(&text, "");
            if next.len() == text.len() {
                break;
            }
            text = next.into_owned();
        }

        if self.unterminated == UnterminatedThink::Strip {
            if let Some(idx) = text.find(THINK_OPEN) {
                text.truncate(idx);
            }
        }

        self.blank_lines.replace_all(&text, "\n").trim().to_string()
    }
}
