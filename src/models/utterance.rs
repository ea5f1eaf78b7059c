use serde::{Deserialize, Serialize};

/// Contiguous block of text attributed to one speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Cleaned speaker name
    pub speaker: String,
    /// Raw paragraph texts in order
    pub paragraphs: Vec<String>,
    /// Index of the paragraph that opened this utterance
    pub start_paragraph: usize,
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, start_paragraph: usize) -> Self {
        Self {
            speaker: speaker.into(),
            paragraphs: Vec::new(),
            start_paragraph,
        }
    }

    /// Append a paragraph, ignoring whitespace-only text
    pub fn push(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.paragraphs.push(text.to_string());
        }
    }

    /// True when no text was attributed to this speaker
    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.trim().is_empty())
    }

    /// All paragraphs joined by single spaces
    pub fn text(&self) -> String {
        self.paragraphs.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_ignores_blank() {
        let mut utterance = Utterance::new("John", 0);
        assert!(utterance.is_empty());

        utterance.push("  ");
        assert!(utterance.is_empty());

        utterance.push("Hello.");
        utterance.push("Again.");
        assert!(!utterance.is_empty());
        assert_eq!(utterance.text(), "Hello. Again.");
    }
}
