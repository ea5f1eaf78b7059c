use serde::{Deserialize, Serialize};

/// A non-empty paragraph of plain text in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Position among the document's non-empty paragraphs
    pub index: usize,
    /// Plain text with formatting stripped
    pub text: String,
    /// Whether any non-blank run carries direct underline formatting
    pub underlined: bool,
}

/// Loaded protocol document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// All non-empty paragraphs in order
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Build a document from already-extracted paragraph texts.
    ///
    /// Blank entries are skipped so indices stay contiguous, matching what
    /// the loader produces from a `.docx` file.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paragraphs = texts
            .into_iter()
            .map(Into::into)
            .filter(|text: &String| !text.trim().is_empty())
            .enumerate()
            .map(|(index, text)| Paragraph {
                index,
                text: text.trim().to_string(),
                underlined: false,
            })
            .collect();

        Self { paragraphs }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Iterate over paragraph texts
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.paragraphs.iter().map(|p| p.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_texts_skips_blank() {
        let doc = Document::from_texts(["first", "   ", "", " second "]);

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.paragraphs[0].index, 0);
        assert_eq!(doc.paragraphs[1].index, 1);
        assert_eq!(doc.paragraphs[1].text, "second");
    }
}
