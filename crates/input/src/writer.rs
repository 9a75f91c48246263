//! Write a [Document] back to deck text

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// external crates
use log::{debug, info};
use mcdeck_utils::f;
use textwrap::{Options, WordSeparator, WordSplitter};

// crate modules
use crate::document::Document;
use crate::error::Result;
use crate::lexer::CONTINUATION_INDENT;

/// Serialise a document with the default line width
///
/// Comments are not kept. Reading the output gives a document equal to the
/// one written.
///
/// ```rust
/// # use mcdeck_input::{serialize, Document};
/// let text = "t\n10 0 -1 imp:n=1\n\n1 so 1.0\n\nnps 1000\n";
/// let doc = Document::from_str(text).unwrap();
/// assert_eq!(serialize(&doc), "t\n10 0 -1 imp:n=1\n\n1 so 1\n\nnps 1000\n");
/// ```
pub fn serialize(document: &Document) -> String {
    Writer::new().serialize(document)
}

/// Deck writer with a configurable line width
///
/// Cards longer than the width are wrapped at blanks onto continuation
/// lines indented by five spaces. Single tokens are never split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Writer {
    /// Maximum columns per line, 78 by default
    pub width: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self { width: 78 }
    }
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(width: usize) -> Self {
        Self {
            width: width.max(CONTINUATION_INDENT + 1),
        }
    }

    /// Full deck text, ending in a newline
    pub fn serialize(&self, document: &Document) -> String {
        let mut lines: Vec<String> = Vec::new();

        if let Some(message) = &document.message {
            lines.push(self.card(&f!("message: {message}")));
            lines.push(String::new());
        }

        lines.push(document.title.clone());
        lines.extend(document.cells().values().map(|c| self.card(&c.to_string())));
        lines.push(String::new());
        lines.extend(document.surfaces().values().map(|s| self.card(&s.to_string())));
        lines.push(String::new());
        lines.extend(document.data_cards().values().map(|d| self.card(&d.to_string())));

        debug!(
            "Serialised {} cells, {} surfaces, {} data cards",
            document.cells().len(),
            document.surfaces().len(),
            document.data_cards().len()
        );

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Write the deck to a file
    pub fn write_file<P: AsRef<Path>>(&self, document: &Document, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Writing {}", path.display());
        let mut writer = init_writer(path)?;
        writer.write_all(self.serialize(document).as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Wrap one logical card onto as many lines as it needs
    fn card(&self, text: &str) -> String {
        if text.len() <= self.width {
            return text.to_string();
        }

        let indent = " ".repeat(CONTINUATION_INDENT);
        let options = Options::new(self.width)
            .subsequent_indent(&indent)
            .word_separator(WordSeparator::AsciiSpace)
            .word_splitter(WordSplitter::NoHyphenation)
            .break_words(false);

        textwrap::wrap(text, options).join("\n")
    }
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
