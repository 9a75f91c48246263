mod cells;
mod data;
mod surfaces;

use log::{debug, warn};

use crate::core::{Block, Issue, Namespace, Origin};
use crate::document::Document;
use crate::error::Result;
use crate::lexer::{tokenize, RawCard};

/// Internal reader turning deck text into a [Document]
///
/// Card level problems are recorded as issues on the document rather than
/// returned, so that a single bad card never hides the rest of the deck.
pub(crate) struct Reader {
    document: Document,
}

// ! Internal API
impl Reader {
    pub(crate) fn new() -> Self {
        Self {
            document: Document::default(),
        }
    }

    /// Parse the full text of a deck
    pub(crate) fn read(mut self, source: &str) -> Result<Document> {
        let lexed = tokenize(source)?;

        self.document.title = lexed.title;
        self.document.message = lexed.message;
        self.document.diagnostics.block_count = lexed.block_count;
        self.document.diagnostics.issues = lexed.issues;

        self.read_cells(&lexed.cells);
        self.read_surfaces(&lexed.surfaces);
        self.read_data(&lexed.data);

        debug!(
            "Read {} cells, {} surfaces, {} data cards with {} issue(s)",
            self.document.cells.len(),
            self.document.surfaces.len(),
            self.document.data_cards.len(),
            self.document.diagnostics.issues.len()
        );

        // reading is not an edit
        self.document.revision = 0;
        Ok(self.document)
    }

    /// Record a card that could not be parsed
    fn skip(&mut self, card: &RawCard, block: Block, reason: String) {
        warn!("line {}: skipped {block} card, {reason}", card.line);
        self.document.diagnostics.issues.push(Issue::SkippedCard {
            line: card.line,
            block,
            text: card.text.clone(),
            reason,
        });
    }

    /// Record a second definition of an identity
    fn duplicate(&mut self, card: &RawCard, namespace: Namespace, id: String) {
        warn!("line {}: {namespace} {id} is already defined, ignored", card.line);
        self.document.diagnostics.issues.push(Issue::Duplicate {
            line: card.line,
            namespace,
            id,
        });
    }
}

fn origin(card: &RawCard) -> Option<Origin> {
    Some(Origin {
        line: card.line,
        raw_text: card.raw.clone(),
    })
}
