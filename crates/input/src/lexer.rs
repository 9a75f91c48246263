//! Line processing for card-format input
//!
//! The lexer turns raw text into logical cards. It knows nothing about what a
//! card means, only the line rules of the format:
//!
//! - A line starting with `c`/`C` followed by a non-alphanumeric character (or
//!   nothing) is a comment line and is dropped.
//! - Everything from a `$` onwards is a trailing comment and is dropped.
//! - A line that is empty after comment stripping closes the current block.
//! - A line indented by five or more spaces, starting with `&`, or following a
//!   line that ends in `&` continues the previous card.
//!
//! Lines indented by one to four spaces are joined to the previous card when
//! there is one, but recorded as [Issue::ShortIndent] so that validation can
//! reject them.

use log::{debug, trace, warn};
use mcdeck_utils::StringExt;

use crate::core::{Block, Issue};
use crate::error::{Error, Result};

/// Minimum indentation for a continuation line
pub const CONTINUATION_INDENT: usize = 5;

/// A logical card assembled from one or more source lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCard {
    /// 1-based line number of the first physical line
    pub line: usize,
    /// Joined card text with whitespace collapsed to single spaces
    pub text: String,
    /// Physical lines exactly as read, newline separated
    pub raw: String,
}

/// Result of splitting a deck into blocks of logical cards
#[derive(Debug, Default)]
pub struct LexedDeck {
    /// Optional `MESSAGE:` block preceding the title
    pub message: Option<String>,
    /// Title line
    pub title: String,
    /// Logical cards of the cell block
    pub cells: Vec<RawCard>,
    /// Logical cards of the surface block
    pub surfaces: Vec<RawCard>,
    /// Logical cards of the data block
    pub data: Vec<RawCard>,
    /// Number of blocks opened
    pub block_count: usize,
    /// Problems worked around while reading lines
    pub issues: Vec<Issue>,
}

impl LexedDeck {
    fn block(&self, block: Block) -> &Vec<RawCard> {
        match block {
            Block::Cells => &self.cells,
            Block::Surfaces => &self.surfaces,
            Block::Data => &self.data,
        }
    }

    fn block_mut(&mut self, block: Block) -> &mut Vec<RawCard> {
        match block {
            Block::Cells => &mut self.cells,
            Block::Surfaces => &mut self.surfaces,
            Block::Data => &mut self.data,
        }
    }
}

/// Check for a comment line
///
/// ```rust
/// # use mcdeck_input::lexer::is_comment;
/// assert!(is_comment("c a comment"));
/// assert!(is_comment("C"));
/// assert!(is_comment("c-----"));
/// assert!(!is_comment("cut:n j 0.1"));
/// assert!(!is_comment(" c indented"));
/// ```
pub fn is_comment(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some('c') | Some('C') => match chars.next() {
            None => true,
            Some(next) => !next.is_alphanumeric(),
        },
        _ => false,
    }
}

/// Remove a trailing `$` comment
///
/// There is no quoting in the format, so a `$` always starts a comment.
pub fn strip_comment(line: &str) -> &str {
    match line.find('$') {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Expand tabs to 8-column tab stops so that indentation can be measured
fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }

    let mut expanded = String::with_capacity(line.len() + 8);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = 8 - column % 8;
            expanded.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            expanded.push(c);
            column += 1;
        }
    }
    expanded
}

/// Check for the start of an optional `MESSAGE:` block
fn is_message_start(line: &str) -> bool {
    line.trim_start()
        .get(..8)
        .is_some_and(|tag| tag.eq_ignore_ascii_case("message:"))
}

/// Split a deck into its title and three blocks of logical cards
///
/// Fails with a structural error if there is no title or fewer than three
/// blocks. Everything else is recovered from and recorded in
/// [LexedDeck::issues].
///
/// ```rust
/// # use mcdeck_input::lexer::tokenize;
/// let deck = tokenize("title\n10 0 -1\n     imp:n=1\n\n1 so 1.0\n\nnps 10\n").unwrap();
/// assert_eq!(deck.title, "title");
/// assert_eq!(deck.cells[0].text, "10 0 -1 imp:n=1");
/// assert_eq!(deck.surfaces[0].text, "1 so 1.0");
/// assert_eq!(deck.data[0].text, "nps 10");
/// ```
pub fn tokenize(source: &str) -> Result<LexedDeck> {
    let mut deck = LexedDeck::default();
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, expand_tabs(line)));

    // the title is the first real line, optionally after a message block
    loop {
        let Some((n, line)) = lines.next() else {
            return Err(Error::MissingTitle);
        };

        if is_comment(&line) || line.trim().is_empty() {
            continue;
        }

        if deck.message.is_none() && is_message_start(&line) {
            let mut message = vec![line.trim()[8..].squash()];
            for (_, next) in lines.by_ref() {
                if next.trim().is_empty() {
                    break;
                }
                message.push(next.squash());
            }
            deck.message = Some(message.join(" ").trim().to_string());
            debug!("Message block ends before line {n}");
            continue;
        }

        debug!("Title on line {n}: {:?}", line.trim());
        deck.title = line.trim().to_string();
        break;
    }

    let mut block = Block::Cells;
    let mut joining = false;
    deck.block_count = 1;

    for (n, line) in lines {
        if is_comment(&line) {
            trace!("line {n}: comment");
            continue;
        }

        let content = strip_comment(&line);
        if content.trim().is_empty() {
            joining = false;
            block = match block {
                Block::Cells => Block::Surfaces,
                Block::Surfaces => Block::Data,
                Block::Data => {
                    debug!("Ignoring everything after the data block (line {n})");
                    break;
                }
            };
            deck.block_count += 1;
            debug!("Line {n} opens the {block} block");
            continue;
        }

        let indent = content.indent();
        let body = content.trim();
        let (body, leading_amp) = match body.strip_prefix('&') {
            Some(rest) => (rest.trim_start(), true),
            None => (body, false),
        };
        let (body, trailing_amp) = match body.strip_suffix('&') {
            Some(rest) => (rest.trim_end(), true),
            None => (body, false),
        };

        let has_card = !deck.block(block).is_empty();
        let mut continues = joining || leading_amp || indent >= CONTINUATION_INDENT;
        if !continues && indent > 0 && has_card {
            warn!("line {n}: continuation indented by {indent} spaces, expected at least {CONTINUATION_INDENT}");
            deck.issues.push(Issue::ShortIndent { line: n, indent });
            continues = true;
        }
        joining = trailing_amp;

        if !continues {
            trace!("line {n}: new {block} card");
            deck.block_mut(block).push(RawCard {
                line: n,
                text: body.to_string(),
                raw: line.clone(),
            });
            continue;
        }

        match deck.block_mut(block).last_mut() {
            Some(card) => {
                trace!("line {n}: continues card from line {}", card.line);
                card.text.push(' ');
                card.text.push_str(body);
                card.raw.push('\n');
                card.raw.push_str(&line);
            }
            None => {
                warn!("line {n}: continuation line with no card to continue, discarded");
                deck.issues.push(Issue::OrphanContinuation {
                    line: n,
                    text: body.to_string(),
                });
            }
        }
    }

    if deck.block_count < 3 {
        return Err(Error::TooFewBlocks {
            found: deck.block_count,
        });
    }

    for card in deck
        .cells
        .iter_mut()
        .chain(deck.surfaces.iter_mut())
        .chain(deck.data.iter_mut())
    {
        card.text = card.text.squash();
    }

    debug!(
        "Lexed {} cell, {} surface, and {} data cards",
        deck.cells.len(),
        deck.surfaces.len(),
        deck.data.len()
    );

    Ok(deck)
}
