//! Extraction of requirement records from a numbered requirements document.
//!
//! The parser recognises two kinds of lines:
//!
//! - **Section headers**: a dotted section number followed by a capitalised
//!   title, optionally prefixed with markdown `#` markers (e.g. `3.1
//!   Functional Requirements`, `## 4 Constraints`). Headers end the current
//!   requirement body, except for indented or numbered list items inside it.
//! - **Requirement tags**: `FR<n>.<m>:`, `NFR<n>.<m>:` or `CR<n>.<m>:`,
//!   optionally bulleted (`-`, `*`, `+`, `•`) and/or in bold. The body runs
//!   until the next tag or header; continuation lines are joined with a
//!   single space. A line that starts with a tag but has no `:` is
//!   malformed.
//!
//! Any other line outside a requirement body is ignored. Parsing is
//! fail-fast: the first malformed record aborts the whole document.

use std::{
    collections::{HashMap, HashSet},
    num::NonZeroUsize,
    sync::LazyLock,
};

use non_empty_string::NonEmptyString;
use regex::{Captures, Regex};
use tracing::instrument;

use crate::domain::{IdError, RequirementId, RequirementKind, RequirementRecord};

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<indent>\s*)(?<marks>#{1,6}\s*)?(?<number>\d+(?:\.\d+)*)(?<dot>\.)?\s+[A-Z]")
        .expect("header pattern is valid")
});

static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s+\S").expect("heading pattern is valid"));

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+•]\s*)?(?:\*\*)?((?:NFR|FR|CR)[0-9.]*)(?:\*\*)?\s*:(?:\*\*)?(.*)$")
        .expect("tag pattern is valid")
});

static TAG_WITHOUT_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+•]\s*)?(?:\*\*)?((?:NFR|FR|CR)\d[\d.]*)\b")
        .expect("separator-less tag pattern is valid")
});

/// Errors raised while parsing a requirements document.
///
/// Every variant carries the 1-based line number of the offending tag.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// A requirement tag does not match `<PREFIX><group>.<index>`.
    #[error("line {line}: malformed requirement tag '{tag}'")]
    MalformedTag {
        /// Line of the tag.
        line: usize,
        /// The tag as written.
        tag: String,
        /// Why the tag was rejected.
        #[source]
        source: IdError,
    },

    /// The same requirement ID appears twice.
    #[error("line {line}: duplicate requirement {id}")]
    Duplicate {
        /// Line of the second occurrence.
        line: usize,
        /// The repeated ID.
        id: RequirementId,
    },

    /// A requirement number skips ahead or goes backwards.
    #[error("line {line}: requirement {found} is out of sequence (expected {expected})")]
    OutOfSequence {
        /// Line of the tag.
        line: usize,
        /// The ID as found.
        found: RequirementId,
        /// The ID (or IDs) that would have continued the sequence.
        expected: String,
    },

    /// A requirement tag has no text.
    #[error("line {line}: requirement {id} has an empty body")]
    EmptyBody {
        /// Line of the tag.
        line: usize,
        /// The requirement ID.
        id: RequirementId,
    },
}

/// Parses a requirements document into records, in document order.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered. No records are returned if
/// any record is malformed.
#[instrument(level = "debug", skip_all, fields(lines = document.lines().count()))]
pub fn parse(document: &str) -> Result<Vec<RequirementRecord>, ParseError> {
    let mut parser = Parser::default();

    for (offset, line) in document.lines().enumerate() {
        parser.line(offset + 1, line)?;
    }
    parser.flush()?;

    tracing::debug!("Parsed {} requirements", parser.records.len());
    Ok(parser.records)
}

/// A requirement whose body is still being collected.
#[derive(Debug)]
struct Pending {
    line: usize,
    id: RequirementId,
    section: Vec<usize>,
    body: Vec<String>,
}

#[derive(Debug, Default)]
struct Parser {
    records: Vec<RequirementRecord>,
    pending: Option<Pending>,
    section: Vec<usize>,
    seen: HashSet<RequirementId>,
    /// The last ID seen for each kind.
    last: HashMap<RequirementKind, RequirementId>,
}

impl Parser {
    fn line(&mut self, number: usize, line: &str) -> Result<(), ParseError> {
        if let Some(captures) = TAG.captures(line) {
            self.flush()?;
            let id = self.tag(number, &captures[1])?;
            let rest = captures[2].trim();
            self.pending = Some(Pending {
                line: number,
                id,
                section: self.section.clone(),
                body: if rest.is_empty() {
                    Vec::new()
                } else {
                    vec![rest.to_string()]
                },
            });
            return Ok(());
        }

        if let Some(captures) = TAG_WITHOUT_SEPARATOR.captures(line) {
            let tag = captures[1].trim_end_matches('.').to_string();
            return Err(ParseError::MalformedTag {
                line: number,
                source: IdError::Separator(tag.clone()),
                tag,
            });
        }

        if let Some(captures) = HEADER
            .captures(line)
            .filter(|captures| self.is_section_boundary(captures))
        {
            self.flush()?;
            self.section = captures["number"]
                .split('.')
                .filter_map(|part| part.parse().ok())
                .collect();
            return Ok(());
        }

        if MARKDOWN_HEADING.is_match(line) {
            return self.flush();
        }

        if let Some(pending) = &mut self.pending {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                pending.body.push(trimmed.to_string());
            }
        }

        Ok(())
    }

    /// Whether a header-like line starts a new section.
    ///
    /// Inside a requirement body, indented lines and single-number list items
    /// (`1. Detect the vehicle`) are part of the body. Markdown headings
    /// always start a section.
    fn is_section_boundary(&self, captures: &Captures) -> bool {
        if self.pending.is_none() || captures.name("marks").is_some() {
            return true;
        }
        let indented = !captures["indent"].is_empty();
        let list_item = captures.name("dot").is_some() && !captures["number"].contains('.');
        !indented && !list_item
    }

    /// Validates a tag and records it as seen.
    fn tag(&mut self, line: usize, tag: &str) -> Result<RequirementId, ParseError> {
        let id = RequirementId::try_from(tag).map_err(|source| ParseError::MalformedTag {
            line,
            tag: tag.to_string(),
            source,
        })?;

        if self.seen.contains(&id) {
            return Err(ParseError::Duplicate { line, id });
        }

        let kind = id.kind();
        let in_sequence = self.last.get(&kind).map_or_else(
            || id.group().get() == 1 && id.index().get() == 1,
            |previous| follows(previous, &id),
        );

        if !in_sequence {
            return Err(ParseError::OutOfSequence {
                line,
                expected: expected_after(kind, self.last.get(&kind)),
                found: id,
            });
        }

        self.seen.insert(id.clone());
        self.last.insert(kind, id.clone());
        Ok(id)
    }

    /// Completes the pending requirement, if any.
    fn flush(&mut self) -> Result<(), ParseError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let text = NonEmptyString::new(pending.body.join(" ")).map_err(|_| {
            ParseError::EmptyBody {
                line: pending.line,
                id: pending.id.clone(),
            }
        })?;

        tracing::trace!("Parsed requirement {}", pending.id);
        self.records
            .push(RequirementRecord::new(pending.id, pending.section, text));
        Ok(())
    }
}

/// Whether `next` directly continues the sequence after `previous`.
fn follows(previous: &RequirementId, next: &RequirementId) -> bool {
    let (group, index) = (previous.group().get(), previous.index().get());
    let (next_group, next_index) = (next.group().get(), next.index().get());

    (next_group == group && next_index == index + 1) || (next_group == group + 1 && next_index == 1)
}

fn expected_after(kind: RequirementKind, previous: Option<&RequirementId>) -> String {
    let id = |group: usize, index: usize| {
        RequirementId::new(kind, nonzero(group), nonzero(index)).to_string()
    };

    match previous {
        None => id(1, 1),
        Some(previous) => {
            let group = previous.group().get();
            format!(
                "{} or {}",
                id(group, previous.index().get() + 1),
                id(group + 1, 1)
            )
        }
    }
}

fn nonzero(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap_or(NonZeroUsize::MIN)
}
