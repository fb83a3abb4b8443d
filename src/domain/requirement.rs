use std::{fmt, num::NonZeroUsize, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Serialize, Serializer};

/// The category of a requirement, encoded by its tag prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequirementKind {
    /// `FR` - behaviour the system must exhibit.
    Functional,
    /// `NFR` - a measurable quality attribute (timing, reliability,
    /// usability).
    NonFunctional,
    /// `CR` - a communication or resource limit.
    Constraint,
}

impl RequirementKind {
    /// All kinds, longest prefix first so that prefix matching is unambiguous.
    pub const ALL: [Self; 3] = [Self::NonFunctional, Self::Functional, Self::Constraint];

    /// The tag prefix used in documents, e.g. `NFR`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Functional => "FR",
            Self::NonFunctional => "NFR",
            Self::Constraint => "CR",
        }
    }

    /// Looks up a kind from its exact tag prefix.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Functional => "Functional",
            Self::NonFunctional => "Non-functional",
            Self::Constraint => "Constraint",
        })
    }
}

/// The identifier of a requirement.
///
/// Format: `{PREFIX}{GROUP}.{INDEX}`, where `PREFIX` is one of `FR`, `NFR` or
/// `CR`, and `GROUP` and `INDEX` are positive integers.
///
/// Examples: `FR1.1`, `NFR2.3`, `CR1.1`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequirementId {
    kind: RequirementKind,
    group: NonZeroUsize,
    index: NonZeroUsize,
}

impl RequirementId {
    /// Creates an identifier from pre-validated parts.
    #[must_use]
    pub const fn new(kind: RequirementKind, group: NonZeroUsize, index: NonZeroUsize) -> Self {
        Self { kind, group, index }
    }

    /// The kind encoded in the prefix.
    #[must_use]
    pub const fn kind(&self) -> RequirementKind {
        self.kind
    }

    /// The group number (the part before the dot).
    #[must_use]
    pub const fn group(&self) -> NonZeroUsize {
        self.group
    }

    /// The index within the group (the part after the dot).
    #[must_use]
    pub const fn index(&self) -> NonZeroUsize {
        self.index
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}.{}", self.kind.prefix(), self.group, self.index)
    }
}

impl Serialize for RequirementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors that can occur when parsing a [`RequirementId`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// The prefix is not one of `FR`, `NFR`, `CR`.
    #[error("Invalid requirement prefix in '{0}': expected FR, NFR or CR")]
    Prefix(String),

    /// The numeric part is not `<group>.<index>`.
    #[error("Invalid requirement number in '{0}': expected <group>.<index>")]
    Number(String),

    /// The group or index is zero.
    #[error("Invalid requirement number in '{0}': group and index must be non-zero")]
    Zero(String),

    /// The tag is not followed by a `:` separator.
    #[error("Missing ':' after requirement tag '{0}'")]
    Separator(String),
}

impl FromStr for RequirementId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s.find(|c: char| !c.is_ascii_uppercase()).unwrap_or(s.len());
        let (prefix, number) = s.split_at(split);

        let kind = RequirementKind::from_prefix(prefix).ok_or_else(|| IdError::Prefix(s.to_string()))?;

        let (group, index) = number
            .split_once('.')
            .ok_or_else(|| IdError::Number(s.to_string()))?;

        let parse = |part: &str| {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(IdError::Number(s.to_string()));
            }
            let value = part
                .parse::<usize>()
                .map_err(|_| IdError::Number(s.to_string()))?;
            NonZeroUsize::new(value).ok_or_else(|| IdError::Zero(s.to_string()))
        };

        Ok(Self::new(kind, parse(group)?, parse(index)?))
    }
}

impl TryFrom<&str> for RequirementId {
    type Error = IdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

/// One numbered requirement extracted from a document.
///
/// Records are created once by the parser and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementRecord {
    id: RequirementId,
    section: Vec<usize>,
    text: NonEmptyString,
}

impl RequirementRecord {
    /// Creates a record.
    ///
    /// `section` is the numbering of the document header the requirement
    /// appears under (e.g. `[3, 1]` for `3.1 Functional Requirements`), or
    /// empty if it precedes any numbered header.
    #[must_use]
    pub const fn new(id: RequirementId, section: Vec<usize>, text: NonEmptyString) -> Self {
        Self { id, section, text }
    }

    /// The requirement identifier.
    #[must_use]
    pub const fn id(&self) -> &RequirementId {
        &self.id
    }

    /// The requirement kind.
    #[must_use]
    pub const fn kind(&self) -> RequirementKind {
        self.id.kind
    }

    /// The enclosing section numbering.
    #[must_use]
    pub fn section(&self) -> &[usize] {
        &self.section
    }

    /// The requirement statement.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}
