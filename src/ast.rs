use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The five kinds of named entity a Colang document can define or reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Bot,
    Flow,
    Subflow,
    Variable,
}

impl EntityType {
    /// Every entity type, in the order the validator reports them.
    pub const ALL: [EntityType; 5] = [
        EntityType::User,
        EntityType::Bot,
        EntityType::Flow,
        EntityType::Subflow,
        EntityType::Variable,
    ];

    /// The lowercase keyword used in source text and messages (`user`, `bot`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::User => "user",
            EntityType::Bot => "bot",
            EntityType::Flow => "flow",
            EntityType::Subflow => "subflow",
            EntityType::Variable => "variable",
        }
    }

    /// Capitalized form used at the start of diagnostic messages.
    #[must_use]
    pub fn pretty_name(self) -> &'static str {
        match self {
            EntityType::User => "User",
            EntityType::Bot => "Bot",
            EntityType::Flow => "Flow",
            EntityType::Subflow => "Subflow",
            EntityType::Variable => "Variable",
        }
    }

    /// Parses the kind keyword of a `define` line. Variables are never defined this way.
    #[must_use]
    pub fn from_define_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "user" => Some(EntityType::User),
            "bot" => Some(EntityType::Bot),
            "flow" => Some(EntityType::Flow),
            "subflow" => Some(EntityType::Subflow),
            _ => None,
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zero-based (line, column) position. Columns count UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// A span between two positions.
///
/// Containment checks treat both endpoints as inside the range, so a cursor
/// sitting right after the last character of a name still hits that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }

    /// A range that starts and ends on the same line.
    pub fn on_line(line: u32, start_character: u32, end_character: u32) -> Self {
        Range {
            start: Position::new(line, start_character),
            end: Position::new(line, end_character),
        }
    }

    /// Inclusive containment test: `start <= position <= end`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Inclusive containment of a `(line, column)` pair.
    #[must_use]
    pub fn contains_character(&self, line: u32, character: u32) -> bool {
        self.contains(Position::new(line, character))
    }
}

/// A name together with the range it occupies in the source.
///
/// Used both for entity names (`define user greet`) and for `$variable`
/// occurrences, whose range excludes the leading `$`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRange {
    pub name: String,
    pub range: Range,
}

impl NamedRange {
    pub fn new(name: impl Into<String>, range: Range) -> Self {
        NamedRange {
            name: name.into(),
            range,
        }
    }
}

/// One classified line of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub kind: LineKind,
    /// Zero-based line number within the owning document.
    pub number: u32,
    /// Raw line text with any trailing `\r` removed.
    pub text: String,
}

/// The closed set of line constructs. Each variant only carries the fields
/// that make sense for it; a missing name means the line was recognized but
/// is incomplete.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// `define <kind> <name>`
    Define {
        entity_type: Option<EntityType>,
        name: Option<NamedRange>,
    },
    /// `user <name>`
    User { name: Option<NamedRange> },
    /// `bot <name>`
    Bot { name: Option<NamedRange> },
    /// `do <name>`, a subflow call.
    Do { name: Option<NamedRange> },
    /// A quoted utterance.
    Message { variables: Vec<NamedRange> },
    Comment,
    /// `if <condition>`
    If { variables: Vec<NamedRange> },
    /// `[else] when [user <name>]`
    When {
        entity_type: Option<EntityType>,
        name: Option<NamedRange>,
        is_else: bool,
    },
    /// `$name = <expression>`
    Variable {
        name: Option<NamedRange>,
        variables: Vec<NamedRange>,
    },
    /// Anything no rule recognized. Blank lines and a bare `else` land here too
    /// but are flagged so they are not reported.
    Unknown { empty: bool, bare_else: bool },
}

impl LineKind {
    /// Short lowercase tag for the line kind, as used in logs.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            LineKind::Define { .. } => "define",
            LineKind::User { .. } => "user",
            LineKind::Bot { .. } => "bot",
            LineKind::Do { .. } => "do",
            LineKind::Message { .. } => "message",
            LineKind::Comment => "comment",
            LineKind::If { .. } => "if",
            LineKind::When { .. } => "when",
            LineKind::Variable { .. } => "variable",
            LineKind::Unknown { .. } => "unknown",
        }
    }
}

impl Line {
    /// The range covering the whole line text.
    #[must_use]
    pub fn full_range(&self) -> Range {
        Range::on_line(self.number, 0, crate::utils::utf16_len(&self.text))
    }

    /// Blank lines and a lone `else` are unknown but never reported.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        matches!(
            self.kind,
            LineKind::Unknown { empty: true, .. } | LineKind::Unknown { bare_else: true, .. }
        )
    }
}
