use crate::ast::{EntityType, Line, LineKind, NamedRange, Range};
use crate::lexer::scan_variables;
use crate::utils::utf16_column;
use log::trace;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Identifies which classification rule matched a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    Define,
    User,
    Bot,
    Do,
    Message,
    Comment,
    If,
    When,
    Variable,
}

/// The ordered rule table. Order is precedence: the first matching rule wins.
///
/// Keywords must end on a word boundary, so `username` is not a `user` line.
fn rules() -> &'static [(LineRule, Regex)] {
    static RULES: OnceLock<Vec<(LineRule, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (
                LineRule::Define,
                r"^\s*define\b(?:\s+(user|bot|flow|subflow)\b(?:\s+(.*))?)?",
            ),
            (LineRule::User, r"^\s*user\b(?:\s+(.*))?"),
            (LineRule::Bot, r"^\s*bot\b(?:\s+(.*))?"),
            (LineRule::Do, r"^\s*do\b(?:\s+(.*))?"),
            (LineRule::Message, r#"^\s*""#),
            (LineRule::Comment, r"^\s*#"),
            (LineRule::If, r"^\s*if\b"),
            (
                LineRule::When,
                r"^\s*(else\s+)?when\b(?:\s+(user)\b(?:\s+(.*))?)?",
            ),
            (LineRule::Variable, r"^\s*\$([^=\s]*)(?:\s*=(.*))?"),
        ]
        .into_iter()
        .map(|(rule, pattern)| {
            let regex = Regex::new(pattern).expect("line rule patterns are valid regexes");
            (rule, regex)
        })
        .collect()
    })
}

fn bare_else() -> &'static Regex {
    static BARE_ELSE: OnceLock<Regex> = OnceLock::new();
    BARE_ELSE.get_or_init(|| Regex::new(r"^\s*else\s*$").expect("bare else pattern is valid"))
}

/// Runs the rule table against `text` and returns the first rule that matches.
pub fn match_line(text: &str) -> Option<(LineRule, Captures<'_>)> {
    rules()
        .iter()
        .find_map(|(rule, regex)| regex.captures(text).map(|caps| (*rule, caps)))
}

/// Classifies one line of source text.
pub fn parse_line(text: &str, number: u32) -> Line {
    let kind = match match_line(text) {
        Some((rule, caps)) => {
            trace!("line {number}: matched {rule:?}");
            parse_kind(rule, &caps, text, number)
        }
        None => {
            trace!("line {number}: no rule matched");
            LineKind::Unknown {
                empty: text.trim().is_empty(),
                bare_else: bare_else().is_match(text),
            }
        }
    };

    Line {
        kind,
        number,
        text: text.to_string(),
    }
}

/// Splits `source` into lines and classifies each one.
///
/// Empty input yields no lines. Otherwise the text is split on `\n`, a
/// trailing `\r` is dropped from each line, and the result has exactly one
/// entry per line in source order.
pub fn parse_lines(source: &str) -> Vec<Line> {
    if source.is_empty() {
        return Vec::new();
    }
    source
        .split('\n')
        .enumerate()
        .map(|(number, text)| parse_line(text.strip_suffix('\r').unwrap_or(text), number as u32))
        .collect()
}

fn parse_kind(rule: LineRule, caps: &Captures<'_>, text: &str, number: u32) -> LineKind {
    match rule {
        LineRule::Define => LineKind::Define {
            entity_type: caps
                .get(1)
                .and_then(|m| EntityType::from_define_keyword(m.as_str())),
            name: capture_name(caps, 2, text, number),
        },
        LineRule::User => LineKind::User {
            name: capture_name(caps, 1, text, number),
        },
        LineRule::Bot => LineKind::Bot {
            name: capture_name(caps, 1, text, number),
        },
        LineRule::Do => LineKind::Do {
            name: capture_name(caps, 1, text, number),
        },
        LineRule::Message => LineKind::Message {
            variables: scan_variables(text, number),
        },
        LineRule::Comment => LineKind::Comment,
        LineRule::If => LineKind::If {
            variables: scan_variables(text, number),
        },
        LineRule::When => LineKind::When {
            entity_type: caps.get(2).map(|_| EntityType::User),
            name: capture_name(caps, 3, text, number),
            is_else: caps.get(1).is_some(),
        },
        LineRule::Variable => {
            // References only count on the right-hand side of `=`.
            let variables = match caps.get(2) {
                Some(rhs) => {
                    let rhs_column = utf16_column(text, rhs.start());
                    scan_variables(text, number)
                        .into_iter()
                        .filter(|v| v.range.start.character >= rhs_column)
                        .collect()
                }
                None => Vec::new(),
            };
            LineKind::Variable {
                name: capture_name(caps, 1, text, number),
                variables,
            }
        }
    }
}

/// Extracts a rest-of-line name capture with trailing whitespace removed.
///
/// The range comes from the capture's own offset, so a name that also
/// appears inside the leading keyword (`define user user`) still gets the
/// right columns.
fn capture_name(caps: &Captures<'_>, group: usize, text: &str, number: u32) -> Option<NamedRange> {
    let m = caps.get(group)?;
    let name = m.as_str().trim_end();
    if name.is_empty() {
        return None;
    }
    let start = m.start();
    let end = start + name.len();
    Some(NamedRange::new(
        name,
        Range::on_line(number, utf16_column(text, start), utf16_column(text, end)),
    ))
}
