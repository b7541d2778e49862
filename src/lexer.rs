use crate::ast::{NamedRange, Range};

/// Scans a single line for `$identifier` variable tokens.
///
/// Identifiers start with an ASCII letter or underscore and continue with
/// ASCII letters, digits, or underscores. A `$` not followed by an identifier
/// start is ignored. Ranges cover only the identifier, not the `$`, and are
/// measured in UTF-16 columns.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: u32,
    /// Current UTF-16 column of the next unread character.
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, line: u32) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line,
            column: 0,
        }
    }

    /// Collects every variable occurrence on the line, left to right.
    pub fn lex(&mut self) -> Vec<NamedRange> {
        let mut variables = Vec::new();
        while let Some(variable) = self.next_variable() {
            variables.push(variable);
        }
        variables
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            self.column += c.len_utf16() as u32;
        }
        next
    }

    fn next_variable(&mut self) -> Option<NamedRange> {
        while let Some((_, c)) = self.advance() {
            if c != '$' {
                continue;
            }
            match self.chars.peek() {
                Some(&(start, next)) if is_identifier_start(next) => {
                    return Some(self.read_identifier(start));
                }
                _ => {}
            }
        }
        None
    }

    fn read_identifier(&mut self, start: usize) -> NamedRange {
        let start_column = self.column;
        let mut end = start;
        while let Some(&(offset, c)) = self.chars.peek() {
            if !is_identifier_continue(c) {
                break;
            }
            end = offset + c.len_utf8();
            self.advance();
        }
        NamedRange::new(
            &self.input[start..end],
            Range::on_line(self.line, start_column, self.column),
        )
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience wrapper around [`Lexer::lex`].
pub fn scan_variables(line: &str, line_number: u32) -> Vec<NamedRange> {
    Lexer::new(line, line_number).lex()
}
