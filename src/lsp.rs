use crate::ast::{EntityType, Line, LineKind, NamedRange, Range};
use serde::Serialize;
use std::collections::HashMap;

/// The entity found under a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionData {
    /// Kind of the entity; `do` lines resolve to subflows.
    pub entity_type: EntityType,
    pub entity_name: String,
    /// Range of the name under the cursor.
    pub range: Range,
}

/// A range inside a specific document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

/// One outline entry, produced for every `define` line with a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: EntityType,
    pub range: Range,
}

/// Replace the text in `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

/// Edits grouped by document uri.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WorkspaceEdit {
    pub changes: HashMap<String, Vec<TextEdit>>,
}

/// Hover text for an entity name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    /// `<Kind> '<name>'`, plus the definition line when one exists.
    pub contents: String,
    /// The hovered name.
    pub range: Range,
}

fn named(name: &Option<NamedRange>) -> Option<&NamedRange> {
    name.as_ref()
}

fn matches_name(candidate: Option<&NamedRange>, name: &str) -> Option<Range> {
    candidate.filter(|n| n.name == name).map(|n| n.range)
}

fn position_data(entity_type: EntityType, named: &NamedRange) -> PositionData {
    PositionData {
        entity_type,
        entity_name: named.name.clone(),
        range: named.range,
    }
}

fn variable_at(variables: &[NamedRange], line: u32, character: u32) -> Option<PositionData> {
    variables
        .iter()
        .find(|v| v.range.contains_character(line, character))
        .map(|v| position_data(EntityType::Variable, v))
}

fn variable_ranges(variables: &[NamedRange], entity_type: EntityType, name: &str) -> Vec<Range> {
    if entity_type != EntityType::Variable {
        return Vec::new();
    }
    variables
        .iter()
        .filter(|v| v.name == name)
        .map(|v| v.range)
        .collect()
}

impl Line {
    /// The entity whose name range contains `character` on this line.
    pub fn entity_at(&self, character: u32) -> Option<PositionData> {
        let hit = |entity_type: EntityType, name: &Option<NamedRange>| {
            named(name)
                .filter(|n| n.range.contains_character(self.number, character))
                .map(|n| position_data(entity_type, n))
        };

        match &self.kind {
            LineKind::Define { entity_type, name } => hit((*entity_type)?, name),
            LineKind::User { name } => hit(EntityType::User, name),
            LineKind::Bot { name } => hit(EntityType::Bot, name),
            LineKind::Do { name } => hit(EntityType::Subflow, name),
            LineKind::When {
                entity_type, name, ..
            } => hit((*entity_type)?, name),
            LineKind::Message { variables } | LineKind::If { variables } => {
                variable_at(variables, self.number, character)
            }
            LineKind::Variable { name, variables } => hit(EntityType::Variable, name)
                .or_else(|| variable_at(variables, self.number, character)),
            LineKind::Comment | LineKind::Unknown { .. } => None,
        }
    }

    /// The range of the definition this line provides for `(entity_type, name)`, if any.
    pub fn definition_range(&self, entity_type: EntityType, name: &str) -> Option<Range> {
        match &self.kind {
            LineKind::Define {
                entity_type: Some(defined),
                name: defined_name,
            } if *defined == entity_type => matches_name(named(defined_name), name),
            LineKind::Variable {
                name: defined_name, ..
            } if entity_type == EntityType::Variable => matches_name(named(defined_name), name),
            LineKind::Define { .. }
            | LineKind::Variable { .. }
            | LineKind::User { .. }
            | LineKind::Bot { .. }
            | LineKind::Do { .. }
            | LineKind::Message { .. }
            | LineKind::Comment
            | LineKind::If { .. }
            | LineKind::When { .. }
            | LineKind::Unknown { .. } => None,
        }
    }

    /// Every range on this line that references `(entity_type, name)`.
    /// Definitions are not included.
    pub fn reference_ranges(&self, entity_type: EntityType, name: &str) -> Vec<Range> {
        let single = |kind: EntityType, candidate: &Option<NamedRange>| -> Vec<Range> {
            if kind != entity_type {
                return Vec::new();
            }
            matches_name(named(candidate), name).into_iter().collect()
        };

        match &self.kind {
            LineKind::User { name: n } => single(EntityType::User, n),
            LineKind::Bot { name: n } => single(EntityType::Bot, n),
            LineKind::Do { name: n } => single(EntityType::Subflow, n),
            LineKind::When {
                entity_type: Some(kind),
                name: n,
                ..
            } => single(*kind, n),
            LineKind::Message { variables }
            | LineKind::If { variables }
            | LineKind::Variable { variables, .. } => {
                variable_ranges(variables, entity_type, name)
            }
            LineKind::When {
                entity_type: None, ..
            }
            | LineKind::Define { .. }
            | LineKind::Comment
            | LineKind::Unknown { .. } => Vec::new(),
        }
    }

    /// Replacement edits for every occurrence of `(entity_type, name)` on this
    /// line, definition first, then references left to right.
    pub fn rename_edits(&self, entity_type: EntityType, name: &str, new_name: &str) -> Vec<TextEdit> {
        self.definition_range(entity_type, name)
            .into_iter()
            .chain(self.reference_ranges(entity_type, name))
            .map(|range| TextEdit {
                range,
                new_text: new_name.to_string(),
            })
            .collect()
    }

    /// Outline entry for a named `define` line.
    pub fn symbol(&self) -> Option<DocumentSymbol> {
        match &self.kind {
            LineKind::Define {
                entity_type: Some(kind),
                name: Some(n),
            } => Some(DocumentSymbol {
                name: n.name.clone(),
                kind: *kind,
                range: n.range,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    #[test]
    fn test_entity_at_define_requires_column_in_range() {
        let line = parse_line("define bot greet", 3);
        let found = line.entity_at(13).unwrap();
        assert_eq!(found.entity_type, EntityType::Bot);
        assert_eq!(found.entity_name, "greet");
        assert!(line.entity_at(2).is_none());
    }

    #[test]
    fn test_entity_at_end_column_is_inclusive() {
        let line = parse_line("user greet", 0);
        assert!(line.entity_at(10).is_some());
        assert!(line.entity_at(11).is_none());
    }

    #[test]
    fn test_entity_at_do_is_subflow() {
        let line = parse_line("do check", 0);
        assert_eq!(line.entity_at(4).unwrap().entity_type, EntityType::Subflow);
    }

    #[test]
    fn test_entity_at_variable_line() {
        let line = parse_line("$sum = $a + $b", 0);
        assert_eq!(line.entity_at(2).unwrap().entity_name, "sum");
        assert_eq!(line.entity_at(13).unwrap().entity_name, "b");
        assert!(line.entity_at(10).is_none());
    }

    #[test]
    fn test_definition_and_references_are_disjoint() {
        let line = parse_line("$x = $x + 1", 0);
        assert_eq!(
            line.definition_range(EntityType::Variable, "x"),
            Some(Range::on_line(0, 1, 2))
        );
        assert_eq!(
            line.reference_ranges(EntityType::Variable, "x"),
            vec![Range::on_line(0, 6, 7)]
        );
        assert_eq!(line.rename_edits(EntityType::Variable, "x", "y").len(), 2);
    }

    #[test]
    fn test_define_is_not_a_reference() {
        let line = parse_line("define user greet", 0);
        assert!(line.reference_ranges(EntityType::User, "greet").is_empty());
        assert!(line.definition_range(EntityType::Bot, "greet").is_none());
        assert!(line.definition_range(EntityType::User, "greet").is_some());
    }

    #[test]
    fn test_when_user_reference() {
        let line = parse_line("when user ask question", 0);
        assert_eq!(
            line.reference_ranges(EntityType::User, "ask question"),
            vec![Range::on_line(0, 10, 22)]
        );
        assert!(line.reference_ranges(EntityType::Bot, "ask question").is_empty());
    }

    #[test]
    fn test_symbol_only_for_named_define() {
        assert!(parse_line("define flow", 0).symbol().is_none());
        let symbol = parse_line("define flow main", 0).symbol().unwrap();
        assert_eq!(symbol.kind, EntityType::Flow);
        assert_eq!(symbol.name, "main");
    }
}
