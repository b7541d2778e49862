use crate::ast::{EntityType, Line, Position, Range};
use crate::lsp::{DocumentSymbol, Hover, Location, PositionData, WorkspaceEdit};
use crate::parser::parse_lines;
use crate::utils::line_start_offsets;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable, fully classified snapshot of one Colang source text.
///
/// A document is rebuilt from scratch whenever the text changes; every query
/// below is answered from the lines classified at construction.
#[derive(Debug, Clone)]
pub struct Document {
    uri: String,
    source: Arc<str>,
    lines: Vec<Line>,
    line_offsets: Vec<usize>,
}

impl Document {
    pub fn new(uri: impl Into<String>, source: &str) -> Self {
        let uri = uri.into();
        let lines = parse_lines(source);
        debug!("classified {} lines for {uri}", lines.len());
        Document {
            uri,
            source: Arc::from(source),
            lines,
            line_offsets: line_start_offsets(source),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// A reference-counted handle to the source text, for consumers that
    /// need to hold on to it without copying.
    pub fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, number: u32) -> Option<&Line> {
        self.lines.get(number as usize)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Byte offset in [`Document::source`] where line `number` starts.
    pub fn line_offset(&self, number: u32) -> Option<usize> {
        self.line_offsets.get(number as usize).copied()
    }

    /// The entity under `position`, if the cursor sits on a name.
    pub fn position_data(&self, position: Position) -> Option<PositionData> {
        self.line(position.line)?.entity_at(position.character)
    }

    /// Location of the first definition of `(entity_type, name)`.
    pub fn definition(&self, entity_type: EntityType, name: &str) -> Option<Location> {
        self.lines
            .iter()
            .find_map(|line| line.definition_range(entity_type, name))
            .map(|range| self.location(range))
    }

    /// Every reference to `(entity_type, name)` in line order.
    pub fn references(&self, entity_type: EntityType, name: &str) -> Vec<Location> {
        self.lines
            .iter()
            .flat_map(|line| line.reference_ranges(entity_type, name))
            .map(|range| self.location(range))
            .collect()
    }

    /// Go-to-definition for whatever entity is under `position`.
    pub fn definition_at(&self, position: Position) -> Option<Location> {
        let data = self.position_data(position)?;
        self.definition(data.entity_type, &data.entity_name)
    }

    /// Find-references for whatever entity is under `position`.
    pub fn references_at(&self, position: Position) -> Vec<Location> {
        match self.position_data(position) {
            Some(data) => self.references(data.entity_type, &data.entity_name),
            None => Vec::new(),
        }
    }

    /// Outline entries, one per named `define` line.
    pub fn symbols(&self) -> Vec<DocumentSymbol> {
        self.lines.iter().filter_map(Line::symbol).collect()
    }

    /// The range a rename at `position` would replace, or `None` when the
    /// cursor is not on a renameable name.
    pub fn prepare_rename(&self, position: Position) -> Option<Range> {
        self.position_data(position).map(|data| data.range)
    }

    /// Renames the entity under `position` everywhere it is defined or used.
    ///
    /// Returns `None` when nothing is under the cursor or no occurrence exists.
    pub fn rename(&self, position: Position, new_name: &str) -> Option<WorkspaceEdit> {
        let data = self.position_data(position)?;
        let edits: Vec<_> = self
            .lines
            .iter()
            .flat_map(|line| line.rename_edits(data.entity_type, &data.entity_name, new_name))
            .collect();

        if edits.is_empty() {
            return None;
        }

        debug!(
            "renaming {} '{}' to '{new_name}': {} edits",
            data.entity_type,
            data.entity_name,
            edits.len()
        );
        let mut changes = HashMap::new();
        changes.insert(self.uri.clone(), edits);
        Some(WorkspaceEdit { changes })
    }

    /// Short description of the entity under `position`.
    pub fn hover(&self, position: Position) -> Option<Hover> {
        let data = self.position_data(position)?;
        let mut contents = format!(
            "{} '{}'",
            data.entity_type.pretty_name(),
            data.entity_name
        );
        if let Some(location) = self.definition(data.entity_type, &data.entity_name) {
            contents.push_str(&format!(
                " (defined at line {})",
                location.range.start.line + 1
            ));
        }
        Some(Hover {
            contents,
            range: data.range,
        })
    }

    fn location(&self, range: Range) -> Location {
        Location {
            uri: self.uri.clone(),
            range,
        }
    }
}
