use crate::ast::{EntityType, Line, LineKind, NamedRange, Range};
use crate::config::Settings;
use crate::document::Document;
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String,
    pub source: String,
}

impl Diagnostic {
    fn new(severity: Severity, message: String, range: Range) -> Self {
        Diagnostic {
            range,
            severity,
            message,
            source: "colang".to_string(),
        }
    }

    pub fn error(message: impl Into<String>, range: Range) -> Self {
        Self::new(Severity::Error, message.into(), range)
    }

    pub fn warning(message: impl Into<String>, range: Range) -> Self {
        Self::new(Severity::Warning, message.into(), range)
    }
}

/// One definition or reference site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReferenceEntry {
    pub entity_type: EntityType,
    pub name: String,
    pub range: Range,
}

/// All definitions and references of one `(type, name)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCrossReference {
    pub definitions: Vec<CrossReferenceEntry>,
    pub references: Vec<CrossReferenceEntry>,
}

/// Name to cross-reference table, kept in first-seen order.
pub type EntityTable = IndexMap<String, EntityCrossReference>;

/// Cross-reference tables for every entity type, plus the lines that could
/// not contribute to any of them.
#[derive(Debug, Default)]
pub struct EntityIndex<'a> {
    users: EntityTable,
    bots: EntityTable,
    flows: EntityTable,
    subflows: EntityTable,
    variables: EntityTable,
    unknown: Vec<&'a Line>,
}

impl<'a> EntityIndex<'a> {
    /// Builds a fresh index from a single pass over `document`.
    pub fn build(document: &'a Document) -> Self {
        document
            .lines()
            .iter()
            .fold(EntityIndex::default(), |mut index, line| {
                index.record(line);
                index
            })
    }

    pub fn table(&self, entity_type: EntityType) -> &EntityTable {
        match entity_type {
            EntityType::User => &self.users,
            EntityType::Bot => &self.bots,
            EntityType::Flow => &self.flows,
            EntityType::Subflow => &self.subflows,
            EntityType::Variable => &self.variables,
        }
    }

    fn table_mut(&mut self, entity_type: EntityType) -> &mut EntityTable {
        match entity_type {
            EntityType::User => &mut self.users,
            EntityType::Bot => &mut self.bots,
            EntityType::Flow => &mut self.flows,
            EntityType::Subflow => &mut self.subflows,
            EntityType::Variable => &mut self.variables,
        }
    }

    pub fn get(&self, entity_type: EntityType, name: &str) -> Option<&EntityCrossReference> {
        self.table(entity_type).get(name)
    }

    /// Lines that matched no rule or lacked a required name.
    pub fn unknown(&self) -> &[&'a Line] {
        &self.unknown
    }

    fn entry(&mut self, entity_type: EntityType, name: &str) -> &mut EntityCrossReference {
        self.table_mut(entity_type)
            .entry(name.to_string())
            .or_default()
    }

    fn define(&mut self, entity_type: EntityType, named: &NamedRange) {
        let entry = cross_reference_entry(entity_type, named);
        self.entry(entity_type, &named.name).definitions.push(entry);
    }

    fn reference(&mut self, entity_type: EntityType, named: &NamedRange) {
        let entry = cross_reference_entry(entity_type, named);
        self.entry(entity_type, &named.name).references.push(entry);
    }

    fn reference_all(&mut self, variables: &[NamedRange]) {
        for variable in variables {
            self.reference(EntityType::Variable, variable);
        }
    }

    fn record(&mut self, line: &'a Line) {
        match &line.kind {
            LineKind::Define {
                entity_type: Some(entity_type),
                name: Some(name),
            } => self.define(*entity_type, name),
            LineKind::User { name: Some(name) } => self.reference(EntityType::User, name),
            LineKind::Bot { name: Some(name) } => self.reference(EntityType::Bot, name),
            LineKind::Do { name: Some(name) } => self.reference(EntityType::Subflow, name),
            LineKind::When {
                entity_type: Some(entity_type),
                name: Some(name),
                ..
            } => self.reference(*entity_type, name),
            LineKind::Message { variables } | LineKind::If { variables } => {
                self.reference_all(variables);
            }
            LineKind::Variable { name, variables } => {
                match name {
                    Some(name) => self.define(EntityType::Variable, name),
                    None => self.unknown.push(line),
                }
                self.reference_all(variables);
            }
            LineKind::Comment => {}
            LineKind::Define { .. }
            | LineKind::User { .. }
            | LineKind::Bot { .. }
            | LineKind::Do { .. }
            | LineKind::When { .. }
            | LineKind::Unknown { .. } => self.unknown.push(line),
        }
    }
}

fn cross_reference_entry(entity_type: EntityType, named: &NamedRange) -> CrossReferenceEntry {
    CrossReferenceEntry {
        entity_type,
        name: named.name.clone(),
        range: named.range,
    }
}

/// Which rules apply to an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRules {
    pub undefined: bool,
    pub duplicate: bool,
    pub unused: bool,
}

impl EntityRules {
    /// Flows may be entry points and are never "unused"; variables may be
    /// reassigned and are never "duplicate".
    pub fn for_type(entity_type: EntityType) -> Self {
        EntityRules {
            undefined: true,
            duplicate: entity_type != EntityType::Variable,
            unused: entity_type != EntityType::Flow,
        }
    }
}

/// Derives diagnostics from a document's cross-reference index.
///
/// Holds only settings; each call to [`Validator::validate`] builds its own
/// index, so a validator can be reused across documents and edits.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    settings: Settings,
}

impl Validator {
    pub fn new(settings: Settings) -> Self {
        Validator { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn validate(&self, document: &Document) -> Vec<Diagnostic> {
        let index = EntityIndex::build(document);
        let mut diagnostics = Vec::new();

        for entity_type in EntityType::ALL {
            let table = index.table(entity_type);
            debug!("{} table: {} names", entity_type, table.len());
            let rules = EntityRules::for_type(entity_type);
            for cross_reference in table.values() {
                check_entity(cross_reference, rules, &mut diagnostics);
            }
        }

        if self.settings.report_unknown_lines {
            diagnostics.extend(
                index
                    .unknown()
                    .iter()
                    .filter(|line| !line.is_suppressed())
                    .map(|line| Diagnostic::error("Unknown line", line.full_range())),
            );
        }

        diagnostics.truncate(self.settings.max_number_of_problems);
        debug!(
            "{} diagnostics for {}",
            diagnostics.len(),
            document.uri()
        );
        diagnostics
    }
}

fn check_entity(
    cross_reference: &EntityCrossReference,
    rules: EntityRules,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let EntityCrossReference {
        definitions,
        references,
    } = cross_reference;

    if rules.undefined && definitions.is_empty() {
        diagnostics.extend(references.iter().map(|entry| {
            Diagnostic::error(
                format!(
                    "{} '{}' does not exist",
                    entry.entity_type.pretty_name(),
                    entry.name
                ),
                entry.range,
            )
        }));
    }

    if rules.duplicate && definitions.len() > 1 {
        diagnostics.extend(definitions.iter().map(|entry| {
            Diagnostic::error(
                format!("Duplicate {} definition", entry.entity_type),
                entry.range,
            )
        }));
    }

    if rules.unused && !definitions.is_empty() && references.is_empty() {
        diagnostics.extend(definitions.iter().map(|entry| {
            Diagnostic::warning(
                format!(
                    "{} '{}' is declared but never used",
                    entry.entity_type.pretty_name(),
                    entry.name
                ),
                entry.range,
            )
        }));
    }
}

/// Validates `document` with default settings.
pub fn validate(document: &Document) -> Vec<Diagnostic> {
    Validator::default().validate(document)
}
