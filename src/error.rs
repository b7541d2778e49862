use crate::document::Document;
use crate::utils::byte_offset;
use crate::validator::{self, Severity};
use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ColangError {
    #[error("Failed to read settings file {path}")]
    #[diagnostic(
        code(config::io),
        help("Check that the settings file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON settings")]
    #[diagnostic(
        code(config::json),
        help("Settings must be a JSON object with camelCase keys, e.g. maxNumberOfProblems.")
    )]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML settings")]
    #[diagnostic(
        code(config::yaml),
        help("Settings must be a mapping such as `maxNumberOfProblems: 100`.")
    )]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported settings file {path}")]
    #[diagnostic(
        code(config::unsupported_format),
        help("Use a .json, .yaml or .yml file.")
    )]
    UnsupportedSettingsFormat { path: String },
}

/// A validator diagnostic bound to its source text, renderable through miette.
///
/// ```ignore
/// let report = miette::Report::new(DiagnosticReport::new(&document, &diagnostic));
/// eprintln!("{report:?}");
/// ```
#[derive(Error, Debug)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    severity: Severity,
    src: NamedSource<Arc<str>>,
    span: SourceSpan,
}

impl DiagnosticReport {
    pub fn new(document: &Document, diagnostic: &validator::Diagnostic) -> Self {
        let range = diagnostic.range;
        let start = source_offset(document, range.start.line, range.start.character);
        let end = source_offset(document, range.end.line, range.end.character);

        DiagnosticReport {
            message: diagnostic.message.clone(),
            severity: diagnostic.severity,
            src: NamedSource::new(document.uri(), document.shared_source()),
            span: (start, end.saturating_sub(start)).into(),
        }
    }

    pub fn span(&self) -> SourceSpan {
        self.span
    }
}

impl Diagnostic for DiagnosticReport {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        let code = match self.severity {
            Severity::Error => "colang::error",
            Severity::Warning => "colang::warning",
        };
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.message.clone()),
            self.span,
        ))))
    }
}

/// Byte offset of a (line, UTF-16 column) position in the document source.
fn source_offset(document: &Document, line: u32, character: u32) -> usize {
    match (document.line_offset(line), document.line(line)) {
        (Some(start), Some(text)) => start + byte_offset(&text.text, character),
        _ => document.source().len(),
    }
}
