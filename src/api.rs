use crate::config::Settings;
use crate::document::Document;
use crate::error::DiagnosticReport;
use crate::lsp::DocumentSymbol;
use crate::validator::{Diagnostic, Severity, Validator};
use serde::Serialize;

/// Everything derived from one (uri, text) snapshot: the classified document,
/// its outline and its diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    #[serde(skip)]
    pub document: Document,
    pub uri: String,
    pub symbols: Vec<DocumentSymbol>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    /// True when at least one diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Serializes the uri, symbols and diagnostics into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the uri, symbols and diagnostics into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }

    /// miette reports for every diagnostic, in order, for terminal rendering.
    #[must_use]
    pub fn reports(&self) -> Vec<DiagnosticReport> {
        self.diagnostics
            .iter()
            .map(|d| DiagnosticReport::new(&self.document, d))
            .collect()
    }
}

/// Analyzes a Colang source string with default settings.
///
/// This is the primary entry point: it classifies every line, builds the
/// cross-reference index and collects diagnostics. Problems in the source
/// never make analysis fail; they show up in [`AnalysisResult::diagnostics`].
///
/// # Arguments
///
/// * `source` - The Colang source text.
/// * `uri` - The document identifier reported back in locations and edits.
pub fn analyze(source: &str, uri: &str) -> AnalysisResult {
    analyze_with_settings(source, uri, &Settings::default())
}

/// Like [`analyze`], with explicit validation settings.
pub fn analyze_with_settings(source: &str, uri: &str, settings: &Settings) -> AnalysisResult {
    let document = Document::new(uri, source);
    let diagnostics = Validator::new(settings.clone()).validate(&document);
    let symbols = document.symbols();

    AnalysisResult {
        uri: document.uri().to_string(),
        document,
        symbols,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use crate::analyze;

    #[test]
    fn test_analyze_to_json() {
        let result = analyze("define user greet\nuser greet\n", "file:///greet.co");
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

        let expected = serde_json::json!({
            "uri": "file:///greet.co",
            "symbols": [{
                "name": "greet",
                "kind": "user",
                "range": {
                    "start": { "line": 0, "character": 12 },
                    "end": { "line": 0, "character": 17 }
                }
            }],
            "diagnostics": []
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn test_analyze_to_yaml() {
        let result = analyze("%%%", "bad.co");
        let yaml = result.to_yaml().unwrap();
        assert!(yaml.contains("message: Unknown line"));
        assert!(yaml.contains("severity: error"));
        assert!(result.has_errors());
    }

    #[test]
    fn test_reports_follow_diagnostics() {
        let result = analyze("bot hi\n%%%", "two.co");
        assert_eq!(result.reports().len(), result.diagnostics.len());
    }
}
