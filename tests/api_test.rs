use colang_core::analyze;
use colang_core::config::Settings;
use colang_core::validator::Severity;

#[test]
fn test_analyze_to_json() {
    let source = "define bot greet\n  \"Hi!\"\n\ndefine flow hello\n  bot greet\n  bot missing\n";

    let expected_json = serde_json::json!({
        "uri": "file:///hello.co",
        "symbols": [
            {
                "name": "greet",
                "kind": "bot",
                "range": {
                    "start": { "line": 0, "character": 11 },
                    "end": { "line": 0, "character": 16 }
                }
            },
            {
                "name": "hello",
                "kind": "flow",
                "range": {
                    "start": { "line": 3, "character": 12 },
                    "end": { "line": 3, "character": 17 }
                }
            }
        ],
        "diagnostics": [
            {
                "range": {
                    "start": { "line": 5, "character": 6 },
                    "end": { "line": 5, "character": 13 }
                },
                "severity": "error",
                "message": "Bot 'missing' does not exist",
                "source": "colang"
            }
        ]
    });

    let analysis_result = analyze(source, "file:///hello.co");
    let result = analysis_result.to_json().unwrap();
    let result_json: serde_json::Value = serde_json::from_str(&result).unwrap();

    assert_eq!(result_json, expected_json);
}

#[test]
fn test_analyze_to_yaml() {
    let analysis_result = analyze("define flow main\n", "main.co");
    let result = analysis_result.to_yaml().unwrap();

    let expected_yaml = "uri: main.co
symbols:
- name: main
  kind: flow
  range:
    start:
      line: 0
      character: 12
    end:
      line: 0
      character: 16
diagnostics: []
";
    assert_eq!(result, expected_yaml);
}

#[test]
fn test_analyze_empty_source() {
    let analysis_result = analyze("", "empty.co");
    assert!(analysis_result.document.is_empty());
    assert!(analysis_result.diagnostics.is_empty());
    assert!(analysis_result.symbols.is_empty());
    assert!(!analysis_result.has_errors());
}

#[test]
fn test_warnings_are_not_errors() {
    let analysis_result = analyze("define user hi\n", "warn.co");
    assert_eq!(analysis_result.diagnostics.len(), 1);
    assert_eq!(analysis_result.diagnostics[0].severity, Severity::Warning);
    assert!(!analysis_result.has_errors());
}

#[test]
fn test_analyze_with_settings_limits_output() {
    let settings = Settings {
        max_number_of_problems: 1,
        ..Settings::default()
    };
    let analysis_result =
        colang_core::analyze_with_settings("user a\nuser b\n%%%\n", "many.co", &settings);
    assert_eq!(analysis_result.diagnostics.len(), 1);
    assert_eq!(analysis_result.diagnostics[0].message, "User 'a' does not exist");
}

#[test]
fn test_reports_render_with_miette() {
    let analysis_result = analyze("bot unknown_bot\n", "render.co");
    let reports = analysis_result.reports();
    assert_eq!(reports.len(), 1);

    let rendered = format!("{:?}", miette::Report::new(reports.into_iter().next().unwrap()));
    assert!(rendered.contains("Bot 'unknown_bot' does not exist"));
}
