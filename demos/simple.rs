use colang_core::analyze;

fn main() {
    let colang = r#"
define user express greeting
  "hello"

define flow greeting
  user express greeting
  bot express greeting
"#;

    let result = analyze(colang, "example.co");
    match result.to_json() {
        Ok(json_output) => println!("Analysis of Colang script:\n{json_output}"),
        Err(e) => eprintln!("Failed to serialize analysis: {e:?}"),
    }

    for report in result.reports() {
        eprintln!("{:?}", miette::Report::new(report));
    }
}
