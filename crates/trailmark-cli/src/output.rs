use std::collections::BTreeMap;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Trait for formatting CLI output
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);

    /// Prints a key/value table, aligned on the longest key.
    fn table(&self, rows: &BTreeMap<String, String>) {
        let width = rows.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in rows {
            self.info(&format!("{key:<width$}  {value}"));
        }
    }
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        println!("  {}", message);
    }
    fn print_json(&self, _value: &serde_json::Value) {}
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
    fn table(&self, rows: &BTreeMap<String, String>) {
        self.print_json(&serde_json::json!(rows));
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter),
    }
}
