//! Plain text: body, a `References` header, one reference per line.

use paperforge_core::paper::Reference;

pub fn render(body: &str, references: &[Reference]) -> String {
    let lines: Vec<&str> = references.iter().map(Reference::as_str).collect();
    format!("{body}\n\nReferences\n\n{}", lines.join("\n"))
}
