//! Markdown: body, a `## References` heading, one bullet per reference.

use paperforge_core::paper::Reference;

pub fn render(body: &str, references: &[Reference]) -> String {
    let bullets: Vec<String> = references.iter().map(|r| format!("- {r}")).collect();
    format!("{body}\n\n## References\n\n{}", bullets.join("\n"))
}
