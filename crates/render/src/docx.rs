//! DOCX emitter.
//!
//! Writes a minimal WordprocessingML package: content types, package and
//! document relationships, the main document and a style sheet. Layout
//! follows APA conventions: 1 inch margins, double-spaced body text with a
//! half-inch first-line indent, and hanging-indented references.

use crate::classify::{LineKind, classify_body};
use paperforge_core::error::RenderError;
use paperforge_core::paper::Reference;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Twentieths of a point per inch.
const TWIPS_PER_INCH: u32 = 1440;
const HALF_INCH: u32 = TWIPS_PER_INCH / 2;
/// `w:line` value for double spacing (240 = single).
const DOUBLE_SPACED: u32 = 480;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman" w:cs="Times New Roman"/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:style></w:styles>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

/// Build the `.docx` bytes for `body` followed by `references`.
pub fn render(body: &str, references: &[Reference]) -> Result<Vec<u8>, RenderError> {
    let document = document_xml(body, references);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, contents) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        ("word/document.xml", document.as_str()),
        ("word/styles.xml", STYLES),
    ] {
        zip.start_file(name, options).map_err(archive_error)?;
        zip.write_all(contents.as_bytes())
            .map_err(|e| RenderError::Archive(e.to_string()))?;
    }

    let cursor = zip.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

fn archive_error(e: zip::result::ZipError) -> RenderError {
    RenderError::Archive(e.to_string())
}

/// The `word/document.xml` part.
pub fn document_xml(body: &str, references: &[Reference]) -> String {
    let mut xml = String::from(DOCUMENT_OPEN);

    for (kind, line) in classify_body(body) {
        let paragraph = match kind {
            LineKind::Heading1 => Paragraph::heading("Heading1", "center"),
            LineKind::Heading2 => Paragraph::heading("Heading2", "left"),
            LineKind::Paragraph => Paragraph::body(),
        };
        paragraph.write(&mut xml, line);
    }

    if !references.is_empty() {
        Paragraph::heading("Heading1", "center").write(&mut xml, "References");
        for reference in references {
            Paragraph::reference().write(&mut xml, reference.as_str());
        }
    }

    xml.push_str(&format!(
        r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="{h}" w:footer="{h}" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        m = TWIPS_PER_INCH,
        h = HALF_INCH,
    ));
    xml
}

/// Paragraph properties for one emitted line.
struct Paragraph {
    style: Option<&'static str>,
    justification: &'static str,
    double_spaced: bool,
    indent: Option<String>,
}

impl Paragraph {
    fn heading(style: &'static str, justification: &'static str) -> Self {
        Self {
            style: Some(style),
            justification,
            double_spaced: false,
            indent: None,
        }
    }

    fn body() -> Self {
        Self {
            style: None,
            justification: "left",
            double_spaced: true,
            indent: Some(format!(r#"<w:ind w:firstLine="{HALF_INCH}"/>"#)),
        }
    }

    fn reference() -> Self {
        Self {
            style: None,
            justification: "left",
            double_spaced: true,
            indent: Some(format!(r#"<w:ind w:left="{HALF_INCH}" w:hanging="{HALF_INCH}"/>"#)),
        }
    }

    fn write(&self, xml: &mut String, text: &str) {
        xml.push_str("<w:p><w:pPr>");
        if let Some(style) = self.style {
            xml.push_str(&format!(r#"<w:pStyle w:val="{style}"/>"#));
        }
        if self.double_spaced {
            xml.push_str(&format!(
                r#"<w:spacing w:line="{DOUBLE_SPACED}" w:lineRule="auto"/>"#
            ));
        }
        if let Some(indent) = &self.indent {
            xml.push_str(indent);
        }
        xml.push_str(&format!(r#"<w:jc w:val="{}"/>"#, self.justification));
        xml.push_str(r#"</w:pPr><w:r><w:t xml:space="preserve">"#);
        xml.push_str(&escape_xml(text));
        xml.push_str("</w:t></w:r></w:p>");
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab are not allowed in XML 1.0
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn refs() -> Vec<Reference> {
        vec![
            Reference::from("Hopper, G. (2019). Grid Storage. https://doi.org/10.1/g"),
            Reference::from("Lovelace, A. (2021). Perovskites & Tandems."),
        ]
    }

    const BODY: &str = "Title\nRenewable Energy\n\nAbstract\nRenewables now supply a third of power.\n";

    #[test]
    fn package_contains_required_parts() {
        let bytes = render(BODY, &refs()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/_rels/document.xml.rels",
            "word/document.xml",
            "word/styles.xml",
        ] {
            assert!(archive.by_name(part).is_ok(), "missing {part}");
        }

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert_eq!(document, document_xml(BODY, &refs()));
    }

    #[test]
    fn headings_and_paragraphs_styled() {
        let xml = document_xml(BODY, &[]);
        assert!(xml.contains(
            r#"<w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">Title</w:t>"#
        ));
        assert!(xml.contains(
            r#"<w:pStyle w:val="Heading2"/><w:jc w:val="left"/></w:pPr><w:r><w:t xml:space="preserve">Renewable Energy</w:t>"#
        ));
        assert!(xml.contains(
            r#"<w:spacing w:line="480" w:lineRule="auto"/><w:ind w:firstLine="720"/><w:jc w:val="left"/></w:pPr><w:r><w:t xml:space="preserve">Renewables now supply a third of power.</w:t>"#
        ));
        assert!(xml.contains(r#"w:top="1440" w:right="1440" w:bottom="1440" w:left="1440""#));
    }

    #[test]
    fn references_section_only_when_present() {
        assert!(!document_xml(BODY, &[]).contains(">References<"));

        let xml = document_xml(BODY, &refs());
        assert_eq!(xml.matches(">References<").count(), 1);
        assert_eq!(xml.matches(r#"<w:ind w:left="720" w:hanging="720"/>"#).count(), 2);
        assert!(xml.contains("Perovskites &amp; Tandems."));
        let heading = xml.find(">References<").unwrap();
        assert!(xml.find("Grid Storage").unwrap() > heading);
    }

    #[test]
    fn escapes_markup_and_control_chars() {
        assert_eq!(escape_xml(r#"a<b>&"c"'d'"#), "a&lt;b&gt;&amp;&quot;c&quot;&apos;d&apos;");
        assert_eq!(escape_xml("x\u{0}y\tz"), "xy\tz");
    }
}
