//! Minimal WordprocessingML (.docx) writer for [`ReportLayout`].

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{self, Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::layout::{Block, ReportLayout};

pub const DOCX_EXTENSION: &str = "docx";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:rPr><w:sz w:val="22"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:after="300"/></w:pPr><w:rPr><w:b/><w:sz w:val="56"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="2E74B5"/><w:sz w:val="32"/></w:rPr></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style></w:styles>"#;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

type XmlWriter = Writer<Vec<u8>>;

/// Encode the layout as a .docx package
pub fn write_docx(layout: &ReportLayout) -> io::Result<Vec<u8>> {
    let body = document_xml(layout).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/document.xml", body.as_slice()),
    ];
    for (name, content) in parts {
        writer.start_file(name, options)?;
        writer.write_all(content)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Body XML for `word/document.xml`
pub fn document_xml(layout: &ReportLayout) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("w:document").with_attributes([("xmlns:w", WORDML_NS)]),
    ))?;
    start(&mut writer, "w:body")?;

    for block in &layout.blocks {
        match block {
            Block::Title(text) => write_paragraph(&mut writer, text, Some("Title"), true, false)?,
            Block::Heading(text) => write_paragraph(&mut writer, text, Some("Heading1"), false, false)?,
            Block::Paragraph(text) => write_paragraph(&mut writer, text, None, false, false)?,
            Block::Table { rows, header } => write_table(&mut writer, rows, *header)?,
        }
    }

    // A4 portrait, one inch margins
    start(&mut writer, "w:sectPr")?;
    empty(&mut writer, "w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    empty(
        &mut writer,
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    end(&mut writer, "w:sectPr")?;

    end(&mut writer, "w:body")?;
    end(&mut writer, "w:document")?;
    Ok(writer.into_inner())
}

fn start(writer: &mut XmlWriter, name: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))
}

fn end(writer: &mut XmlWriter, name: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn empty(writer: &mut XmlWriter, name: &str, attributes: &[(&str, &str)]) -> quick_xml::Result<()> {
    writer.write_event(Event::Empty(
        BytesStart::new(name).with_attributes(attributes.iter().copied()),
    ))
}

fn write_paragraph(
    writer: &mut XmlWriter,
    text: &str,
    style: Option<&str>,
    centered: bool,
    bold: bool,
) -> quick_xml::Result<()> {
    start(writer, "w:p")?;
    if style.is_some() || centered {
        start(writer, "w:pPr")?;
        if let Some(style) = style {
            empty(writer, "w:pStyle", &[("w:val", style)])?;
        }
        if centered {
            empty(writer, "w:jc", &[("w:val", "center")])?;
        }
        end(writer, "w:pPr")?;
    }
    write_run(writer, text, bold)?;
    end(writer, "w:p")
}

/// One run per paragraph; newlines become `<w:br/>`
fn write_run(writer: &mut XmlWriter, text: &str, bold: bool) -> quick_xml::Result<()> {
    start(writer, "w:r")?;
    if bold {
        start(writer, "w:rPr")?;
        empty(writer, "w:b", &[])?;
        end(writer, "w:rPr")?;
    }
    let text = strip_invalid_xml_chars(text);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            empty(writer, "w:br", &[])?;
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        writer.write_event(Event::Start(
            BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
        ))?;
        writer.write_event(Event::Text(BytesText::new(line)))?;
        end(writer, "w:t")?;
    }
    end(writer, "w:r")
}

fn write_table(writer: &mut XmlWriter, rows: &[Vec<String>], header: bool) -> quick_xml::Result<()> {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    start(writer, "w:tbl")?;
    start(writer, "w:tblPr")?;
    empty(writer, "w:tblStyle", &[("w:val", "TableGrid")])?;
    empty(writer, "w:tblW", &[("w:w", "5000"), ("w:type", "pct")])?;
    end(writer, "w:tblPr")?;
    start(writer, "w:tblGrid")?;
    for _ in 0..columns {
        empty(writer, "w:gridCol", &[])?;
    }
    end(writer, "w:tblGrid")?;

    for (i, row) in rows.iter().enumerate() {
        let is_header = header && i == 0;
        start(writer, "w:tr")?;
        if is_header {
            start(writer, "w:trPr")?;
            empty(writer, "w:tblHeader", &[])?;
            end(writer, "w:trPr")?;
        }
        for col in 0..columns {
            let cell = row.get(col).map(String::as_str).unwrap_or("");
            start(writer, "w:tc")?;
            write_paragraph(writer, cell, None, false, is_header)?;
            end(writer, "w:tc")?;
        }
        end(writer, "w:tr")?;
    }
    end(writer, "w:tbl")?;
    // Word expects a paragraph between a table and the section properties
    empty(writer, "w:p", &[])
}

/// XML 1.0 forbids most C0 control characters even when escaped
fn strip_invalid_xml_chars(text: &str) -> std::borrow::Cow<'_, str> {
    let invalid = |c: char| (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r');
    if text.chars().any(invalid) {
        text.chars().filter(|c| !invalid(*c)).collect::<String>().into()
    } else {
        text.into()
    }
}
