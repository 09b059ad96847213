//! Fabricated conversion output.
//!
//! The uploaded document is never read. Excel output is a one-row workbook
//! built from [`FALLBACK_SENTENCE`]; Word output is a four-line text report.
//! Both depend only on the source name and the supplied timestamp, so equal
//! inputs always yield byte-identical payloads.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use bytes::Bytes;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::TargetFormat;

/// Words of this sentence become the columns of the spreadsheet row.
pub const FALLBACK_SENTENCE: &str =
    "Extraction fallback engaged: no tabular structure was recovered from the source document";

/// Added to each word's length to size its column.
pub const COLUMN_PADDING: usize = 4;

const SHEET_NAME: &str = "Extracted Data";
const REPORT_HEADER: &str = "PDF CONVERSION REPORT";
const REPORT_STATUS: &str = "Text layer extracted (static fallback output)";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output blob produced when a run reaches 100%.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPayload {
    format: TargetFormat,
    bytes: Bytes,
}

impl ResultPayload {
    pub fn format(&self) -> TargetFormat {
        self.format
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Builds the result for `format`. Only `source_name` and `generated_at`
/// influence the output.
pub fn produce_result(
    format: TargetFormat,
    source_name: &str,
    generated_at: &str,
) -> Result<ResultPayload, PayloadError> {
    let bytes = match format {
        TargetFormat::Excel => Bytes::from(build_workbook(FALLBACK_SENTENCE)?),
        TargetFormat::Word => Bytes::from(build_text_report(source_name, generated_at)),
    };
    Ok(ResultPayload { format, bytes })
}

fn build_text_report(source_name: &str, generated_at: &str) -> String {
    format!(
        "{REPORT_HEADER}\nSource: {source_name}\nStatus: {REPORT_STATUS}\nGenerated: {generated_at}\n"
    )
}

fn build_workbook(sentence: &str) -> Result<Vec<u8>, PayloadError> {
    let words: Vec<&str> = sentence.split_whitespace().collect();

    // Fixed entry timestamps keep the archive bytes reproducible.
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let parts = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", root_rels_xml()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", workbook_rels_xml()),
        ("xl/worksheets/sheet1.xml", sheet_xml(&words)),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

fn sheet_xml(words: &[&str]) -> String {
    let mut cols = String::new();
    let mut cells = String::new();
    for (idx, word) in words.iter().enumerate() {
        let col = idx + 1;
        let width = word.chars().count() + COLUMN_PADDING;
        let _ = write!(
            cols,
            r#"<col min="{col}" max="{col}" width="{width}" customWidth="1"/>"#
        );
        let _ = write!(
            cells,
            r#"<c r="{}1" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_name(idx),
            escape_xml(word)
        );
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
            "<cols>{cols}</cols>",
            r#"<sheetData><row r="1">{cells}</row></sheetData>"#,
            "</worksheet>"
        ),
        cols = cols,
        cells = cells
    )
}

fn workbook_xml() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<sheets><sheet name="{name}" sheetId="1" r:id="rId1"/></sheets>"#,
            "</workbook>"
        ),
        name = escape_xml(SHEET_NAME)
    )
}

fn content_types_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
        "</Types>"
    )
    .to_string()
}

fn root_rels_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
        "</Relationships>"
    )
    .to_string()
}

fn workbook_rels_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
        "</Relationships>"
    )
    .to_string()
}

/// Spreadsheet column letters: 0 -> A, 25 -> Z, 26 -> AA.
fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_roll_over_after_z() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn sheet_sizes_columns_from_word_length() {
        let xml = sheet_xml(&["no", "tabular"]);
        assert!(xml.contains(r#"<col min="1" max="1" width="6" customWidth="1"/>"#));
        assert!(xml.contains(r#"<col min="2" max="2" width="11" customWidth="1"/>"#));
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t>no</t></is></c>"#));
        assert!(xml.contains(r#"<c r="B1" t="inlineStr"><is><t>tabular</t></is></c>"#));
    }

    #[test]
    fn escapes_markup_in_cells() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
    }
}
