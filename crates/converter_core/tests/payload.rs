use std::io::{Cursor, Read};

use converter_core::{produce_result, TargetFormat, COLUMN_PADDING, FALLBACK_SENTENCE};
use pretty_assertions::assert_eq;

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid archive");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut text = String::new();
    entry.read_to_string(&mut text).expect("utf8 entry");
    text
}

#[test]
fn same_name_gives_identical_bytes() {
    for format in [TargetFormat::Excel, TargetFormat::Word] {
        let a = produce_result(format, "report.pdf", "2026-10-18 09:30:00").unwrap();
        let b = produce_result(format, "report.pdf", "2026-10-18 09:30:00").unwrap();
        assert!(!a.is_empty());
        assert_eq!(a.len(), a.bytes().len());
        assert_eq!(a, b);
    }
}

#[test]
fn workbook_has_one_row_of_sentence_words() {
    let payload = produce_result(TargetFormat::Excel, "report.pdf", "ignored").unwrap();
    assert_eq!(payload.format(), TargetFormat::Excel);

    let sheet = read_entry(payload.bytes(), "xl/worksheets/sheet1.xml");
    let words: Vec<&str> = FALLBACK_SENTENCE.split_whitespace().collect();

    assert_eq!(sheet.matches("<row ").count(), 1);
    assert_eq!(sheet.matches("<c ").count(), words.len());
    for (idx, word) in words.iter().enumerate() {
        let col = idx + 1;
        let width = word.chars().count() + COLUMN_PADDING;
        assert!(sheet.contains(&format!(r#"<col min="{col}" max="{col}" width="{width}""#)));
        assert!(sheet.contains(&format!("<t>{word}</t>")));
    }

    let workbook = read_entry(payload.bytes(), "xl/workbook.xml");
    assert_eq!(workbook.matches("<sheet ").count(), 1);
}

#[test]
fn workbook_ignores_source_name() {
    let a = produce_result(TargetFormat::Excel, "a.pdf", "t1").unwrap();
    let b = produce_result(TargetFormat::Excel, "b.pdf", "t2").unwrap();
    assert_eq!(a.bytes(), b.bytes());
}

#[test]
fn text_report_has_four_labelled_lines() {
    let payload = produce_result(TargetFormat::Word, "Q3 summary.pdf", "2026-10-18 09:30:00")
        .unwrap();
    let text = std::str::from_utf8(payload.bytes()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "PDF CONVERSION REPORT",
            "Source: Q3 summary.pdf",
            "Status: Text layer extracted (static fallback output)",
            "Generated: 2026-10-18 09:30:00",
        ]
    );
}
