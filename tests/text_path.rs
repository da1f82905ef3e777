//! Real-PDF conversions through the lopdf text path.
//!
//! The PDFs are generated with lopdf in the test, so no fixtures or pdfium
//! library are needed. Auto mode passes whether or not pdfium can be bound:
//! either the layout path reads the text, or it fails and falls back.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdfstruct::{convert, convert_to_file, ConversionConfig, ExtractionPath, Pdf2MdError};
use std::path::{Path, PathBuf};

/// Write a Courier PDF with the given lines per page to `dir/name`.
fn write_pdf(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![16.into()]),
            Operation::new("Td", vec![72.into(), 760.into()]),
        ];
        for line in *lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

fn text_only() -> ConversionConfig {
    ConversionConfig::builder()
        .extraction_method("text-only")
        .build()
        .unwrap()
}

#[test]
fn test_text_only_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(
        dir.path(),
        "report.pdf",
        &[&["QUARTERLY SUMMARY"], &["Revenue grew in every region this year."]],
    );

    let out = convert(&pdf, &text_only()).unwrap();
    assert_eq!(out.stats.method, ExtractionPath::Text);
    assert_eq!(out.stats.page_count, 2);
    assert!(!out.stats.fallback_used);
    assert!(out.markdown.contains("# QUARTERLY SUMMARY"), "{}", out.markdown);
    assert!(out.markdown.contains("Revenue grew in every region this year."));
    assert!(!out.markdown.contains("<!-- Page"));
}

#[test]
fn test_text_only_with_metadata_keeps_markers() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "two.pdf", &[&["First page."], &["Second page."]]);
    let config = ConversionConfig::builder()
        .extraction_method("text-only")
        .include_metadata(true)
        .build()
        .unwrap();

    let out = convert(&pdf, &config).unwrap();
    let first = out.markdown.find("<!-- Page 1 -->").unwrap();
    let second = out.markdown.find("<!-- Page 2 -->").unwrap();
    assert!(first < second);
}

#[test]
fn test_auto_mode_produces_text() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "auto.pdf", &[&["Plain body text on the only page."]]);

    let out = convert(&pdf, &ConversionConfig::default()).unwrap();
    assert!(out.markdown.contains("Plain body text on the only page."));
    if out.stats.method == ExtractionPath::Text {
        assert!(out.stats.fallback_used);
    }
}

#[test]
fn test_blank_pdf_is_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "blank.pdf", &[&[]]);
    let err = convert(&pdf, &text_only()).unwrap_err();
    assert!(matches!(err, Pdf2MdError::EmptyDocument), "got {err:?}");
}

#[test]
fn test_not_a_pdf_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pdf");
    std::fs::write(&path, "just some text").unwrap();
    let err = convert(&path, &text_only()).unwrap_err();
    assert!(matches!(err, Pdf2MdError::NotAPdf { .. }));
}

#[test]
fn test_convert_to_file_writes_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "file.pdf", &[&["Written to disk, as expected."]]);
    let out_path = dir.path().join("out").join("file.md");

    let stats = convert_to_file(&pdf, &out_path, &text_only()).unwrap();
    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("Written to disk, as expected."));
    assert_eq!(stats.markdown_length, written.chars().count());
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_convert_async_matches_sync() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_pdf(dir.path(), "async.pdf", &[&["Converted off the async worker."]]);

    let sync_out = convert(&pdf, &text_only()).unwrap();
    let async_out = pdfstruct::convert_async(&pdf, &text_only()).await.unwrap();
    assert_eq!(async_out.markdown, sync_out.markdown);
    assert_eq!(async_out.stats.method, ExtractionPath::Text);
}
