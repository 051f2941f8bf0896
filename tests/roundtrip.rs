use std::io::Cursor;

use pdf_graph::{BlockerReason, Dictionary, Document, Object};

fn load_example() -> Document {
    Document::load("assets/example.pdf").expect("fixture must load")
}

#[test]
fn basic_load_reports_expected_page_count() {
    let metadata = Document::load_metadata("assets/example.pdf").unwrap();
    assert_eq!(metadata.page_count, 1);
    assert_eq!(metadata.title.as_deref(), Some("Example"));
}

#[test]
fn full_save_round_trips_page_count() {
    let mut doc = load_example();
    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();

    assert!(out.starts_with(b"%PDF-1.5\n%"));
    let tail = String::from_utf8_lossy(&out[out.len().saturating_sub(6)..]);
    assert!(tail.trim_end().ends_with("%%EOF"));

    let reloaded = Document::load_from(Cursor::new(&out)).unwrap();
    let root = reloaded.trailer.get(b"Root").and_then(Object::as_reference).unwrap();
    let catalog = reloaded.get_object(root).unwrap().as_dict().unwrap();
    assert_eq!(catalog.get_type().unwrap(), b"Catalog");
}

#[test]
fn full_save_drops_unreachable_objects() {
    let mut doc = load_example();
    let orphan = doc.add_object(Object::Integer(42));

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();

    let reloaded = Document::load_from(Cursor::new(&out)).unwrap();
    assert!(reloaded.get_object(orphan).is_err());
}

#[test]
fn incremental_save_preserves_original_prefix_and_exposes_new_object() {
    let original = std::fs::read("assets/example.pdf").unwrap();
    let mut doc = Document::load_from(Cursor::new(&original)).unwrap();

    let mut note = Dictionary::new();
    note.set("Note", Object::string_literal("hi"));
    let note_id = doc.add_object(note);

    let root = doc.trailer.get(b"Root").and_then(Object::as_reference).unwrap();
    doc.get_object_mut(root).unwrap().as_dict_mut().unwrap().set("Note", note_id);

    let mut out = Vec::new();
    doc.save_incremental(&original, &mut out).unwrap();

    assert_eq!(&out[..original.len()], original.as_slice());

    let reloaded = Document::load_from(Cursor::new(&out)).unwrap();
    let root = reloaded.trailer.get(b"Root").and_then(Object::as_reference).unwrap();
    let catalog = reloaded.get_object(root).unwrap().as_dict().unwrap();
    let note_ref = catalog.get(b"Note").and_then(Object::as_reference).unwrap();
    let note_dict = reloaded.get_object(note_ref).unwrap().as_dict().unwrap();
    assert_eq!(note_dict.get(b"Note").and_then(Object::as_str).unwrap(), b"hi");
}

#[test]
fn incremental_save_with_no_changes_only_appends_an_empty_update() {
    let original = std::fs::read("assets/example.pdf").unwrap();
    let mut doc = Document::load_from(Cursor::new(&original)).unwrap();

    let mut out = Vec::new();
    doc.save_incremental(&original, &mut out).unwrap();

    assert_eq!(&out[..original.len()], original.as_slice());
}

#[test]
fn malformed_startxref_falls_back_to_brute_force_and_blocks_incremental_save() {
    let mut original = std::fs::read("assets/example.pdf").unwrap();
    let eof = original.len();
    let marker = b"startxref\n269\n%%EOF";
    let pos = original.windows(marker.len()).rposition(|w| w == marker).unwrap();
    let bogus = format!("startxref\n{}\n%%EOF", eof + 100_000);
    original.splice(pos..pos + marker.len(), bogus.into_bytes());

    let mut doc = Document::load_from(Cursor::new(&original)).unwrap();
    assert_eq!(doc.can_save_incrementally(), Some(BlockerReason::BruteForceRecovery));

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    let reloaded = Document::load_from(Cursor::new(&out)).unwrap();
    let root = reloaded.trailer.get(b"Root").and_then(Object::as_reference).unwrap();
    assert!(reloaded.get_object(root).is_ok());
}
