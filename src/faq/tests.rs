use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn inline_source_assigns_sequential_ids() {
    let entries = FaqSource::Inline(default_faqs()).load();

    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(entries[0].question, "Siparişim nerede?");
    assert_eq!(entries[0].answer, "Siparişiniz kargoya verildi.");
    assert_eq!(entries[2].question, "İade süreci nasıl işliyor?");
}

#[test]
fn file_source_preserves_order() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("faq_data.json");
    fs::write(
        &path,
        r#"{"faqs": [
            {"question": "Kargo ücreti ne kadar?", "answer": "Kargo ücretsizdir."},
            {"question": "Siparişim nerede?", "answer": "Siparişiniz kargoya verildi."}
        ]}"#,
    )
    .expect("should write faq file");

    let entries = FaqSource::File(path).load();

    assert_eq!(
        entries,
        vec![
            FaqEntry {
                id: 0,
                question: "Kargo ücreti ne kadar?".to_string(),
                answer: "Kargo ücretsizdir.".to_string(),
            },
            FaqEntry {
                id: 1,
                question: "Siparişim nerede?".to_string(),
                answer: "Siparişiniz kargoya verildi.".to_string(),
            },
        ]
    );
}

#[test]
fn missing_file_yields_no_entries() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let entries = FaqSource::File(temp_dir.path().join("absent.json")).load();
    assert!(entries.is_empty());
}

#[test]
fn malformed_file_yields_no_entries() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let not_json = temp_dir.path().join("broken.json");
    fs::write(&not_json, "{\"faqs\": [").expect("should write file");
    assert!(FaqSource::File(not_json).load().is_empty());

    let wrong_shape = temp_dir.path().join("shape.json");
    fs::write(&wrong_shape, r#"{"faqs": [{"question": "only a question"}]}"#)
        .expect("should write file");
    assert!(FaqSource::File(wrong_shape).load().is_empty());

    let wrong_key = temp_dir.path().join("key.json");
    fs::write(&wrong_key, r#"{"items": []}"#).expect("should write file");
    assert!(FaqSource::File(wrong_key).load().is_empty());
}

#[test]
fn directory_path_yields_no_entries() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    assert!(FaqSource::File(temp_dir.path().to_path_buf()).load().is_empty());
}

#[test]
fn empty_faq_list_is_valid() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let path = temp_dir.path().join("empty.json");
    fs::write(&path, r#"{"faqs": []}"#).expect("should write file");
    assert!(FaqSource::File(path).load().is_empty());
}
