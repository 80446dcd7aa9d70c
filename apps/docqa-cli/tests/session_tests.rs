use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, TimeZone};

use docqa_cli::chat::{parse_line, ChatInput};
use docqa_cli::logging::default_level;
use docqa_cli::{ChatHistory, DocumentInfo, Session, StagedUpload};
use docqa_core::config::Settings;
use docqa_core::types::ReplyKind;
use docqa_embed::FakeEmbedder;
use docqa_fixtures::write_text_pdf;
use docqa_generate::FakeGenerator;
use docqa_rag::RagEngine;

fn fake_session() -> Session {
    Session::new(RagEngine::new(Box::new(FakeEmbedder::new(384)), Box::new(FakeGenerator::new(100)), &Settings::default()))
}

#[test]
fn history_export_format() {
    let mut history = ChatHistory::new();
    assert_eq!(history.export(), "");
    history.push("What color is the sky?", "Blue.");
    history.push("Why?", "Scattering.");
    assert_eq!(
        history.export(),
        "Q: What color is the sky?\nA: Blue.\n---\n\nQ: Why?\nA: Scattering.\n---"
    );
    assert!(history.turns()[0].timestamp <= history.turns()[1].timestamp);
}

#[test]
fn history_written_to_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chat.txt");
    let mut history = ChatHistory::new();
    history.push("q", "a");
    history.write_to(&path).expect("write");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "Q: q\nA: a\n---");
}

#[test]
fn document_info_display() {
    let info = DocumentInfo {
        name: "report.pdf".into(),
        size_bytes: 1536,
        chunks: 4,
        load_time: Duration::from_millis(1250),
        uploaded_at: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).single().expect("valid time"),
    };
    assert_eq!(
        info.to_string(),
        "Name: report.pdf\nSize: 1.5 KB\nChunks: 4\nUploaded: 2024-03-09 14:05:07\nLoad time: 1.25s"
    );
}

#[test]
fn staged_upload_is_removed_on_drop() {
    let upload = StagedUpload::from_bytes("doc.pdf", b"%PDF-1.5").expect("stage");
    let path = upload.path().to_path_buf();
    assert!(path.exists());
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
    assert_eq!(upload.size(), 8);
    drop(upload);
    assert!(!path.exists());
}

#[test]
fn uploaded_pdf_loads_and_answers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("sky.pdf");
    write_text_pdf(&source, &["The sky is blue."]).expect("write pdf");
    let bytes = std::fs::read(&source).expect("read pdf");

    let mut session = fake_session();
    let upload = StagedUpload::from_bytes("sky.pdf", &bytes).expect("stage");
    let staged_path = upload.path().to_path_buf();
    let info = session.load_upload(upload).expect("load").clone();
    assert!(!staged_path.exists());
    assert_eq!(info.name, "sky.pdf");
    assert_eq!(info.chunks, 1);
    assert_eq!(info.size_bytes, bytes.len() as u64);

    let reply = session.ask("What color is the sky?");
    assert_eq!(reply.kind, ReplyKind::Answer);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn bad_upload_reports_load_failure() {
    let mut session = fake_session();
    let upload = StagedUpload::from_bytes("junk.pdf", b"not a pdf").expect("stage");
    let message = session.load_upload(upload).expect_err("junk must fail");
    assert!(message.starts_with("Failed to load document: Error reading PDF:"), "{message}");
    assert!(session.document().is_none());
    assert!(!session.engine().is_loaded());
}

#[test]
fn reset_clears_document_and_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sky.pdf");
    write_text_pdf(&path, &["The sky is blue."]).expect("write pdf");

    let mut session = fake_session();
    session.load_path(&path).expect("load");
    session.ask("What color is the sky?");
    session.reset();
    assert!(session.history().is_empty());
    assert!(session.document().is_none());
    assert_eq!(session.ask("again?").text, "Please upload a document first.");
}

#[test]
fn default_export_name_is_timestamped() {
    let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).single().expect("valid time");
    assert_eq!(ChatHistory::export_file_name(at), "chat_history_20240309_140507.txt");
}

#[test]
fn chat_questions_pass_through_verbatim() {
    assert_eq!(parse_line("  What is it?  "), ChatInput::Question("  What is it?  "));
    assert_eq!(parse_line("\tword"), ChatInput::Question("\tword"));
}

#[test]
fn chat_commands_parse() {
    assert_eq!(parse_line(" :quit "), ChatInput::Quit);
    assert_eq!(parse_line(":reset"), ChatInput::Reset);
    assert_eq!(parse_line(":clear"), ChatInput::Clear);
    assert_eq!(parse_line(":load  notes.pdf "), ChatInput::Load(Some("notes.pdf")));
    assert_eq!(parse_line(":load"), ChatInput::Load(None));
    assert_eq!(parse_line(":export out.txt"), ChatInput::Export(PathBuf::from("out.txt")));
    assert_eq!(parse_line("   "), ChatInput::Blank);

    let ChatInput::Export(path) = parse_line(":export") else {
        panic!("expected export");
    };
    let name = path.to_string_lossy();
    assert!(name.starts_with("chat_history_") && name.ends_with(".txt"), "{name}");
}

#[test]
fn verbosity_maps_to_log_levels() {
    assert_eq!(default_level(0), "warn");
    assert_eq!(default_level(1), "info");
    assert_eq!(default_level(2), "debug");
    assert_eq!(default_level(5), "debug");
}

#[test]
fn loaded_document_records_upload_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sky.pdf");
    write_text_pdf(&path, &["The sky is blue."]).expect("write pdf");

    let before = Local::now();
    let mut session = fake_session();
    let info = session.load_path(&path).expect("load").clone();
    assert!(info.uploaded_at >= before && info.uploaded_at <= Local::now());
}
