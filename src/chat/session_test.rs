// Tests for ChatSession
// Test cases:
// - Send builds a user message from prompt and pending image
// - Empty session has nothing to send; history alone is resent
// - Only one request in flight; stale replies are dropped after a restart
// - Transcript, last prompt/response and file context formatting
// - Image attachment encodes a data URL

use super::*;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

fn config() -> ModelConfig {
    ModelConfig {
        name: "Fast".to_string(),
        api_key: "sk-test".to_string(),
        model: "openai/gpt-4o-mini".to_string(),
    }
}

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_begin_send_appends_user_message() {
    let mut session = ChatSession::new(config());
    let request = session.begin_send("  hello  ").unwrap();

    assert_eq!(request.model, "openai/gpt-4o-mini");
    assert_eq!(request.api_key, "sk-test");
    assert_eq!(request.history.len(), 1);
    assert_eq!(
        serde_json::to_value(&request.history[0]).unwrap(),
        json!({"role": "user", "content": [{"type": "text", "text": "hello"}]})
    );
    assert!(session.is_in_flight());
}

#[test]
fn test_nothing_to_send_on_empty_session() {
    let mut session = ChatSession::new(config());
    assert!(matches!(session.begin_send("   "), Err(ChatError::NothingToSend)));
    assert!(!session.is_in_flight());
}

#[test]
fn test_blank_prompt_resends_history() {
    let mut session = ChatSession::seeded(config(), None, Some("Earlier answer"));
    let request = session.begin_send("").unwrap();
    assert_eq!(request.history, vec![ChatMessage::assistant("Earlier answer")]);
}

#[test]
fn test_second_send_rejected_while_in_flight() {
    let mut session = ChatSession::new(config());
    let request = session.begin_send("one").unwrap();
    assert!(matches!(session.begin_send("two"), Err(ChatError::InFlight)));

    assert!(session.complete(&request.ticket, Some("reply")));
    assert!(!session.is_in_flight());
    assert_eq!(session.history().last(), Some(&ChatMessage::assistant("reply")));
    assert!(session.begin_send("two").is_ok());
}

#[test]
fn test_failed_request_keeps_user_message() {
    let mut session = ChatSession::new(config());
    let request = session.begin_send("question").unwrap();

    assert!(session.complete(&request.ticket, None));
    assert_eq!(session.history().len(), 1);
    assert!(!session.is_in_flight());
}

#[test]
fn test_reply_after_new_conversation_is_discarded() {
    let mut session = ChatSession::new(config());
    let request = session.begin_send("old question").unwrap();

    let notice = session.new_conversation();
    assert_eq!(notice, "--- New conversation started ---");
    assert!(!session.is_in_flight());

    assert!(!session.complete(&request.ticket, Some("late reply")));
    assert!(session.history().is_empty());
    assert_eq!(session.transcript(), "--- New conversation started ---\n");
}

#[test]
fn test_notices_stay_where_they_were_added() {
    let mut session = ChatSession::new(config());
    let request = session.begin_send("one").unwrap();
    session.complete(&request.ticket, Some("two"));
    session.apply_profile("Precise", Map::new());

    assert_eq!(
        session.transcript(),
        "You: one\nAssistant: two\n\n--- Applied settings profile: Precise ---\n"
    );
    assert_eq!(session.history_text().unwrap(), "You: one\nAssistant: two");
}

#[test]
fn test_seeded_session_uses_draft_and_assistant_message() {
    let session = ChatSession::seeded(config(), Some("Draft prompt"), Some("Saved answer"));
    let view = session.view();

    assert_eq!(view.draft, "Draft prompt");
    assert_eq!(session.history(), &[ChatMessage::assistant("Saved answer")]);
    assert_eq!(view.title, "Query: Fast (Profile: Default)");
}

#[test]
fn test_apply_profile_updates_title_and_settings() {
    let mut session = ChatSession::new(config());
    let mut settings = Map::new();
    settings.insert("temperature".to_string(), json!(0.2));

    let notice = session.apply_profile("Precise", settings);
    assert_eq!(notice, "--- Applied settings profile: Precise ---");
    assert_eq!(session.title(), "Query: Fast (Profile: Precise)");

    let request = session.begin_send("hi").unwrap();
    assert_eq!(request.settings["temperature"], json!(0.2));
}

#[test]
fn test_attach_image_goes_out_with_next_message() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "Photo.JPG", &[0xff, 0xd8, 0xff]);
    let mut session = ChatSession::new(config());

    let notice = session.attach_image(&path).unwrap();
    assert_eq!(notice, "[Image Uploaded: Photo.JPG]");
    assert_eq!(session.view().pending_image.as_deref(), Some("Photo.JPG"));

    let request = session.begin_send("").unwrap();
    match &request.history[0].content {
        MessageContent::Parts(parts) => {
            assert_eq!(
                parts,
                &vec![ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: "data:image/jpeg;base64,/9j/".to_string()
                    }
                }]
            );
        }
        other => panic!("expected parts, got {:?}", other),
    }
    assert_eq!(session.view().pending_image, None);
}

#[test]
fn test_attach_image_rejects_other_files() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "notes.txt", b"text");
    let mut session = ChatSession::new(config());

    assert!(matches!(
        session.attach_image(&path),
        Err(ChatError::UnsupportedImage(_))
    ));
    assert!(matches!(
        session.attach_image(&dir.path().join("missing.png")),
        Err(ChatError::ImageRead(_))
    ));
}

#[test]
fn test_file_context_wraps_content() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "todo.md", b"- ship it");
    let file = SavedFile {
        filename: "todo.md".to_string(),
        file_type: "md".to_string(),
        date_added: String::new(),
        path,
    };
    let mut session = ChatSession::new(config());

    session.add_file_context(&file).unwrap();
    assert_eq!(
        session.history()[0],
        ChatMessage::user("--- Using File: todo.md ---\n\n- ship it\n\n--- End of File ---")
    );
}

#[test]
fn test_missing_file_context_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let file = SavedFile {
        filename: "gone.md".to_string(),
        file_type: "md".to_string(),
        date_added: String::new(),
        path: dir.path().join("gone.md"),
    };
    let mut session = ChatSession::new(config());

    let result = session.add_file_context(&file);
    assert!(matches!(result, Err(ChatError::FileRead(_))));
    assert!(session.history().is_empty());
}

#[test]
fn test_transcript_and_last_messages() {
    let dir = TempDir::new().unwrap();
    let image = write_file(&dir, "a.png", b"png");
    let mut session = ChatSession::new(config());
    assert!(matches!(session.last_prompt(), Err(ChatError::NoPrompt)));
    assert!(matches!(session.last_response(), Err(ChatError::NoResponse)));
    assert!(matches!(session.history_text(), Err(ChatError::EmptyHistory)));

    session.attach_image(&image).unwrap();
    let request = session.begin_send("What is it?").unwrap();
    session.complete(&request.ticket, Some("A square."));

    assert_eq!(
        session.transcript(),
        "[Image Uploaded: a.png]\nYou: What is it?\n[Image]\nAssistant: A square.\n\n"
    );
    assert_eq!(session.last_prompt().unwrap(), "What is it?");
    assert_eq!(session.last_response().unwrap(), "A square.");
    assert_eq!(
        session.history_text().unwrap(),
        "You: What is it?\n[Image]\nAssistant: A square."
    );
}
