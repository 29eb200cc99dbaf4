use geminix_genai::Client;
use geminix_genai::Content;

use super::*;

fn test_model(name: &str) -> GenerativeModel {
    let client = Client::with_api_key("test-key").unwrap();
    GenerativeModel::new(client, name)
}

#[tokio::test]
async fn test_empty_session_has_no_handles() {
    let session = Session::new();

    assert!(matches!(
        session.model_snapshot().await.unwrap_err(),
        GeminiXError::ModelNotInitialized
    ));
    assert!(matches!(
        session.chat_snapshot().await.unwrap_err(),
        GeminiXError::ChatNotInitialized
    ));
}

#[tokio::test]
async fn test_install_model_makes_snapshot_available() {
    let session = Session::new();
    session.install_model(test_model("gemini-pro")).await;

    let snapshot = session.model_snapshot().await.unwrap();
    assert_eq!(snapshot.name(), "gemini-pro");
}

#[tokio::test]
async fn test_reinstalling_model_drops_chat() {
    let session = Session::new();
    session.install_model(test_model("gemini-pro")).await;

    {
        let mut state = session.state.write().await;
        let chat = state.model.as_ref().unwrap().start_chat();
        state.chat = Some(chat);
    }
    assert!(session.chat_snapshot().await.is_ok());

    session.install_model(test_model("gemini-2.0-flash")).await;

    assert!(matches!(
        session.chat_snapshot().await.unwrap_err(),
        GeminiXError::ChatNotInitialized
    ));
    assert_eq!(
        session.model_snapshot().await.unwrap().name(),
        "gemini-2.0-flash"
    );
}

#[tokio::test]
async fn test_chat_snapshot_is_independent_of_stored_state() {
    let session = Session::new();
    session.install_model(test_model("gemini-pro")).await;
    {
        let mut state = session.state.write().await;
        let chat = state.model.as_ref().unwrap().start_chat();
        state.chat = Some(chat);
    }

    let mut snapshot = session.chat_snapshot().await.unwrap();
    snapshot.add_to_history(Content::user("local only"));

    let stored = session.chat_snapshot().await.unwrap();
    assert!(stored.history().is_empty());
}
