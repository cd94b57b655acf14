//! End-to-End Integration Tests for the translation session
//!
//! These tests drive a `TranslationController` against a real
//! `LibreTranslateProvider` talking HTTP to an in-process axum stub, so the
//! whole path from an edit to the rendered state goes over the wire.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --lib mt::integration_tests
//! # against a real instance
//! LIBRETRANSLATE_URL=http://localhost:5000 cargo test --lib mt::integration_tests -- --ignored --nocapture
//! ```

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::ControllerConfig;
    use crate::controller::TranslationController;
    use crate::error::AppError;
    use crate::platform::{MemoryClipboard, RecordingSpeech};
    use crate::session::{SessionState, Status};
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;

    /// Serve `app` on an ephemeral port and return its base URL
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Small dictionary stub; Spanish answers slowly so requests can overlap
    async fn dictionary(Json(body): Json<Value>) -> Json<Value> {
        let q = body["q"].as_str().unwrap_or_default();
        let target = body["target"].as_str().unwrap_or_default();
        if target == "es" {
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        let translated = match (q, target) {
            ("Hello", "es") => "Hola".to_string(),
            ("Hello", "fr") => "Bonjour".to_string(),
            ("Hola", "en") => "Hello".to_string(),
            _ => format!("{}_{}", q, target),
        };
        Json(json!({ "translatedText": translated }))
    }

    fn fast_config() -> ControllerConfig {
        ControllerConfig {
            debounce: Duration::from_millis(30),
            ..ControllerConfig::default()
        }
    }

    fn controller_for(base_url: String) -> (TranslationController, Arc<MemoryClipboard>) {
        let provider = LibreTranslateProvider::new(base_url, None).unwrap();
        let clipboard = Arc::new(MemoryClipboard::new());
        let controller = TranslationController::new(
            Arc::new(provider),
            Arc::new(RecordingSpeech::new()),
            clipboard.clone(),
            fast_config(),
        );
        (controller, clipboard)
    }

    /// Wait until the session satisfies `done`, failing after a few seconds
    async fn wait_for(
        rx: &mut watch::Receiver<SessionState>,
        done: impl Fn(&SessionState) -> bool,
    ) -> SessionState {
        let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| done(s)))
            .await
            .expect("session did not settle in time")
            .expect("controller dropped");
        state.clone()
    }

    // ============================================================================
    // Debounced translation over HTTP
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_typing_produces_translation() {
        let base = serve(Router::new().route("/translate", post(dictionary))).await;
        let (controller, _) = controller_for(base);
        let mut rx = controller.subscribe();

        controller.set_target_lang("fr");
        controller.set_source_text("Hello");

        let state = wait_for(&mut rx, |s| s.status == Status::Done).await;
        assert_eq!(state.translated_text, "Bonjour");
        assert!(state.error.is_none());
        assert_eq!(state.char_count(), 5);
    }

    #[tokio::test]
    async fn test_e2e_latest_request_wins() {
        let base = serve(Router::new().route("/translate", post(dictionary))).await;
        let (controller, _) = controller_for(base);
        let mut rx = controller.subscribe();

        // Slow es request goes out first
        controller.set_source_text("Hello");
        wait_for(&mut rx, |s| s.status == Status::Pending).await;

        // Fast fr request issued while es is still in flight
        controller.set_target_lang("fr");
        let state = wait_for(&mut rx, |s| s.status == Status::Done).await;
        assert_eq!(state.translated_text, "Bonjour");

        // Give the es answer time to arrive; it must be dropped
        tokio::time::sleep(Duration::from_millis(600)).await;
        let state = controller.snapshot();
        assert_eq!(state.translated_text, "Bonjour");
        assert_eq!(state.target_lang, "fr");
    }

    #[tokio::test]
    async fn test_e2e_swap_round_trip() {
        let base = serve(Router::new().route("/translate", post(dictionary))).await;
        let (controller, clipboard) = controller_for(base);

        controller.set_source_text("Hello");
        let state = controller.translate_now().await;
        assert_eq!(state.translated_text, "Hola");

        controller.copy().unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("Hola"));

        controller.swap().unwrap();
        let state = controller.translate_now().await;
        assert_eq!(state.source_lang, "es");
        assert_eq!(state.source_text, "Hola");
        assert_eq!(state.translated_text, "Hello");
    }

    // ============================================================================
    // Failures surfaced to the session
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_server_error_shows_network_message() {
        let app = Router::new().route(
            "/translate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let (controller, _) = controller_for(serve(app).await);

        controller.set_source_text("Hello");
        let state = controller.translate_now().await;
        assert_eq!(state.status, Status::Failed);
        assert!(state.translated_text.is_empty());
        assert_eq!(
            state.error,
            Some(AppError::Service(NETWORK_ERROR_MESSAGE.to_string()))
        );
    }

    #[tokio::test]
    async fn test_e2e_missing_field_shows_translation_failed() {
        let app = Router::new().route("/translate", post(|| async { Json(json!({})) }));
        let (controller, _) = controller_for(serve(app).await);

        controller.set_source_text("Hello");
        let state = controller.translate_now().await;
        assert_eq!(
            state.error,
            Some(AppError::Service(TRANSLATION_FAILED_MESSAGE.to_string()))
        );
    }

    #[tokio::test]
    async fn test_e2e_same_language_makes_no_request() {
        let app = Router::new().route(
            "/translate",
            post(|| async { (StatusCode::IM_A_TEAPOT, "should not be called") }),
        );
        let (controller, _) = controller_for(serve(app).await);

        controller.set_source_text("Hello");
        controller.set_target_lang("en");
        let state = controller.translate_now().await;
        assert_eq!(state.status, Status::Failed);
        assert_eq!(state.error, Some(AppError::SameLanguage));
    }

    // ============================================================================
    // Real endpoint (requires network access)
    // ============================================================================

    #[tokio::test]
    #[ignore]
    async fn test_e2e_real_endpoint() {
        let provider = LibreTranslateProvider::from_env().unwrap();
        let controller = TranslationController::new(
            Arc::new(provider),
            Arc::new(RecordingSpeech::new()),
            Arc::new(MemoryClipboard::new()),
            ControllerConfig::default(),
        );

        controller.set_source_text("Good morning");
        let state = controller.translate_now().await;
        println!("Good morning → {:?} ({:?})", state.translated_text, state.error);
        assert_eq!(state.status, Status::Done);
        assert!(!state.translated_text.is_empty());
    }
}
