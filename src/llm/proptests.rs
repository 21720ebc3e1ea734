//! Property-based tests for the Gemini translation layer
//!
//! - Message translation never produces empty parts
//! - Order and text are preserved through translation
//! - Roles map onto Gemini's `user`/`model` vocabulary

use super::gemini::{translate_messages, GeminiService};
use super::types::{LlmMessage, MessageRole};
use proptest::prelude::*;

fn arb_message() -> impl Strategy<Value = LlmMessage> {
    (
        prop_oneof![Just(MessageRole::User), Just(MessageRole::Assistant)],
        "[a-zA-Z0-9 _.!?,]{0,60}",
    )
        .prop_map(|(role, text)| LlmMessage { role, text })
}

fn arb_history() -> impl Strategy<Value = Vec<LlmMessage>> {
    proptest::collection::vec(arb_message(), 0..20)
}

proptest! {
    #[test]
    fn prop_translation_preserves_text_and_order(history in arb_history()) {
        let contents = translate_messages(&history);
        let expected: Vec<&LlmMessage> = history.iter().filter(|m| !m.text.is_empty()).collect();

        prop_assert_eq!(contents.len(), expected.len());
        for (content, message) in contents.iter().zip(expected) {
            prop_assert_eq!(content.parts.len(), 1);
            prop_assert_eq!(&content.parts[0].text, &message.text);
            let role = content.role.as_deref();
            match message.role {
                MessageRole::User => prop_assert_eq!(role, Some("user")),
                MessageRole::Assistant => prop_assert_eq!(role, Some("model")),
            }
        }
    }

    #[test]
    fn prop_no_empty_parts(history in arb_history()) {
        for content in translate_messages(&history) {
            prop_assert!(content.parts.iter().all(|p| !p.text.is_empty()));
        }
    }

    #[test]
    fn prop_normalize_keeps_all_text(parts in proptest::collection::vec("[a-zA-Z ]{1,20}", 1..5)) {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": parts.iter().map(|t| serde_json::json!({ "text": t })).collect::<Vec<_>>()
                },
                "finishReason": "STOP"
            }]
        });
        let response = GeminiService::normalize_response(serde_json::from_value(body).unwrap()).unwrap();
        prop_assert_eq!(response.text(), parts.concat());
    }
}
