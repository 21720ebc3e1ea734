//! Property-based tests for the conversation graph steps
//!
//! These tests verify key invariants hold across arbitrary histories.

use super::state::*;
use super::transition::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// One full turn with a canned model reply, as the graph runner would do it
fn run_turn(state: ConversationState, text: String, reply: String) -> ConversationState {
    let state = count_messages(state, Message::user(text));
    match should_continue(&state) {
        Branch::Continue => respond(state, reply),
        Branch::End => end_conversation(state),
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant)]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (arb_role(), "[a-zA-Z0-9 ?!.]{0,40}").prop_map(|(role, content)| Message { role, content })
}

/// History with any role mix and a counter that may be stale
fn arb_state() -> impl Strategy<Value = ConversationState> {
    (proptest::collection::vec(arb_message(), 0..16), 0usize..10).prop_map(
        |(messages, user_message_count)| ConversationState {
            messages,
            user_message_count,
        },
    )
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{1,30}"
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: every turn grows the history by exactly two entries
    #[test]
    fn prop_turn_appends_two_messages(state in arb_state(), text in arb_text(), reply in arb_text()) {
        let before = state.messages.clone();
        let after = run_turn(state, text.clone(), reply);
        prop_assert_eq!(after.messages.len(), before.len() + 2);
        prop_assert_eq!(&after.messages[..before.len()], &before[..]);
        prop_assert_eq!(&after.messages[before.len()], &Message::user(text));
        prop_assert_eq!(after.messages[before.len() + 1].role, Role::Assistant);
    }

    // Invariant 2: count always matches the user-role entries in the history
    #[test]
    fn prop_count_matches_history(state in arb_state(), text in arb_text(), reply in arb_text()) {
        let after = run_turn(state, text, reply);
        prop_assert_eq!(after.user_message_count, count_user_messages(&after.messages));
    }

    // Invariant 3: once the limit is reached, every later turn ends
    #[test]
    fn prop_ended_stays_ended(
        texts in proptest::collection::vec(arb_text(), MAX_USER_MESSAGES..MAX_USER_MESSAGES + 5),
    ) {
        let mut state = ConversationState::new();
        for (i, text) in texts.into_iter().enumerate() {
            let counted = count_messages(state.clone(), Message::user(text.clone()));
            let branch = should_continue(&counted);
            if i + 1 >= MAX_USER_MESSAGES {
                prop_assert_eq!(branch, Branch::End);
            } else {
                prop_assert_eq!(branch, Branch::Continue);
            }
            state = run_turn(state, text, "reply".to_string());
        }
        prop_assert!(state.is_ended());
        prop_assert_eq!(state.messages.last(), Some(&Message::farewell()));
    }

    // Invariant 4: the branch depends only on the recomputed count
    #[test]
    fn prop_branch_follows_count(state in arb_state(), text in arb_text()) {
        let counted = count_messages(state, Message::user(text));
        let expected = if count_user_messages(&counted.messages) >= MAX_USER_MESSAGES {
            Branch::End
        } else {
            Branch::Continue
        };
        prop_assert_eq!(should_continue(&counted), expected);
    }
}
