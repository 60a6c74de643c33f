//! Integration tests for the DSA trainer and the assistant chat

mod common;

#[cfg(test)]
mod dsa_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_generate_problem() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        llm.reply(
            r#"```json
{"title": "Two Sum", "statement": "Find two numbers adding up to target.",
 "examples": [{"input": "[2,7,11,15], 9", "output": "[0,1]"}],
 "constraints": ["2 <= n <= 10^4"], "hints": ["Use a hash map"]}
```"#,
        );

        let response = server
            .post("/dsa/problems")
            .authorization_bearer(&alice.token)
            .json(&json!({ "topic": "hashing", "difficulty": "easy" }))
            .await;
        response.assert_status_ok();

        let problem = response.json::<Value>();
        assert_eq!(problem["title"], "Two Sum");
        // missing difficulty is taken from the request
        assert_eq!(problem["difficulty"], "easy");
        assert_eq!(problem["examples"][0]["output"], "[0,1]");

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].messages[1].content.contains("hashing"));
    }

    #[tokio::test]
    async fn test_malformed_problem_is_bad_gateway() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        llm.reply("Here is a problem: reverse a linked list.");

        server
            .post("/dsa/problems")
            .authorization_bearer(&alice.token)
            .json(&json!({ "topic": "lists", "difficulty": "medium" }))
            .await
            .assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_problem_difficulty_in_any_case() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        llm.reply(r#"{"title": "Two Sum", "difficulty": "Medium", "statement": "find pair"}"#);
        llm.reply(r#"{"title": "Three Sum", "difficulty": "moderate", "statement": "find triple"}"#);

        let problem = server
            .post("/dsa/problems")
            .authorization_bearer(&alice.token)
            .json(&json!({ "topic": "arrays", "difficulty": "easy" }))
            .await
            .json::<Value>();
        assert_eq!(problem["difficulty"], "medium");

        // an unknown level falls back to the requested one
        let problem = server
            .post("/dsa/problems")
            .authorization_bearer(&alice.token)
            .json(&json!({ "topic": "arrays", "difficulty": "hard" }))
            .await
            .json::<Value>();
        assert_eq!(problem["title"], "Three Sum");
        assert_eq!(problem["difficulty"], "hard");
    }

    #[tokio::test]
    async fn test_review_code() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        llm.reply(
            "Review:\n```json\n{\"correct\": true, \"summary\": \"Works\", \"time_complexity\": \"O(n)\", \"issues\": []}\n```",
        );

        let review = server
            .post("/dsa/review")
            .authorization_bearer(&alice.token)
            .json(&json!({
                "problem": "Two Sum",
                "language": "python",
                "code": "def two_sum(a, t): ..."
            }))
            .await
            .json::<Value>();

        assert_eq!(review["correct"], true);
        assert_eq!(review["time_complexity"], "O(n)");
        assert!(llm.requests()[0].messages[1].content.contains("def two_sum"));
    }

    #[tokio::test]
    async fn test_free_text_review_is_kept() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        llm.reply("  The loop is off by one.  ");

        let response = server
            .post("/dsa/review")
            .authorization_bearer(&alice.token)
            .json(&json!({ "problem": "p", "language": "rust", "code": "fn main() {}" }))
            .await;
        response.assert_status_ok();

        let review = response.json::<Value>();
        assert_eq!(review["correct"], false);
        assert_eq!(review["summary"], "The loop is off by one.");
    }

    #[tokio::test]
    async fn test_empty_code_is_rejected() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;

        server
            .post("/dsa/review")
            .authorization_bearer(&alice.token)
            .json(&json!({ "problem": "p", "language": "rust", "code": "" }))
            .await
            .assert_status_bad_request();
        assert!(llm.requests().is_empty());
    }
}

#[cfg(test)]
mod chat_tests {
    use super::common::*;
    use algorithms_server::core::AppState;
    use algorithms_server::llm::{ChatRole, CompletionClient, CompletionRequest, LlmError};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Holds every completion until the test releases it
    #[derive(Default)]
    struct GatedClient {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl CompletionClient for GatedClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok("Use two pointers.".to_string())
        }
    }

    async fn gated_setup() -> (axum_test::TestServer, Arc<GatedClient>) {
        let gate = Arc::new(GatedClient::default());
        let state = Arc::new(AppState::new(
            create_test_pool().await,
            TEST_JWT_SECRET.to_string(),
            gate.clone(),
        ));
        (create_test_server(state), gate)
    }

    async fn create_session(server: &axum_test::TestServer, token: &str, body: Value) -> String {
        let response = server
            .post("/chat/sessions")
            .authorization_bearer(token)
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;

        let first = create_session(&server, &alice.token, json!({ "title": "Heaps" })).await;
        let second = create_session(&server, &alice.token, json!({})).await;

        let sessions = server
            .get("/chat/sessions")
            .authorization_bearer(&alice.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(sessions.len(), 2);

        let session = server
            .get(&format!("/chat/sessions/{}", second))
            .authorization_bearer(&alice.token)
            .await
            .json::<Value>();
        assert_eq!(session["title"], "New chat");
        assert_eq!(session["messages"], json!([]));

        server
            .delete(&format!("/chat/sessions/{}", first))
            .authorization_bearer(&alice.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/chat/sessions/{}", first))
            .authorization_bearer(&alice.token)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;
        let session = create_session(&server, &alice.token, json!({})).await;

        server
            .get(&format!("/chat/sessions/{}", session))
            .authorization_bearer(&bob.token)
            .await
            .assert_status_not_found();
        let bobs = server
            .get("/chat/sessions")
            .authorization_bearer(&bob.token)
            .await
            .json::<Vec<Value>>();
        assert!(bobs.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_sends_history() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let session = create_session(&server, &alice.token, json!({})).await;
        llm.reply("BFS uses a queue.");
        llm.reply("DFS uses a stack.");

        let reply = server
            .post(&format!("/chat/sessions/{}/messages", session))
            .authorization_bearer(&alice.token)
            .json(&json!({ "content": "What does BFS use?" }))
            .await
            .json::<Value>();
        assert_eq!(reply["title"], "What does BFS use?");
        assert_eq!(reply["messages"].as_array().unwrap().len(), 2);
        assert_eq!(reply["messages"][1]["role"], "assistant");

        let reply = server
            .post(&format!("/chat/sessions/{}/messages", session))
            .authorization_bearer(&alice.token)
            .json(&json!({ "content": "And DFS?" }))
            .await
            .json::<Value>();
        assert_eq!(reply["messages"][3]["content"], "DFS uses a stack.");

        // system prompt followed by the full history
        let second = &llm.requests()[1];
        assert_eq!(second.messages.len(), 4);
        assert_eq!(second.messages[0].role, ChatRole::System);
        assert_eq!(second.messages[1].content, "What does BFS use?");
        assert_eq!(second.messages[2].role, ChatRole::Assistant);
        assert_eq!(second.messages[3].content, "And DFS?");

        let summary = server
            .get("/chat/sessions")
            .authorization_bearer(&alice.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(summary[0]["message_count"], 4);
    }

    #[tokio::test]
    async fn test_failed_reply_keeps_user_message() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let session = create_session(&server, &alice.token, json!({ "title": "Tries" })).await;
        llm.fail(LlmError::Api {
            status: 429,
            body: "rate limited".to_string(),
        });

        server
            .post(&format!("/chat/sessions/{}/messages", session))
            .authorization_bearer(&alice.token)
            .json(&json!({ "content": "Explain tries" }))
            .await
            .assert_status(StatusCode::BAD_GATEWAY);

        let stored = server
            .get(&format!("/chat/sessions/{}", session))
            .authorization_bearer(&alice.token)
            .await
            .json::<Value>();
        let messages = stored["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[tokio::test]
    async fn test_message_to_unknown_session() {
        let (server, _, llm) = setup().await;
        let alice = register_and_login(&server, "alice").await;

        server
            .post("/chat/sessions/7d8f0b8e-3c1a-4c55-9a43-2b1f0c3e9d11/messages")
            .authorization_bearer(&alice.token)
            .json(&json!({ "content": "hi" }))
            .await
            .assert_status_not_found();
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_session_created_during_reply_is_kept() {
        let (server, gate) = gated_setup().await;
        let alice = register_and_login(&server, "alice").await;
        let session = create_session(&server, &alice.token, json!({ "title": "Pairs" })).await;

        let (response, other) = tokio::join!(
            async {
                server
                    .post(&format!("/chat/sessions/{}/messages", session))
                    .authorization_bearer(&alice.token)
                    .json(&json!({ "content": "How do I find a pair?" }))
                    .await
            },
            async {
                gate.started.notified().await;
                let other = create_session(&server, &alice.token, json!({ "title": "Other tab" })).await;
                gate.release.notify_one();
                other
            }
        );
        response.assert_status_ok();

        let sessions = server
            .get("/chat/sessions")
            .authorization_bearer(&alice.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().any(|s| s["id"] == other.as_str()));
        let replied = sessions.iter().find(|s| s["id"] == session.as_str()).unwrap();
        assert_eq!(replied["message_count"], 2);
    }

    #[tokio::test]
    async fn test_session_deleted_during_reply_stays_deleted() {
        let (server, gate) = gated_setup().await;
        let alice = register_and_login(&server, "alice").await;
        let session = create_session(&server, &alice.token, json!({ "title": "Pairs" })).await;

        let (response, _) = tokio::join!(
            async {
                server
                    .post(&format!("/chat/sessions/{}/messages", session))
                    .authorization_bearer(&alice.token)
                    .json(&json!({ "content": "How do I find a pair?" }))
                    .await
            },
            async {
                gate.started.notified().await;
                server
                    .delete(&format!("/chat/sessions/{}", session))
                    .authorization_bearer(&alice.token)
                    .await
                    .assert_status_success();
                gate.release.notify_one();
            }
        );
        response.assert_status_ok();

        let sessions = server
            .get("/chat/sessions")
            .authorization_bearer(&alice.token)
            .await
            .json::<Vec<Value>>();
        assert!(sessions.is_empty());
    }
}
