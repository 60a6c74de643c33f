//! Integration tests for blogs and comments

mod common;

#[cfg(test)]
mod blog_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    async fn create_blog(server: &TestServer, user: &TestUser, title: &str, published: bool) -> i64 {
        let response = server
            .post("/blogs")
            .authorization_bearer(&user.token)
            .json(&json!({ "title": title, "content": "Some content", "published": published }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["blog_id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_read_blog() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let blog_id = create_blog(&server, &alice, "Binary Search", true).await;

        let response = server
            .get(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&alice.token)
            .await;
        response.assert_status_ok();
        let blog = response.json::<Value>();
        assert_eq!(blog["title"], "Binary Search");
        assert_eq!(blog["author_username"], "alice");
        assert_eq!(blog["comment_count"], 0);
    }

    #[tokio::test]
    async fn test_create_blog_validates() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;

        server
            .post("/blogs")
            .authorization_bearer(&alice.token)
            .json(&json!({ "title": "", "content": "x" }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_drafts_are_private() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;
        let draft_id = create_blog(&server, &alice, "Work in progress", false).await;

        server
            .get(&format!("/blogs/{}", draft_id))
            .authorization_bearer(&bob.token)
            .await
            .assert_status_not_found();
        server
            .get(&format!("/blogs/{}", draft_id))
            .authorization_bearer(&alice.token)
            .await
            .assert_status_ok();

        let public = server
            .get("/blogs")
            .authorization_bearer(&bob.token)
            .await
            .json::<Vec<Value>>();
        assert!(public.is_empty());

        let mine = server
            .get("/blogs/mine")
            .authorization_bearer(&alice.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn test_search_and_author_filter() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;
        create_blog(&server, &alice, "Dynamic Programming", true).await;
        create_blog(&server, &bob, "Graph Traversal", true).await;

        let found = server
            .get("/blogs")
            .add_query_param("search", "dynamic")
            .authorization_bearer(&bob.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["title"], "Dynamic Programming");

        let by_bob = server
            .get("/blogs")
            .add_query_param("author_id", bob.id)
            .authorization_bearer(&alice.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(by_bob.len(), 1);
        assert_eq!(by_bob[0]["author_id"], bob.id);
    }

    #[tokio::test]
    async fn test_only_author_can_change_blog() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;
        let blog_id = create_blog(&server, &alice, "Heaps", true).await;

        server
            .patch(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&bob.token)
            .json(&json!({ "title": "Hijacked" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .delete(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&bob.token)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let updated = server
            .patch(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&alice.token)
            .json(&json!({ "title": "Binary Heaps" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<Value>()["title"], "Binary Heaps");

        server
            .delete(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&alice.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&alice.token)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_feed_and_publish_notifications() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;

        server
            .post(&format!("/users/{}/follow", alice.id))
            .authorization_bearer(&bob.token)
            .await
            .assert_status(StatusCode::CREATED);

        create_blog(&server, &alice, "Tries", true).await;
        let draft_id = create_blog(&server, &alice, "Segment Trees", false).await;

        let feed = server
            .get("/blogs/feed")
            .authorization_bearer(&bob.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0]["title"], "Tries");

        // publishing a draft announces it too
        server
            .patch(&format!("/blogs/{}", draft_id))
            .authorization_bearer(&alice.token)
            .json(&json!({ "published": true }))
            .await
            .assert_status_ok();

        let notifications = server
            .get("/notifications")
            .authorization_bearer(&bob.token)
            .await
            .json::<Vec<Value>>();
        let new_blogs: Vec<&Value> = notifications
            .iter()
            .filter(|n| n["kind"] == "new_blog")
            .collect();
        assert_eq!(new_blogs.len(), 2);
        assert_eq!(new_blogs.iter().filter(|n| n["blog_id"] == draft_id).count(), 1);
    }

    #[tokio::test]
    async fn test_comments_flow() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;
        let carol = register_and_login(&server, "carol").await;
        let blog_id = create_blog(&server, &alice, "Sorting", true).await;

        let response = server
            .post(&format!("/blogs/{}/comments", blog_id))
            .authorization_bearer(&bob.token)
            .json(&json!({ "content": "Great explanation" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let comment_id = response.json::<Value>()["comment_id"].as_i64().unwrap();

        // the author commenting on their own post is not notified
        server
            .post(&format!("/blogs/{}/comments", blog_id))
            .authorization_bearer(&alice.token)
            .json(&json!({ "content": "Thanks!" }))
            .await
            .assert_status(StatusCode::CREATED);

        let comments = server
            .get(&format!("/blogs/{}/comments", blog_id))
            .authorization_bearer(&carol.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0]["author_username"], "bob");

        let notifications = server
            .get("/notifications")
            .authorization_bearer(&alice.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["kind"], "comment");
        assert_eq!(notifications[0]["blog_id"], blog_id);

        // a third user cannot delete it, the blog author can
        server
            .delete(&format!("/comments/{}", comment_id))
            .authorization_bearer(&carol.token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .delete(&format!("/comments/{}", comment_id))
            .authorization_bearer(&alice.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let blog = server
            .get(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&alice.token)
            .await
            .json::<Value>();
        assert_eq!(blog["comment_count"], 1);
    }

    #[tokio::test]
    async fn test_blank_titles_are_rejected() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;

        server
            .post("/blogs")
            .authorization_bearer(&alice.token)
            .json(&json!({ "title": "   ", "content": "x" }))
            .await
            .assert_status_bad_request();

        let blog_id = create_blog(&server, &alice, "Heaps", true).await;
        server
            .patch(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&alice.token)
            .json(&json!({ "title": " \t " }))
            .await
            .assert_status_bad_request();

        // surrounding whitespace is dropped on a valid title
        let updated = server
            .patch(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&alice.token)
            .json(&json!({ "title": "  Binary Heaps  " }))
            .await
            .json::<Value>();
        assert_eq!(updated["title"], "Binary Heaps");
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        create_blog(&server, &alice, "Alpha", true).await;
        create_blog(&server, &alice, "Beta", true).await;

        for pattern in ["%", "_", "%a%"] {
            let found = server
                .get("/blogs")
                .add_query_param("search", pattern)
                .authorization_bearer(&alice.token)
                .await
                .json::<Vec<Value>>();
            assert!(found.is_empty(), "pattern {:?} matched {:?}", pattern, found);
        }

        create_blog(&server, &alice, "100% Recursion", true).await;
        let found = server
            .get("/blogs")
            .add_query_param("search", "100%")
            .authorization_bearer(&alice.token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["title"], "100% Recursion");
    }

    #[tokio::test]
    async fn test_republish_announces_once() {
        let (server, _, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;
        server
            .post(&format!("/users/{}/follow", alice.id))
            .authorization_bearer(&bob.token)
            .await
            .assert_status(StatusCode::CREATED);

        let blog_id = create_blog(&server, &alice, "Union Find", true).await;
        for published in [false, true, false, true] {
            server
                .patch(&format!("/blogs/{}", blog_id))
                .authorization_bearer(&alice.token)
                .json(&json!({ "published": published }))
                .await
                .assert_status_ok();
        }

        let notifications = server
            .get("/notifications")
            .authorization_bearer(&bob.token)
            .await
            .json::<Vec<Value>>();
        let announcements = notifications
            .iter()
            .filter(|n| n["kind"] == "new_blog" && n["blog_id"] == blog_id)
            .count();
        assert_eq!(announcements, 1);
    }

    #[tokio::test]
    async fn test_publish_survives_follower_lookup_failure() {
        let pool = create_test_pool().await;
        let state = create_test_state(pool.clone(), ScriptedClient::new());
        let server = create_test_server(state);
        let alice = register_and_login(&server, "alice").await;

        sqlx::query("DROP TABLE follows")
            .execute(&pool)
            .await
            .unwrap();

        let blog_id = create_blog(&server, &alice, "Sorting", true).await;
        server
            .get(&format!("/blogs/{}", blog_id))
            .authorization_bearer(&alice.token)
            .await
            .assert_status_ok();
    }
}
