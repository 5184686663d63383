#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use crate::config::{AppConfig, PaginationConfig};
    use crate::state::AppState;

    /// State backed by in-memory repositories and a temp upload directory.
    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            database: None,
            upload_dir: dir.path().to_path_buf(),
            max_upload_bytes: 10 * 1024 * 1024,
            pagination: PaginationConfig {
                default_size: 20,
                max_size: 100,
            },
        };
        (AppState::new(&config).await, dir)
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new($state.clone()))
                    .app_data(actix_web::web::Data::new($state.tokens.clone()))
                    .configure(crate::handlers::configure_routes),
            )
            .await
        };
    }

    macro_rules! register_user {
        ($app:expr, $username:expr) => {{
            let body = serde_json::json!({
                "username": $username,
                "email": format!("{}@example.com", $username),
                "password": "correct-horse9",
            });
            let req = test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(&body)
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: serde_json::Value = test::read_body_json(resp).await;
            body["access_token"].as_str().unwrap().to_string()
        }};
    }

    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    /// Builds a multipart/form-data body with an optional `post` JSON part
    /// and any number of `images` file parts.
    fn multipart_body(post_json: Option<&str>, images: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(json) = post_json {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"post\"\r\n\r\n{json}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, bytes) in images {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; \
                     filename=\"{name}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(
        method: test::TestRequest,
        token: &str,
        post_json: Option<&str>,
        images: &[(&str, &[u8])],
    ) -> test::TestRequest {
        method
            .insert_header(("authorization", format!("Bearer {token}")))
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(post_json, images))
    }

    fn file_exists(dir: &std::path::Path, reference: &str) -> bool {
        let name = reference.strip_prefix("/images/").unwrap();
        dir.join(name).exists()
    }

    #[actix_web::test]
    async fn test_register_login_me_flow() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);

        let token = register_user!(app, "alice");

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let me: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(me["username"], "alice");

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({"username": "alice", "password": "correct-horse9"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_register_rejects_invalid_email() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "username": "bob",
                "email": "not-an-email",
                "password": "correct-horse9",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_duplicate_username_conflicts() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);
        register_user!(app, "alice");

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "username": "alice",
                "email": "second@example.com",
                "password": "correct-horse9",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_post_with_images() {
        let (state, dir) = test_state().await;
        let app = test_app!(state);
        let token = register_user!(app, "alice");

        let req = multipart_request(
            test::TestRequest::post().uri("/api/posts"),
            &token,
            Some(r#"{"title": "Hello", "content": "First post"}"#),
            &[("a.png", b"aaa"), ("b.png", b"bbb")],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let post: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(post["title"], "Hello");

        let images = post["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        for image in images {
            let reference = image.as_str().unwrap();
            assert!(reference.starts_with("/images/"));
            assert!(file_exists(dir.path(), reference));
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post["id"].as_str().unwrap()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_create_post_requires_post_part() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);
        let token = register_user!(app, "alice");

        let req = multipart_request(
            test::TestRequest::post().uri("/api/posts"),
            &token,
            None,
            &[("a.png", b"aaa")],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_create_post_requires_auth() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(
                Some(r#"{"title": "Hello", "content": "First post"}"#),
                &[],
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_update_reconciles_images() {
        let (state, dir) = test_state().await;
        let app = test_app!(state);
        let token = register_user!(app, "alice");

        let req = multipart_request(
            test::TestRequest::post().uri("/api/posts"),
            &token,
            Some(r#"{"title": "Hello", "content": "First post"}"#),
            &[("a.png", b"aaa"), ("b.png", b"bbb")],
        )
        .to_request();
        let created: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        let post_id = created["id"].as_str().unwrap().to_string();
        let kept = created["images"][0].as_str().unwrap().to_string();
        let dropped = created["images"][1].as_str().unwrap().to_string();

        let update_json = serde_json::json!({
            "title": "Hello v2",
            "existing_images": [kept],
        });
        let req = multipart_request(
            test::TestRequest::put().uri(&format!("/api/posts/{post_id}")),
            &token,
            Some(&update_json.to_string()),
            &[("c.png", b"ccc")],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: serde_json::Value = test::read_body_json(resp).await;

        assert_eq!(updated["title"], "Hello v2");
        assert_eq!(updated["content"], "First post");
        let images = updated["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].as_str().unwrap(), kept);
        assert!(images[1].as_str().unwrap().ends_with("_c.png"));

        assert!(file_exists(dir.path(), &kept));
        assert!(!file_exists(dir.path(), &dropped));
    }

    #[actix_web::test]
    async fn test_update_by_non_author_is_forbidden() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);
        let author_token = register_user!(app, "alice");
        let other_token = register_user!(app, "mallory");

        let req = multipart_request(
            test::TestRequest::post().uri("/api/posts"),
            &author_token,
            Some(r#"{"title": "Hello", "content": "First post"}"#),
            &[],
        )
        .to_request();
        let created: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        let post_id = created["id"].as_str().unwrap().to_string();

        let req = multipart_request(
            test::TestRequest::put().uri(&format!("/api/posts/{post_id}")),
            &other_token,
            Some(r#"{"title": "Hijacked"}"#),
            &[],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_delete_removes_record_and_files() {
        let (state, dir) = test_state().await;
        let app = test_app!(state);
        let token = register_user!(app, "alice");

        let req = multipart_request(
            test::TestRequest::post().uri("/api/posts"),
            &token,
            Some(r#"{"title": "Hello", "content": "First post"}"#),
            &[("a.png", b"aaa")],
        )
        .to_request();
        let created: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        let post_id = created["id"].as_str().unwrap().to_string();
        let reference = created["images"][0].as_str().unwrap().to_string();

        // Any authenticated user may delete, not just the author.
        let deleter_token = register_user!(app, "bob");
        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(("authorization", format!("Bearer {deleter_token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        assert!(!file_exists(dir.path(), &reference));

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{post_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_search_and_filters() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);
        let token = register_user!(app, "alice");

        for (title, content) in [("Rust Rocks", "systems"), ("Cooking", "pasta")] {
            let json = format!(r#"{{"title": "{title}", "content": "{content}"}}"#);
            let req = multipart_request(
                test::TestRequest::post().uri("/api/posts"),
                &token,
                Some(&json),
                &[],
            )
            .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/posts/search?title=rust")
            .to_request();
        let page: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(page["total_items"], 1);
        assert_eq!(page["items"][0]["title"], "Rust Rocks");

        let req = test::TestRequest::get()
            .uri("/api/posts/filter/title?title=COOK")
            .to_request();
        let page: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(page["total_items"], 1);

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("authorization", format!("Bearer {token}")))
            .to_request();
        let me: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
        let author_id = me["id"].as_str().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/filter/author?author_id={author_id}"))
            .to_request();
        let page: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(page["total_items"], 2);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let page: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(page["total_items"], 2);
        assert_eq!(page["total_pages"], 1);
    }

    #[actix_web::test]
    async fn test_filter_author_unknown_user_is_not_found() {
        let (state, _dir) = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/posts/filter/author?author_id={}",
                uuid::Uuid::new_v4()
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
