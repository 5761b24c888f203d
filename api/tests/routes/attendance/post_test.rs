#[cfg(test)]
mod tests {
    use crate::helpers::{body_json, make_test_app, request, send, setup};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::models::attendance_record;
    use serde_json::json;

    async fn open_session(app: &axum::Router, token: &str, module_id: i64) -> i64 {
        let res = send(
            app,
            request(
                "POST",
                "/api/attendance/sessions",
                Some(token),
                Some(json!({ "module_id": module_id, "title": "Lecture 1" })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        body_json(res).await["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_create_session_as_lecturer() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        let res = send(
            &app,
            request(
                "POST",
                "/api/attendance/sessions",
                Some(&ctx.lecturer.token),
                Some(json!({ "module_id": ctx.module.id, "title": "  Week 3  " })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let json = body_json(res).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["title"], "Week 3");
        assert_eq!(json["data"]["status"], "active");
        assert_eq!(json["data"]["module_id"], ctx.module.id);
        assert_eq!(json["data"]["created_by"], ctx.lecturer.user.id);
        assert!(json["data"]["closed_at"].is_null());
    }

    #[tokio::test]
    async fn test_create_session_default_title_as_admin() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        let res = send(
            &app,
            request(
                "POST",
                "/api/attendance/sessions",
                Some(&ctx.admin.token),
                Some(json!({ "module_id": ctx.module.id })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(body_json(res).await["data"]["title"], "Attendance");
    }

    #[tokio::test]
    async fn test_create_session_forbidden_for_student_and_tutor() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        for token in [&ctx.students[0].token, &ctx.tutor.token, &ctx.outsider.token] {
            let res = send(
                &app,
                request(
                    "POST",
                    "/api/attendance/sessions",
                    Some(token),
                    Some(json!({ "module_id": ctx.module.id })),
                ),
            )
            .await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN);
            assert_eq!(body_json(res).await["success"], false);
        }
    }

    #[tokio::test]
    async fn test_create_session_bad_input() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let token = ctx.lecturer.token.as_str();

        // unknown module: forbidden for a lecturer without a role there, not found for an admin
        let res = send(
            &app,
            request("POST", "/api/attendance/sessions", Some(token), Some(json!({ "module_id": 9999 }))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let res = send(
            &app,
            request(
                "POST",
                "/api/attendance/sessions",
                Some(&ctx.admin.token),
                Some(json!({ "module_id": 9999 })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        // title too long
        let res = send(
            &app,
            request(
                "POST",
                "/api/attendance/sessions",
                Some(token),
                Some(json!({ "module_id": ctx.module.id, "title": "x".repeat(256) })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(res).await["message"], "Title must be at most 255 characters");

        // the limit applies after trimming
        let padded = format!("  {}  ", "y".repeat(255));
        let res = send(
            &app,
            request(
                "POST",
                "/api/attendance/sessions",
                Some(token),
                Some(json!({ "module_id": ctx.module.id, "title": padded })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(body_json(res).await["data"]["title"], "y".repeat(255));

        // malformed json
        let req = Request::builder()
            .method("POST")
            .uri("/api/attendance/sessions")
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from("{ \"module_id\": "))
            .unwrap();
        let res = send(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        let res = send(
            &app,
            request("POST", "/api/attendance/sessions", None, Some(json!({ "module_id": ctx.module.id }))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = send(&app, request("POST", "/api/attendance/mark/1", Some("not-a-jwt"), None)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_mark_then_mark_again() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let session_id = open_session(&app, &ctx.lecturer.token, ctx.module.id).await;
        let bo = &ctx.students[1];
        let uri = format!("/api/attendance/mark/{session_id}");

        let res = send(&app, request("POST", &uri, Some(&bo.token), None)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let first = body_json(res).await;
        assert_eq!(first["data"]["already_marked"], false);
        assert_eq!(first["data"]["record"]["user_id"], bo.user.id);

        let res = send(&app, request("POST", &uri, Some(&bo.token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let second = body_json(res).await;
        assert_eq!(second["success"], true);
        assert_eq!(second["data"]["already_marked"], true);
        assert_eq!(second["data"]["record"]["taken_at"], first["data"]["record"]["taken_at"]);

        let rows = attendance_record::Model::for_session(state.db(), session_id).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_rules() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let session_id = open_session(&app, &ctx.lecturer.token, ctx.module.id).await;
        let uri = format!("/api/attendance/mark/{session_id}");

        for token in [&ctx.lecturer.token, &ctx.tutor.token, &ctx.outsider.token, &ctx.admin.token] {
            let res = send(&app, request("POST", &uri, Some(token), None)).await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN);
        }

        let res = send(
            &app,
            request("POST", "/api/attendance/mark/424242", Some(&ctx.students[0].token), None),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = send(
            &app,
            request(
                "PATCH",
                &format!("/api/attendance/sessions/{session_id}/close"),
                Some(&ctx.lecturer.token),
                None,
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, request("POST", &uri, Some(&ctx.students[2].token), None)).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let json = body_json(res).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("no longer accepting attendance"));

        let rows = attendance_record::Model::for_session(state.db(), session_id).await.unwrap();
        assert!(rows.is_empty());
    }
}
