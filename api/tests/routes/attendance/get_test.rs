#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::helpers::{body_json, body_text, make_app_with_state, make_test_app, request, send, setup};
    use api::state::AppState;
    use async_trait::async_trait;
    use axum::http::{StatusCode, header};
    use services::{
        AttendanceError, AttendanceResult, EnrolledStudent, EnrollmentDirectory, collaborators::RoleAccessPolicy,
    };

    async fn post_json(app: &axum::Router, uri: &str, token: &str, body: serde_json::Value) -> serde_json::Value {
        let res = send(app, request("POST", uri, Some(token), Some(body))).await;
        assert!(res.status().is_success(), "POST {uri} -> {}", res.status());
        body_json(res).await
    }

    #[tokio::test]
    async fn test_listings_before_and_after_close() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let module_id = ctx.module.id;

        let s1 = post_json(
            &app,
            "/api/attendance/sessions",
            &ctx.lecturer.token,
            serde_json::json!({ "module_id": module_id, "title": "S1" }),
        )
        .await["data"]["id"]
            .as_i64()
            .unwrap();

        let active_uri = format!("/api/attendance/modules/{module_id}/active");
        let all_uri = format!("/api/attendance/modules/{module_id}/all");

        // any member may list active sessions
        for token in [&ctx.students[0].token, &ctx.tutor.token] {
            let res = send(&app, request("GET", &active_uri, Some(token), None)).await;
            assert_eq!(res.status(), StatusCode::OK);
            let json = body_json(res).await;
            assert_eq!(json["data"].as_array().unwrap().len(), 1);
            assert_eq!(json["data"][0]["id"], s1);
        }

        let res = send(&app, request("GET", &active_uri, Some(&ctx.outsider.token), None)).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = send(
            &app,
            request("PATCH", &format!("/api/attendance/sessions/{s1}/close"), Some(&ctx.lecturer.token), None),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, request("GET", &active_uri, Some(&ctx.students[0].token), None)).await;
        assert!(body_json(res).await["data"].as_array().unwrap().is_empty());

        let res = send(&app, request("GET", &all_uri, Some(&ctx.students[0].token), None)).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = send(&app, request("GET", &all_uri, Some(&ctx.lecturer.token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["data"][0]["id"], s1);
        assert_eq!(json["data"][0]["status"], "closed");

        let res = send(
            &app,
            request("GET", "/api/attendance/modules/9999/all", Some(&ctx.lecturer.token), None),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = send(
            &app,
            request("GET", "/api/attendance/modules/9999/all", Some(&ctx.admin.token), None),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_and_export_end_to_end() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let (ann, bo, cy) = (&ctx.students[0], &ctx.students[1], &ctx.students[2]);

        let s1 = post_json(
            &app,
            "/api/attendance/sessions",
            &ctx.lecturer.token,
            serde_json::json!({ "module_id": ctx.module.id, "title": "S1" }),
        )
        .await["data"]["id"]
            .as_i64()
            .unwrap();
        let mark_uri = format!("/api/attendance/mark/{s1}");

        send(&app, request("POST", &mark_uri, Some(&ann.token), None)).await;
        send(&app, request("POST", &mark_uri, Some(&bo.token), None)).await;
        let res = send(&app, request("POST", &mark_uri, Some(&bo.token), None)).await;
        assert_eq!(res.status(), StatusCode::OK);

        send(
            &app,
            request("PATCH", &format!("/api/attendance/sessions/{s1}/close"), Some(&ctx.lecturer.token), None),
        )
        .await;
        let res = send(&app, request("POST", &mark_uri, Some(&cy.token), None)).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        // report
        let res = send(
            &app,
            request("GET", &format!("/api/attendance/sessions/{s1}"), Some(&ctx.lecturer.token), None),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let report = body_json(res).await["data"].clone();
        assert_eq!(report["total_students"], 3);
        assert_eq!(report["present"], 2);
        assert_eq!(report["absent"], 1);
        assert_eq!(report["session"]["status"], "closed");
        assert_eq!(report["session"]["module_code"], "ATT301");

        let rows = report["rows"].as_array().unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["ann", "bo", "cy"]);
        assert_eq!(rows[2]["present"], false);
        assert!(rows[2]["marked_at"].is_null());

        // students cannot read the roster
        let res = send(
            &app,
            request("GET", &format!("/api/attendance/sessions/{s1}"), Some(&ann.token), None),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // export
        let res = send(
            &app,
            request("GET", &format!("/api/attendance/export/{s1}"), Some(&ctx.lecturer.token), None),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        let disposition = res
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with(&format!("attachment; filename=\"attendance_session_{s1}_")));
        assert!(disposition.ends_with("Z.csv\""));

        let csv = body_text(res).await;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,email,status,marked_at");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("ann,ann@test.com,Present,"));
        assert!(lines[2].starts_with("bo,bo@test.com,Present,"));
        assert_eq!(lines[3], "cy,cy@test.com,Absent,");
    }

    struct DownEnrollment;

    #[async_trait]
    impl EnrollmentDirectory for DownEnrollment {
        async fn students(&self, _module_id: i64) -> AttendanceResult<Vec<EnrolledStudent>> {
            Err(AttendanceError::enrollment("directory offline"))
        }

        async fn is_enrolled(&self, _module_id: i64, _student_id: i64) -> AttendanceResult<bool> {
            Err(AttendanceError::enrollment("directory offline"))
        }
    }

    #[tokio::test]
    async fn test_enrollment_outage_is_service_unavailable() {
        let (_, seeded) = make_test_app().await;
        let db = seeded.db().clone();
        let ctx = setup(&db).await;

        let state = AppState::with_collaborators(
            db.clone(),
            Arc::new(DownEnrollment),
            Arc::new(RoleAccessPolicy::new(db.clone())),
        );
        let app = make_app_with_state(state);

        let s1 = post_json(
            &app,
            "/api/attendance/sessions",
            &ctx.lecturer.token,
            serde_json::json!({ "module_id": ctx.module.id }),
        )
        .await["data"]["id"]
            .as_i64()
            .unwrap();

        for uri in [format!("/api/attendance/sessions/{s1}"), format!("/api/attendance/export/{s1}")] {
            let res = send(&app, request("GET", &uri, Some(&ctx.lecturer.token), None)).await;
            assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body_json(res).await["success"], false);
        }

        let res = send(
            &app,
            request("POST", &format!("/api/attendance/mark/{s1}"), Some(&ctx.students[0].token), None),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
