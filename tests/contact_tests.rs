
use actix_web::{http::StatusCode, test};
use portfolio_api::settings::AppConfig;
use serde_json::{json, Value};
use test_utils::{bearer, guarded_config};

fn valid_message() -> Value {
    json!({"name": "Ada Lovelace", "email": "Ada@Example.com", "message": "Hello there"})
}

#[actix_rt::test]
async fn test_submission_is_created() {
    let app = spawn_app!(AppConfig::for_tests());

    let req = test::TestRequest::post().uri("/api/contact").set_json(valid_message()).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message received successfully!");
    assert_eq!(body["data"]["name"], "Ada Lovelace");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["id"].as_str().unwrap().len(), 24);
}

#[actix_rt::test]
async fn test_bad_email_scenario() {
    let app = spawn_app!(AppConfig::for_tests());

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({"name": "A", "email": "bad-email", "message": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["errors"],
        json!([{"field": "email", "message": "Please provide a valid email address"}])
    );
}

#[actix_rt::test]
async fn test_blank_required_fields_are_named() {
    let app = spawn_app!(AppConfig::for_tests());

    for field in ["name", "email", "message"] {
        let mut body = valid_message();
        body[field] = json!("  ");

        let req = test::TestRequest::post().uri("/api/contact").set_json(&body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], field);
    }
}

#[actix_rt::test]
async fn test_get_list_and_delete() {
    let app = spawn_app!(AppConfig::for_tests());

    let req = test::TestRequest::post().uri("/api/contact").set_json(valid_message()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/contact/{}", created["data"]["id"].as_str().unwrap());

    let req = test::TestRequest::get().uri(&uri).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["data"], created["data"]);

    let req = test::TestRequest::get().uri("/api/contact").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["count"], 1);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "error": "Contact message not found"}));
}

#[actix_rt::test]
async fn test_malformed_ids_are_bad_requests() {
    let app = spawn_app!(AppConfig::for_tests());

    for req in [
        test::TestRequest::get().uri("/api/contact/abc").to_request(),
        test::TestRequest::delete().uri("/api/contact/abc").to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_rt::test]
async fn test_admin_token_guards_the_inbox() {
    let app = spawn_app!(guarded_config());

    // submissions stay public
    let req = test::TestRequest::post().uri("/api/contact").set_json(valid_message()).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/contact/{}", created["data"]["id"].as_str().unwrap());

    for req in [
        test::TestRequest::get().uri("/api/contact").to_request(),
        test::TestRequest::get().uri(&uri).to_request(),
        test::TestRequest::delete().uri(&uri).to_request(),
    ] {
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    let req = test::TestRequest::get().uri("/api/contact").insert_header(bearer()).to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["count"], 1);

    let req = test::TestRequest::delete().uri(&uri).insert_header(bearer()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
