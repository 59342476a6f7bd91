
use actix_web::{body::to_bytes, http::StatusCode, test, web, App, HttpResponse};
use portfolio_api::{
    middlewares::fault_barrier::FaultBarrier,
    routes::configure_routes,
    settings::AppConfig,
};
use serde_json::{json, Value};
use test_utils::test_state;

#[actix_rt::test]
async fn test_home_and_health() {
    let app = spawn_app!(AppConfig::for_tests());

    let req = test::TestRequest::get().uri("/").to_request();
    let home: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(home["status"], "Ok");
    assert_eq!(home["version"], env!("CARGO_PKG_VERSION"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let health: Value = test::read_body_json(resp).await;
    assert_eq!(health["success"], true);
    assert_eq!(health["database"], "OK");
    assert!(health["uptime"].is_string());
    assert!(health["startedAt"].is_string());
}

#[actix_rt::test]
async fn test_unknown_routes_are_not_found() {
    let app = spawn_app!(AppConfig::for_tests());

    for uri in ["/nope", "/api/nothing-here"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": false, "error": "Route not found"}));
    }
}

#[actix_rt::test]
async fn test_malformed_json_is_rejected() {
    let app = spawn_app!(AppConfig::for_tests());

    let req = test::TestRequest::post()
        .uri("/api/projects")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"title\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON payload"));
}

#[actix_rt::test]
async fn test_non_object_bodies_fail_validation() {
    let app = spawn_app!(AppConfig::for_tests());

    let req = test::TestRequest::post().uri("/api/projects").set_json(json!(["title"])).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "body");
}

async fn explode() -> HttpResponse {
    panic!("storage exploded with secret detail")
}

#[actix_rt::test]
async fn test_panics_become_one_normalized_500() {
    let app = test::init_service(
        App::new()
            .app_data(test_state(&AppConfig::for_tests()))
            .wrap(FaultBarrier)
            .route("/explode", web::get().to(explode))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/explode").to_request();
    let err = match test::try_call_service(&app, req).await {
        Err(err) => err,
        Ok(resp) => panic!("expected an error, got {}", resp.status()),
    };
    assert_eq!(err.as_response_error().status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(err.error_response().into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"success": false, "error": "Internal Server Error"}));

    // the app keeps serving afterwards
    let req = test::TestRequest::get().uri("/api/projects").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_barrier_passes_routed_requests_through() {
    let app = test::init_service(
        App::new()
            .app_data(test_state(&AppConfig::for_tests()))
            .wrap(FaultBarrier)
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/projects/000000000000000000000000").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/projects").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
}
