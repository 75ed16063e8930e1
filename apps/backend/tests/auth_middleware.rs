mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpMessage, HttpRequest, HttpResponse};
use backend_test_support::problem_details::assert_problem_details;
use serde_json::{json, Value};
use users_backend::auth::jwt::mint_access_token;
use users_backend::{AppState, AuthenticatedIdentity, JwtExtract, RequestTrace, SecurityConfig};

use common::{bearer, security, test_app, test_state};

/// A protected probe route that counts how often its handler actually runs.
fn probe_app_config(
    hits: Arc<AtomicUsize>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::resource("/probe").wrap(JwtExtract).route(web::get().to(
                move |req: HttpRequest| {
                    let hits = Arc::clone(&hits);
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        let identity = req.extensions().get::<AuthenticatedIdentity>().copied();
                        HttpResponse::Ok().json(identity.map(|i| {
                            json!({ "subject_id": i.subject_id, "is_privileged": i.is_privileged })
                        }))
                    }
                },
            )),
        );
    }
}

fn state_without_db() -> AppState {
    AppState::new_without_db(security())
}

#[actix_web::test]
async fn missing_header_is_rejected_before_the_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_without_db()))
            .configure(probe_app_config(Arc::clone(&hits))),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/probe").to_request()).await;
    assert_problem_details(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn valid_token_attaches_identity() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_without_db()))
            .configure(probe_app_config(Arc::clone(&hits))),
    )
    .await;

    let token = mint_access_token(12, true, SystemTime::now(), &security()).unwrap();
    let req = test::TestRequest::get()
        .uri("/probe")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "subject_id": 12, "is_privileged": true }));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn rejected_tokens_share_one_response() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_without_db()))
            .configure(probe_app_config(Arc::clone(&hits))),
    )
    .await;

    let expired = mint_access_token(
        1,
        false,
        SystemTime::now() - Duration::from_secs(2 * 60 * 60),
        &security(),
    )
    .unwrap();
    let foreign = mint_access_token(
        1,
        true,
        SystemTime::now(),
        &SecurityConfig::new("some-other-secret"),
    )
    .unwrap();

    let mut details = Vec::new();
    for token in [expired.as_str(), foreign.as_str(), "garbage"] {
        let req = test::TestRequest::get()
            .uri("/probe")
            .insert_header(bearer(token))
            .to_request();
        let problem = assert_problem_details(
            test::call_service(&app, req).await,
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
        )
        .await;
        details.push(problem.detail);
    }

    details.dedup();
    assert_eq!(details.len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn token_route_echoes_claims() {
    let state = test_state().await;
    let app = test_app!(state).await;

    let token = mint_access_token(12, true, SystemTime::now(), &security()).unwrap();
    let req = test::TestRequest::get()
        .uri("/users/token")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "user_id": 12, "admin": true }));

    let req = test::TestRequest::get().uri("/users/token").to_request();
    assert_problem_details(
        test::call_service(&app, req).await,
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED",
    )
    .await;
}

#[actix_web::test]
async fn bare_token_without_scheme_is_accepted() {
    let state = test_state().await;
    let app = test_app!(state).await;

    let token = mint_access_token(3, false, SystemTime::now(), &security()).unwrap();
    let req = test::TestRequest::get()
        .uri("/users/token")
        .insert_header(("authorization", token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "user_id": 3, "admin": false }));
}
