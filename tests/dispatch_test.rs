//! Request dispatcher integration tests
//!
//! Every test runs the dispatcher against a `wiremock` backend and checks
//! what went over the wire as well as the classified outcome.

use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use itinera::config::ApiConfig;
use itinera::model::{ChatQuery, LoginRequest};
use itinera::{DispatchOutcome, Dispatcher, Endpoint, SessionContext, SessionToken};

fn dispatcher(base_url: &str, session: SessionContext) -> Dispatcher {
    let api = ApiConfig {
        base_url: base_url.to_string(),
        ..ApiConfig::default()
    };
    Dispatcher::new(&api, base_url, session).expect("dispatcher builds")
}

#[tokio::test]
async fn test_login_posts_credentials_as_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher(&server.uri(), SessionContext::in_memory());
    let request = LoginRequest {
        username: "alice".to_string(),
        password: "secret".to_string(),
    };

    let outcome = dispatcher.dispatch(Endpoint::Login, &request).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Success(json!({"token": "abc123"})));
}

#[tokio::test]
async fn test_protected_endpoint_sends_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/submit-review"))
        .and(header("x-access-token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionContext::in_memory();
    session.save(&SessionToken::new("abc123")).unwrap();
    let dispatcher = dispatcher(&server.uri(), session);

    let outcome = dispatcher
        .dispatch(
            Endpoint::SubmitReview,
            &json!({"activity_id": "42", "rating": 5, "review_text": "Great"}),
        )
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Success(json!({})));
}

#[tokio::test]
async fn test_authorization_header_uses_bearer_scheme() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/itinerary"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"itinerary": ["Park", "Museum"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionContext::in_memory();
    session.save(&SessionToken::new("abc123")).unwrap();
    let api = ApiConfig {
        base_url: server.uri(),
        auth_header: "authorization".to_string(),
        ..ApiConfig::default()
    };
    let dispatcher = Dispatcher::new(&api, &server.uri(), session).unwrap();

    let outcome = dispatcher
        .dispatch(Endpoint::CreateItinerary, &json!({"destination": "Paris"}))
        .await
        .unwrap();
    assert!(matches!(outcome, DispatchOutcome::Success(_)));
}

#[tokio::test]
async fn test_protected_endpoint_without_token_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dispatcher = dispatcher(&server.uri(), SessionContext::in_memory());

    let outcome = dispatcher
        .dispatch(Endpoint::CreateItinerary, &json!({"destination": "Paris"}))
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::LoginRequired);
}

#[tokio::test]
async fn test_public_endpoint_never_sends_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header_exists("x-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hi"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hi"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionContext::in_memory();
    session.save(&SessionToken::new("abc123")).unwrap();
    let dispatcher = dispatcher(&server.uri(), session);

    let outcome = dispatcher
        .dispatch(
            Endpoint::Chatbot,
            &ChatQuery {
                query: "hello".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Success(json!({"response": "Hi"})));
}

#[tokio::test]
async fn test_error_status_carries_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid Credentials!"})),
        )
        .mount(&server)
        .await;

    let dispatcher = dispatcher(&server.uri(), SessionContext::in_memory());
    let outcome = dispatcher
        .dispatch(Endpoint::Login, &json!({"username": "alice", "password": "wrong"}))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DispatchOutcome::ServerError {
            status: 401,
            message: Some("Invalid Credentials!".to_string()),
        }
    );
}

#[tokio::test]
async fn test_error_status_without_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let dispatcher = dispatcher(&server.uri(), SessionContext::in_memory());
    let outcome = dispatcher
        .dispatch(Endpoint::TrackExpense, &json!({"amount": 10, "currency": "EUR"}))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DispatchOutcome::ServerError {
            status: 500,
            message: None,
        }
    );
}

#[tokio::test]
async fn test_non_json_body_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let dispatcher = dispatcher(&server.uri(), SessionContext::in_memory());
    let outcome = dispatcher
        .dispatch(Endpoint::Chatbot, &json!({"query": "hi"}))
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::TransportFailure(_)));
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hi"})))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/api", server.uri());
    let dispatcher = dispatcher(&base, SessionContext::in_memory());
    let outcome = dispatcher
        .dispatch(Endpoint::Chatbot, &json!({"query": "hi"}))
        .await
        .unwrap();

    assert!(matches!(outcome, DispatchOutcome::Success(_)));
}

#[tokio::test]
async fn test_generate_uses_its_own_base_url() {
    let planner = MockServer::start().await;
    let generator = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&planner)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate-itinerary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"places": []})))
        .expect(1)
        .mount(&generator)
        .await;

    let api = ApiConfig {
        base_url: planner.uri(),
        ..ApiConfig::default()
    };
    let dispatcher =
        Dispatcher::new(&api, &generator.uri(), SessionContext::in_memory()).unwrap();

    let outcome = dispatcher
        .dispatch(Endpoint::GenerateItinerary, &json!({"destination": "Lisbon"}))
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Success(json!({"places": []})));
}
