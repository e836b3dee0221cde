use chrono::{TimeZone, Utc};
use mpesa_core::{FixedClock, GatewayError, PaymentRequest};
use mpesa_daraja::{DarajaClient, DarajaConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH_PATH: &str = "/oauth/v1/generate";
const PUSH_PATH: &str = "/mpesa/stkpush/v1/processrequest";

fn client_for(server: &MockServer) -> DarajaClient {
    let config = DarajaConfig::new("key", "secret", "passkey")
        .with_api_base_url(server.uri())
        .with_callback_url("https://example.com/mpesa-callback");

    // 09:00 UTC is 12:00 in Nairobi
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    DarajaClient::new(config)
        .unwrap()
        .with_clock(Arc::new(FixedClock(now)))
}

fn push_ack() -> Value {
    json!({
        "MerchantRequestID": "29115-34620561-1",
        "CheckoutRequestID": "ws_CO_191220191020363925",
        "ResponseCode": "0",
        "ResponseDescription": "Success. Request accepted for processing",
        "CustomerMessage": "Success. Request accepted for processing"
    })
}

async fn mount_auth_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(AUTH_PATH))
        .and(query_param("grant_type", "client_credentials"))
        .and(header("Authorization", "Basic a2V5OnNlY3JldA=="))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-123", "expires_in": "3599"})),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn authenticate_returns_access_token() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;

    let token = client_for(&server).authenticate().await.unwrap();

    assert_eq!(token, "tok-123");
}

#[tokio::test]
async fn authenticate_preserves_upstream_error_body() {
    let server = MockServer::start().await;
    let upstream_error = json!({
        "requestId": "abc",
        "errorCode": "400.008.01",
        "errorMessage": "Invalid Authentication passed"
    });
    Mock::given(method("GET"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(upstream_error.clone()))
        .mount(&server)
        .await;

    let err = client_for(&server).authenticate().await.unwrap_err();

    match &err {
        GatewayError::UpstreamAuth(failure) => {
            assert_eq!(failure.status, Some(400));
            assert_eq!(failure.detail, upstream_error);
        }
        other => panic!("expected UpstreamAuth, got {:?}", other),
    }
}

#[tokio::test]
async fn authenticate_without_token_in_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_in": "3599"})))
        .mount(&server)
        .await;

    let err = client_for(&server).authenticate().await.unwrap_err();

    assert!(matches!(err, GatewayError::UpstreamAuth(_)));
    assert_eq!(err.detail(), json!({"expires_in": "3599"}));
}

#[tokio::test]
async fn initiate_payment_returns_upstream_body_verbatim() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;

    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(header("Authorization", "Bearer tok-123"))
        .and(body_json(json!({
            "BusinessShortCode": "174379",
            "Password": "MTc0Mzc5cGFzc2tleTIwMjQwMTAxMTIwMDAw",
            "Timestamp": "20240101120000",
            "TransactionType": "CustomerPayBillOnline",
            "Amount": 10,
            "PartyA": "254712345678",
            "PartyB": "174379",
            "PhoneNumber": "254712345678",
            "CallBackURL": "https://example.com/mpesa-callback",
            "AccountReference": "PDFBUKS",
            "TransactionDesc": "Payment of 10"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_ack()))
        .expect(1)
        .mount(&server)
        .await;

    let request = PaymentRequest::new("0712345678", 10.0).unwrap();
    let body = client_for(&server).initiate_payment(&request).await.unwrap();

    assert_eq!(body, push_ack());
}

#[tokio::test]
async fn initiate_payment_auth_failure_skips_push() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(push_ack()))
        .expect(0)
        .mount(&server)
        .await;

    let request = PaymentRequest::new("0712345678", 10.0).unwrap();
    let err = client_for(&server).initiate_payment(&request).await.unwrap_err();

    assert!(matches!(err, GatewayError::UpstreamRequest(_)));
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.detail(), json!("Unauthorized"));
}

#[tokio::test]
async fn initiate_payment_surfaces_push_error() {
    let server = MockServer::start().await;
    mount_auth_ok(&server).await;

    let upstream_error = json!({
        "requestId": "req-1",
        "errorCode": "400.002.02",
        "errorMessage": "Bad Request - Invalid PhoneNumber"
    });
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(upstream_error.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let request = PaymentRequest::new("12", 10.0).unwrap();
    let err = client_for(&server).initiate_payment(&request).await.unwrap_err();

    assert!(matches!(err, GatewayError::UpstreamRequest(_)));
    assert_eq!(err.detail(), upstream_error);
}

#[tokio::test]
async fn initiate_payment_unreachable_upstream() {
    // Nothing listens on port 1
    let config = DarajaConfig::new("key", "secret", "passkey")
        .with_api_base_url("http://127.0.0.1:1");
    let client = DarajaClient::new(config).unwrap();

    let request = PaymentRequest::new("0712345678", 10.0).unwrap();
    let err = client.initiate_payment(&request).await.unwrap_err();

    match err {
        GatewayError::UpstreamRequest(failure) => {
            assert_eq!(failure.status, None);
            assert!(failure.detail.is_string());
        }
        other => panic!("expected UpstreamRequest, got {:?}", other),
    }
}
