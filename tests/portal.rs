use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ptwater::api::client::WaterApi;
use ptwater::auth::credentials::Account;
use ptwater::coordinator::RefreshCoordinator;
use ptwater::error::AppError;
use ptwater::models::refresh::RefreshState;

const METER_PATH: &str = "/queryUserMeterList/v1.json";
const PAYMENT_PATH: &str = "/queryPayMentInfo/v2.json";

fn test_account() -> Account {
    Account {
        token: "tok-1".to_string(),
        cookie: "JSESSIONID=abc123".to_string(),
        meter_number: "M100200".to_string(),
        query_year: "2025".to_string(),
        water_corp_id: 3,
        area_id: 0,
    }
}

fn api_for(server: &MockServer) -> WaterApi {
    WaterApi::new(Some(server.uri()), &test_account(), false).unwrap()
}

async fn mount_meter(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(METER_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_payment(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(PAYMENT_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn meter_list_request_is_form_encoded_with_integer_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(METER_PATH))
        .and(header("cookie", "JSESSIONID=abc123"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("requestPara="))
        .and(body_string_contains("%22waterCorpId%22%3A3"))
        .and(body_string_contains("%22areaId%22%3A0"))
        .and(body_string_contains("%22accountType%22%3A%22XJ%22"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"meterNumber": "M100200", "balance": "12.5"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = api_for(&server).fetch_meter_list().await.unwrap();
    assert!(envelope.first_record().is_some());
}

#[tokio::test]
async fn payment_request_spans_the_configured_year() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PAYMENT_PATH))
        .and(body_string_contains("%22startDate%22%3A%2220250101%22"))
        .and(body_string_contains("%22endDate%22%3A%2220251231%22"))
        .and(body_string_contains("%22payStatus%22%3A%222%22"))
        .and(body_string_contains("%22meterNumber%22%3A%22M100200%22"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).fetch_payment_info().await.unwrap();
}

#[tokio::test]
async fn non_200_maps_to_status_error() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(500).set_body_string("Internal error"),
    )
    .await;

    let err = api_for(&server).fetch_meter_list().await.unwrap_err();
    match err {
        AppError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal error");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_content_type_is_rejected() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_raw("<html>session expired</html>", "text/html"),
    )
    .await;

    let err = api_for(&server).fetch_meter_list().await.unwrap_err();
    match err {
        AppError::UnexpectedResponse { content_type, body } => {
            assert!(content_type.contains("text/html"));
            assert!(body.contains("session expired"));
        }
        other => panic!("expected UnexpectedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_json_body_is_an_error() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_raw("not json at all", "application/json"),
    )
    .await;

    let err = api_for(&server).fetch_meter_list().await.unwrap_err();
    assert!(matches!(err, AppError::Json(_)));
}

#[tokio::test]
async fn reported_failure_carries_the_portal_message() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "token失效"
        })),
    )
    .await;

    let err = api_for(&server).fetch_meter_list().await.unwrap_err();
    assert!(matches!(err, AppError::Api(_)));
    assert!(err.to_string().contains("token失效"));
}

#[tokio::test]
async fn false_success_with_data_still_yields_records() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "获取水表列表成功",
            "data": [{"meterNumber": "M100200", "balance": "5"}]
        })),
    )
    .await;

    let envelope = api_for(&server).fetch_meter_list().await.unwrap();
    assert!(envelope.first_record().is_some());
}

#[tokio::test]
async fn envelope_without_data_or_success_is_malformed() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"foo": 1})),
    )
    .await;

    let err = api_for(&server).fetch_meter_list().await.unwrap_err();
    assert!(matches!(err, AppError::MissingFields));
}

#[tokio::test]
async fn connection_test_accepts_the_success_message_alone() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "获取水表列表成功"
        })),
    )
    .await;

    assert!(api_for(&server).test_connection().await);
}

#[tokio::test]
async fn connection_test_accepts_data_without_success_key() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"meterNumber": "M100200"}]
        })),
    )
    .await;

    assert!(api_for(&server).test_connection().await);
}

#[tokio::test]
async fn connection_test_folds_failures_into_false() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(500).set_body_string("boom"),
    )
    .await;

    assert!(!api_for(&server).test_connection().await);
}

#[tokio::test]
async fn connection_check_surfaces_the_failure() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "账号或密码错误"
        })),
    )
    .await;

    let err = api_for(&server).check_connection().await.unwrap_err();
    assert!(err.to_string().contains("账号或密码错误"));
}

#[tokio::test]
async fn refresh_cycle_normalizes_both_endpoints() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "meterNumber": "M100200",
                "meterAddress": "莆田市某街道1号",
                "userStatus": "正常",
                "balance": "12.5",
                "consumedVolume": "8"
            }]
        })),
    )
    .await;
    mount_payment(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "costDate": "2025-03",
                "payablePrincipal": "30.6",
                "payStatus": "已缴费",
                "paymentDate": "2025-03-05 10:00:00"
            }]
        })),
    )
    .await;

    let mut coordinator = RefreshCoordinator::new(api_for(&server));
    let result = coordinator.refresh().await;

    assert!(result.is_fresh());
    let meter = result.meter.as_ref().unwrap();
    assert_eq!(meter.balance, 12.5);
    assert_eq!(meter.arrearage, 0.0);
    let bill = result.bill.as_ref().unwrap();
    assert_eq!(bill.amount, 30.6);
    assert_eq!(bill.payment_date, "2025-03-05");
    assert_eq!(result.query_year, "2025");
}

#[tokio::test]
async fn failed_meter_fetch_degrades_and_skips_the_payment_call() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(500).set_body_string("down"),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(PAYMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let mut coordinator = RefreshCoordinator::new(api_for(&server));
    let result = coordinator.refresh().await;

    assert!(result.meter.is_none());
    assert!(result.bill.is_none());
    let error = result.error.as_ref().unwrap();
    assert!(error.contains("500"));
    assert_eq!(result.state(), RefreshState::Stale);
}

#[tokio::test]
async fn successful_empty_lists_read_as_fresh_but_empty() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
    )
    .await;
    mount_payment(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
    )
    .await;

    let mut coordinator = RefreshCoordinator::new(api_for(&server));
    let result = coordinator.refresh().await;

    assert!(result.meter.is_none());
    assert!(result.bill.is_none());
    assert!(result.error.is_none());
    assert_eq!(result.state(), RefreshState::Fresh);
}

#[tokio::test]
async fn a_failed_cycle_replaces_the_previous_result_wholesale() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"meterNumber": "M100200", "balance": "12.5"}]
        })),
    )
    .await;
    mount_payment(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
    )
    .await;

    let mut coordinator = RefreshCoordinator::new(api_for(&server));
    assert!(coordinator.data().is_none());
    assert_eq!(coordinator.state(), RefreshState::Stale);

    assert!(coordinator.refresh().await.meter.is_some());
    assert_eq!(coordinator.state(), RefreshState::Fresh);

    server.reset().await;
    mount_meter(
        &server,
        ResponseTemplate::new(500).set_body_string("down"),
    )
    .await;

    let result = coordinator.refresh().await;
    assert!(result.meter.is_none());
    assert!(result.error.is_some());

    let cached = coordinator.data().unwrap();
    assert!(cached.meter.is_none());
    assert_eq!(coordinator.state(), RefreshState::Stale);
}

#[tokio::test]
async fn malformed_record_degrades_the_whole_refresh() {
    let server = MockServer::start().await;
    mount_meter(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"meterNumber": "M100200", "balance": "abc"}]
        })),
    )
    .await;
    mount_payment(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
    )
    .await;

    let mut coordinator = RefreshCoordinator::new(api_for(&server));
    let result = coordinator.refresh().await;

    assert!(result.meter.is_none());
    let error = result.error.as_ref().unwrap();
    assert!(error.contains("balance"));
    assert_eq!(result.state(), RefreshState::Stale);
}
