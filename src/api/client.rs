use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, CONTENT_LENGTH,
    CONTENT_TYPE, COOKIE, ORIGIN, REFERER, USER_AGENT,
};
use serde_json::{json, Value};

use crate::api::payload::encode_request_para;
use crate::api::response::{ApiEnvelope, METER_LIST_OK_MESSAGE};
use crate::auth::credentials::Account;
use crate::error::AppError;

const BASE_URL: &str = "https://wt.ptswater.cn/iwater/v1/watermeter";

const PATH_METER_LIST: &str = "queryUserMeterList/v1.json";
const PATH_PAYMENT_INFO: &str = "queryPayMentInfo/v2.json";

/// Client identity constants the portal expects on every request.
const ACCOUNT_TYPE: &str = "XJ";
const API_TYPE: &str = "PC";
const APP_VERSION: &str = "1.0.2";

/// Payment query filter: settled bills only.
const PAY_STATUS: &str = "2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Putian water portal. Both endpoints take a POST with a
/// single percent-encoded `requestPara` form field and answer with a JSON
/// envelope; see [`ApiEnvelope`] for the validation rules.
pub struct WaterApi {
    client: reqwest::Client,
    host: String,
    headers: HeaderMap,
    token: String,
    meter_number: String,
    query_year: String,
    water_corp_id: i64,
    area_id: i64,
    verbose: bool,
}

impl WaterApi {
    /// `host` overrides the production base URL so tests can point the
    /// client at a local mock server.
    pub fn new(host: Option<String>, account: &Account, verbose: bool) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            host: host.unwrap_or_else(|| BASE_URL.to_string()),
            headers: browser_headers(&account.cookie)?,
            token: account.token.clone(),
            meter_number: account.meter_number.clone(),
            query_year: account.query_year.clone(),
            water_corp_id: account.water_corp_id,
            area_id: account.area_id,
            verbose,
        })
    }

    pub fn meter_number(&self) -> &str {
        &self.meter_number
    }

    pub fn query_year(&self) -> &str {
        &self.query_year
    }

    /// Fetch the account's meter list.
    pub async fn fetch_meter_list(&self) -> Result<ApiEnvelope, AppError> {
        let envelope = self
            .post_envelope(PATH_METER_LIST, &self.meter_list_body())
            .await?;
        envelope.require_success()?;
        Ok(envelope)
    }

    /// Fetch the settled payment records for the configured query year.
    pub async fn fetch_payment_info(&self) -> Result<ApiEnvelope, AppError> {
        let envelope = self
            .post_envelope(PATH_PAYMENT_INFO, &self.payment_info_body())
            .await?;
        envelope.require_success()?;
        Ok(envelope)
    }

    /// Setup-time probe that keeps the failure around for classification.
    /// The success test is deliberately lenient: the portal answers list
    /// queries with `success: false` often enough that only the data and
    /// the known success message are trusted.
    pub async fn check_connection(&self) -> Result<(), AppError> {
        let envelope = self
            .post_envelope(PATH_METER_LIST, &self.meter_list_body())
            .await?;
        if envelope.data_non_null()
            || envelope.message_contains(METER_LIST_OK_MESSAGE)
            || envelope.success_truthy()
        {
            return Ok(());
        }
        Err(AppError::Api(
            envelope.message().unwrap_or("Unknown error").to_string(),
        ))
    }

    /// Lenient connection test; any failure folds into `false`.
    pub async fn test_connection(&self) -> bool {
        self.check_connection().await.is_ok()
    }

    /// POST one endpoint and run the checks shared by both endpoints:
    /// HTTP status, content type, JSON shape, presence of envelope keys.
    async fn post_envelope(&self, path: &str, body: &Value) -> Result<ApiEnvelope, AppError> {
        let url = format!("{}/{}", self.host, path);
        let payload = encode_request_para(body);

        if self.verbose {
            eprintln!("POST {url}");
            eprintln!("Request: {body}");
        }

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .header(CONTENT_LENGTH, payload.len())
            .body(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        if status != 200 {
            return Err(AppError::Status { status, body: text });
        }
        if !content_type.contains("application/json") {
            return Err(AppError::UnexpectedResponse { content_type, body: text });
        }

        let value: Value = serde_json::from_str(&text)?;
        if self.verbose {
            eprintln!("Response: {value}");
        }

        let envelope = ApiEnvelope::from_value(&value);
        if !envelope.has_data() && !envelope.has_success() {
            return Err(AppError::MissingFields);
        }
        Ok(envelope)
    }

    fn meter_list_body(&self) -> Value {
        // waterCorpId and areaId must stay JSON integers; the portal throws
        // a NumberFormatException on anything else.
        json!({
            "UNID": "",
            "token": self.token,
            "waterCorpId": self.water_corp_id,
            "areaId": self.area_id,
            "accountType": ACCOUNT_TYPE,
            "apiType": API_TYPE,
            "appVersion": APP_VERSION,
        })
    }

    fn payment_info_body(&self) -> Value {
        json!({
            "meterNumber": self.meter_number,
            "startDate": format!("{}0101", self.query_year),
            "endDate": format!("{}1231", self.query_year),
            "waterCorpId": self.water_corp_id,
            "payStatus": PAY_STATUS,
            "token": self.token,
            "UNID": "",
            "areaId": self.area_id,
            "accountType": ACCOUNT_TYPE,
            "apiType": API_TYPE,
            "appVersion": APP_VERSION,
        })
    }
}

/// The header set the portal's own web front-end sends. The service is picky
/// about looking like a browser, so the whole set rides on every request.
fn browser_headers(cookie: &str) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/138.0.0.0 Safari/537.36 Edg/138.0.0.0",
        ),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(
            "\"Not)A;Brand\";v=\"8\", \"Chromium\";v=\"138\", \"Microsoft Edge\";v=\"138\"",
        ),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://wt.ptswater.cn"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert(REFERER, HeaderValue::from_static("https://wt.ptswater.cn/"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6,zh-TW;q=0.5"),
    );
    headers.insert(
        COOKIE,
        HeaderValue::from_str(cookie).map_err(|_| {
            AppError::InvalidInput("cookie contains characters not allowed in a header".to_string())
        })?,
    );
    Ok(headers)
}
