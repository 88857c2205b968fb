//! JSON bodies exchanged with the Zabbix server.

use serde::Serialize;
use serde_json::Value;

use crate::log_record::LogRecord;

const JSONRPC_VERSION: &str = "2.0";
const REQUEST_ID: u32 = 1;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// `user.login` API call.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: Credentials<'a>,
    id: u32,
}

impl<'a> LoginRequest<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: "user.login",
            params: Credentials { username, password },
            id: REQUEST_ID,
        }
    }
}

/// `user.logout` API call.
#[derive(Debug, Serialize)]
pub struct LogoutRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: [(); 0],
    id: u32,
    auth: &'a str,
}

impl<'a> LogoutRequest<'a> {
    pub fn new(token: &'a str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: "user.logout",
            params: [],
            id: REQUEST_ID,
            auth: token,
        }
    }
}

/// One observation pushed to a trapper item.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DataPoint<'a> {
    pub host: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}

/// `sender data` request carrying a single data point.
#[derive(Debug, Serialize)]
pub struct SenderData<'a> {
    request: &'static str,
    data: [DataPoint<'a>; 1],
}

impl<'a> SenderData<'a> {
    /// Map `record` onto the trapper item `key`.
    pub fn from_record(record: &'a LogRecord, key: &'a str) -> Self {
        Self {
            request: "sender data",
            data: [DataPoint {
                host: record.origin(),
                key,
                value: &record.message,
            }],
        }
    }

    pub fn point(&self) -> &DataPoint<'a> {
        &self.data[0]
    }
}

/// Extract a non-empty session token from a `user.login` response.
pub fn login_token(response: &Value) -> Option<String> {
    match response.get("result")? {
        Value::String(token) if !token.is_empty() => Some(token.clone()),
        _ => None,
    }
}

/// `true` when a `user.logout` response reports success.
pub fn logout_succeeded(response: &Value) -> bool {
    response.get("result") == Some(&Value::Bool(true))
}

/// Human-readable reason carried by a JSON-RPC error object, if any.
pub fn api_error(response: &Value) -> Option<String> {
    let error = response.get("error")?;
    let message = error.get("message").and_then(Value::as_str).unwrap_or("API error");
    match error.get("data").and_then(Value::as_str) {
        Some(data) => Some(format!("{message} {data}")),
        None => Some(message.to_owned()),
    }
}
