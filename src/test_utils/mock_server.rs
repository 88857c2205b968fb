//! Scripted stand-in for a Zabbix server.
//!
//! Speaks just enough HTTP/1.1 to accept `PUT /` requests carrying `ZBXD`
//! frames, records each decoded request in arrival order, and answers with
//! framed JSON chosen by [`MockBehaviour`]. Connections are kept alive so the
//! client can reuse them.

use std::{
    io::{BufRead, BufReader, Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::Arc,
    thread,
    time::Duration,
};

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::zabbix::frame;

/// How the mock answers each kind of request.
#[derive(Clone, Debug)]
pub struct MockBehaviour {
    /// `result` returned by `user.login`.
    pub login_result: Value,
    /// `result` returned by `user.logout`.
    pub logout_result: Value,
    /// HTTP status returned for `sender data`.
    pub data_status: u16,
    /// When false, response bodies are bare JSON without a frame header.
    pub framed_responses: bool,
    /// Pause before each response is written.
    pub response_delay: Duration,
}

impl Default for MockBehaviour {
    fn default() -> Self {
        Self {
            login_result: json!("tok123"),
            logout_result: json!(true),
            data_status: 200,
            framed_responses: true,
            response_delay: Duration::ZERO,
        }
    }
}

/// Running mock server bound to an ephemeral localhost port.
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockServer {
    /// Start a server that accepts every login and logout.
    pub fn start() -> Self {
        Self::with_behaviour(MockBehaviour::default())
    }

    pub fn with_behaviour(behaviour: MockBehaviour) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
        let addr = listener.local_addr().expect("listener has address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        let behaviour = Arc::new(behaviour);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let log = Arc::clone(&log);
                let behaviour = Arc::clone(&behaviour);
                thread::spawn(move || serve_connection(stream, &log, &behaviour));
            }
        });
        Self { addr, requests }
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Decoded request bodies in arrival order.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().clone()
    }

    /// [`request_kind`] of every request in arrival order.
    pub fn kinds(&self) -> Vec<String> {
        self.requests.lock().iter().map(request_kind).collect()
    }
}

/// `user.login`, `user.logout`, `sender data`, or `unknown`.
pub fn request_kind(request: &Value) -> String {
    request
        .get("method")
        .or_else(|| request.get("request"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_owned()
}

/// A localhost port with nothing listening on it.
pub fn unused_port() -> u16 {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
    listener.local_addr().expect("listener has address").port()
}

fn serve_connection(stream: TcpStream, log: &Mutex<Vec<Value>>, behaviour: &MockBehaviour) {
    let mut writer = stream.try_clone().expect("clone stream");
    let mut reader = BufReader::new(stream);
    while let Some(body) = read_request(&mut reader) {
        let request = frame::decode(&body).unwrap_or(Value::Null);
        let (status, response) = respond(&request, behaviour);
        log.lock().push(request);
        thread::sleep(behaviour.response_delay);
        let payload = serde_json::to_vec(&response).expect("serialise response");
        let body = if behaviour.framed_responses {
            frame::encode(&payload).expect("frame response")
        } else {
            payload
        };
        let head = format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n\r\n",
            reason(status),
            body.len()
        );
        if writer.write_all(head.as_bytes()).is_err()
            || writer.write_all(&body).is_err()
            || writer.flush().is_err()
        {
            return;
        }
    }
}

fn read_request(reader: &mut BufReader<TcpStream>) -> Option<Vec<u8>> {
    let mut line = String::new();
    if reader.read_line(&mut line).ok()? == 0 {
        return None;
    }
    let mut content_length = 0usize;
    loop {
        line.clear();
        if reader.read_line(&mut line).ok()? == 0 {
            return None;
        }
        let header = line.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().ok()?;
            }
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(body)
}

fn respond(request: &Value, behaviour: &MockBehaviour) -> (u16, Value) {
    match request_kind(request).as_str() {
        "user.login" => (
            200,
            json!({"jsonrpc": "2.0", "result": behaviour.login_result, "id": 1}),
        ),
        "user.logout" => (
            200,
            json!({"jsonrpc": "2.0", "result": behaviour.logout_result, "id": 1}),
        ),
        "sender data" => (
            behaviour.data_status,
            json!({
                "response": "success",
                "info": "processed: 1; failed: 0; total: 1; seconds spent: 0.000042"
            }),
        ),
        _ => (400, json!({"response": "failed", "info": "unrecognised request"})),
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200..=299 => "OK",
        400 => "Bad Request",
        500..=599 => "Internal Server Error",
        _ => "Unknown",
    }
}
