#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gamejolt_client::protocol::{ResponseEnvelope, Transport};
use gamejolt_client::{Error, GameClient, Result};

pub const GAME_ID: u64 = 1111;
pub const PRIVATE_KEY: &str = "private-key";
pub const USERNAME: &str = "username";
pub const USER_TOKEN: &str = "userToken";

pub const SUCCESS: &str = "success:\"true\"";
pub const FAILURE: &str = "success:\"false\"\nmessage:\"Server error message\"";

struct Route {
    path: String,
    fragment: Option<String>,
    response: Result<ResponseEnvelope>,
}

#[derive(Default)]
struct MockState {
    routes: Vec<Route>,
    calls: Vec<String>,
}

/// A recording transport with canned responses.
///
/// Routes match on the endpoint path (`data-store/`, `users/auth/`, ...) and
/// optionally on a query fragment such as `key=key2`. A route with a matching
/// fragment wins over a bare path route. Unrouted URLs fail as transport
/// errors.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, body: &str) -> &Self {
        self.route(path, None, Ok(ResponseEnvelope::ok(body)))
    }

    pub fn respond_when(&self, path: &str, fragment: &str, body: &str) -> &Self {
        self.route(path, Some(fragment), Ok(ResponseEnvelope::ok(body)))
    }

    pub fn route(
        &self,
        path: &str,
        fragment: Option<&str>,
        response: Result<ResponseEnvelope>,
    ) -> &Self {
        self.state.lock().unwrap().routes.push(Route {
            path: format!("/{}?", path),
            fragment: fragment.map(str::to_string),
            response,
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        let needle = format!("/{}?", path);
        self.calls().iter().filter(|u| u.contains(&needle)).count()
    }
}

impl Transport for MockTransport {
    fn execute(&self, url: &str) -> Result<ResponseEnvelope> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(url.to_string());
        let on_path = |r: &&Route| url.contains(&r.path);
        let specific = state.routes.iter().filter(on_path).find(|r| {
            r.fragment
                .as_deref()
                .is_some_and(|f| url.contains(f))
        });
        let route = specific.or_else(|| {
            state
                .routes
                .iter()
                .filter(on_path)
                .find(|r| r.fragment.is_none())
        });
        match route {
            Some(r) => r.response.clone(),
            None => Err(Error::Transport(format!("mock: no route for {}", url))),
        }
    }
}

pub fn client(mock: &MockTransport) -> GameClient {
    GameClient::with_transport(GAME_ID, PRIVATE_KEY, mock.clone())
}

/// A client whose session already holds USERNAME/USER_TOKEN.
pub fn verified_client(mock: &MockTransport) -> GameClient {
    mock.respond_when("users/auth/", &format!("username={}", USERNAME), SUCCESS);
    let client = client(mock);
    assert!(client.verify_user(USERNAME, USER_TOKEN).expect("verify"));
    client
}

/// `success` header plus one `key:"..."` line per key.
pub fn key_listing(keys: &[&str]) -> String {
    let mut out = String::from(SUCCESS);
    for key in keys {
        out.push_str(&format!("\nkey:\"{}\"", key));
    }
    out
}

pub fn dump(value: &str) -> String {
    format!("SUCCESS\r\n{}", value)
}

// ── one-shot HTTP server ────────────────────────────────────────────

fn read_http_request(stream: &mut std::net::TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set timeout");
    let mut buf = Vec::new();
    let mut tmp = [0u8; 1024];
    loop {
        let n = stream.read(&mut tmp).expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&tmp[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn text_response(status: &str, body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}

/// Serve one response per handler, in order, then exit.
pub fn spawn_server<F>(handlers: Vec<F>) -> (String, std::thread::JoinHandle<()>)
where
    F: FnOnce(String) -> Vec<u8> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let h = std::thread::spawn(move || {
        for handler in handlers {
            let (mut stream, _) = listener.accept().expect("accept");
            let req = read_http_request(&mut stream);
            let resp = handler(req);
            stream.write_all(&resp).expect("write response");
            stream.flush().expect("flush response");
        }
    });
    (format!("http://{}", addr), h)
}
