use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use ui_testgen::extractor::inventory::{ButtonRecord, ElementInventory, FormInput, FormRecord};
use ui_testgen::scenario::model::TestCase;
use ui_testgen::trace::{EventSink, TraceEvent};

pub fn fixture_path(name: &str) -> PathBuf {
    let base = std::env::current_dir().unwrap();
    base.join("tests").join("fixtures").join(name)
}

pub fn page(name: &str) -> String {
    format!("file://{}", fixture_path(name).display())
}

/// Client that never routes through an environment proxy.
pub fn direct_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

// =========================================================================
// One-shot HTTP responder
// =========================================================================

pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// Serve exactly one HTTP response on an ephemeral port.
/// Returns the base URL and a channel yielding the request that was received.
pub fn serve_once(status: &str, content_type: &str, body: &str) -> (String, Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let captured = read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            let _ = tx.send(captured);
        }
    });

    (format!("http://{}", addr), rx)
}

fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (k, v) = line.split_once(':')?;
            if k.eq_ignore_ascii_case("content-length") {
                v.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    CapturedRequest {
        head,
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    }
}

// =========================================================================
// Event recording
// =========================================================================

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &TraceEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

// =========================================================================
// Builders
// =========================================================================

pub fn login_inventory() -> ElementInventory {
    ElementInventory {
        buttons: vec![ButtonRecord {
            text: "Login".into(),
            id: "login-btn".into(),
            ..Default::default()
        }],
        links: vec![],
        inputs: vec![],
        forms: vec![FormRecord {
            inputs: vec![FormInput {
                input_type: "text".into(),
                name: "username".into(),
            }],
            ..Default::default()
        }],
    }
}

pub fn test_case(n: usize) -> TestCase {
    TestCase {
        test_case_id: format!("TC{:03}", n),
        test_scenario: format!("Scenario {}", n),
        steps_to_execute: format!("1. Open page\n2. Do step {}", n),
        expected_result: format!("Result {}", n),
    }
}

/// A well-formed five-element reply wrapped in prose.
pub fn five_case_reply() -> String {
    let cases: Vec<TestCase> = (1..=5).map(test_case).collect();
    format!(
        "Here are your test cases:\n```json\n{}\n```\nLet me know if you need more.",
        serde_json::to_string_pretty(&cases).unwrap()
    )
}
