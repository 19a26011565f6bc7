//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed listing page on `GET /list/` and records every
//! `POST /hook` body, so one process can stand in for both the scraped site
//! and the webhook endpoint.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Status line for the listing page (e.g. "200 OK", "500 Internal Server Error").
    pub page_status: &'static str,
    pub page_body: String,
    /// Webhook POSTs after this many successful ones get a 500.
    pub hook_ok_limit: Option<usize>,
}

impl ServerOptions {
    pub fn page(body: impl Into<String>) -> Self {
        Self {
            page_status: "200 OK",
            page_body: body.into(),
            hook_ok_limit: None,
        }
    }
}

pub struct ListingServer {
    base: String,
    hooks: Arc<Mutex<Vec<String>>>,
}

impl ListingServer {
    pub fn page_url(&self) -> String {
        format!("{}list/", self.base)
    }

    pub fn hook_url(&self) -> String {
        format!("{}hook", self.base)
    }

    /// Bodies of all webhook POSTs received so far (including rejected ones).
    pub fn hook_bodies(&self) -> Vec<String> {
        self.hooks.lock().unwrap().clone()
    }

    pub fn hook_texts(&self) -> Vec<String> {
        self.hook_bodies()
            .iter()
            .map(|b| {
                let v: serde_json::Value = serde_json::from_str(b).unwrap();
                v["text"].as_str().unwrap().to_string()
            })
            .collect()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(opts: ServerOptions) -> ListingServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hooks = Arc::new(Mutex::new(Vec::new()));
    let hooks_srv = Arc::clone(&hooks);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let hooks = Arc::clone(&hooks_srv);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &opts, &hooks));
        }
    });
    ListingServer {
        base: format!("http://127.0.0.1:{}/", port),
        hooks,
    }
}

fn handle(mut stream: TcpStream, opts: &ServerOptions, hooks: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some((method, path, body)) = read_request(&mut stream) else {
        return;
    };

    if method == "GET" && path == "/list/" {
        respond(&mut stream, opts.page_status, "text/html; charset=utf-8", &opts.page_body);
        return;
    }
    if method == "POST" && path == "/hook" {
        let accepted = {
            let mut hooks = hooks.lock().unwrap();
            hooks.push(body);
            opts.hook_ok_limit.map_or(true, |limit| hooks.len() <= limit)
        };
        if accepted {
            respond(&mut stream, "200 OK", "text/plain", "ok");
        } else {
            respond(&mut stream, "500 Internal Server Error", "text/plain", "rejected");
        }
        return;
    }
    respond(&mut stream, "404 Not Found", "text/plain", "");
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Reads one request; returns (method, path, body).
fn read_request(stream: &mut TcpStream) -> Option<(String, String, String)> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let end = (header_end + content_length).min(data.len());
    let body = String::from_utf8_lossy(&data[header_end..end]).into_owned();
    Some((method, path, body))
}
