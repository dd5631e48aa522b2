//! Minimal HTTP/1.1 server on a loopback port for exercising the fetchers.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use reqwest::blocking::Client;

use super::http::HttpFetcher;

/// Serve `handler` on `127.0.0.1:<free port>` until the test process exits.
///
/// The handler maps a request path to a body; `None` answers 404. Returns
/// the server's base URL without a trailing slash.
pub(crate) fn serve<F>(handler: F) -> String
where
    F: Fn(&str) -> Option<Vec<u8>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            respond(stream, &handler);
        }
    });
    format!("http://{addr}")
}

fn respond(stream: TcpStream, handler: &impl Fn(&str) -> Option<Vec<u8>>) {
    let path = {
        let mut reader = BufReader::new(&stream);
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).is_err() {
            return;
        }
        // Drain headers up to the blank line.
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) if line.trim_end().is_empty() => break,
                Ok(_) => {}
            }
        }
        request_line
            .split_whitespace()
            .nth(1)
            .unwrap_or("/")
            .to_string()
    };

    let (status, body) = match handler(&path) {
        Some(body) => ("200 OK", body),
        None => ("404 Not Found", Vec::new()),
    };
    let mut out = &stream;
    let _ = write!(
        out,
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = out.write_all(&body);
    let _ = out.flush();
}

/// Fetcher that talks to the loopback server directly, ignoring any
/// proxy configured in the environment.
pub(crate) fn fetcher() -> HttpFetcher {
    HttpFetcher::from_client(Client::builder().no_proxy().build().unwrap())
}
