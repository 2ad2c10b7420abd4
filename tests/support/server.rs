//! Tiny single-connection HTTP servers for exercising the prediction client.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

/// Build a full HTTP response around a JSON body.
pub fn http_json(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
}

/// Serve one connection, responding immediately.
pub fn serve_once(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

/// A server that holds its response until explicitly released, exposing the
/// raw request bytes it observed.
pub struct GatedServer {
    pub url: String,
    release: Sender<()>,
    request: Receiver<String>,
}

impl GatedServer {
    /// Block until the client's request has arrived, returning its raw text.
    pub fn await_request(&self) -> String {
        self.request
            .recv_timeout(Duration::from_secs(5))
            .expect("request should reach the server")
    }

    /// Let the held response go out.
    pub fn release(&self) {
        let _ = self.release.send(());
    }
}

/// Serve one connection, but hold the response until [`GatedServer::release`].
pub fn serve_gated(response: String) -> GatedServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let (release_tx, release_rx) = channel::<()>();
    let (request_tx, request_rx) = channel::<String>();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let request = read_request(&mut stream);
            let _ = request_tx.send(request);
            let _ = release_rx.recv();
            let _ = stream.write_all(response.as_bytes());
        }
    });
    GatedServer {
        url: format!("http://{addr}"),
        release: release_tx,
        request: request_rx,
    }
}

/// Accumulate request bytes until the client pauses to wait for the reply.
fn read_request(stream: &mut std::net::TcpStream) -> String {
    let _ = stream.set_read_timeout(Some(Duration::from_millis(100)));
    let mut collected = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => collected.extend_from_slice(&buf[..read]),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&collected).to_string()
}

/// A 127.0.0.1 port with nothing listening on it.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let port = listener.local_addr().expect("listener addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
