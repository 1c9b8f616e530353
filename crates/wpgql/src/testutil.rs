use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

#[derive(Clone, Debug, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `func` with a `tracing` subscriber installed for the current thread
/// and return its result along with everything that was logged
pub(crate) fn capture_logs<R, F: FnOnce() -> R>(func: F) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let r = tracing::subscriber::with_default(subscriber, func);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (r, logs)
}

/// A single-request HTTP server on a local port
#[derive(Debug)]
pub(crate) struct OneShotServer {
    pub(crate) url: String,
    handle: JoinHandle<Vec<u8>>,
}

impl OneShotServer {
    /// Wait for the request to be served and return its body parsed as JSON
    pub(crate) fn request_body(self) -> serde_json::Value {
        let body = self.handle.join().unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}

/// Answer the next request to the returned server's URL with the given
/// status line and body
pub(crate) fn serve_once(status: &str, body: &str) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();
        let mut stream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request_body
    });
    OneShotServer {
        url: format!("http://{addr}/graphql"),
        handle,
    }
}
