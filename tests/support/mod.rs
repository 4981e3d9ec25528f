use std::{
    io::{self, BufRead, BufReader, Read, Write},
    net::{TcpListener, TcpStream},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

const ACCEPT_DEADLINE: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Loopback stand-in for the GitHub REST API. Answers `GET /user` with a fixed
/// login and every other request with the configured repository response.
/// Every accepted connection is recorded, even one that never sends a request.
pub struct StubGithub {
    url: String,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl StubGithub {
    pub fn start(repo_status: u16, repo_body: &str) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.set_nonblocking(true)?;
        let url = format!("http://{}", listener.local_addr()?);
        let repo_body = repo_body.to_owned();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let deadline = Instant::now() + ACCEPT_DEADLINE;
            let mut recorded = Vec::new();
            loop {
                // Checked before accepting so connections queued before `finish`
                // are still drained.
                let stopping = stop_flag.load(Ordering::SeqCst);
                match listener.accept() {
                    Ok((stream, _)) => {
                        recorded.push(serve(stream, repo_status, &repo_body));
                    }
                    Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                        if stopping || Instant::now() >= deadline {
                            break;
                        }
                        thread::sleep(POLL_INTERVAL);
                    }
                    Err(_) => break,
                }
            }
            recorded
        });

        Ok(Self { url, stop, handle })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stops listening and returns everything received so far.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.stop.store(true, Ordering::SeqCst);
        self.handle.join().expect("stub server thread panicked")
    }
}

fn serve(stream: TcpStream, repo_status: u16, repo_body: &str) -> RecordedRequest {
    let request = stream
        .set_nonblocking(false)
        .and_then(|()| stream.set_read_timeout(Some(Duration::from_secs(5))))
        .and_then(|()| read_request(&stream));
    let Ok(request) = request else {
        return RecordedRequest {
            method: String::new(),
            path: String::new(),
            authorization: None,
            body: String::new(),
        };
    };

    let (status, body) = if request.path == "/user" {
        (200, r#"{"login":"octocat","id":1}"#.to_owned())
    } else {
        (repo_status, repo_body.to_owned())
    };
    let _ = write_response(stream, status, &body);
    request
}

pub fn repository_json(name: &str, private: bool) -> String {
    serde_json::json!({
        "id": 42,
        "full_name": format!("octocat/{name}"),
        "clone_url": format!("https://github.com/octocat/{name}.git"),
        "html_url": format!("https://github.com/octocat/{name}"),
        "private": private,
    })
    .to_string()
}

fn read_request(stream: &TcpStream) -> io::Result<RecordedRequest> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let path = parts.next().unwrap_or_default().to_owned();

    let mut content_length = 0;
    let mut authorization = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.to_owned());
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body)?;

    Ok(RecordedRequest {
        method,
        path,
        authorization,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn write_response(mut stream: TcpStream, status: u16, body: &str) -> io::Result<()> {
    let reason = match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        422 => "Unprocessable Entity",
        _ => "Unknown",
    };
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}
