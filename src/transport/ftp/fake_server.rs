//! Scripted FTP server on a loopback port
//!
//! Speaks just enough of RFC 959 for `suppaftp` in passive mode: login,
//! `TYPE`, `PASV`, `RETR`, `LIST` and `QUIT`. Every command line and the
//! end of every control connection is recorded so tests can check what the
//! client actually sent.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::config::EndpointConfig;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Something the server saw on a control connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ServerEvent {
    /// A command line, verbatim
    Command(String),
    /// The client closed the control connection
    Closed,
}

/// What the server will answer
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeFtpServer {
    files: HashMap<String, Vec<u8>>,
    listings: HashMap<String, Vec<String>>,
    stalled: HashSet<String>,
    reject_login: bool,
}

impl FakeFtpServer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.as_bytes().to_vec());
        self
    }

    pub(crate) fn with_listing(mut self, path: &str, lines: &[&str]) -> Self {
        self.listings
            .insert(path.to_string(), lines.iter().map(|l| l.to_string()).collect());
        self
    }

    /// `RETR path` opens the data connection and never sends a byte
    pub(crate) fn with_stalled_file(mut self, path: &str) -> Self {
        self.stalled.insert(path.to_string());
        self
    }

    pub(crate) fn rejecting_login(mut self) -> Self {
        self.reject_login = true;
        self
    }

    /// Bind to an ephemeral port and serve until the test process exits
    pub(crate) fn start(self) -> RunningServer {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let events = Arc::new(Mutex::new(Vec::new()));

        let script = Arc::new(self);
        let log = Arc::clone(&events);
        std::thread::spawn(move || {
            for conn in listener.incoming() {
                let Ok(conn) = conn else { break };
                let script = Arc::clone(&script);
                let log = Arc::clone(&log);
                std::thread::spawn(move || serve(conn, &script, &log));
            }
        });

        RunningServer { port, events }
    }
}

pub(crate) struct RunningServer {
    port: u16,
    events: Arc<Mutex<Vec<ServerEvent>>>,
}

impl RunningServer {
    pub(crate) fn endpoint(&self) -> EndpointConfig {
        EndpointConfig {
            host: "127.0.0.1".to_string(),
            port: self.port,
            username: "relay".to_string(),
            password: "secret".to_string(),
            secure: false,
        }
    }

    pub(crate) fn events(&self) -> Vec<ServerEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Command lines starting with `verb`, in arrival order
    pub(crate) fn commands(&self, verb: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ServerEvent::Command(line) if line.starts_with(verb) => Some(line),
                _ => None,
            })
            .collect()
    }

    /// Poll until `event` has been recorded or `within` elapses
    pub(crate) async fn wait_for(&self, event: &ServerEvent, within: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + within;
        while tokio::time::Instant::now() < deadline {
            if self.events().contains(event) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.events().contains(event)
    }
}

fn serve(conn: TcpStream, script: &FakeFtpServer, events: &Mutex<Vec<ServerEvent>>) {
    let mut writer = conn.try_clone().unwrap();
    let mut reader = BufReader::new(conn);
    let mut passive: Option<TcpListener> = None;
    // Data connections of stalled transfers stay open until the client goes away
    let mut held = Vec::new();

    let _ = reply(&mut writer, "220 fake ftp ready");

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim_end().to_string();
        events.lock().unwrap().push(ServerEvent::Command(line.clone()));

        let (verb, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        let answered = match verb.to_ascii_uppercase().as_str() {
            "USER" => reply(&mut writer, "331 password required"),
            "PASS" if script.reject_login => reply(&mut writer, "530 login incorrect"),
            "PASS" => reply(&mut writer, "230 logged in"),
            "TYPE" => reply(&mut writer, "200 type set"),
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").unwrap();
                let port = listener.local_addr().unwrap().port();
                passive = Some(listener);
                reply(
                    &mut writer,
                    &format!(
                        "227 Entering Passive Mode (127,0,0,1,{},{})",
                        port / 256,
                        port % 256
                    ),
                )
            }
            "RETR" | "LIST" => match passive.take() {
                None => reply(&mut writer, "425 use PASV first"),
                // The client connects before it reads the reply, refusals included
                Some(listener) => listener.accept().and_then(|(data, _)| {
                    if verb.eq_ignore_ascii_case("LIST") {
                        match script.listings.get(arg) {
                            Some(lines) => {
                                let body: String =
                                    lines.iter().map(|l| format!("{l}\r\n")).collect();
                                send_data(&mut writer, data, body.as_bytes())
                            }
                            None => reply(&mut writer, "550 no such directory"),
                        }
                    } else if script.stalled.contains(arg) {
                        held.push(data);
                        reply(&mut writer, "150 opening data connection")
                    } else {
                        match script.files.get(arg) {
                            Some(content) => send_data(&mut writer, data, content),
                            None => reply(&mut writer, "550 no such file"),
                        }
                    }
                }),
            },
            "QUIT" => reply(&mut writer, "221 bye"),
            _ => reply(&mut writer, "502 not implemented"),
        };

        if answered.is_err() {
            break;
        }
    }

    drop(held);
    events.lock().unwrap().push(ServerEvent::Closed);
}

fn send_data(writer: &mut TcpStream, mut data: TcpStream, content: &[u8]) -> std::io::Result<()> {
    reply(writer, "150 opening data connection")?;
    data.write_all(content)?;
    drop(data);
    reply(writer, "226 transfer complete")
}

fn reply(writer: &mut TcpStream, line: &str) -> std::io::Result<()> {
    writer.write_all(format!("{line}\r\n").as_bytes())
}
