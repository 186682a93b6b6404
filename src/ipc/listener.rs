//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! "Get"
//! {"Move":{"x":0,"y":0}}
//! {"MoveResize":"0 0 1600 900"}
//! {"Resize":{"width":1600,"height":900}}
//! {"MoveInWorkArea":"0 0"}
//! "CenterInWorkArea"
//! ```
//!
//! Malformed lines are logged and skipped; the connection stays open.

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of serving one client connection.
enum ClientEnd {
    /// The client disconnected; keep accepting.
    Disconnected,
    /// The command sink is gone; the daemon is shutting down.
    SinkClosed,
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is
    /// called; a stale file from a previous run is removed first.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read newline-delimited commands from one client until it
    /// disconnects or the sink closes.
    fn serve_client(stream: UnixStream, sink: &mpsc::Sender<Command>) -> ClientEnd {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let text = match line {
                Ok(text) => text,
                Err(e) => {
                    error!("read error: {}", e);
                    return ClientEnd::Disconnected;
                }
            };
            if text.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Command>(&text) {
                Ok(cmd) => {
                    debug!("received {:?}", cmd);
                    if sink.send(cmd).is_err() {
                        return ClientEnd::SinkClosed;
                    }
                }
                Err(e) => {
                    error!("bad command {:?}: {}", text, e);
                }
            }
        }
        ClientEnd::Disconnected
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** indefinitely.  Run it on a dedicated
    /// thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    match Self::serve_client(stream, &sink) {
                        ClientEnd::Disconnected => debug!("client disconnected"),
                        ClientEnd::SinkClosed => {
                            info!("sink closed, shutting down");
                            return Ok(());
                        }
                    }
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{PointArg, RectArg};
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("sizerd-test-{}-{}.sock", std::process::id(), id))
    }

    /// Spawn a listener on a fresh socket and return its path plus the
    /// receiving end of the sink.
    fn spawn_listener() -> (PathBuf, mpsc::Receiver<Command>) {
        let path = tmp_socket_path();
        let path_clone = path.clone();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&path_clone);
            let _ = listener.run(tx);
        });
        // Give the listener a moment to bind.
        std::thread::sleep(std::time::Duration::from_millis(150));
        (path, rx)
    }

    #[test]
    fn round_trip_commands_over_socket() {
        let (path, rx) = spawn_listener();

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#""Get""#).unwrap();
            writeln!(stream, r#"{{"Move":{{"x":10,"y":20}}}}"#).unwrap();
            writeln!(stream, r#"{{"MoveResizeInWorkArea":"0 0 1600 900"}}"#).unwrap();
            writeln!(stream, r#""CenterInWorkArea""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        std::thread::sleep(std::time::Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();

        assert_eq!(
            cmds,
            vec![
                Command::Get,
                Command::Move(PointArg { x: 10, y: 20 }),
                Command::MoveResizeInWorkArea(RectArg {
                    x: 0,
                    y: 0,
                    width: 1600,
                    height: 900
                }),
                Command::CenterInWorkArea,
            ]
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_is_skipped() {
        let (path, rx) = spawn_listener();

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, "not json at all").unwrap();
            writeln!(stream, r#"{{"Move":{{"x":1}}}}"#).unwrap();
            writeln!(stream, r#""Get""#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        std::thread::sleep(std::time::Duration::from_millis(150));
        let cmds: Vec<Command> = rx.try_iter().collect();
        // Only the valid command should have arrived.
        assert_eq!(cmds, vec![Command::Get]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn consecutive_connections_are_served() {
        let (path, rx) = spawn_listener();

        for payload in [r#""Get""#, r#"{"MoveInMonitor":"5 5"}"#] {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, "{}", payload).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(150));
        }

        let cmds: Vec<Command> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![
                Command::Get,
                Command::MoveInMonitor(PointArg { x: 5, y: 5 }),
            ]
        );

        let _ = std::fs::remove_file(&path);
    }
}
