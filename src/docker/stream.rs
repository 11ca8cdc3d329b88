use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::types::CancelToken;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Live output of a running container, one line per item.
///
/// The iterator blocks until a line arrives and only ends when the
/// [`CancelToken`] fires or the underlying output is closed (the container
/// exited). Dropping the stream stops the attached client process.
pub struct LogStream {
    rx: Receiver<String>,
    cancel: CancelToken,
    child: Option<Child>,
    readers: Vec<JoinHandle<()>>,
}

impl LogStream {
    /// Spawn `cmd` and stream its stdout and stderr.
    pub fn spawn(mut cmd: Command, cancel: CancelToken) -> io::Result<Self> {
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("stderr was not captured"))?;

        let (tx, rx) = mpsc::channel();
        let readers = vec![forward_lines(stdout, tx.clone()), forward_lines(stderr, tx)];

        Ok(Self {
            rx,
            cancel,
            child: Some(child),
            readers,
        })
    }

    /// Wrap an existing channel of lines. Used by engines that do not
    /// stream through a child process.
    pub fn from_receiver(rx: Receiver<String>, cancel: CancelToken) -> Self {
        Self {
            rx,
            cancel,
            child: None,
            readers: Vec::new(),
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        for handle in self.readers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Iterator for LogStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if self.cancel.is_cancelled() {
                self.stop();
                return None;
            }
            match self.rx.recv_timeout(POLL_INTERVAL) {
                Ok(line) => return Some(line),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    self.stop();
                    return None;
                }
            }
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Progress bars redraw with bare `\r`, so treat it as a line break too.
pub fn split_output_line(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(['\r', '\n']).filter(|part| !part.trim().is_empty())
}

fn forward_lines<R: Read + Send + 'static>(source: R, tx: Sender<String>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut reader = BufReader::new(source);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf);
                    for part in split_output_line(&text) {
                        // Receiver may be gone; send errors are ignored.
                        let _ = tx.send(part.to_string());
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_carriage_returns() {
        let parts: Vec<_> = split_output_line("10%\r50%\r100%\n").collect();
        assert_eq!(parts, vec!["10%", "50%", "100%"]);
    }

    #[test]
    fn split_drops_blank_segments() {
        let parts: Vec<_> = split_output_line("\r\n  \r\n").collect();
        assert!(parts.is_empty());
    }

    #[test]
    fn stream_ends_when_sender_is_dropped() {
        let (tx, rx) = mpsc::channel();
        tx.send("one".to_string()).unwrap();
        tx.send("two".to_string()).unwrap();
        drop(tx);
        let lines: Vec<_> = LogStream::from_receiver(rx, CancelToken::new()).collect();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn stream_ends_on_cancel_even_while_sender_lives() {
        let (tx, rx) = mpsc::channel::<String>();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            trigger.cancel();
        });
        let lines: Vec<_> = LogStream::from_receiver(rx, cancel).collect();
        canceller.join().unwrap();
        assert!(lines.is_empty());
        drop(tx);
    }

    #[cfg(unix)]
    #[test]
    fn spawn_streams_child_output() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "printf 'a\\rb\\n'; echo c 1>&2"]);
        let mut lines: Vec<_> = LogStream::spawn(cmd, CancelToken::new())
            .unwrap()
            .collect();
        lines.sort();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
