use std::borrow::Cow;
use std::io::BufRead;

use tokio::sync::mpsc;
use tracing::warn;

/// What the user typed, after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Exit,
    Clear,
    /// Blank line; ignored.
    Empty,
    Message(String),
}

impl ConsoleCommand {
    /// `exit` and `clear` are matched case-insensitively; anything else non-blank is a message.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            ConsoleCommand::Empty
        } else if trimmed.eq_ignore_ascii_case("exit") {
            ConsoleCommand::Exit
        } else if trimmed.eq_ignore_ascii_case("clear") {
            ConsoleCommand::Clear
        } else {
            ConsoleCommand::Message(trimmed.to_string())
        }
    }
}

/// Read stdin line by line on a plain thread.
///
/// Blocking reads on stdin cannot be cancelled, so they live outside the
/// runtime; the thread is detached and dies with the process. The channel
/// closes on end of input.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        forward_lines(stdin.lock(), &tx);
    });
    rx
}

/// Send each line of `reader` to `tx` until end of input, an I/O error, or
/// the receiver going away.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the stream.
pub fn forward_lines<R: BufRead>(mut reader: R, tx: &mpsc::UnboundedSender<String>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if buf.ends_with(b"\n") {
                    buf.pop();
                    if buf.ends_with(b"\r") {
                        buf.pop();
                    }
                }
                let line = String::from_utf8_lossy(&buf);
                if matches!(line, Cow::Owned(_)) {
                    warn!("Input line contained invalid UTF-8; replaced undecodable bytes");
                }
                if tx.send(line.into_owned()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Failed to read from stdin: {e}");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_ignore_case_and_whitespace() {
        assert_eq!(ConsoleCommand::parse("  EXIT \n"), ConsoleCommand::Exit);
        assert_eq!(ConsoleCommand::parse("Clear"), ConsoleCommand::Clear);
    }

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(ConsoleCommand::parse(""), ConsoleCommand::Empty);
        assert_eq!(ConsoleCommand::parse(" \t "), ConsoleCommand::Empty);
    }

    #[test]
    fn other_text_is_a_trimmed_message() {
        assert_eq!(
            ConsoleCommand::parse("  exit now please "),
            ConsoleCommand::Message("exit now please".to_string())
        );
    }

    fn collect(bytes: &[u8]) -> Vec<String> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        forward_lines(std::io::Cursor::new(bytes.to_vec()), &tx);
        drop(tx);
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn invalid_utf8_line_does_not_end_input() {
        let lines = collect(b"hi\n\xff\xfe\nsecond\nexit\n");

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "hi");
        assert_eq!(lines[1], "\u{FFFD}\u{FFFD}");
        assert_eq!(lines[2], "second");
        assert_eq!(ConsoleCommand::parse(&lines[3]), ConsoleCommand::Exit);
    }

    #[test]
    fn strips_crlf_and_keeps_unterminated_last_line() {
        assert_eq!(collect(b"one\r\ntwo"), vec!["one", "two"]);
        assert!(collect(b"").is_empty());
    }
}
