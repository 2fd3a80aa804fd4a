//! Line input that can be polled, so pages can keep the live session
//! serviced while waiting for the user.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    Text(String),
    /// Nothing typed within the wait.
    Pending,
    Eof,
}

pub trait LineInput {
    fn next_line(&mut self, wait: Duration) -> Line;

    /// Waits as long as it takes. `None` at end of input.
    fn read_line(&mut self) -> Option<String> {
        loop {
            match self.next_line(Duration::from_millis(250)) {
                Line::Text(text) => return Some(text),
                Line::Pending => continue,
                Line::Eof => return None,
            }
        }
    }
}

/// Stdin read on a background thread.
pub struct StdinLines {
    rx: Receiver<String>,
}

impl StdinLines {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }
}

impl LineInput for StdinLines {
    fn next_line(&mut self, wait: Duration) -> Line {
        match self.rx.recv_timeout(wait) {
            Ok(text) => Line::Text(text),
            Err(RecvTimeoutError::Timeout) => Line::Pending,
            Err(RecvTimeoutError::Disconnected) => Line::Eof,
        }
    }
}

/// Fixed lines, for non-interactive use and tests.
#[derive(Clone, Debug, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineInput for ScriptedLines {
    fn next_line(&mut self, _wait: Duration) -> Line {
        match self.lines.pop_front() {
            Some(text) => Line::Text(text),
            None => Line::Eof,
        }
    }
}
