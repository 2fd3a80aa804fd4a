//! The single place failures are shown to the user.

use std::io::Write;

use crate::error::AppError;

/// Surfaces a failure to the user. Every page reports through this.
pub trait Reporter {
    fn report(&mut self, err: &AppError);
}

/// Inline error banner held by the current page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Banner {
    message: Option<String>,
}

impl Banner {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// Prints the banner, if any, to `out`.
    pub fn show(&self, out: &mut impl Write) -> std::io::Result<()> {
        if let Some(message) = &self.message {
            writeln!(out)?;
            writeln!(out, "  !! {}", message)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

impl Reporter for Banner {
    fn report(&mut self, err: &AppError) {
        crate::log_trace!("[Banner] {}", err);
        self.message = Some(err.notice().to_string());
    }
}

/// Reporter for one-shot subcommands: logs the cause and prints the notice.
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn report(&mut self, err: &AppError) {
        crate::log_trace!("[Report] {}", err);
        eprintln!("!! {}", err.notice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_shows_notice_not_cause() {
        let mut banner = Banner::default();
        banner.report(&AppError::Generation("HTTP 503 from upstream".into()));
        let msg = banner.message().unwrap();
        assert!(msg.contains("spirits of travel"));
        assert!(!msg.contains("503"));

        let mut out = Vec::new();
        banner.show(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("!! We encountered"));

        banner.clear();
        assert!(!banner.is_visible());
    }
}
