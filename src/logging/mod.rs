//! Leveled logging and output control
//!
//! This module provides the [`Logger`] used by the registry client, the HTTP layer
//! and the binary. Every line carries the level and the time elapsed since the
//! logger was created; verbose-only levels are dropped unless verbose mode is on.

use std::time::{Duration, Instant};

/// Logger responsible for all service output
#[derive(Debug, Clone)]
pub struct Logger {
    pub verbose: bool,
    pub quiet: bool,
    pub start_time: Option<Instant>,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            start_time: Some(Instant::now()),
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
            start_time: Some(Instant::now()),
        }
    }

    // Structured logging levels
    pub fn debug(&self, message: &str) {
        if self.verbose && !self.quiet {
            self.print_with_timestamp("DEBUG", message);
        }
    }

    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            self.print_with_timestamp("INFO", message);
        }
    }

    /// Information message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("INFO", message);
        }
    }

    /// Success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("OK", message);
        }
    }

    /// Warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            self.print_with_timestamp("WARN", message);
        }
    }

    /// Error message, printed even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} ERROR {}", self.timestamp(), message);
    }

    /// Detailed information (only shown in verbose mode)
    pub fn detail(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{}       {}", self.timestamp(), message);
        }
    }

    /// Format file size in human-readable units
    pub fn format_size(&self, bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs == 0 {
            format!("{}ms", duration.as_millis())
        } else if secs < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else if secs < 3600 {
            format!("{}m{:02}s", secs / 60, secs % 60)
        } else {
            format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }

    fn timestamp(&self) -> String {
        match self.start_time {
            Some(start_time) => format!("[{:10.3}s]", start_time.elapsed().as_secs_f64()),
            None => String::new(),
        }
    }

    fn print_with_timestamp(&self, level: &str, message: &str) {
        println!("{} {:<5} {}", self.timestamp(), level, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(false)
    }
}
