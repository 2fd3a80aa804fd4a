use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

lazy_static::lazy_static! {
    static ref LOG_MUTEX: parking_lot::Mutex<()> = parking_lot::Mutex::new(());
}

/// Directory holding `session.log`. `ATLAS_VOYAGER_LOG_DIR` overrides the default.
pub fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("ATLAS_VOYAGER_LOG_DIR") {
        return PathBuf::from(dir);
    }
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("atlas-voyager");
    path.push("logs");
    path
}

pub fn log_debug(msg: &str) {
    let _lock = LOG_MUTEX.lock();
    let mut path = log_dir();
    let _ = std::fs::create_dir_all(&path);
    path.push("session.log");

    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] {}", timestamp, msg);
    }
}

/// Session log only; nothing reaches the terminal.
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        {
            let msg = format!($($arg)*);
            $crate::debug_log::log_debug(&msg);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        {
            let msg = format!($($arg)*);
            if $crate::debug_log::verbose() {
                eprintln!("{}", msg);
            }
            $crate::debug_log::log_debug(&msg);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        {
            let msg = format!($($arg)*);
            if $crate::debug_log::verbose() {
                eprintln!("ERROR {}", msg);
            }
            $crate::debug_log::log_debug(&format!("ERROR {}", msg));
        }
    };
}

static VERBOSE: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Echo `log_info!` lines to stderr (the `--verbose` flag).
pub fn set_verbose(on: bool) {
    VERBOSE.store(on, std::sync::atomic::Ordering::Relaxed);
}

pub fn verbose() -> bool {
    VERBOSE.load(std::sync::atomic::Ordering::Relaxed)
}
