//! Logging helpers

/// Log a debug message; callers decide when verbose output is on
pub fn debug(msg: &str) {
    eprintln!("[sdkmirror:debug] {}", msg);
}

/// Log a warning message
pub fn warn(msg: &str) {
    eprintln!("[sdkmirror:warn] {}", msg);
}
