//! Process-wide switch for parser diagnostics on stderr.

use std::sync::atomic::{AtomicBool, Ordering};

static PARSE_DEBUG: AtomicBool = AtomicBool::new(false);

pub(crate) fn set_parse_debug(enabled: bool) {
    PARSE_DEBUG.store(enabled, Ordering::Relaxed);
}

/// True when skipped lines and unreadable files should be reported
pub(crate) fn parse_debug_enabled() -> bool {
    PARSE_DEBUG.load(Ordering::Relaxed)
}
