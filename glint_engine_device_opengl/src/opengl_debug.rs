/// OpenGL debug output - forwards GL_DEBUG_OUTPUT messages to the engine logger
///
/// Messages are counted per severity and identical messages are grouped so
/// repeats show a `[xN]` marker instead of looking like new problems.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use colored::*;
use glint_engine::glint::Engine;
use rustc_hash::FxHashMap;

use crate::opengl_format::{debug_severity_to_log, debug_source_name, debug_type_name};

/// Global debug message statistics (thread-safe atomic counters)
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

/// Global message tracker for grouping identical messages
static MESSAGE_TRACKER: Mutex<Option<FxHashMap<u32, u32>>> = Mutex::new(None);

/// Number of driver debug messages received, per GL severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMessageStats {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub notification: u32,
}

impl DebugMessageStats {
    pub fn total(&self) -> u32 {
        self.high + self.medium + self.low + self.notification
    }
}

struct DebugStatsTracker {
    high: AtomicU32,
    medium: AtomicU32,
    low: AtomicU32,
    notification: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            high: AtomicU32::new(0),
            medium: AtomicU32::new(0),
            low: AtomicU32::new(0),
            notification: AtomicU32::new(0),
        }
    }

    fn increment(&self, severity: u32) {
        let counter = match severity {
            glow::DEBUG_SEVERITY_HIGH => &self.high,
            glow::DEBUG_SEVERITY_MEDIUM => &self.medium,
            glow::DEBUG_SEVERITY_LOW => &self.low,
            _ => &self.notification,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> DebugMessageStats {
        DebugMessageStats {
            high: self.high.load(Ordering::Relaxed),
            medium: self.medium.load(Ordering::Relaxed),
            low: self.low.load(Ordering::Relaxed),
            notification: self.notification.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.high.store(0, Ordering::Relaxed);
        self.medium.store(0, Ordering::Relaxed);
        self.low.store(0, Ordering::Relaxed);
        self.notification.store(0, Ordering::Relaxed);
    }
}

/// Count one more occurrence of message `id`; returns the new count
fn track_message(id: u32) -> u32 {
    let mut tracker = MESSAGE_TRACKER.lock().unwrap_or_else(|e| e.into_inner());
    let count = tracker.get_or_insert_with(FxHashMap::default).entry(id).or_insert(0);
    *count += 1;
    *count
}

/// Reset statistics and grouping (called when a device enables debug output)
pub(crate) fn reset_debug_tracking() {
    DEBUG_STATS.reset();
    *MESSAGE_TRACKER.lock().unwrap_or_else(|e| e.into_inner()) = Some(FxHashMap::default());
}

/// Current debug message statistics
pub fn debug_message_stats() -> DebugMessageStats {
    DEBUG_STATS.get_stats()
}

/// Print a colored summary of the debug messages received so far
pub fn print_debug_message_report() {
    let stats = debug_message_stats();

    if stats.total() == 0 {
        println!("\n{}", "No OpenGL debug messages".green().bold());
        return;
    }

    println!("\n{}", "=== OpenGL Debug Output Report ===".bright_blue().bold());

    if stats.high > 0 {
        println!("  {} {}", "High:".red().bold(), stats.high);
    }
    if stats.medium > 0 {
        println!("  {} {}", "Medium:".yellow().bold(), stats.medium);
    }
    if stats.low > 0 {
        println!("  {} {}", "Low:".cyan(), stats.low);
    }
    if stats.notification > 0 {
        println!("  {} {}", "Notification:".bright_black(), stats.notification);
    }

    println!("  {} {}", "Total:".white().bold(), stats.total());

    let tracker = MESSAGE_TRACKER.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(messages) = tracker.as_ref() {
        let repeated = messages.values().filter(|&&count| count > 1).count();
        if repeated > 0 {
            println!("\n  {} message id(s) appeared multiple times", repeated);
        }
    }

    println!("{}\n", "==================================".bright_blue().bold());
}

/// Driver debug callback
///
/// Notification-level messages are counted but only logged with the
/// `verbose-debug-output` feature.
pub(crate) fn handle_debug_message(source: u32, message_type: u32, id: u32, severity: u32, message: &str) {
    DEBUG_STATS.increment(severity);

    if severity == glow::DEBUG_SEVERITY_NOTIFICATION && !cfg!(feature = "verbose-debug-output") {
        return;
    }

    let occurrences = track_message(id);
    let repeat = if occurrences > 1 {
        format!(" [x{}]", occurrences)
    } else {
        String::new()
    };

    Engine::log(
        debug_severity_to_log(severity),
        "glint::OpenGL",
        format!(
            "[{}/{}] #{}{}: {}",
            debug_source_name(source),
            debug_type_name(message_type),
            id,
            repeat,
            message.trim_end()
        ),
    );
}

#[cfg(test)]
#[path = "opengl_debug_tests.rs"]
mod tests;
