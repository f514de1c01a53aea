/// Vulkan Debug Messenger - Forwards validation layer messages to the engine logger
///
/// Messages are filtered by severity and category, counted, and grouped so a
/// colored summary can be printed at shutdown.

use ash::vk;
use colored::*;
use lve_engine::lve::Engine;
use lve_engine::lve::log::LogSeverity;
use lve_engine::lve::render::{DebugSeverity, DebugMessageFilter};
use std::collections::HashMap;
use std::ffi::CStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

const LOG_SOURCE: &str = "lve::vulkan::validation";

/// Global debug configuration (shared across callbacks)
static DEBUG_CONFIG: Mutex<Option<Config>> = Mutex::new(None);

static VALIDATION_STATS: ValidationStatsTracker = ValidationStatsTracker::new();

/// Occurrence count per message text
static MESSAGE_TRACKER: Mutex<Option<HashMap<String, u32>>> = Mutex::new(None);

/// Debug configuration for the callback
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub severity: DebugSeverity,
    pub message_filter: DebugMessageFilter,
}

/// Validation message counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }
}

struct ValidationStatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    verbose: AtomicU32,
}

impl ValidationStatsTracker {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            verbose: AtomicU32::new(0),
        }
    }

    fn record(&self, severity: LogSeverity) {
        let counter = match severity {
            LogSeverity::Error => &self.errors,
            LogSeverity::Warn => &self.warnings,
            LogSeverity::Info => &self.info,
            LogSeverity::Debug | LogSeverity::Trace => &self.verbose,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> ValidationStats {
        ValidationStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            verbose: self.verbose.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        self.info.store(0, Ordering::Relaxed);
        self.verbose.store(0, Ordering::Relaxed);
    }
}

/// Install the callback configuration and reset statistics
pub fn init_debug_config(config: Config) {
    VALIDATION_STATS.reset();
    *MESSAGE_TRACKER.lock().unwrap_or_else(PoisonError::into_inner) = Some(HashMap::new());
    *DEBUG_CONFIG.lock().unwrap_or_else(PoisonError::into_inner) = Some(config);
}

/// Stop forwarding messages (called before the messenger is destroyed)
pub fn cleanup_debug_config() {
    *DEBUG_CONFIG.lock().unwrap_or_else(PoisonError::into_inner) = None;
}

pub fn get_validation_stats() -> ValidationStats {
    VALIDATION_STATS.get_stats()
}

/// Print validation statistics report
pub fn print_validation_stats_report() {
    let stats = get_validation_stats();

    if stats.total() == 0 {
        println!("\n{}", "No validation messages".green().bold());
        return;
    }

    println!("\n{}", "=== Validation Statistics Report ===".bright_blue().bold());

    if stats.errors > 0 {
        println!("  {} {}", "Errors:".red().bold(), stats.errors);
    }
    if stats.warnings > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), stats.warnings);
    }
    if stats.info > 0 {
        println!("  {} {}", "Info:".cyan(), stats.info);
    }
    if stats.verbose > 0 {
        println!("  {} {}", "Verbose:".bright_black(), stats.verbose);
    }

    println!("  {} {}", "Total:".white().bold(), stats.total());

    let tracker = MESSAGE_TRACKER.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(messages) = tracker.as_ref() {
        let repeated = messages.values().filter(|&&count| count > 1).count();
        if repeated > 0 {
            println!("\n  {} message(s) appeared multiple times", repeated);
        }
    }

    println!("{}\n", "====================================".bright_blue().bold());
}

// ===== Filtering =====

/// Severity flags requested from the messenger for a given config
pub(crate) fn severity_flags(severity: DebugSeverity) -> vk::DebugUtilsMessageSeverityFlagsEXT {
    match severity {
        DebugSeverity::ErrorsOnly => vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        DebugSeverity::ErrorsAndWarnings => {
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
        }
        DebugSeverity::All => {
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
        }
    }
}

/// Engine log severity for a validation message
pub(crate) fn log_severity(message_severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> LogSeverity {
    if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        LogSeverity::Error
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        LogSeverity::Warn
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        LogSeverity::Info
    } else {
        LogSeverity::Debug
    }
}

fn category_name(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
        "Validation"
    } else if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
        "Performance"
    } else {
        "General"
    }
}

/// Whether a message passes both the severity and the category filter
pub(crate) fn should_report(
    config: &Config,
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
) -> bool {
    if !severity_flags(config.severity).intersects(message_severity) {
        return false;
    }

    if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
        config.message_filter.show_validation
    } else if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
        config.message_filter.show_performance
    } else {
        config.message_filter.show_general
    }
}

/// Vulkan debug messenger callback
pub unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    let config = match *DEBUG_CONFIG.lock().unwrap_or_else(PoisonError::into_inner) {
        Some(cfg) => cfg,
        None => return vk::FALSE,
    };

    if !should_report(&config, message_severity, message_type) || p_callback_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = *p_callback_data;
    let message_id_name = if callback_data.p_message_id_name.is_null() {
        "Unknown".into()
    } else {
        CStr::from_ptr(callback_data.p_message_id_name).to_string_lossy()
    };
    let message = if callback_data.p_message.is_null() {
        "No message".into()
    } else {
        CStr::from_ptr(callback_data.p_message).to_string_lossy()
    };

    let severity = log_severity(message_severity);
    VALIDATION_STATS.record(severity);

    let occurrences = {
        let mut tracker = MESSAGE_TRACKER.lock().unwrap_or_else(PoisonError::into_inner);
        let count = tracker
            .get_or_insert_with(HashMap::new)
            .entry(message.to_string())
            .or_insert(0);
        *count += 1;
        *count
    };
    let repeat = if occurrences > 1 {
        format!(" [x{}]", occurrences)
    } else {
        String::new()
    };

    Engine::log(
        severity,
        LOG_SOURCE,
        format!("[{}]{} {}: {}", category_name(message_type), repeat, message_id_name, message),
    );

    vk::FALSE
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
