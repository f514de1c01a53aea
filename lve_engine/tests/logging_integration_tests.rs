//! Integration tests for Engine logging system
//!
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use lve_engine::lve::Engine;
use lve_engine::lve::log::{DefaultLogger, Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "lve::test", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "lve::test", "Test warning message".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].source, "lve::test");
        assert_eq!(captured[0].message, "Test info message");
        assert_eq!(captured[1].severity, LogSeverity::Warn);
        assert!(captured[1].file.is_none());
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log_detailed(
        LogSeverity::Error,
        "lve::test",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].file, Some("test_file.rs"));
        assert_eq!(captured[0].line, Some(42));

        let line = DefaultLogger::format_plain(&captured[0]);
        assert!(line.contains("[ERROR] [lve::test] Critical error occurred (test_file.rs:42)"));
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "lve::test", "Message 1".to_string());
    Engine::reset_logger();
    Engine::log(LogSeverity::Info, "lve::test", "Message 2".to_string());

    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_integration_engine_errors_reach_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);
    Engine::initialize().unwrap();

    let result = Engine::graphics_device();
    Engine::reset_logger();

    assert!(result.is_err());
    let captured = entries.lock().unwrap();
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Error && e.source == "lve::Engine"));
    assert!(captured.iter().all(|e| e.file.is_some() || e.severity != LogSeverity::Error));
}
