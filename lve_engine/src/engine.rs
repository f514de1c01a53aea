/// LVE Engine - Singleton manager for the graphics device and the logger
///
/// Global state lives in `OnceLock` statics guarded by `RwLock`s so any
/// thread can reach the device or emit log entries.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::graphics_device::GraphicsDevice;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

struct EngineState {
    /// Graphics device singleton (wrapped in Mutex for mutable access)
    graphics_device: RwLock<Option<Arc<Mutex<dyn GraphicsDevice>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            graphics_device: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```ignore
/// use lve_engine::lve::Engine;
/// use lve_engine_renderer_vulkan::lve::VulkanGraphicsDevice;
///
/// Engine::initialize()?;
/// Engine::create_graphics_device(VulkanGraphicsDevice::new(&window, config)?)?;
///
/// let device = Engine::graphics_device()?;
///
/// Engine::shutdown();
/// # Ok::<(), lve_engine::lve::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Log an engine error before handing it back to the caller
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("lve::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("lve::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("lve::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))
    }

    /// Initialize the engine
    ///
    /// Idempotent. Must be called before registering a graphics device.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Drop the graphics device singleton
    ///
    /// The device itself is only destroyed once the last `Arc` goes away,
    /// including those held by pipelines built with the engine device.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut device) = state.graphics_device.write() {
                *device = None;
            }
        }
    }

    /// Create and register the graphics device singleton
    ///
    /// # Errors
    ///
    /// - `Error::InitializationFailed` if the engine is not initialized or a
    ///   device is already registered
    /// - `Error::BackendError` if the device lock is poisoned
    pub fn create_graphics_device<D: GraphicsDevice + 'static>(device: D) -> Result<()> {
        let arc_device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(device));

        Self::register_graphics_device(arc_device)?;

        crate::engine_info!("lve::Engine", "GraphicsDevice singleton created successfully");

        Ok(())
    }

    pub(crate) fn register_graphics_device(device: Arc<Mutex<dyn GraphicsDevice>>) -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("GraphicsDevice already exists. Call Engine::destroy_graphics_device() first.".to_string())
            ));
        }

        *lock = Some(device);
        Ok(())
    }

    /// Get the graphics device singleton
    ///
    /// ```ignore
    /// let device = Engine::graphics_device()?;
    /// let mut guard = device.lock().unwrap();
    /// ```
    pub fn graphics_device() -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let state = Self::state()?;

        let lock = state.graphics_device.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("GraphicsDevice not created. Call Engine::create_graphics_device() first.".to_string())
            ))
    }

    /// Remove the graphics device singleton so a new one can be registered
    ///
    /// Outstanding `Arc`s returned by [`Engine::graphics_device`], and
    /// pipelines built from it, keep the device alive until dropped.
    pub fn destroy_graphics_device() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        *lock = None;

        crate::engine_info!("lve::Engine", "GraphicsDevice singleton destroyed");

        Ok(())
    }

    /// Clear singletons between tests
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut device) = state.graphics_device.write() {
                *device = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Replace the default logger (file logger, test capture, etc.)
    ///
    /// ```ignore
    /// use lve_engine::lve::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Emit an entry without source location (used by the engine_* macros)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Emit an entry with file:line (used by engine_error! and engine_err!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&entry);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
