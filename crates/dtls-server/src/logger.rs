//! Structured log sink and LSP `window/logMessage` bridge.
//!
//! Records go two places: a state-directory file written with
//! `[LEVEL][timestamp]` prefixes, and, once a client transport is
//! attached, `window/logMessage` notifications for Info and above.
//! Errors additionally surface as `window/showMessage`.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde_json::json;

use crate::transport::write_notification;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

static LOGGER: OnceCell<ServerLogger> = OnceCell::new();

struct ServerLogger {
    file: Option<Mutex<File>>,
    client: SharedWriter,
}

/// Install the global logger, bridging to the given client transport.
///
/// Safe to call more than once; later calls are ignored (the transport of
/// the first caller stays attached).
pub fn init(client: SharedWriter) {
    let logger = LOGGER.get_or_init(|| ServerLogger { file: open_log_file().map(Mutex::new), client });
    // set_logger fails only if a logger is already installed.
    if log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

/// `$XDG_STATE_HOME` (or `~/.local/state`) under
/// `design-tokens-language-server/dtls.log`.
fn log_file_path() -> Option<PathBuf> {
    let state = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(dirs::state_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))?;
    Some(state.join("design-tokens-language-server").join("dtls.log"))
}

fn open_log_file() -> Option<File> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// LSP MessageType values.
fn message_type(level: Level) -> i32 {
    match level {
        Level::Error => 1,
        Level::Warn => 2,
        Level::Info => 3,
        Level::Debug | Level::Trace => 4,
    }
}

impl Log for ServerLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let message = format!("{}", record.args());

        if let Some(file) = &self.file {
            let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
            let mut file = file.lock();
            let _ = writeln!(file, "[{}][{}] {}", record.level(), stamp, message);
        }

        // Debug/trace stay in the file; the editor sees Info and above.
        if record.level() <= Level::Info {
            let params = json!({
                "type": message_type(record.level()),
                "message": message
            });
            let mut client = self.client.lock();
            let _ = write_notification(&mut **client, "window/logMessage", params);
            if record.level() == Level::Error {
                let params = json!({ "type": 1, "message": message });
                let _ = write_notification(&mut **client, "window/showMessage", params);
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}
