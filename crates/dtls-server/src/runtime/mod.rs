//! The language server: state, main loop, and request handling.

mod dispatch;
mod language;
mod lifecycle;
mod text_sync;

use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use dtls_syntax::SyntaxPools;
use dtls_tokens::TokenRegistry;

use crate::cancellation::CancellationRegistry;
use crate::state::DocumentStore;
use crate::transport::{ReadOutcome, read_message, write_message, write_notification};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// One editor session over a framed JSON-RPC transport.
///
/// Shared structures carry the concurrency discipline of their access
/// patterns: the token registry and document store are read-mostly
/// (`RwLock`, exclusive only for lifecycle writes), parser pools hand out
/// per-thread parsers, and the output writer serializes all server→client
/// traffic.
pub struct LspServer {
    pub(crate) documents: DocumentStore,
    pub(crate) registry: Arc<RwLock<TokenRegistry>>,
    pub(crate) pools: Arc<SyntaxPools>,
    pub(crate) cancellations: CancellationRegistry,
    pub(crate) initialized: bool,
    pub(crate) shutdown_received: bool,
    pub(crate) workspace_folders: Vec<PathBuf>,
    pub(crate) trace_level: Mutex<String>,
    reader: Arc<Mutex<Box<dyn BufRead + Send>>>,
    output: SharedWriter,
}

impl LspServer {
    pub fn new() -> Self {
        Self::with_io(
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Build a server over custom I/O, for tests.
    pub fn with_io(reader: Box<dyn BufRead + Send>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            documents: DocumentStore::new(),
            registry: Arc::new(RwLock::new(TokenRegistry::new())),
            pools: Arc::new(SyntaxPools::new()),
            cancellations: CancellationRegistry::new(),
            initialized: false,
            shutdown_received: false,
            workspace_folders: Vec::new(),
            trace_level: Mutex::new("off".to_string()),
            reader: Arc::new(Mutex::new(reader)),
            output: Arc::new(Mutex::new(writer)),
        }
    }

    /// Handle on the output writer, shared with the logger bridge.
    pub fn output_handle(&self) -> SharedWriter {
        Arc::clone(&self.output)
    }

    /// Serve until `exit` or EOF; returns the process exit code.
    pub fn run(&mut self) -> i32 {
        loop {
            let outcome = {
                let mut reader = self.reader.lock();
                read_message(&mut **reader)
            };
            match outcome {
                Ok(ReadOutcome::Message(request)) => {
                    let is_exit = request.method == "exit";
                    if let Some(response) = self.handle_request(*request) {
                        let mut output = self.output.lock();
                        if write_message(&mut **output, &response).is_err() {
                            return 1;
                        }
                    }
                    if is_exit {
                        return i32::from(!self.shutdown_received);
                    }
                }
                Ok(ReadOutcome::Skipped) => continue,
                Ok(ReadOutcome::Eof) => {
                    log::warn!("client closed the transport without exit");
                    return i32::from(!self.shutdown_received);
                }
                Err(err) => {
                    log::error!("transport failure: {err}");
                    return 1;
                }
            }
        }
    }

    /// Send a server→client notification.
    pub(crate) fn notify(&self, method: &str, params: Value) -> io::Result<()> {
        let mut output = self.output.lock();
        write_notification(&mut **output, method, params)
    }
}

impl Default for LspServer {
    fn default() -> Self {
        Self::new()
    }
}
