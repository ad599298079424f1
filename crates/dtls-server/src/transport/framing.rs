//! Content-Length message framing.
//!
//! The LSP Base Protocol frames each JSON-RPC message with
//! `Content-Length: N\r\n\r\n` headers. A malformed frame is fatal only at
//! the scope of that message: the reader reports it as skippable so the
//! session continues. Only I/O failures are errors.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use dtls_protocol::{JsonRpcRequest, JsonRpcResponse};

/// Result of one framed read.
#[derive(Debug)]
pub enum ReadOutcome {
    Message(Box<JsonRpcRequest>),
    /// A frame arrived but could not be parsed; drop it and continue.
    Skipped,
    Eof,
}

/// Read one framed message.
pub fn read_message<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<ReadOutcome> {
    let mut headers = HashMap::new();

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(": ") {
            headers.insert(key.to_string(), value.to_string());
        }
    }

    let Some(length) = headers.get("Content-Length").and_then(|v| v.parse::<usize>().ok())
    else {
        return Ok(ReadOutcome::Skipped);
    };

    let mut content = vec![0u8; length];
    let mut read = 0;
    while read < length {
        match reader.read(&mut content[read..])? {
            0 => return Ok(ReadOutcome::Eof),
            n => read += n,
        }
    }

    match serde_json::from_slice(&content) {
        Ok(request) => Ok(ReadOutcome::Message(Box::new(request))),
        Err(err) => {
            log::error!("dropping malformed frame ({} bytes): {err}", content.len());
            Ok(ReadOutcome::Skipped)
        }
    }
}

/// Write a response with framing.
pub fn write_message<W: Write + ?Sized>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    let content = serde_json::to_string(response)?;
    write!(writer, "Content-Length: {}\r\n\r\n{}", content.len(), content)?;
    writer.flush()
}

/// Write a server→client notification with framing.
pub fn write_notification<W: Write + ?Sized>(
    writer: &mut W,
    method: &str,
    params: serde_json::Value,
) -> io::Result<()> {
    let notification = serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    });
    let content = serde_json::to_string(&notification)?;
    write!(writer, "Content-Length: {}\r\n\r\n{}", content.len(), content)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn frame(body: &str) -> Vec<u8> {
        format!("Content-Length: {}\r\n\r\n{}", body.len(), body).into_bytes()
    }

    #[test]
    fn roundtrip_request() {
        let body = r#"{"jsonrpc":"2.0","id":1,"method":"shutdown"}"#;
        let framed = frame(body);
        let mut reader = BufReader::new(framed.as_slice());
        let ReadOutcome::Message(request) = read_message(&mut reader).unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(request.method, "shutdown");
        assert_eq!(request.id, Some(serde_json::json!(1)));
    }

    #[test]
    fn eof_is_reported() {
        let mut reader = BufReader::new(&[] as &[u8]);
        assert!(matches!(read_message(&mut reader).unwrap(), ReadOutcome::Eof));
    }

    #[test]
    fn malformed_json_is_skippable() {
        let mut bytes = frame("{not json");
        bytes.extend(frame(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#));
        let mut reader = BufReader::new(bytes.as_slice() as &[u8]);
        assert!(matches!(read_message(&mut reader).unwrap(), ReadOutcome::Skipped));
        assert!(matches!(read_message(&mut reader).unwrap(), ReadOutcome::Message(_)));
    }

    #[test]
    fn truncated_content_is_eof() {
        let bytes = b"Content-Length: 100\r\n\r\n{}".to_vec();
        let mut reader = BufReader::new(bytes.as_slice() as &[u8]);
        assert!(matches!(read_message(&mut reader).unwrap(), ReadOutcome::Eof));
    }

    #[test]
    fn response_framing() {
        let mut out = Vec::new();
        write_message(&mut out, &JsonRpcResponse::null(Some(serde_json::json!(2)))).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.starts_with("Content-Length: "));
        assert!(rendered.contains("\r\n\r\n{"));
    }

    #[test]
    fn multiple_messages_in_sequence() {
        let mut bytes = frame(r#"{"jsonrpc":"2.0","method":"initialized"}"#);
        bytes.extend(frame(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#));
        let mut reader = BufReader::new(bytes.as_slice() as &[u8]);
        for expected in ["initialized", "shutdown"] {
            let ReadOutcome::Message(request) = read_message(&mut reader).unwrap() else {
                panic!("expected a message");
            };
            assert_eq!(request.method, expected);
        }
    }
}
