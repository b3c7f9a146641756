//! Line-delimited JSON bridge for a desktop or web shell.
//!
//! Each input line is `{"cmd": "<name>", "payload": {...}}`; each output line
//! is `{"ok": <result>}` or `{"error": "<message>"}`. Blank lines are skipped;
//! a malformed line is answered with an error and the loop keeps going.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{commands::dispatch, state::AppState};

#[derive(Debug, Deserialize)]
struct Request {
    cmd: String,
    #[serde(default)]
    payload: Value,
}

pub fn handle_line(state: &AppState, line: &str) -> Value {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => return json!({ "error": format!("Invalid request: {err}") }),
    };
    match dispatch(state, &request.cmd, request.payload) {
        Ok(value) => json!({ "ok": value }),
        Err(message) => {
            tracing::warn!(cmd = %request.cmd, %message, "command failed");
            json!({ "error": message })
        }
    }
}

pub fn serve(state: &AppState, input: impl BufRead, mut output: impl Write) -> Result<()> {
    for chunk in input.split(b'\n') {
        let mut bytes = chunk.context("failed to read request line")?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let response = match String::from_utf8(bytes) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(state, &line),
            Err(err) => json!({ "error": format!("Invalid request: {err}") }),
        };
        serde_json::to_writer(&mut output, &response).context("failed to encode response")?;
        output
            .write_all(b"\n")
            .context("failed to write response")?;
        output.flush().context("failed to flush response")?;
    }
    state.records.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_answers_each_line() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path().to_path_buf()).unwrap();
        let input = concat!(
            r#"{"cmd":"normalize_checklist","payload":{"raw":{"Motor":["Aceite bajo"]}}}"#,
            "\n\n",
            r#"{"cmd":"nope"}"#,
            "\n",
            "not json\n",
        );
        let mut output = Vec::new();
        serve(&state, input.as_bytes(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["ok"][0]["title"], "Motor");
        assert_eq!(lines[0]["ok"][0]["items"][0]["id"], "legacy-0");
        assert_eq!(lines[1]["error"], "Unknown command: nope");
        assert!(lines[2]["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request"));
    }

    #[test]
    fn non_utf8_line_is_answered_and_serving_continues() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path().to_path_buf()).unwrap();
        let mut input: Vec<u8> = b"{\"cmd\":\"nope\"}\r\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(br#"{"cmd":"normalize_checklist","payload":{"raw":["x"]}}"#);
        let mut output = Vec::new();
        serve(&state, input.as_slice(), &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["error"], "Unknown command: nope");
        assert!(lines[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request"));
        assert_eq!(lines[2], json!({ "ok": [] }));
    }
}
