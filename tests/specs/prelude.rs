// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers: a builder around the binary and a one-shot fake server

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use assert_cmd::Command;

/// The binary with a clean environment: no servers from the caller's shell,
/// no config file.
pub fn cli() -> CliBuilder {
    let mut cmd = Command::cargo_bin("xymon-client").unwrap();
    cmd.env_remove("XYMSRV")
        .env_remove("XYMSERVERS")
        .env_remove("XYMONDPORT")
        .env_remove("RUST_LOG")
        .env("XYMON_CLIENT_CONFIG", "")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .env("NO_COLOR", "1")
        .timeout(Duration::from_secs(30));
    CliBuilder { cmd }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    fn run(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        RunAssert {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    pub fn fails(self) -> RunAssert {
        let run = self.run();
        assert_ne!(run.code, Some(0), "expected failure\nstdout: {}\nstderr: {}", run.stdout, run.stderr);
        run
    }

    pub fn exits(self, code: i32) -> RunAssert {
        let run = self.run();
        assert_eq!(run.code, Some(code), "stdout: {}\nstderr: {}", run.stdout, run.stderr);
        run
    }
}

pub struct RunAssert {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunAssert {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}:\n{}", self.stderr);
        self
    }
}

/// Accepts connections on a local port, records each request, and answers
/// with a fixed reply.
pub struct FakeServer {
    addr: String,
    requests: mpsc::Receiver<String>,
}

impl FakeServer {
    pub fn silent() -> Self {
        Self::replying("")
    }

    pub fn replying(reply: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let reply = reply.to_string();
        let (tx, requests) = mpsc::channel();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut request = String::new();
                if stream.read_to_string(&mut request).is_err() {
                    continue;
                }
                if tx.send(request).is_err() {
                    break;
                }
                let _ = stream.write_all(reply.as_bytes());
                let _ = stream.shutdown(Shutdown::Both);
            }
        });
        Self { addr, requests }
    }

    /// `host:port` for `--server`
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Requests received so far. The client may exit before the server
    /// thread has finished reading, so wait briefly for stragglers.
    pub fn requests(&self) -> Vec<String> {
        let mut requests = Vec::new();
        while let Ok(request) = self.requests.recv_timeout(Duration::from_millis(500)) {
            requests.push(request);
        }
        requests
    }
}

/// A local port with nothing listening on it.
pub fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}
