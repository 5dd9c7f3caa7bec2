//! Scripted in-memory transport shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use pagefetch::{Connector, FetchError, FetchOptions, HttpTarget};

/// Hands out one scripted response per connection and records what was sent.
#[derive(Default)]
pub struct ScriptedConnector {
    responses:   RefCell<VecDeque<Vec<u8>>>,
    connections: RefCell<Vec<Connection>>,
}

pub struct Connection {
    pub target:  HttpTarget,
    pub request: Rc<RefCell<Vec<u8>>>,
}

pub struct ScriptedStream {
    input:   Cursor<Vec<u8>>,
    written: Rc<RefCell<Vec<u8>>>,
}

impl ScriptedConnector {
    pub fn new<I, R>(responses: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Vec<u8>>,
    {
        Self {
            responses:   RefCell::new(responses.into_iter().map(Into::into).collect()),
            connections: RefCell::default(),
        }
    }

    pub fn push(&self, response: impl Into<Vec<u8>>) { self.responses.borrow_mut().push_back(response.into()); }

    pub fn connections(&self) -> usize { self.connections.borrow().len() }

    pub fn target(&self, index: usize) -> HttpTarget { self.connections.borrow()[index].target.clone() }

    pub fn request(&self, index: usize) -> String {
        String::from_utf8(self.connections.borrow()[index].request.borrow().clone()).unwrap()
    }
}

impl Connector for ScriptedConnector {
    type Stream = ScriptedStream;

    fn connect(&self, target: &HttpTarget, _options: &FetchOptions) -> pagefetch::Result<ScriptedStream> {
        let Some(response) = self.responses.borrow_mut().pop_front() else {
            return Err(FetchError::Connect {
                host:   target.host.clone(),
                port:   target.port,
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "no scripted response left"),
            });
        };
        let written = Rc::new(RefCell::new(Vec::new()));
        self.connections.borrow_mut().push(Connection {
            target:  target.clone(),
            request: written.clone(),
        });
        Ok(ScriptedStream {
            input: Cursor::new(response),
            written,
        })
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.input.read(buf) }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

/// A clock the test can move.
pub fn manual_clock(start: i64) -> (Arc<AtomicI64>, FetchOptions) {
    let now = Arc::new(AtomicI64::new(start));
    let handle = now.clone();
    let options = FetchOptions::default().clock(Arc::new(move || handle.load(Ordering::SeqCst)));
    (now, options)
}

pub fn ok(body: &str, extra_headers: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}\r\n{}",
        body.len(),
        extra_headers,
        body
    )
}

pub fn redirect(status: u16, location: &str) -> String {
    format!("HTTP/1.1 {} Moved\r\nLocation: {}\r\nContent-Length: 0\r\n\r\n", status, location)
}
