//! In-crate test doubles for the ports.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use apiprobe_domain::{Endpoint, LogRecord, Response};
use chrono::{DateTime, TimeZone, Utc};

use crate::ports::{Clock, HttpClient, LogSink, SinkError, TransportError};

/// Sink that keeps records in memory.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<LogRecord>>,
    failing: bool,
    delay: Duration,
}

impl RecordingSink {
    /// A sink whose every append fails.
    pub fn failing() -> Self {
        Self {
            records: Mutex::default(),
            failing: true,
            delay: Duration::ZERO,
        }
    }

    /// A sink that blocks for `delay` on every append.
    pub fn slow(delay: Duration) -> Self {
        Self {
            records: Mutex::default(),
            failing: false,
            delay,
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl LogSink for RecordingSink {
    fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        if self.failing {
            return Err(SinkError::Io(std::io::Error::other("disk full")));
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.records
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(record.clone());
        Ok(())
    }

    fn destination(&self) -> String {
        "recording".to_string()
    }
}

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Client that answers from a script, repeating the last entry when exhausted.
pub struct StubClient {
    replies: Mutex<VecDeque<Result<Response, TransportError>>>,
    last: Mutex<Option<Result<Response, TransportError>>>,
    calls: AtomicUsize,
}

impl StubClient {
    pub fn new(replies: Vec<Result<Response, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answers with `status` and `body`.
    pub fn always(status: u16, body: &str) -> Self {
        Self::new(vec![Ok(Response::with_body(status, body))])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> Result<Response, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let popped = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(reply) = popped {
            *last = Some(reply.clone());
            return reply;
        }
        last.clone()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".to_string())))
    }
}

impl HttpClient for StubClient {
    fn execute(
        &self,
        _endpoint: &Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + '_>> {
        let reply = self.next_reply();
        Box::pin(async move { reply })
    }

    fn base_url(&self) -> &str {
        "http://stub.invalid"
    }
}
