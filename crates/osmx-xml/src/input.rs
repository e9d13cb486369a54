//! Consumer handle for a background XML read.
//!
//! [`XmlInput::open`] spawns the producer thread and returns immediately.
//! The consumer then pulls the header and buffers at its own pace; the
//! bounded queue stalls the producer whenever the consumer falls behind.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use osmx_arena::Buffer;

use crate::config::ReaderConfig;
use crate::error::ReadError;
use crate::meta::{header_slot, Header, MetaSubscriber};
use crate::parser::{ParseSummary, XmlParser};
use crate::queue::{buffer_queue, BufferConsumer};

type Outcome = Result<ParseSummary, ReadError>;

/// A running read of one OSM XML document.
///
/// Dropping the handle cancels the read and joins the producer thread.
#[must_use]
pub struct XmlInput {
    header: Option<Header>,
    meta: Option<MetaSubscriber>,
    consumer: Option<BufferConsumer>,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<Outcome>>,
    outcome: Option<Outcome>,
    done: bool,
}

impl XmlInput {
    /// Validate `config` and start reading `input` on a new thread.
    pub fn open<R>(input: R, config: ReaderConfig) -> Result<Self, ReadError>
    where
        R: Read + Send + 'static,
    {
        config.validate()?;
        let (producer, consumer) = buffer_queue(config.max_queue_size);
        let (publisher, subscriber) = header_slot();
        let cancel = Arc::new(AtomicBool::new(false));
        let parser = XmlParser::new(&config, producer, publisher).with_cancel(Arc::clone(&cancel));

        let thread = thread::Builder::new()
            .name("osmx-xml-reader".into())
            .spawn(move || {
                let outcome = parser.run(input);
                if let Err(e) = &outcome {
                    tracing::warn!(error = %e, "reader stopped");
                }
                outcome
            })?;

        tracing::debug!(
            buffer_capacity = config.buffer_capacity,
            max_queue_size = config.max_queue_size,
            "reader started"
        );
        Ok(Self {
            header: None,
            meta: Some(subscriber),
            consumer: Some(consumer),
            cancel,
            thread: Some(thread),
            outcome: None,
            done: false,
        })
    }

    /// The document header, blocking until it is published.
    ///
    /// Fails with the producer's error if it stopped before publishing,
    /// or [`ReadError::MetaUnavailable`] if that error was already taken.
    pub fn header(&mut self) -> Result<&Header, ReadError> {
        if self.header.is_none() {
            let published = self.meta.take().and_then(MetaSubscriber::wait);
            match published {
                Some(header) => self.header = Some(header),
                None => {
                    self.join();
                    return match self.outcome.take() {
                        Some(Err(e)) => {
                            self.done = true;
                            Err(e)
                        }
                        other => {
                            self.outcome = other;
                            Err(ReadError::MetaUnavailable)
                        }
                    };
                }
            }
        }
        self.header.as_ref().ok_or(ReadError::MetaUnavailable)
    }

    /// The next data buffer, blocking until one arrives.
    ///
    /// Returns `Ok(None)` after the end-of-stream sentinel. If the producer
    /// stops with an error, every buffer it delivered is returned first and
    /// the error comes next, in place of the end of stream.
    pub fn next_buffer(&mut self) -> Result<Option<Buffer>, ReadError> {
        if self.done {
            return Ok(None);
        }
        let received = self.consumer.as_ref().and_then(BufferConsumer::pop);
        match received {
            Some(buffer) if buffer.is_end_of_stream() => {
                self.done = true;
                Ok(None)
            }
            Some(buffer) => Ok(Some(buffer)),
            None => {
                self.done = true;
                self.join();
                match self.outcome.take() {
                    Some(Err(e)) => Err(e),
                    other => {
                        self.outcome = other;
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Ask the producer to stop at its next buffer hand-off.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Drain any remaining buffers and wait for the producer.
    ///
    /// Returns the parse counts or the producer's error. If that error was
    /// already returned by [`next_buffer`](Self::next_buffer) or
    /// [`header`](Self::header), this returns [`ReadError::AlreadyFailed`].
    pub fn finish(mut self) -> Result<ParseSummary, ReadError> {
        while self.next_buffer()?.is_some() {}
        self.consumer = None;
        self.join();
        self.outcome.take().unwrap_or(Err(ReadError::AlreadyFailed))
    }

    /// Join the producer once, keeping its result.
    fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            self.outcome = Some(handle.join().unwrap_or(Err(ReadError::ProducerPanicked)));
        }
    }
}

impl Drop for XmlInput {
    fn drop(&mut self) {
        self.cancel();
        // Unblocks a producer waiting on a full queue.
        self.consumer = None;
        self.meta = None;
        self.join();
    }
}

// Compile-time assertion: XmlInput can be moved to another thread.
const _: fn() = || {
    fn assert<T: Send>() {}
    assert::<XmlInput>();
};
