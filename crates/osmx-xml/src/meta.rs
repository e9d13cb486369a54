//! Document metadata and its one-shot publication slot.
//!
//! The producer publishes the [`Header`] exactly once, either when the
//! first entity starts or at the end of a document without entities. The
//! slot is a capacity-one channel: [`MetaPublisher::publish`] consumes the
//! publisher, so a second publication cannot be written.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use osmx_core::BoundingBox;

/// The only format version the reader accepts.
pub const SUPPORTED_VERSION: &str = "0.6";

/// Metadata from the document root and the `bounds` elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Header {
    /// Format version from the root element, empty if it had none.
    pub version: String,
    /// Program that wrote the document.
    pub generator: Option<String>,
    /// Union of all `bounds` elements seen before the first entity.
    pub bbox: BoundingBox,
    /// Set for change files, which may hold several versions of one object.
    pub has_multiple_object_versions: bool,
}

/// Create a connected publisher/subscriber pair.
pub fn header_slot() -> (MetaPublisher, MetaSubscriber) {
    let (tx, rx) = bounded(1);
    (MetaPublisher { tx }, MetaSubscriber { rx })
}

/// Write side of the header slot, owned by the producer.
#[derive(Debug)]
pub struct MetaPublisher {
    tx: Sender<Header>,
}

impl MetaPublisher {
    /// Publish the header. Never blocks.
    ///
    /// A subscriber that has already gone away is not an error.
    pub fn publish(self, header: Header) {
        tracing::debug!(
            version = %header.version,
            generator = header.generator.as_deref().unwrap_or(""),
            "publishing document header"
        );
        let _ = self.tx.try_send(header);
    }
}

/// Read side of the header slot.
#[derive(Debug)]
pub struct MetaSubscriber {
    rx: Receiver<Header>,
}

impl MetaSubscriber {
    /// Block until the header is published.
    ///
    /// Returns `None` if the publisher was dropped without publishing,
    /// which happens when the producer stops with an error first.
    pub fn wait(self) -> Option<Header> {
        self.rx.recv().ok()
    }

    /// Take the header if it has been published, without blocking.
    pub fn try_take(&self) -> Option<Header> {
        match self.rx.try_recv() {
            Ok(header) => Some(header),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
