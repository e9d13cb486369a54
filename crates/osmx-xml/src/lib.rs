//! Streaming OSM XML reader.
//!
//! Parses an OpenStreetMap XML document (`osm` or `osmChange`, format
//! version 0.6) on a background thread and delivers the entities as
//! sealed [`Buffer`](osmx_arena::Buffer)s through a bounded queue.
//!
//! # Architecture
//!
//! ```text
//!   producer thread                              consumer
//!  ┌──────────────────────────┐
//!  │ quick-xml tokenizer      │
//!  │        │ events          │   header slot (one shot)
//!  │        ▼                 │ ─────────────────────────▶ XmlInput::header
//!  │ XmlParser state machine  │
//!  │        │ builders        │   bounded buffer queue
//!  │        ▼                 │ ─────────────────────────▶ XmlInput::next_buffer
//!  │ current Buffer           │   ... data ..., sentinel
//!  └──────────────────────────┘
//! ```
//!
//! Every delivered buffer holds only complete records. The stream ends
//! with exactly one end-of-stream sentinel on success; on failure the
//! sentinel is replaced by the error.
//!
//! # Example
//!
//! ```
//! use osmx_xml::{ReaderConfig, XmlInput};
//!
//! let doc = r#"<osm version="0.6"><node id="1" lon="1" lat="2"/></osm>"#;
//! let mut input = XmlInput::open(doc.as_bytes(), ReaderConfig::default())?;
//! assert_eq!(input.header()?.version, "0.6");
//! let mut nodes = 0;
//! while let Some(buffer) = input.next_buffer()? {
//!     nodes += buffer.iter().count();
//! }
//! assert_eq!(nodes, 1);
//! # Ok::<(), osmx_xml::ReadError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod element;
pub mod error;
pub mod input;
pub mod meta;
pub mod parser;
pub mod queue;
mod tracking;

pub use config::{ConfigError, OverflowPolicy, ReaderConfig};
pub use error::{ReadError, TextPosition};
pub use input::XmlInput;
pub use meta::{header_slot, Header, MetaPublisher, MetaSubscriber};
pub use parser::{ParseSummary, XmlParser};
pub use queue::{buffer_queue, BufferConsumer, BufferProducer, Disconnected};
