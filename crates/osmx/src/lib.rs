//! osmx: a streaming OpenStreetMap XML reader.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all osmx sub-crates. For most users, adding `osmx` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use osmx::prelude::*;
//!
//! let doc = r#"<osm version="0.6" generator="doc">
//!   <node id="1" lon="8.5" lat="47.4"><tag k="amenity" v="cafe"/></node>
//!   <way id="2"><nd ref="1"/><nd ref="3"/></way>
//! </osm>"#;
//!
//! let mut input = XmlInput::open(doc.as_bytes(), ReaderConfig::default())?;
//! assert_eq!(input.header()?.generator.as_deref(), Some("doc"));
//!
//! let mut cafes = 0;
//! let mut way_nodes = Vec::new();
//! while let Some(buffer) = input.next_buffer()? {
//!     for object in &buffer {
//!         let object = object?;
//!         match object.kind() {
//!             ItemType::Node if object.tag("amenity") == Some("cafe") => cafes += 1,
//!             ItemType::Way => way_nodes.extend(object.nodes()),
//!             _ => {}
//!         }
//!     }
//! }
//! assert_eq!(cafes, 1);
//! assert_eq!(way_nodes, vec![ObjectId(1), ObjectId(3)]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `osmx-core` | Ids, item kinds, locations, timestamps |
//! | [`arena`] | `osmx-arena` | Record buffers, builders and record views |
//! | [`xml`] | `osmx-xml` | The XML parser, buffer queue and header slot |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`osmx-core`).
///
/// Contains [`types::ObjectId`], [`types::ItemType`], fixed-point
/// [`types::Location`]s and [`types::Timestamp`]s.
pub use osmx_core as types;

/// Record buffers (`osmx-arena`).
///
/// [`arena::Buffer`] holds records back to back; the builders in
/// [`arena::builder`] write them and [`arena::Object`] reads them.
pub use osmx_arena as arena;

/// The XML front-end (`osmx-xml`).
///
/// [`xml::XmlInput`] runs a read on a background thread. Use
/// [`xml::XmlParser`] directly to drive a parse on a thread you own.
pub use osmx_xml as xml;

/// Common imports for typical osmx usage.
///
/// ```rust
/// use osmx::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use osmx_core::{BoundingBox, ChangesetId, ItemType, Location, ObjectId, Timestamp, UserId};

    // Records
    pub use osmx_arena::{ArenaError, Buffer, Member, Object};

    // Reading
    pub use osmx_xml::{Header, OverflowPolicy, ReadError, ReaderConfig, XmlInput};
}
