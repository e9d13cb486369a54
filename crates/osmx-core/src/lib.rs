//! Core value types for the osmx OpenStreetMap reader.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the small value types shared by the arena and the XML front-end:
//! object identifiers, item kinds, fixed-point locations, bounding
//! boxes and timestamps.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod item;
pub mod location;
pub mod timestamp;

pub use id::{ChangesetId, ObjectId, UserId};
pub use item::ItemType;
pub use location::{BoundingBox, Location};
pub use timestamp::Timestamp;
