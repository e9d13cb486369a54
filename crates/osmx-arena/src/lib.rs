//! Bump-allocated record buffers for OpenStreetMap entities.
//!
//! Entities are serialized back-to-back into one contiguous [`Buffer`]
//! with a fixed binary layout (see [`layout`]). A record is staged with the
//! builders in [`builder`] and becomes visible to readers only once the
//! buffer is committed.
//!
//! # Architecture
//!
//! ```text
//! Buffer (one Vec<u8>, written / committed cursors)
//! ├── ObjectBuilder ─ node / way / relation header + user name
//! │   ├── TagListBuilder
//! │   ├── WayNodeListBuilder
//! │   └── RelationMemberListBuilder
//! └── ObjectIter ─ validated read-only views of committed records
//! ```
//!
//! Builders are offset handles, not borrows, so the producer can keep a
//! builder across calls, grow the buffer, or abandon the record and
//! [`Buffer::rollback`] to the last commit.
//!
//! # Example
//!
//! ```
//! use osmx_arena::{Buffer, ObjectBuilder, TagListBuilder};
//! use osmx_core::{ItemType, Location, ObjectId};
//!
//! let mut buffer = Buffer::new(1024);
//! let mut node = ObjectBuilder::open(&mut buffer, ItemType::Node)?;
//! node.object_mut(&mut buffer)
//!     .set_id(ObjectId(1))
//!     .set_location(Location::new(2.0, 3.0));
//! let mut tags = TagListBuilder::open(&mut buffer, &mut node)?;
//! tags.add_tag(&mut buffer, "highway", "residential")?;
//! tags.close(&mut buffer)?;
//! node.close(&mut buffer)?;
//! buffer.commit();
//!
//! let object = buffer.iter().next().unwrap()?;
//! assert_eq!(object.id(), ObjectId(1));
//! assert_eq!(object.tag("highway"), Some("residential"));
//! # Ok::<(), osmx_arena::ArenaError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod builder;
pub mod error;
pub mod item;
pub mod layout;

pub use buffer::{Buffer, MAX_CAPACITY};
pub use builder::{
    ObjectBuilder, ObjectMut, RelationMemberListBuilder, TagListBuilder, WayNodeListBuilder,
};
pub use error::ArenaError;
pub use item::{Member, MemberIter, Object, ObjectIter, TagIter, WayNodeIter};

// Buffers are handed from the producer thread to the consumer.
const _: fn() = || {
    fn assert<T: Send + 'static>() {}
    assert::<Buffer>();
};
