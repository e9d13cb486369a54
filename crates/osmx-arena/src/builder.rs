//! Builders that stage one entity record and its sub-lists in a [`Buffer`].
//!
//! Builders are handles: a start offset plus, for sub-lists, the offset of
//! the owning entity. They borrow the buffer only for the duration of each
//! call, so growing the buffer mid-record never invalidates them, and a
//! builder abandoned after an error is simply discarded together with the
//! bytes a [`Buffer::rollback`] throws away.
//!
//! The write order for one entity is fixed:
//!
//! ```text
//! ObjectBuilder::open        header, visible = true
//!   object_mut().set_*()     any order, any number of times
//!   set_user()               once, before the first sub-list
//!   <List>Builder::open      lazily, on the first item
//!     add_*()                one call per item
//!   <List>Builder::close     pads, patches the entity size
//! ObjectBuilder::close       pads the entity
//! Buffer::commit             done by the caller
//! ```

use osmx_core::{ChangesetId, ItemType, Location, ObjectId, Timestamp, UserId};

use crate::buffer::Buffer;
use crate::error::ArenaError;
use crate::layout::{
    self, padded_length, FLAG_VISIBLE, ITEM_HEADER_SIZE, MEMBER_HEADER_SIZE, OBJECT_HEADER_SIZE,
};

fn write_header(buffer: &mut Buffer, start: usize, size: usize, kind: ItemType) {
    let header = buffer.bytes_mut(start, ITEM_HEADER_SIZE);
    layout::write_u32(header, layout::SIZE, size as u32);
    layout::write_u16(header, layout::ITEM_TYPE, kind.as_u16());
}

fn patch_size(buffer: &mut Buffer, start: usize) {
    let size = buffer.written() - start;
    layout::write_u32(buffer.bytes_mut(start, 4), layout::SIZE, size as u32);
}

/// Handle to an entity record under construction.
#[derive(Debug)]
#[must_use]
pub struct ObjectBuilder {
    start: usize,
    kind: ItemType,
    user_written: bool,
}

impl ObjectBuilder {
    /// Reserve the header of a new `kind` record at the write cursor.
    ///
    /// The record starts out visible. Node locations start undefined.
    pub fn open(buffer: &mut Buffer, kind: ItemType) -> Result<Self, ArenaError> {
        debug_assert!(kind.is_object(), "{kind} is not an entity kind");
        let start = buffer.reserve(OBJECT_HEADER_SIZE)?;
        write_header(buffer, start, OBJECT_HEADER_SIZE, kind);
        let builder = Self {
            start,
            kind,
            user_written: false,
        };
        builder
            .object_mut(buffer)
            .set_visible(true)
            .set_location(Location::undefined());
        Ok(builder)
    }

    /// Kind of the record being built.
    pub fn kind(&self) -> ItemType {
        self.kind
    }

    /// Mutable view of the fixed header fields.
    pub fn object_mut<'a>(&self, buffer: &'a mut Buffer) -> ObjectMut<'a> {
        ObjectMut {
            header: buffer.bytes_mut(self.start, OBJECT_HEADER_SIZE),
            kind: self.kind,
        }
    }

    /// Write the inline user name.
    ///
    /// Must be called before the first sub-list is opened. Later calls
    /// are ignored.
    pub fn set_user(&mut self, buffer: &mut Buffer, name: &str) -> Result<(), ArenaError> {
        if self.user_written {
            debug_assert!(false, "user name written twice");
            return Ok(());
        }
        debug_assert_eq!(
            buffer.written(),
            self.start + OBJECT_HEADER_SIZE,
            "user name must directly follow the header"
        );
        let len = name.len();
        let at = buffer.reserve(len + 1)?;
        buffer.bytes_mut(at, len).copy_from_slice(name.as_bytes());
        let header = buffer.bytes_mut(self.start, OBJECT_HEADER_SIZE);
        layout::write_u32(header, layout::USER_LEN, len as u32);
        patch_size(buffer, self.start);
        buffer.pad_to_alignment()?;
        self.user_written = true;
        Ok(())
    }

    fn ensure_user(&mut self, buffer: &mut Buffer) -> Result<(), ArenaError> {
        if self.user_written {
            Ok(())
        } else {
            self.set_user(buffer, "")
        }
    }

    /// Finish the record and return its offset.
    ///
    /// Does not commit; the caller commits once the record is closed.
    pub fn close(mut self, buffer: &mut Buffer) -> Result<usize, ArenaError> {
        self.ensure_user(buffer)?;
        buffer.pad_to_alignment()?;
        Ok(self.start)
    }
}

/// Setters for the fixed header of an entity record.
///
/// Borrowed from an [`ObjectBuilder`] via [`ObjectBuilder::object_mut`].
pub struct ObjectMut<'a> {
    header: &'a mut [u8],
    kind: ItemType,
}

impl ObjectMut<'_> {
    /// Set the object id.
    pub fn set_id(&mut self, id: ObjectId) -> &mut Self {
        layout::write_i64(self.header, layout::ID, id.0);
        self
    }

    /// Set the object version.
    pub fn set_version(&mut self, version: u32) -> &mut Self {
        layout::write_u32(self.header, layout::VERSION, version);
        self
    }

    /// Set the changeset that last touched the object.
    pub fn set_changeset(&mut self, changeset: ChangesetId) -> &mut Self {
        layout::write_u32(self.header, layout::CHANGESET, changeset.0);
        self
    }

    /// Set the last-modified time.
    pub fn set_timestamp(&mut self, timestamp: Timestamp) -> &mut Self {
        layout::write_i64(self.header, layout::TIMESTAMP, timestamp.0);
        self
    }

    /// Set the id of the last editor.
    pub fn set_uid(&mut self, uid: UserId) -> &mut Self {
        layout::write_u32(self.header, layout::UID, uid.0);
        self
    }

    /// Set or clear the visible flag.
    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        let flags = &mut self.header[layout::FLAGS];
        if visible {
            *flags |= FLAG_VISIBLE;
        } else {
            *flags &= !FLAG_VISIBLE;
        }
        self
    }

    /// Set the node location. No effect on ways and relations.
    pub fn set_location(&mut self, location: Location) -> &mut Self {
        if self.kind == ItemType::Node {
            layout::write_i32(self.header, layout::LON, location.x());
            layout::write_i32(self.header, layout::LAT, location.y());
        }
        self
    }

    /// Set only the longitude, in degrees. No effect on ways and relations.
    pub fn set_lon(&mut self, lon: f64) -> &mut Self {
        let mut location = self.location();
        location.set_lon(lon);
        self.set_location(location)
    }

    /// Set only the latitude, in degrees. No effect on ways and relations.
    pub fn set_lat(&mut self, lat: f64) -> &mut Self {
        let mut location = self.location();
        location.set_lat(lat);
        self.set_location(location)
    }

    fn location(&self) -> Location {
        Location::from_fixed(
            layout::read_i32(self.header, layout::LON),
            layout::read_i32(self.header, layout::LAT),
        )
    }
}

/// Shared state of an open sub-list.
#[derive(Debug)]
struct ListHandle {
    start: usize,
    parent: usize,
}

impl ListHandle {
    fn open(
        buffer: &mut Buffer,
        parent: &mut ObjectBuilder,
        kind: ItemType,
    ) -> Result<Self, ArenaError> {
        parent.ensure_user(buffer)?;
        let start = buffer.reserve(ITEM_HEADER_SIZE)?;
        write_header(buffer, start, ITEM_HEADER_SIZE, kind);
        Ok(Self {
            start,
            parent: parent.start,
        })
    }

    fn reserve(&self, buffer: &mut Buffer, len: usize) -> Result<usize, ArenaError> {
        let at = buffer.reserve(len)?;
        patch_size(buffer, self.start);
        Ok(at)
    }

    fn close(self, buffer: &mut Buffer) -> Result<(), ArenaError> {
        patch_size(buffer, self.start);
        buffer.pad_to_alignment()?;
        patch_size(buffer, self.parent);
        Ok(())
    }
}

/// Builder for the tag list of an entity.
#[derive(Debug)]
#[must_use]
pub struct TagListBuilder(ListHandle);

impl TagListBuilder {
    /// Open a tag list inside `parent`.
    pub fn open(buffer: &mut Buffer, parent: &mut ObjectBuilder) -> Result<Self, ArenaError> {
        ListHandle::open(buffer, parent, ItemType::TagList).map(Self)
    }

    /// Append one `(key, value)` pair.
    pub fn add_tag(
        &mut self,
        buffer: &mut Buffer,
        key: &str,
        value: &str,
    ) -> Result<(), ArenaError> {
        let at = self.0.reserve(buffer, key.len() + value.len() + 2)?;
        buffer
            .bytes_mut(at, key.len())
            .copy_from_slice(key.as_bytes());
        buffer
            .bytes_mut(at + key.len() + 1, value.len())
            .copy_from_slice(value.as_bytes());
        Ok(())
    }

    /// Pad the list and account for it in the parent record.
    pub fn close(self, buffer: &mut Buffer) -> Result<(), ArenaError> {
        self.0.close(buffer)
    }
}

/// Builder for the node references of a way.
#[derive(Debug)]
#[must_use]
pub struct WayNodeListBuilder(ListHandle);

impl WayNodeListBuilder {
    /// Open a way-node list inside `parent`.
    pub fn open(buffer: &mut Buffer, parent: &mut ObjectBuilder) -> Result<Self, ArenaError> {
        ListHandle::open(buffer, parent, ItemType::WayNodeList).map(Self)
    }

    /// Append one node reference.
    pub fn add_node_ref(&mut self, buffer: &mut Buffer, node: ObjectId) -> Result<(), ArenaError> {
        let at = self.0.reserve(buffer, 8)?;
        layout::write_i64(buffer.bytes_mut(at, 8), 0, node.0);
        Ok(())
    }

    /// Pad the list and account for it in the parent record.
    pub fn close(self, buffer: &mut Buffer) -> Result<(), ArenaError> {
        self.0.close(buffer)
    }
}

/// Builder for the members of a relation.
#[derive(Debug)]
#[must_use]
pub struct RelationMemberListBuilder(ListHandle);

impl RelationMemberListBuilder {
    /// Open a member list inside `parent`.
    pub fn open(buffer: &mut Buffer, parent: &mut ObjectBuilder) -> Result<Self, ArenaError> {
        ListHandle::open(buffer, parent, ItemType::RelationMemberList).map(Self)
    }

    /// Append one member.
    ///
    /// `kind` must be an entity kind.
    pub fn add_member(
        &mut self,
        buffer: &mut Buffer,
        kind: ItemType,
        member: ObjectId,
        role: &str,
    ) -> Result<(), ArenaError> {
        debug_assert!(kind.is_object(), "{kind} is not a member kind");
        let len = MEMBER_HEADER_SIZE + padded_length(role.len() + 1);
        let at = self.0.reserve(buffer, len)?;
        let entry = buffer.bytes_mut(at, len);
        layout::write_i64(entry, layout::MEMBER_REF, member.0);
        layout::write_u16(entry, layout::MEMBER_TYPE, kind.as_u16());
        layout::write_u32(entry, layout::MEMBER_ROLE_LEN, role.len() as u32);
        entry[MEMBER_HEADER_SIZE..MEMBER_HEADER_SIZE + role.len()]
            .copy_from_slice(role.as_bytes());
        Ok(())
    }

    /// Pad the list and account for it in the parent record.
    pub fn close(self, buffer: &mut Buffer) -> Result<(), ArenaError> {
        self.0.close(buffer)
    }
}
