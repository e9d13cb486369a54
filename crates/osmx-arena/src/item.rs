//! Read-only views over committed entity records.
//!
//! [`ObjectIter`] walks the committed prefix of a [`Buffer`](crate::Buffer)
//! and yields one [`Object`] per record. Each record, including all of its
//! sub-lists, is validated when it is reached, so the accessors on
//! [`Object`] never fail.

use std::fmt;
use std::str;

use osmx_core::{ChangesetId, ItemType, Location, ObjectId, Timestamp, UserId};

use crate::error::ArenaError;
use crate::layout::{
    self, padded_length, FLAG_VISIBLE, ITEM_HEADER_SIZE, MEMBER_HEADER_SIZE, OBJECT_HEADER_SIZE,
};

/// Iterator over the entity records in a byte region.
///
/// Yields an error and then stops if a record is malformed.
pub struct ObjectIter<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> ObjectIter<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = Result<Object<'a>, ArenaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        match Object::parse(self.data, self.pos) {
            Ok(object) => {
                self.pos += padded_length(object.size());
                Some(Ok(object))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// A committed node, way or relation.
#[derive(Clone, Copy)]
pub struct Object<'a> {
    record: &'a [u8],
    offset: usize,
    kind: ItemType,
}

impl<'a> Object<'a> {
    fn parse(data: &'a [u8], offset: usize) -> Result<Self, ArenaError> {
        let truncated = ArenaError::Truncated { offset };
        let header = data
            .get(offset..offset + ITEM_HEADER_SIZE)
            .ok_or(truncated.clone())?;
        let size = layout::read_u32(header, layout::SIZE) as usize;
        let value = layout::read_u16(header, layout::ITEM_TYPE);
        let kind = ItemType::from_u16(value)
            .filter(|kind| kind.is_object())
            .ok_or(ArenaError::InvalidItemType { offset, value })?;
        if size < OBJECT_HEADER_SIZE {
            return Err(truncated);
        }
        let record = data.get(offset..offset + size).ok_or(truncated.clone())?;

        let user_len = layout::read_u32(record, layout::USER_LEN) as usize;
        let user_end = OBJECT_HEADER_SIZE + user_len;
        if user_end >= size {
            return Err(truncated);
        }
        str::from_utf8(&record[OBJECT_HEADER_SIZE..user_end])
            .map_err(|_| ArenaError::InvalidUtf8 { offset })?;

        let mut pos = padded_length(user_end + 1);
        while pos < size {
            let sub_offset = offset + pos;
            let sub = record
                .get(pos..pos + ITEM_HEADER_SIZE)
                .ok_or(ArenaError::Truncated { offset: sub_offset })?;
            let sub_size = layout::read_u32(sub, layout::SIZE) as usize;
            let value = layout::read_u16(sub, layout::ITEM_TYPE);
            let sub_kind = ItemType::from_u16(value)
                .filter(|kind| !kind.is_object())
                .ok_or(ArenaError::InvalidItemType {
                    offset: sub_offset,
                    value,
                })?;
            if sub_size < ITEM_HEADER_SIZE {
                return Err(ArenaError::Truncated { offset: sub_offset });
            }
            let body = record
                .get(pos + ITEM_HEADER_SIZE..pos + sub_size)
                .ok_or(ArenaError::Truncated { offset: sub_offset })?;
            validate_list(sub_kind, body, sub_offset)?;
            pos += padded_length(sub_size);
        }

        Ok(Self {
            record,
            offset,
            kind,
        })
    }

    /// Node, way or relation.
    pub fn kind(&self) -> ItemType {
        self.kind
    }

    /// Offset of the record in its buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the record in bytes, without trailing padding.
    pub fn size(&self) -> usize {
        self.record.len()
    }

    /// The raw record bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.record
    }

    /// Object id.
    pub fn id(&self) -> ObjectId {
        ObjectId(layout::read_i64(self.record, layout::ID))
    }

    /// Object version, 0 if unknown.
    pub fn version(&self) -> u32 {
        layout::read_u32(self.record, layout::VERSION)
    }

    /// Changeset id, 0 if unknown.
    pub fn changeset(&self) -> ChangesetId {
        ChangesetId(layout::read_u32(self.record, layout::CHANGESET))
    }

    /// Last-modified time.
    pub fn timestamp(&self) -> Timestamp {
        Timestamp(layout::read_i64(self.record, layout::TIMESTAMP))
    }

    /// Id of the last editor, 0 if unknown.
    pub fn uid(&self) -> UserId {
        UserId(layout::read_u32(self.record, layout::UID))
    }

    /// Name of the last editor, empty if unknown.
    pub fn user(&self) -> &'a str {
        let len = layout::read_u32(self.record, layout::USER_LEN) as usize;
        utf8(&self.record[OBJECT_HEADER_SIZE..OBJECT_HEADER_SIZE + len])
    }

    /// Whether the object is visible (not deleted).
    pub fn visible(&self) -> bool {
        self.record[layout::FLAGS] & FLAG_VISIBLE != 0
    }

    /// Node location. Undefined for ways and relations.
    pub fn location(&self) -> Location {
        if self.kind != ItemType::Node {
            return Location::undefined();
        }
        Location::from_fixed(
            layout::read_i32(self.record, layout::LON),
            layout::read_i32(self.record, layout::LAT),
        )
    }

    /// Tags in input order.
    pub fn tags(&self) -> TagIter<'a> {
        TagIter {
            lists: self.sub_lists(ItemType::TagList),
            body: &[],
        }
    }

    /// Value of the first tag with `key`.
    pub fn tag(&self, key: &str) -> Option<&'a str> {
        self.tags().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Node references of a way. Empty for other kinds.
    pub fn nodes(&self) -> WayNodeIter<'a> {
        WayNodeIter {
            lists: self.sub_lists(ItemType::WayNodeList),
            body: &[],
        }
    }

    /// Members of a relation. Empty for other kinds.
    pub fn members(&self) -> MemberIter<'a> {
        MemberIter {
            lists: self.sub_lists(ItemType::RelationMemberList),
            body: &[],
        }
    }

    fn sub_lists(&self, kind: ItemType) -> SubLists<'a> {
        let user_len = layout::read_u32(self.record, layout::USER_LEN) as usize;
        SubLists {
            record: self.record,
            pos: padded_length(OBJECT_HEADER_SIZE + user_len + 1),
            kind,
        }
    }
}

impl fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("kind", &self.kind)
            .field("id", &self.id())
            .field("version", &self.version())
            .field("visible", &self.visible())
            .field("offset", &self.offset)
            .field("size", &self.size())
            .finish()
    }
}

/// One member of a relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Member<'a> {
    /// Kind of the referenced object.
    pub kind: ItemType,
    /// Id of the referenced object.
    pub id: ObjectId,
    /// Role of the member, possibly empty.
    pub role: &'a str,
}

// Bodies of the sub-lists of one kind, in record order.
struct SubLists<'a> {
    record: &'a [u8],
    pos: usize,
    kind: ItemType,
}

impl<'a> Iterator for SubLists<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        while self.pos < self.record.len() {
            let start = self.pos;
            let size = layout::read_u32(self.record, start + layout::SIZE) as usize;
            let value = layout::read_u16(self.record, start + layout::ITEM_TYPE);
            self.pos += padded_length(size);
            if value == self.kind.as_u16() {
                return Some(&self.record[start + ITEM_HEADER_SIZE..start + size]);
            }
        }
        None
    }
}

/// Iterator over `(key, value)` pairs.
pub struct TagIter<'a> {
    lists: SubLists<'a>,
    body: &'a [u8],
}

impl<'a> Iterator for TagIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while self.body.is_empty() {
            self.body = self.lists.next()?;
        }
        let (key, rest) = split_nul(self.body);
        let (value, rest) = split_nul(rest);
        self.body = rest;
        Some((utf8(key), utf8(value)))
    }
}

/// Iterator over the node references of a way.
pub struct WayNodeIter<'a> {
    lists: SubLists<'a>,
    body: &'a [u8],
}

impl Iterator for WayNodeIter<'_> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        while self.body.is_empty() {
            self.body = self.lists.next()?;
        }
        let id = layout::read_i64(self.body, 0);
        self.body = &self.body[8..];
        Some(ObjectId(id))
    }
}

/// Iterator over the members of a relation.
pub struct MemberIter<'a> {
    lists: SubLists<'a>,
    body: &'a [u8],
}

impl<'a> Iterator for MemberIter<'a> {
    type Item = Member<'a>;

    fn next(&mut self) -> Option<Member<'a>> {
        while self.body.is_empty() {
            self.body = self.lists.next()?;
        }
        let role_len = layout::read_u32(self.body, layout::MEMBER_ROLE_LEN) as usize;
        let kind = ItemType::from_u16(layout::read_u16(self.body, layout::MEMBER_TYPE))
            .unwrap_or(ItemType::Node);
        let member = Member {
            kind,
            id: ObjectId(layout::read_i64(self.body, layout::MEMBER_REF)),
            role: utf8(&self.body[MEMBER_HEADER_SIZE..MEMBER_HEADER_SIZE + role_len]),
        };
        let stride = (MEMBER_HEADER_SIZE + padded_length(role_len + 1)).min(self.body.len());
        self.body = &self.body[stride..];
        Some(member)
    }
}

fn split_nul(bytes: &[u8]) -> (&[u8], &[u8]) {
    match bytes.iter().position(|&b| b == 0) {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &[]),
    }
}

// Strings are validated when the record is parsed.
fn utf8(bytes: &[u8]) -> &str {
    str::from_utf8(bytes).unwrap_or_default()
}

fn validate_list(kind: ItemType, body: &[u8], offset: usize) -> Result<(), ArenaError> {
    match kind {
        ItemType::TagList => {
            let nuls = body.iter().filter(|&&b| b == 0).count();
            if nuls % 2 != 0 || body.last().is_some_and(|&b| b != 0) {
                return Err(ArenaError::Truncated { offset });
            }
            str::from_utf8(body).map_err(|_| ArenaError::InvalidUtf8 { offset })?;
        }
        ItemType::WayNodeList => {
            if body.len() % 8 != 0 {
                return Err(ArenaError::Truncated { offset });
            }
        }
        ItemType::RelationMemberList => {
            let mut rest = body;
            while !rest.is_empty() {
                if rest.len() < MEMBER_HEADER_SIZE {
                    return Err(ArenaError::Truncated { offset });
                }
                let value = layout::read_u16(rest, layout::MEMBER_TYPE);
                if !ItemType::from_u16(value).is_some_and(ItemType::is_object) {
                    return Err(ArenaError::InvalidItemType { offset, value });
                }
                let role_len = layout::read_u32(rest, layout::MEMBER_ROLE_LEN) as usize;
                let stride = MEMBER_HEADER_SIZE + padded_length(role_len + 1);
                if stride > rest.len() {
                    return Err(ArenaError::Truncated { offset });
                }
                str::from_utf8(&rest[MEMBER_HEADER_SIZE..MEMBER_HEADER_SIZE + role_len])
                    .map_err(|_| ArenaError::InvalidUtf8 { offset })?;
                rest = &rest[stride..];
            }
        }
        _ => {
            return Err(ArenaError::InvalidItemType {
                offset,
                value: kind.as_u16(),
            })
        }
    }
    Ok(())
}
