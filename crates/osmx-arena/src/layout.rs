//! Binary layout of records inside a [`Buffer`](crate::Buffer).
//!
//! All integers are little-endian and every record starts on an
//! [`ALIGN_BYTES`] boundary.
//!
//! ```text
//! item header (8 bytes, every record and sub-record)
//!   0  u32  size        own bytes incl. padded sub-items, excl. own trailing padding
//!   4  u16  item type
//!   6  u8   flags       bit 0 = visible (entity records only)
//!   7  u8   reserved
//!
//! entity header (continues the item header, 48 bytes total)
//!   8  i64  id
//!  16  u32  version
//!  20  u32  changeset
//!  24  i64  timestamp   seconds since epoch
//!  32  u32  uid
//!  36  u32  user length (bytes, without the NUL)
//!  40  i32  lon         nodes only, 1e-7 degrees
//!  44  i32  lat         nodes only, 1e-7 degrees
//!  48  ...  user name + NUL, padded, then the sub-lists
//! ```
//!
//! Sub-list bodies: tag lists hold `key NUL value NUL` pairs, way-node
//! lists hold `i64` refs, member lists hold a 16-byte member header
//! (`i64 ref, u16 type, u16 reserved, u32 role length`) followed by the
//! padded `role NUL`.

/// Alignment of every record and sub-record.
pub const ALIGN_BYTES: usize = 8;

/// Size of the header shared by all items.
pub const ITEM_HEADER_SIZE: usize = 8;

/// Size of the fixed part of an entity record.
pub const OBJECT_HEADER_SIZE: usize = 48;

/// Size of the fixed part of one relation member.
pub const MEMBER_HEADER_SIZE: usize = 16;

/// Flag bit for visible objects.
pub const FLAG_VISIBLE: u8 = 0x01;

pub(crate) const SIZE: usize = 0;
pub(crate) const ITEM_TYPE: usize = 4;
pub(crate) const FLAGS: usize = 6;
pub(crate) const ID: usize = 8;
pub(crate) const VERSION: usize = 16;
pub(crate) const CHANGESET: usize = 20;
pub(crate) const TIMESTAMP: usize = 24;
pub(crate) const UID: usize = 32;
pub(crate) const USER_LEN: usize = 36;
pub(crate) const LON: usize = 40;
pub(crate) const LAT: usize = 44;

pub(crate) const MEMBER_REF: usize = 0;
pub(crate) const MEMBER_TYPE: usize = 8;
pub(crate) const MEMBER_ROLE_LEN: usize = 12;

/// Round `len` up to the next multiple of [`ALIGN_BYTES`].
pub const fn padded_length(len: usize) -> usize {
    (len + ALIGN_BYTES - 1) & !(ALIGN_BYTES - 1)
}

fn array<const N: usize>(buf: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[at..at + N]);
    out
}

pub(crate) fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes(array(buf, at))
}

pub(crate) fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(array(buf, at))
}

pub(crate) fn read_i32(buf: &[u8], at: usize) -> i32 {
    i32::from_le_bytes(array(buf, at))
}

pub(crate) fn read_i64(buf: &[u8], at: usize) -> i64 {
    i64::from_le_bytes(array(buf, at))
}

pub(crate) fn write_u16(buf: &mut [u8], at: usize, v: u16) {
    buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

pub(crate) fn write_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

pub(crate) fn write_i32(buf: &mut [u8], at: usize, v: i32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

pub(crate) fn write_i64(buf: &mut [u8], at: usize, v: i64) {
    buf[at..at + 8].copy_from_slice(&v.to_le_bytes());
}
