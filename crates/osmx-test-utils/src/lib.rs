//! Test utilities for osmx development.
//!
//! Provides an owned snapshot of arena records ([`OwnedObject`]), a writer
//! that renders snapshots back to OSM XML ([`write_document`]), fixture
//! documents ([`fixtures`]) and proptest strategies ([`strategies`]).
//!
//! The usual round trip in a test is: generate `Vec<OwnedObject>`, render
//! it with [`write_document`], parse it, then compare against
//! [`collect_objects`] on the delivered buffers.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod strategies;

use std::fmt::Write as _;

use osmx_arena::{Buffer, Object};
use osmx_core::location::fix_to_double;
use osmx_core::{ChangesetId, ItemType, Location, ObjectId, Timestamp, UserId};

/// An owned copy of one entity record.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedObject {
    pub kind: ItemType,
    pub id: ObjectId,
    pub version: u32,
    pub changeset: ChangesetId,
    pub timestamp: Timestamp,
    pub uid: UserId,
    pub user: String,
    pub visible: bool,
    pub location: Location,
    pub tags: Vec<(String, String)>,
    pub nodes: Vec<ObjectId>,
    pub members: Vec<OwnedMember>,
}

/// An owned relation member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedMember {
    pub kind: ItemType,
    pub id: ObjectId,
    pub role: String,
}

impl OwnedObject {
    /// An empty, visible entity of `kind` with every attribute zero.
    pub fn new(kind: ItemType, id: i64) -> Self {
        Self {
            kind,
            id: ObjectId(id),
            version: 0,
            changeset: ChangesetId(0),
            timestamp: Timestamp(0),
            uid: UserId(0),
            user: String::new(),
            visible: true,
            location: Location::undefined(),
            tags: Vec::new(),
            nodes: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    pub fn with_location(mut self, lon: f64, lat: f64) -> Self {
        self.location = Location::new(lon, lat);
        self
    }

    pub fn with_node(mut self, id: i64) -> Self {
        self.nodes.push(ObjectId(id));
        self
    }

    pub fn with_member(mut self, kind: ItemType, id: i64, role: &str) -> Self {
        self.members.push(OwnedMember {
            kind,
            id: ObjectId(id),
            role: role.into(),
        });
        self
    }
}

impl From<Object<'_>> for OwnedObject {
    fn from(object: Object<'_>) -> Self {
        Self {
            kind: object.kind(),
            id: object.id(),
            version: object.version(),
            changeset: object.changeset(),
            timestamp: object.timestamp(),
            uid: object.uid(),
            user: object.user().into(),
            visible: object.visible(),
            location: object.location(),
            tags: object
                .tags()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
            nodes: object.nodes().collect(),
            members: object
                .members()
                .map(|m| OwnedMember {
                    kind: m.kind,
                    id: m.id,
                    role: m.role.into(),
                })
                .collect(),
        }
    }
}

/// Snapshot every record in `buffers`, in delivery order.
///
/// Panics on a malformed record.
pub fn collect_objects<'a>(buffers: impl IntoIterator<Item = &'a Buffer>) -> Vec<OwnedObject> {
    buffers
        .into_iter()
        .flat_map(Buffer::iter)
        .map(|object| OwnedObject::from(object.expect("well-formed record")))
        .collect()
}

// ── XML writer ─────────────────────────────────────────────────────

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Render one entity as an XML element.
///
/// Zero attributes are omitted, matching what the reader fills in for a
/// missing attribute.
pub fn write_object(out: &mut String, object: &OwnedObject) {
    let name = object.kind.name();
    let _ = write!(out, "  <{name} id=\"{}\"", object.id);
    if object.version != 0 {
        let _ = write!(out, " version=\"{}\"", object.version);
    }
    if object.changeset.0 != 0 {
        let _ = write!(out, " changeset=\"{}\"", object.changeset);
    }
    if object.timestamp.is_set() {
        let _ = write!(out, " timestamp=\"{}\"", object.timestamp);
    }
    if object.uid.0 != 0 {
        let _ = write!(out, " uid=\"{}\"", object.uid);
    }
    if !object.user.is_empty() {
        let _ = write!(out, " user=\"{}\"", escape_attr(&object.user));
    }
    if !object.visible {
        out.push_str(" visible=\"false\"");
    }
    if object.kind == ItemType::Node && object.location.is_defined() {
        let _ = write!(
            out,
            " lon=\"{}\" lat=\"{}\"",
            fix_to_double(object.location.x()),
            fix_to_double(object.location.y())
        );
    }
    if object.tags.is_empty() && object.nodes.is_empty() && object.members.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for node in &object.nodes {
        let _ = writeln!(out, "    <nd ref=\"{node}\"/>");
    }
    for member in &object.members {
        let _ = writeln!(
            out,
            "    <member type=\"{}\" ref=\"{}\" role=\"{}\"/>",
            member.kind.name(),
            member.id,
            escape_attr(&member.role)
        );
    }
    for (k, v) in &object.tags {
        let _ = writeln!(out, "    <tag k=\"{}\" v=\"{}\"/>", escape_attr(k), escape_attr(v));
    }
    let _ = writeln!(out, "  </{name}>");
}

/// Render a complete `osm` document holding `objects`.
pub fn write_document(objects: &[OwnedObject]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<osm version=\"0.6\" generator=\"osmx-test-utils\">\n",
    );
    for object in objects {
        write_object(&mut out, object);
    }
    out.push_str("</osm>\n");
    out
}

/// A document of `count` untagged nodes with ids `1..=count`.
pub fn node_document(count: usize) -> String {
    let objects: Vec<_> = (1..=count as i64)
        .map(|id| OwnedObject::new(ItemType::Node, id).with_location(0.5, 0.5))
        .collect();
    write_document(&objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use osmx_arena::{ObjectBuilder, TagListBuilder};

    #[test]
    fn escape_covers_markup() {
        assert_eq!(escape_attr(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
    }

    #[test]
    fn snapshot_reads_every_field() {
        let mut buffer = Buffer::new(1024);
        let mut node = ObjectBuilder::open(&mut buffer, ItemType::Node).unwrap();
        node.object_mut(&mut buffer)
            .set_id(ObjectId(9))
            .set_version(2)
            .set_location(Location::new(1.0, 2.0));
        node.set_user(&mut buffer, "ann").unwrap();
        let mut tags = TagListBuilder::open(&mut buffer, &mut node).unwrap();
        tags.add_tag(&mut buffer, "k", "v").unwrap();
        tags.close(&mut buffer).unwrap();
        node.close(&mut buffer).unwrap();
        buffer.commit();

        let objects = collect_objects([&buffer]);
        let expected = OwnedObject {
            version: 2,
            user: "ann".into(),
            ..OwnedObject::new(ItemType::Node, 9)
                .with_location(1.0, 2.0)
                .with_tag("k", "v")
        };
        assert_eq!(objects, vec![expected]);
    }

    #[test]
    fn writer_omits_zero_attributes() {
        let mut out = String::new();
        write_object(&mut out, &OwnedObject::new(ItemType::Way, 4));
        assert_eq!(out, "  <way id=\"4\"/>\n");
    }

    #[test]
    fn writer_renders_children() {
        let mut out = String::new();
        let relation = OwnedObject::new(ItemType::Relation, 1)
            .with_member(ItemType::Way, 2, "outer")
            .with_tag("type", "multipolygon");
        write_object(&mut out, &relation);
        assert!(out.contains("<member type=\"way\" ref=\"2\" role=\"outer\"/>"));
        assert!(out.contains("<tag k=\"type\" v=\"multipolygon\"/>"));
        assert!(out.ends_with("</relation>\n"));
    }
}
