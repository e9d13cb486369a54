//! Closed vocabularies for element and attribute names.
//!
//! Names are classified once per token so the state machine matches on
//! enums instead of comparing strings at every decision point.

use osmx_core::ItemType;

/// An element name of the OSM XML vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    /// `<osm>` document root.
    Osm,
    /// `<osmChange>` document root.
    OsmChange,
    /// `<bounds>`.
    Bounds,
    /// `<node>`.
    Node,
    /// `<way>`.
    Way,
    /// `<relation>`.
    Relation,
    /// `<tag>`.
    Tag,
    /// `<nd>`, a way-node reference.
    Nd,
    /// `<member>`, a relation member.
    Member,
    /// `<delete>` section of a change file.
    Delete,
    /// Anything else (`create`, `modify`, `changeset`, ...).
    Other,
}

impl Element {
    /// Classify a raw element name.
    pub fn from_name(name: &[u8]) -> Self {
        match name {
            b"osm" => Self::Osm,
            b"osmChange" => Self::OsmChange,
            b"bounds" => Self::Bounds,
            b"node" => Self::Node,
            b"way" => Self::Way,
            b"relation" => Self::Relation,
            b"tag" => Self::Tag,
            b"nd" => Self::Nd,
            b"member" => Self::Member,
            b"delete" => Self::Delete,
            _ => Self::Other,
        }
    }

    /// Whether this element can be the document root.
    pub fn is_root(self) -> bool {
        matches!(self, Self::Osm | Self::OsmChange)
    }

    /// The entity kind this element opens, if any.
    pub fn object_kind(self) -> Option<ItemType> {
        match self {
            Self::Node => Some(ItemType::Node),
            Self::Way => Some(ItemType::Way),
            Self::Relation => Some(ItemType::Relation),
            _ => None,
        }
    }
}

/// An attribute name the parser acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attr {
    /// `version` (document format or object version).
    Version,
    /// `generator`.
    Generator,
    /// `id`.
    Id,
    /// `changeset`.
    Changeset,
    /// `timestamp`.
    Timestamp,
    /// `uid`.
    Uid,
    /// `user`.
    User,
    /// `visible`.
    Visible,
    /// `lon`.
    Lon,
    /// `lat`.
    Lat,
    /// `minlon` of bounds.
    MinLon,
    /// `minlat` of bounds.
    MinLat,
    /// `maxlon` of bounds.
    MaxLon,
    /// `maxlat` of bounds.
    MaxLat,
    /// `k` of a tag.
    Key,
    /// `v` of a tag.
    Value,
    /// `ref` of a way node or member.
    Ref,
    /// `type` of a member.
    Type,
    /// `role` of a member.
    Role,
    /// Any other attribute.
    Other,
}

impl Attr {
    /// Classify a raw attribute name.
    pub fn from_name(name: &[u8]) -> Self {
        match name {
            b"version" => Self::Version,
            b"generator" => Self::Generator,
            b"id" => Self::Id,
            b"changeset" => Self::Changeset,
            b"timestamp" => Self::Timestamp,
            b"uid" => Self::Uid,
            b"user" => Self::User,
            b"visible" => Self::Visible,
            b"lon" => Self::Lon,
            b"lat" => Self::Lat,
            b"minlon" => Self::MinLon,
            b"minlat" => Self::MinLat,
            b"maxlon" => Self::MaxLon,
            b"maxlat" => Self::MaxLat,
            b"k" => Self::Key,
            b"v" => Self::Value,
            b"ref" => Self::Ref,
            b"type" => Self::Type,
            b"role" => Self::Role,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_is_case_sensitive() {
        assert_eq!(Element::from_name(b"osmChange"), Element::OsmChange);
        assert_eq!(Element::from_name(b"osmchange"), Element::Other);
        assert_eq!(Element::from_name(b"Node"), Element::Other);
    }

    #[test]
    fn only_entities_open_objects() {
        assert_eq!(Element::Way.object_kind(), Some(ItemType::Way));
        assert_eq!(Element::Tag.object_kind(), None);
        assert!(Element::Osm.is_root());
        assert!(!Element::Delete.is_root());
    }

    #[test]
    fn short_attribute_names() {
        assert_eq!(Attr::from_name(b"k"), Attr::Key);
        assert_eq!(Attr::from_name(b"v"), Attr::Value);
        assert_eq!(Attr::from_name(b"kk"), Attr::Other);
    }
}
