//! Item kind discriminators stored in every record header.

use std::fmt;

/// Kind of a record or sub-record in an arena buffer.
///
/// The discriminant is what gets written into the record header, so the
/// values are part of the binary layout and must never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ItemType {
    /// A point feature with a location.
    Node = 0x01,
    /// An ordered list of node references.
    Way = 0x02,
    /// An ordered list of typed, role-tagged member references.
    Relation = 0x03,
    /// Sub-record: `(key, value)` pairs.
    TagList = 0x11,
    /// Sub-record: node references of a way.
    WayNodeList = 0x12,
    /// Sub-record: members of a relation.
    RelationMemberList = 0x13,
}

impl ItemType {
    /// Decode a header discriminant.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x01 => Some(Self::Node),
            0x02 => Some(Self::Way),
            0x03 => Some(Self::Relation),
            0x11 => Some(Self::TagList),
            0x12 => Some(Self::WayNodeList),
            0x13 => Some(Self::RelationMemberList),
            _ => None,
        }
    }

    /// The header discriminant.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Whether this is a top-level entity (node, way or relation).
    pub fn is_object(self) -> bool {
        matches!(self, Self::Node | Self::Way | Self::Relation)
    }

    /// Parse the `type` attribute of a relation member.
    ///
    /// Only the three entity kinds are valid member kinds.
    pub fn from_member_type(text: &str) -> Option<Self> {
        match text {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            "relation" => Some(Self::Relation),
            _ => None,
        }
    }

    /// Lower-case name as used in the XML vocabulary.
    pub fn name(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
            Self::TagList => "tag_list",
            Self::WayNodeList => "way_node_list",
            Self::RelationMemberList => "relation_member_list",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_round_trip() {
        for kind in [
            ItemType::Node,
            ItemType::Way,
            ItemType::Relation,
            ItemType::TagList,
            ItemType::WayNodeList,
            ItemType::RelationMemberList,
        ] {
            assert_eq!(ItemType::from_u16(kind.as_u16()), Some(kind));
        }
        assert_eq!(ItemType::from_u16(0), None);
    }

    #[test]
    fn member_types() {
        assert_eq!(ItemType::from_member_type("way"), Some(ItemType::Way));
        assert_eq!(ItemType::from_member_type("tag_list"), None);
        assert_eq!(ItemType::from_member_type("n"), None);
    }

    #[test]
    fn only_entities_are_objects() {
        assert!(ItemType::Relation.is_object());
        assert!(!ItemType::TagList.is_object());
    }
}
