//! Proptest strategies producing entity snapshots.
//!
//! Generated values stay inside what the writer and reader carry
//! losslessly: coordinates on the fixed-point grid, timestamps after the
//! epoch, and printable ASCII text.

use proptest::collection::vec;
use proptest::prelude::*;

use osmx_core::{ChangesetId, ItemType, Location, ObjectId, Timestamp, UserId};

use crate::{OwnedMember, OwnedObject};

fn text(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[ -~]{{0,{max}}}")).expect("valid regex")
}

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z:_]{0,11}"
}

fn location() -> impl Strategy<Value = Location> {
    (-1_800_000_000i32..=1_800_000_000, -900_000_000i32..=900_000_000)
        .prop_map(|(x, y)| Location::from_fixed(x, y))
}

fn member_kind() -> impl Strategy<Value = ItemType> {
    prop_oneof![
        Just(ItemType::Node),
        Just(ItemType::Way),
        Just(ItemType::Relation),
    ]
}

fn base(kind: ItemType) -> impl Strategy<Value = OwnedObject> {
    (
        -1_000i64..10_000_000,
        any::<u32>(),
        any::<u32>(),
        prop_oneof![Just(0i64), 1i64..4_000_000_000],
        any::<u32>(),
        text(12),
        any::<bool>(),
        vec((key(), text(16)), 0..4),
    )
        .prop_map(
            move |(id, version, changeset, timestamp, uid, user, visible, tags)| OwnedObject {
                version,
                changeset: ChangesetId(changeset),
                timestamp: Timestamp(timestamp),
                uid: UserId(uid),
                user,
                visible,
                tags,
                ..OwnedObject::new(kind, id)
            },
        )
}

/// A node with a defined location.
pub fn arb_node() -> impl Strategy<Value = OwnedObject> {
    (base(ItemType::Node), location()).prop_map(|(mut node, location)| {
        node.location = location;
        node
    })
}

/// A way with up to eight node references.
pub fn arb_way() -> impl Strategy<Value = OwnedObject> {
    (base(ItemType::Way), vec(any::<i64>(), 0..8)).prop_map(|(mut way, nodes)| {
        way.nodes = nodes.into_iter().map(ObjectId).collect();
        way
    })
}

/// A relation with up to six members.
pub fn arb_relation() -> impl Strategy<Value = OwnedObject> {
    (
        base(ItemType::Relation),
        vec((member_kind(), any::<i64>(), text(10)), 0..6),
    )
        .prop_map(|(mut relation, members)| {
            relation.members = members
                .into_iter()
                .map(|(kind, id, role)| OwnedMember {
                    kind,
                    id: ObjectId(id),
                    role,
                })
                .collect();
            relation
        })
}

/// Any entity.
pub fn arb_object() -> impl Strategy<Value = OwnedObject> {
    prop_oneof![arb_node(), arb_way(), arb_relation()]
}

/// Up to `max` entities in document order.
pub fn arb_objects(max: usize) -> impl Strategy<Value = Vec<OwnedObject>> {
    vec(arb_object(), 0..=max)
}
