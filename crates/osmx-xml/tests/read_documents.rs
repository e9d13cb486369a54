//! End-to-end reads of fixture documents through `XmlInput`.

use std::io::Cursor;

use osmx_arena::Buffer;
use osmx_core::{ItemType, Location, ObjectId, Timestamp};
use osmx_test_utils::fixtures::{CHANGE_FILE, EMPTY_EXTRACT, INTERLEAVED_RELATION, SMALL_EXTRACT};
use osmx_test_utils::{collect_objects, OwnedMember};
use osmx_xml::{ReaderConfig, XmlInput};

fn read_all(doc: &str, config: ReaderConfig) -> (osmx_xml::Header, Vec<Buffer>) {
    let mut input = XmlInput::open(Cursor::new(doc.as_bytes().to_vec()), config).unwrap();
    let header = input.header().unwrap().clone();
    let mut buffers = Vec::new();
    while let Some(buffer) = input.next_buffer().unwrap() {
        buffers.push(buffer);
    }
    input.finish().unwrap();
    (header, buffers)
}

#[test]
fn small_extract_header() {
    let (header, _) = read_all(SMALL_EXTRACT, ReaderConfig::default());
    assert_eq!(header.version, "0.6");
    assert_eq!(header.generator.as_deref(), Some("fixture"));
    assert!(!header.has_multiple_object_versions);
    assert_eq!(header.bbox.bottom_left(), Location::new(7.0, 50.0));
    assert_eq!(header.bbox.top_right(), Location::new(7.1, 50.1));
}

#[test]
fn small_extract_objects() {
    let (_, buffers) = read_all(SMALL_EXTRACT, ReaderConfig::default());
    assert_eq!(buffers.len(), 1);
    let objects = collect_objects(&buffers);
    let kinds: Vec<_> = objects.iter().map(|o| (o.kind, o.id.0)).collect();
    assert_eq!(
        kinds,
        vec![
            (ItemType::Node, 1),
            (ItemType::Node, 2),
            (ItemType::Way, 3),
            (ItemType::Relation, 4)
        ]
    );

    let cafe = &objects[0];
    assert_eq!(cafe.version, 2);
    assert_eq!(cafe.changeset.0, 10);
    assert_eq!(cafe.uid.0, 7);
    assert_eq!(cafe.user, "ann");
    assert_eq!(cafe.timestamp, Timestamp::parse("2012-06-01T12:00:00Z").unwrap());
    assert_eq!(cafe.location, Location::new(7.05, 50.05));
    assert_eq!(
        cafe.tags,
        vec![
            ("amenity".to_owned(), "cafe".to_owned()),
            ("name".to_owned(), "Café & Bar".to_owned()),
        ]
    );

    let way = &objects[2];
    assert_eq!(way.nodes, vec![ObjectId(1), ObjectId(2), ObjectId(1)]);
    assert!(!way.location.is_defined());
    assert_eq!(way.tags.len(), 1);

    let relation = &objects[3];
    assert_eq!(
        relation.members,
        vec![
            OwnedMember {
                kind: ItemType::Way,
                id: ObjectId(3),
                role: "outer".into()
            },
            OwnedMember {
                kind: ItemType::Node,
                id: ObjectId(1),
                role: String::new()
            },
        ]
    );
}

#[test]
fn every_buffer_is_fully_committed() {
    let config = ReaderConfig {
        buffer_capacity: 512,
        flush_threshold: Some(300),
        ..ReaderConfig::default()
    };
    let (_, buffers) = read_all(SMALL_EXTRACT, config);
    assert!(buffers.len() > 1);
    for buffer in &buffers {
        assert!(!buffer.is_empty());
        assert_eq!(buffer.committed(), buffer.written());
        assert!(!buffer.has_uncommitted());
    }
    assert_eq!(collect_objects(&buffers).len(), 4);
}

#[test]
fn change_file_marks_deletions() {
    let (header, buffers) = read_all(CHANGE_FILE, ReaderConfig::default());
    assert!(header.has_multiple_object_versions);
    let visible: Vec<_> = collect_objects(&buffers)
        .iter()
        .map(|o| (o.id.0, o.visible))
        .collect();
    assert_eq!(visible, vec![(-1, true), (20, true), (21, false), (30, false)]);
}

#[test]
fn empty_extract_still_publishes_header() {
    let (header, buffers) = read_all(EMPTY_EXTRACT, ReaderConfig::default());
    assert!(buffers.is_empty());
    assert_eq!(header.bbox.bottom_left(), Location::new(-1.0, -1.0));
}

#[test]
fn interleaved_tags_read_as_one_list() {
    let (_, buffers) = read_all(INTERLEAVED_RELATION, ReaderConfig::default());
    let relation = &collect_objects(&buffers)[0];
    assert_eq!(
        relation.tags,
        vec![
            ("type".to_owned(), "route".to_owned()),
            ("route".to_owned(), "bus".to_owned()),
        ]
    );
    assert_eq!(relation.members.len(), 2);
    assert_eq!(relation.members[0].role, "stop");
}

#[test]
fn missing_version_is_accepted() {
    let (header, buffers) = read_all(r#"<osm><node id="5"/></osm>"#, ReaderConfig::default());
    assert_eq!(header.version, "");
    assert_eq!(collect_objects(&buffers)[0].id, ObjectId(5));
}

#[test]
fn missing_user_is_empty() {
    let (_, buffers) = read_all(
        r#"<osm version="0.6"><node id="5" uid="3"/></osm>"#,
        ReaderConfig::default(),
    );
    let node = &collect_objects(&buffers)[0];
    assert_eq!(node.user, "");
    assert_eq!(node.uid.0, 3);
}
