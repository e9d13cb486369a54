//! Property tests: every entity written to a document comes back out of
//! the reader, in order, whatever the buffer size.

use std::io::Cursor;

use osmx_test_utils::strategies::arb_objects;
use osmx_test_utils::{collect_objects, write_document};
use osmx_xml::{OverflowPolicy, ReaderConfig, XmlInput};
use proptest::prelude::*;

fn read_back(doc: String, config: ReaderConfig) -> (Vec<osmx_test_utils::OwnedObject>, usize) {
    let mut input = XmlInput::open(Cursor::new(doc.into_bytes()), config).unwrap();
    let mut buffers = Vec::new();
    while let Some(buffer) = input.next_buffer().unwrap() {
        assert_eq!(buffer.committed(), buffer.written());
        buffers.push(buffer);
    }
    let summary = input.finish().unwrap();
    assert_eq!(summary.buffers as usize, buffers.len());
    (collect_objects(&buffers), buffers.len())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn entities_survive_small_buffers(objects in arb_objects(40)) {
        let config = ReaderConfig {
            buffer_capacity: 1024,
            flush_threshold: Some(512),
            max_queue_size: 2,
            ..ReaderConfig::default()
        };
        let (read, _) = read_back(write_document(&objects), config);
        prop_assert_eq!(read, objects);
    }

    #[test]
    fn growing_buffers_hold_everything(objects in arb_objects(40)) {
        let config = ReaderConfig {
            buffer_capacity: 64,
            flush_threshold: Some(1),
            overflow: OverflowPolicy::Grow,
            ..ReaderConfig::default()
        };
        let (read, buffers) = read_back(write_document(&objects), config);
        prop_assert_eq!(read.len(), objects.len());
        prop_assert!(buffers <= objects.len());
    }
}
