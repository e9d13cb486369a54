//! Failure reporting: what the consumer sees when a read goes wrong.

use std::io::{self, Cursor, Read};

use osmx_arena::ArenaError;
use osmx_xml::{ReadError, ReaderConfig, XmlInput};

/// Consume `input` to completion, returning the buffers delivered before
/// the terminal result.
fn drive(doc: &str, config: ReaderConfig) -> (usize, Result<(), ReadError>) {
    let mut input = XmlInput::open(Cursor::new(doc.as_bytes().to_vec()), config).unwrap();
    let mut delivered = 0;
    loop {
        match input.next_buffer() {
            Ok(Some(_)) => delivered += 1,
            Ok(None) => return (delivered, Ok(())),
            Err(e) => return (delivered, Err(e)),
        }
    }
}

#[test]
fn unsupported_version_has_no_header_and_no_buffers() {
    let doc = r#"<osm version="0.5"><node id="1"/></osm>"#;
    let mut input = XmlInput::open(Cursor::new(doc.as_bytes().to_vec()), ReaderConfig::default()).unwrap();
    match input.header() {
        Err(e @ ReadError::UnsupportedVersion { .. }) => {
            assert_eq!(
                e.to_string(),
                "can only read version 0.6 files, found version \"0.5\""
            );
        }
        other => panic!("expected an unsupported version, got {other:?}"),
    }
    assert!(input.next_buffer().unwrap().is_none());
}

#[test]
fn unsupported_version_without_asking_for_header() {
    let (delivered, result) = drive(r#"<osmChange version="1.0"/>"#, ReaderConfig::default());
    assert_eq!(delivered, 0);
    assert!(matches!(result, Err(ReadError::UnsupportedVersion { .. })));
}

#[test]
fn structural_error_reports_line() {
    let doc = "<osm version=\"0.6\">\n<node id=\"1\">\n<tag k=\"a\" v=\"b\"><x/></tag>\n</node>\n</osm>";
    let (delivered, result) = drive(doc, ReaderConfig::default());
    assert_eq!(delivered, 0);
    match result {
        Err(ReadError::Structure { position, .. }) => assert_eq!(position.line, Some(3)),
        other => panic!("expected a structural error, got {other:?}"),
    }
}

#[test]
fn malformed_attribute_is_an_xml_error() {
    let doc = "<osm version=\"0.6\">\n<node id=1/>\n</osm>";
    let (_, result) = drive(doc, ReaderConfig::default());
    match result {
        Err(ReadError::Xml { position, .. }) => assert_eq!(position.line, Some(2)),
        other => panic!("expected an XML error, got {other:?}"),
    }
}

#[test]
fn truncated_input_is_reported() {
    let (_, result) = drive(r#"<osm version="0.6"><node id="1"/><node id="2">"#, ReaderConfig::default());
    assert!(matches!(result, Err(ReadError::Structure { .. })));
}

#[test]
fn buffers_before_the_error_are_delivered() {
    let mut doc = String::from("<osm version=\"0.6\">");
    for id in 1..=5 {
        doc.push_str(&format!("<node id=\"{id}\"/>"));
    }
    doc.push_str("<relation id=\"9\"><member type=\"area\" ref=\"1\" role=\"\"/></relation></osm>");
    let config = ReaderConfig {
        buffer_capacity: 256,
        flush_threshold: Some(220),
        ..ReaderConfig::default()
    };
    let (delivered, result) = drive(&doc, config);
    assert_eq!(delivered, 5);
    assert!(matches!(result, Err(ReadError::Structure { .. })));
}

#[test]
fn oversized_object_with_fixed_buffers() {
    let value = "x".repeat(400);
    let doc = format!(r#"<osm version="0.6"><node id="1"><tag k="k" v="{value}"/></node></osm>"#);
    let config = ReaderConfig {
        buffer_capacity: 256,
        ..ReaderConfig::default()
    };
    let (delivered, result) = drive(&doc, config);
    assert_eq!(delivered, 0);
    assert!(matches!(
        result,
        Err(ReadError::Arena(ArenaError::BufferFull { .. }))
    ));
}

#[test]
fn oversized_object_with_growing_buffers() {
    let value = "x".repeat(400);
    let doc = format!(r#"<osm version="0.6"><node id="1"><tag k="k" v="{value}"/></node></osm>"#);
    let config = ReaderConfig {
        buffer_capacity: 256,
        overflow: osmx_xml::OverflowPolicy::Grow,
        ..ReaderConfig::default()
    };
    let (delivered, result) = drive(&doc, config);
    assert_eq!(delivered, 1);
    assert!(result.is_ok());
}

struct FailingReader {
    head: Cursor<&'static [u8]>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.head.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "disk went away")),
            n => Ok(n),
        }
    }
}

#[test]
fn io_errors_surface_with_their_kind() {
    let reader = FailingReader {
        head: Cursor::new(&br#"<osm version="0.6"><node id="1"/>"#[..]),
    };
    let mut input = XmlInput::open(reader, ReaderConfig::default()).unwrap();
    let outcome = loop {
        match input.next_buffer() {
            Ok(Some(_)) => continue,
            other => break other,
        }
    };
    match outcome {
        Err(ReadError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}
