//! Benchmark profiles and utilities for the osmx reader.
//!
//! Provides synthetic documents shaped like real extracts:
//!
//! - [`reference_extract`]: 10K nodes, 1K ways, 100 relations
//! - [`stress_extract`]: 10x the reference size
//! - [`read_to_end`]: drive an [`XmlInput`] and count what it delivered

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt::Write as _;
use std::io::Cursor;

use osmx_xml::{ParseSummary, ReadError, ReaderConfig, XmlInput};

/// Build a synthetic extract with `nodes` nodes, one way per ten nodes and
/// one relation per ten ways.
///
/// Roughly a third of the nodes carry tags; ways reference ten
/// consecutive nodes; relations reference ten consecutive ways.
pub fn synthetic_extract(nodes: usize) -> String {
    let ways = nodes / 10;
    let relations = ways / 10;
    let mut out = String::with_capacity(nodes * 160);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<osm version=\"0.6\" generator=\"osmx-bench\">\n");
    out.push_str("  <bounds minlon=\"7.0\" minlat=\"50.0\" maxlon=\"8.0\" maxlat=\"51.0\"/>\n");

    for i in 0..nodes {
        let lon = 7.0 + (i % 1000) as f64 / 1000.0;
        let lat = 50.0 + (i / 1000) as f64 / 1000.0;
        let _ = write!(
            out,
            "  <node id=\"{}\" version=\"{}\" changeset=\"{}\" timestamp=\"2015-03-0{}T10:20:30Z\" uid=\"{}\" user=\"mapper{}\" lon=\"{lon:.7}\" lat=\"{lat:.7}\"",
            i + 1,
            i % 7 + 1,
            30_000_000 + i / 50,
            i % 9 + 1,
            i % 300 + 1,
            i % 300
        );
        if i % 3 == 0 {
            let _ = write!(
                out,
                ">\n    <tag k=\"amenity\" v=\"bench\"/>\n    <tag k=\"name\" v=\"Point {i} &amp; co\"/>\n  </node>\n"
            );
        } else {
            out.push_str("/>\n");
        }
    }

    for w in 0..ways {
        let _ = writeln!(out, "  <way id=\"{}\" version=\"1\" changeset=\"1\" user=\"mapper\">", w + 1);
        for n in 0..10 {
            let _ = writeln!(out, "    <nd ref=\"{}\"/>", w * 10 + n + 1);
        }
        out.push_str("    <tag k=\"highway\" v=\"residential\"/>\n  </way>\n");
    }

    for r in 0..relations {
        let _ = writeln!(out, "  <relation id=\"{}\" version=\"1\">", r + 1);
        for m in 0..10 {
            let _ = writeln!(
                out,
                "    <member type=\"way\" ref=\"{}\" role=\"{}\"/>",
                r * 10 + m + 1,
                if m == 0 { "outer" } else { "inner" }
            );
        }
        out.push_str("    <tag k=\"type\" v=\"multipolygon\"/>\n  </relation>\n");
    }

    out.push_str("</osm>\n");
    out
}

/// The reference benchmark document: 10K nodes, 1K ways, 100 relations.
pub fn reference_extract() -> String {
    synthetic_extract(10_000)
}

/// The stress benchmark document: 100K nodes, 10K ways, 1K relations.
pub fn stress_extract() -> String {
    synthetic_extract(100_000)
}

/// Read `doc` to the end, touching every record once.
///
/// Returns the producer's summary together with the number of records
/// the consumer saw.
pub fn read_to_end(doc: String, config: ReaderConfig) -> Result<(ParseSummary, u64), ReadError> {
    let mut input = XmlInput::open(Cursor::new(doc.into_bytes()), config)?;
    let mut seen = 0u64;
    while let Some(buffer) = input.next_buffer()? {
        for object in &buffer {
            object?;
            seen += 1;
        }
    }
    Ok((input.finish()?, seen))
}
