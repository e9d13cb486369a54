//! Hand-written fixture documents.
//!
//! - [`SMALL_EXTRACT`]: bounds, two tagged nodes, a way and a relation.
//! - [`CHANGE_FILE`]: an `osmChange` with create, modify and delete sections.
//! - [`EMPTY_EXTRACT`]: bounds but no entities.
//! - [`INTERLEAVED_RELATION`]: tags before and after the member list.

/// A small extract exercising every entity kind.
pub const SMALL_EXTRACT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="fixture">
  <bounds minlon="7.0" minlat="50.0" maxlon="7.1" maxlat="50.1"/>
  <node id="1" version="2" changeset="10" timestamp="2012-06-01T12:00:00Z" uid="7" user="ann" lon="7.05" lat="50.05">
    <tag k="amenity" v="cafe"/>
    <tag k="name" v="Caf&#233; &amp; Bar"/>
  </node>
  <node id="2" version="1" changeset="10" timestamp="2012-06-01T12:00:01Z" uid="7" user="ann" lon="7.06" lat="50.06"/>
  <way id="3" version="1" changeset="11" timestamp="2012-06-02T08:30:00Z" uid="8" user="bob">
    <nd ref="1"/>
    <nd ref="2"/>
    <nd ref="1"/>
    <tag k="highway" v="footway"/>
  </way>
  <relation id="4" version="5" changeset="12" timestamp="2012-06-03T00:00:00Z" uid="8" user="bob">
    <member type="way" ref="3" role="outer"/>
    <member type="node" ref="1" role=""/>
    <tag k="type" v="multipolygon"/>
  </relation>
</osm>
"#;

/// A change file: one created, one modified and two deleted objects.
pub const CHANGE_FILE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osmChange version="0.6" generator="fixture">
  <create>
    <node id="-1" version="1" lon="1.0" lat="1.0"/>
  </create>
  <modify>
    <way id="20" version="3"><nd ref="21"/><nd ref="22"/></way>
  </modify>
  <delete>
    <node id="21" version="4" visible="true" lon="1.5" lat="1.5"/>
    <relation id="30" version="2"/>
  </delete>
</osmChange>
"#;

/// Bounds and no entities.
pub const EMPTY_EXTRACT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="fixture">
  <bounds minlon="-1" minlat="-1" maxlon="1" maxlat="1"/>
</osm>
"#;

/// A relation whose tags surround its members.
pub const INTERLEAVED_RELATION: &str = r#"<osm version="0.6">
  <relation id="1">
    <tag k="type" v="route"/>
    <member type="node" ref="10" role="stop"/>
    <member type="way" ref="11" role=""/>
    <tag k="route" v="bus"/>
  </relation>
</osm>
"#;
