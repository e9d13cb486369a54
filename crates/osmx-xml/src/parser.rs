//! The parse state machine.
//!
//! [`XmlParser`] pulls element events from the tokenizer and turns them
//! into builder calls on the current [`Buffer`]. It runs on the producer
//! thread and talks to the consumer only through the buffer queue and the
//! header slot.
//!
//! ```text
//!   Root ──(osm / osmChange)──▶ Top ──(node / way / relation)──▶ Node | Way | Relation
//!    ▲                           ▲                                  │         ▲
//!    │ root end:                 │ entity end:                      │ child   │ child end
//!    │ publish header,           │ close lists, commit,             ▼         │
//!    │ push buffer + sentinel    │ maybe flush                     InObject ──┘
//!    └──────────── Top ──────────┘
//! ```

use std::borrow::Cow;
use std::io::{self, BufReader, Read};
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use osmx_arena::{
    ArenaError, Buffer, ObjectBuilder, RelationMemberListBuilder, TagListBuilder,
    WayNodeListBuilder,
};
use osmx_core::location::parse_degrees_lossy;
use osmx_core::{id::parse_u32_lossy, ChangesetId, ItemType, Location, ObjectId, Timestamp, UserId};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use smallvec::SmallVec;

use crate::config::{OverflowPolicy, ReaderConfig};
use crate::element::{Attr, Element};
use crate::error::{ReadError, TextPosition};
use crate::meta::{Header, MetaPublisher, SUPPORTED_VERSION};
use crate::queue::BufferProducer;
use crate::tracking::TrackingReader;

type Attrs<'e> = SmallVec<[(Attr, Cow<'e, str>); 8]>;

// ── ParseSummary ───────────────────────────────────────────────────

/// Counts reported by a finished parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Node records committed.
    pub nodes: u64,
    /// Way records committed.
    pub ways: u64,
    /// Relation records committed.
    pub relations: u64,
    /// Data buffers pushed, not counting the end-of-stream sentinel.
    pub buffers: u64,
}

impl ParseSummary {
    /// Total number of entity records.
    pub fn objects(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }

    fn count(&mut self, kind: ItemType) {
        match kind {
            ItemType::Node => self.nodes += 1,
            ItemType::Way => self.ways += 1,
            ItemType::Relation => self.relations += 1,
            _ => {}
        }
    }
}

// ── Context ────────────────────────────────────────────────────────

/// Where in the document the parser currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Context {
    Root,
    Top,
    Node,
    Way,
    Relation,
    InObject,
}

impl Context {
    fn for_object(kind: ItemType) -> Self {
        match kind {
            ItemType::Way => Self::Way,
            ItemType::Relation => Self::Relation,
            _ => Self::Node,
        }
    }
}

/// The entity being built and its open sub-lists.
///
/// At most one list of each kind is open at a time; adding an item of one
/// kind closes the lists of the other kinds first.
struct OpenObject {
    builder: ObjectBuilder,
    tags: Option<TagListBuilder>,
    way_nodes: Option<WayNodeListBuilder>,
    members: Option<RelationMemberListBuilder>,
}

impl OpenObject {
    fn new(builder: ObjectBuilder) -> Self {
        Self {
            builder,
            tags: None,
            way_nodes: None,
            members: None,
        }
    }

    fn close_tags(&mut self, buffer: &mut Buffer) -> Result<(), ArenaError> {
        match self.tags.take() {
            Some(list) => list.close(buffer),
            None => Ok(()),
        }
    }

    fn close_way_nodes(&mut self, buffer: &mut Buffer) -> Result<(), ArenaError> {
        match self.way_nodes.take() {
            Some(list) => list.close(buffer),
            None => Ok(()),
        }
    }

    fn close_members(&mut self, buffer: &mut Buffer) -> Result<(), ArenaError> {
        match self.members.take() {
            Some(list) => list.close(buffer),
            None => Ok(()),
        }
    }

    fn close(mut self, buffer: &mut Buffer) -> Result<usize, ArenaError> {
        self.close_tags(buffer)?;
        self.close_way_nodes(buffer)?;
        self.close_members(buffer)?;
        self.builder.close(buffer)
    }
}

fn structure(reason: impl Into<String>) -> ReadError {
    ReadError::Structure {
        reason: reason.into(),
        position: TextPosition::default(),
    }
}

fn xml_error(message: impl ToString) -> ReadError {
    ReadError::Xml {
        message: message.to_string(),
        position: TextPosition::default(),
    }
}

fn element_name(name: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(name)
}

fn attributes<'e>(e: &'e BytesStart<'_>) -> Result<Attrs<'e>, ReadError> {
    let mut attrs = Attrs::new();
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        let name = Attr::from_name(attr.key.as_ref());
        if name != Attr::Other {
            attrs.push((name, attr.unescape_value().map_err(xml_error)?));
        }
    }
    Ok(attrs)
}

// ── XmlParser ──────────────────────────────────────────────────────

/// Streaming OSM XML parser that fills record buffers.
///
/// Usually driven by [`XmlInput`](crate::XmlInput) on a background thread,
/// but [`run`](Self::run) can be called on any thread that owns the
/// producer ends.
pub struct XmlParser {
    buffer: Buffer,
    buffer_capacity: usize,
    flush_threshold: usize,
    read_chunk_size: usize,
    overflow: OverflowPolicy,
    producer: BufferProducer,
    publisher: Option<MetaPublisher>,
    header: Header,
    context: Context,
    last_context: Context,
    /// Open `delete` sections enclosing the cursor.
    delete_depth: usize,
    /// Open non-entity elements at top level (`bounds`, `delete`, `create`, ...).
    top_depth: usize,
    finished: bool,
    object: Option<OpenObject>,
    cancel: Arc<AtomicBool>,
    summary: ParseSummary,
}

impl XmlParser {
    /// Create a parser that pushes to `producer` and publishes the header
    /// to `publisher`.
    ///
    /// `config` is assumed to be valid.
    pub fn new(config: &ReaderConfig, producer: BufferProducer, publisher: MetaPublisher) -> Self {
        let mut parser = Self {
            buffer: Buffer::end_of_stream(),
            buffer_capacity: config.buffer_capacity,
            flush_threshold: config.resolved_flush_threshold(),
            read_chunk_size: config.read_chunk_size,
            overflow: config.overflow,
            producer,
            publisher: Some(publisher),
            header: Header::default(),
            context: Context::Root,
            last_context: Context::Root,
            delete_depth: 0,
            top_depth: 0,
            finished: false,
            object: None,
            cancel: Arc::new(AtomicBool::new(false)),
            summary: ParseSummary::default(),
        };
        parser.buffer = parser.fresh_buffer();
        parser
    }

    /// Use `cancel` as the cancellation flag.
    ///
    /// The flag is checked each time a buffer is handed off.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Parse `input` to the end of the document.
    ///
    /// On success the last item pushed is the end-of-stream sentinel. On
    /// error the current buffer is discarded and no sentinel is pushed.
    pub fn run<R: Read>(mut self, input: R) -> Result<ParseSummary, ReadError> {
        let tracking = TrackingReader::new(input);
        let mut reader = Reader::from_reader(BufReader::with_capacity(self.read_chunk_size, tracking));
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = true;

        let mut buf = Vec::new();
        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(quick_xml::Error::Io(e)) => {
                    return Err(ReadError::Io(io::Error::new(e.kind(), e.to_string())));
                }
                Err(e) => {
                    let position = reader.get_ref().get_ref().position(reader.error_position() as u64);
                    return Err(ReadError::Xml {
                        message: e.to_string(),
                        position,
                    });
                }
            };
            let step = match event {
                Event::Start(e) => self.start_element(&e),
                Event::Empty(e) => self
                    .start_element(&e)
                    .and_then(|()| self.end_element(e.name().as_ref())),
                Event::End(e) => self.end_element(e.name().as_ref()),
                Event::Eof => break,
                _ => Ok(()),
            };
            if let Err(e) = step {
                let offset = reader.buffer_position() as u64;
                return Err(self.fail(e, reader.get_ref().get_ref().position(offset)));
            }
            buf.clear();
        }

        if !self.finished {
            let offset = reader.get_ref().get_ref().bytes_read();
            let err = structure("unexpected end of document");
            return Err(self.fail(err, reader.get_ref().get_ref().position(offset)));
        }
        tracing::debug!(
            nodes = self.summary.nodes,
            ways = self.summary.ways,
            relations = self.summary.relations,
            buffers = self.summary.buffers,
            "document finished"
        );
        Ok(self.summary)
    }

    fn fresh_buffer(&self) -> Buffer {
        match self.overflow {
            OverflowPolicy::Fail => Buffer::new(self.buffer_capacity),
            OverflowPolicy::Grow => Buffer::with_auto_grow(self.buffer_capacity),
        }
    }

    /// Discard the partial record and attach `position` to the error.
    fn fail(&mut self, err: ReadError, at: TextPosition) -> ReadError {
        self.buffer.rollback();
        self.object = None;
        match err {
            ReadError::Structure { reason, .. } => ReadError::Structure {
                reason,
                position: at,
            },
            ReadError::Xml { message, .. } => ReadError::Xml {
                message,
                position: at,
            },
            other => other,
        }
    }

    // ── start tags ──────────────────────────────────────────────────

    fn start_element(&mut self, e: &BytesStart<'_>) -> Result<(), ReadError> {
        if self.finished {
            return Err(structure("content after the end of the document"));
        }
        let name = e.name();
        let element = Element::from_name(name.as_ref());
        match self.context {
            Context::Root => self.start_document(element, name.as_ref(), e),
            Context::Top => self.start_top_level(element, e),
            Context::Node | Context::Way | Context::Relation => {
                self.last_context = self.context;
                self.context = Context::InObject;
                match (element, self.last_context) {
                    (Element::Tag, _) => self.add_tag(e),
                    (Element::Nd, Context::Way) => self.add_way_node(e),
                    (Element::Member, Context::Relation) => self.add_member(e),
                    _ => Ok(()),
                }
            }
            Context::InObject => Err(structure(format!(
                "unexpected <{}> nested inside an object child",
                element_name(name.as_ref())
            ))),
        }
    }

    fn start_document(
        &mut self,
        element: Element,
        name: &[u8],
        e: &BytesStart<'_>,
    ) -> Result<(), ReadError> {
        if !element.is_root() {
            return Err(structure(format!(
                "expected <osm> or <osmChange> as document root, found <{}>",
                element_name(name)
            )));
        }
        for (attr, value) in attributes(e)? {
            match attr {
                Attr::Version => {
                    if value != SUPPORTED_VERSION {
                        return Err(ReadError::UnsupportedVersion {
                            found: value.into_owned(),
                        });
                    }
                    self.header.version = value.into_owned();
                }
                Attr::Generator => self.header.generator = Some(value.into_owned()),
                _ => {}
            }
        }
        self.header.has_multiple_object_versions = element == Element::OsmChange;
        self.context = Context::Top;
        tracing::debug!(root = %element_name(name), "document started");
        Ok(())
    }

    fn start_top_level(&mut self, element: Element, e: &BytesStart<'_>) -> Result<(), ReadError> {
        if let Some(kind) = element.object_kind() {
            return self.open_object(kind, e);
        }
        match element {
            Element::Bounds => self.extend_bounds(e)?,
            Element::Delete => self.delete_depth += 1,
            _ => {}
        }
        self.top_depth += 1;
        Ok(())
    }

    fn extend_bounds(&mut self, e: &BytesStart<'_>) -> Result<(), ReadError> {
        let mut min = Location::undefined();
        let mut max = Location::undefined();
        for (attr, value) in attributes(e)? {
            match attr {
                Attr::MinLon => min.set_lon(parse_degrees_lossy(&value)),
                Attr::MinLat => min.set_lat(parse_degrees_lossy(&value)),
                Attr::MaxLon => max.set_lon(parse_degrees_lossy(&value)),
                Attr::MaxLat => max.set_lat(parse_degrees_lossy(&value)),
                _ => {}
            }
        }
        self.header.bbox.extend(min).extend(max);
        Ok(())
    }

    fn open_object(&mut self, kind: ItemType, e: &BytesStart<'_>) -> Result<(), ReadError> {
        if let Some(publisher) = self.publisher.take() {
            publisher.publish(self.header.clone());
        }
        let attrs = attributes(e)?;
        let mut builder = ObjectBuilder::open(&mut self.buffer, kind)?;
        let mut user = "";
        {
            let mut object = builder.object_mut(&mut self.buffer);
            for (attr, value) in &attrs {
                match attr {
                    Attr::Id => {
                        object.set_id(ObjectId::parse_lossy(value));
                    }
                    Attr::Version => {
                        object.set_version(parse_u32_lossy(value));
                    }
                    Attr::Changeset => {
                        object.set_changeset(ChangesetId::parse_lossy(value));
                    }
                    Attr::Timestamp => {
                        object.set_timestamp(Timestamp::parse_lossy(value));
                    }
                    Attr::Uid => {
                        object.set_uid(UserId::parse_lossy(value));
                    }
                    Attr::Visible => {
                        object.set_visible(value != "false");
                    }
                    Attr::Lon => {
                        object.set_lon(parse_degrees_lossy(value));
                    }
                    Attr::Lat => {
                        object.set_lat(parse_degrees_lossy(value));
                    }
                    Attr::User => user = value.as_ref(),
                    _ => {}
                }
            }
            if self.delete_depth > 0 {
                object.set_visible(false);
            }
        }
        builder.set_user(&mut self.buffer, user)?;
        self.object = Some(OpenObject::new(builder));
        self.context = Context::for_object(kind);
        Ok(())
    }

    fn add_tag(&mut self, e: &BytesStart<'_>) -> Result<(), ReadError> {
        let attrs = attributes(e)?;
        let mut key = "";
        let mut value = "";
        for (attr, text) in &attrs {
            match attr {
                Attr::Key => key = text.as_ref(),
                Attr::Value => value = text.as_ref(),
                _ => {}
            }
        }
        let buffer = &mut self.buffer;
        let object = self
            .object
            .as_mut()
            .ok_or_else(|| structure("tag without an open object"))?;
        object.close_way_nodes(buffer)?;
        object.close_members(buffer)?;
        if object.tags.is_none() {
            object.tags = Some(TagListBuilder::open(buffer, &mut object.builder)?);
        }
        if let Some(tags) = object.tags.as_mut() {
            tags.add_tag(buffer, key, value)?;
        }
        Ok(())
    }

    fn add_way_node(&mut self, e: &BytesStart<'_>) -> Result<(), ReadError> {
        let node_ref = attributes(e)?
            .into_iter()
            .find(|(attr, _)| *attr == Attr::Ref)
            .map(|(_, text)| ObjectId::parse_lossy(&text));
        let buffer = &mut self.buffer;
        let object = self
            .object
            .as_mut()
            .ok_or_else(|| structure("nd without an open object"))?;
        object.close_tags(buffer)?;
        if object.way_nodes.is_none() {
            object.way_nodes = Some(WayNodeListBuilder::open(buffer, &mut object.builder)?);
        }
        if let (Some(list), Some(node_ref)) = (object.way_nodes.as_mut(), node_ref) {
            list.add_node_ref(buffer, node_ref)?;
        }
        Ok(())
    }

    fn add_member(&mut self, e: &BytesStart<'_>) -> Result<(), ReadError> {
        let attrs = attributes(e)?;
        let mut kind = None;
        let mut member_ref = ObjectId(0);
        let mut role = "";
        for (attr, text) in &attrs {
            match attr {
                Attr::Type => {
                    kind = Some(ItemType::from_member_type(text).ok_or_else(|| {
                        structure(format!("invalid member type {text:?}"))
                    })?);
                }
                Attr::Ref => member_ref = ObjectId::parse_lossy(text),
                Attr::Role => role = text.as_ref(),
                _ => {}
            }
        }
        let kind = kind.ok_or_else(|| structure("member without a type"))?;
        let buffer = &mut self.buffer;
        let object = self
            .object
            .as_mut()
            .ok_or_else(|| structure("member without an open object"))?;
        object.close_tags(buffer)?;
        if object.members.is_none() {
            object.members = Some(RelationMemberListBuilder::open(buffer, &mut object.builder)?);
        }
        if let Some(list) = object.members.as_mut() {
            list.add_member(buffer, kind, member_ref, role)?;
        }
        Ok(())
    }

    // ── end tags ────────────────────────────────────────────────────

    fn end_element(&mut self, name: &[u8]) -> Result<(), ReadError> {
        match self.context {
            Context::Root => Err(structure(format!(
                "unexpected end tag </{}>",
                element_name(name)
            ))),
            Context::Top if self.top_depth > 0 => {
                self.top_depth -= 1;
                if Element::from_name(name) == Element::Delete {
                    self.delete_depth -= 1;
                }
                Ok(())
            }
            Context::Top => self.finish_document(),
            Context::Node | Context::Way | Context::Relation => self.close_object(),
            Context::InObject => {
                self.context = self.last_context;
                Ok(())
            }
        }
    }

    fn close_object(&mut self) -> Result<(), ReadError> {
        let object = self
            .object
            .take()
            .ok_or_else(|| structure("object end without an open object"))?;
        let kind = object.builder.kind();
        let offset = object.close(&mut self.buffer)?;
        self.buffer.commit();
        self.summary.count(kind);
        tracing::trace!(%kind, offset, "committed object");
        self.context = Context::Top;
        if self.buffer.remaining() < self.flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ReadError> {
        if self.cancel.load(Ordering::Acquire) {
            tracing::debug!("read cancelled");
            return Err(ReadError::Cancelled);
        }
        let fresh = self.fresh_buffer();
        let full = mem::replace(&mut self.buffer, fresh);
        tracing::debug!(
            committed = full.committed(),
            queued = self.producer.len(),
            "handing off buffer"
        );
        self.push(full)
    }

    fn push(&mut self, buffer: Buffer) -> Result<(), ReadError> {
        let is_data = !buffer.is_end_of_stream();
        self.producer
            .push(buffer)
            .map_err(|_| ReadError::Disconnected)?;
        if is_data {
            self.summary.buffers += 1;
        }
        Ok(())
    }

    fn finish_document(&mut self) -> Result<(), ReadError> {
        if let Some(publisher) = self.publisher.take() {
            publisher.publish(self.header.clone());
        }
        let last = mem::replace(&mut self.buffer, Buffer::end_of_stream());
        if !last.is_empty() {
            self.push(last)?;
        }
        self.push(Buffer::end_of_stream())?;
        tracing::debug!("end of stream");
        self.context = Context::Root;
        self.finished = true;
        Ok(())
    }
}
