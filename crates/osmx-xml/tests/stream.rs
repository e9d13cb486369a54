//! Ordering and flow-control guarantees of the buffer stream.

use std::io::Cursor;
use std::thread;
use std::time::Duration;

use osmx_arena::Buffer;
use osmx_test_utils::{collect_objects, node_document};
use osmx_xml::{buffer_queue, header_slot, ReadError, ReaderConfig, XmlInput, XmlParser};

/// One node per buffer.
fn tiny_buffers() -> ReaderConfig {
    ReaderConfig {
        buffer_capacity: 256,
        flush_threshold: Some(220),
        ..ReaderConfig::default()
    }
}

#[test]
fn sentinel_is_last_and_unique() {
    let (tx, rx) = buffer_queue(1024);
    let (publisher, _subscriber) = header_slot();
    let summary = XmlParser::new(&tiny_buffers(), tx, publisher)
        .run(node_document(10).as_bytes())
        .unwrap();
    let buffers: Vec<Buffer> = std::iter::from_fn(|| rx.try_pop()).collect();
    assert_eq!(summary.buffers, 10);
    assert_eq!(buffers.len(), 11);
    let sentinels: Vec<_> = buffers
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_end_of_stream())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(sentinels, vec![10]);
}

#[test]
fn header_is_visible_before_first_buffer() {
    let (tx, rx) = buffer_queue(1);
    let (publisher, subscriber) = header_slot();
    let producer = thread::spawn(move || {
        XmlParser::new(&tiny_buffers(), tx, publisher).run(Cursor::new(node_document(20).into_bytes()))
    });
    let first = rx.pop().unwrap();
    assert!(!first.is_end_of_stream());
    assert!(subscriber.try_take().is_some());
    while rx.pop().is_some() {}
    assert_eq!(producer.join().unwrap().unwrap().nodes, 20);
}

#[test]
fn producer_stalls_on_full_queue() {
    let (tx, rx) = buffer_queue(2);
    let (publisher, _subscriber) = header_slot();
    let producer = thread::spawn(move || {
        XmlParser::new(&tiny_buffers(), tx, publisher).run(Cursor::new(node_document(50).into_bytes()))
    });
    thread::sleep(Duration::from_millis(100));
    assert!(!producer.is_finished());
    assert_eq!(rx.len(), 2);

    let mut received = 0;
    let mut sentinel = false;
    while let Some(buffer) = rx.pop() {
        assert!(rx.len() <= 2);
        if buffer.is_end_of_stream() {
            sentinel = true;
        } else {
            received += 1;
        }
    }
    assert!(sentinel);
    assert_eq!(received, 50);
    assert_eq!(producer.join().unwrap().unwrap().buffers, 50);
}

#[test]
fn buffers_preserve_document_order() {
    let mut input = XmlInput::open(Cursor::new(node_document(200).into_bytes()), tiny_buffers()).unwrap();
    let mut buffers = Vec::new();
    while let Some(buffer) = input.next_buffer().unwrap() {
        buffers.push(buffer);
    }
    let ids: Vec<_> = collect_objects(&buffers).iter().map(|o| o.id.0).collect();
    assert_eq!(ids, (1..=200).collect::<Vec<_>>());
}

#[test]
fn cancel_stops_a_blocked_reader() {
    let config = ReaderConfig {
        max_queue_size: 1,
        ..tiny_buffers()
    };
    let mut input = XmlInput::open(Cursor::new(node_document(5_000).into_bytes()), config).unwrap();
    assert!(input.next_buffer().unwrap().is_some());
    input.cancel();
    let outcome = loop {
        match input.next_buffer() {
            Ok(Some(_)) => continue,
            other => break other,
        }
    };
    assert!(matches!(outcome, Err(ReadError::Cancelled)));
}

#[test]
fn dropping_the_consumer_mid_stream_releases_the_producer() {
    let (tx, rx) = buffer_queue(1);
    let (publisher, _subscriber) = header_slot();
    let producer = thread::spawn(move || {
        XmlParser::new(&tiny_buffers(), tx, publisher).run(Cursor::new(node_document(100).into_bytes()))
    });
    assert!(rx.pop().is_some());
    drop(rx);
    assert!(matches!(
        producer.join().unwrap(),
        Err(ReadError::Disconnected)
    ));
}
