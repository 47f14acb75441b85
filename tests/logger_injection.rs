mod support;

use std::sync::Arc;
use std::time::Duration;
use support::CaptureLogger;
use waypoint_sim::adapters::outbound::{init_buffered_logger, init_noop_logger, MultiLogger};
use waypoint_sim::domains::logger::DomainLogger;

#[tokio::test]
async fn test_buffered_and_noop_logger() {
    let capture = Arc::new(CaptureLogger::new());
    let bridge = capture.clone() as Arc<dyn DomainLogger>;

    // Create a buffered logger that forwards to the bridge with small capacity
    let buffered = init_buffered_logger(bridge, 8);

    buffered.info("one");
    buffered.warn("two");
    buffered.error("three");

    // Give the background task a moment
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(capture.contains("INFO:one"));
    assert!(capture.contains("WARN:two"));
    assert!(capture.contains("ERR:three"));
    assert_eq!(buffered.dropped(), 0);

    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}

#[tokio::test]
async fn test_buffered_logger_drops_when_full() {
    let capture = Arc::new(CaptureLogger::new());
    let buffered = init_buffered_logger(capture.clone(), 1);

    // The forwarding task cannot run until this task yields.
    buffered.info("kept");
    buffered.info("dropped-1");
    buffered.info("dropped-2");
    assert_eq!(buffered.dropped(), 2);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(capture.contains("INFO:kept"));
    assert!(!capture.contains("dropped-1"));
}

#[test]
fn test_multi_logger_forwards_to_both() {
    let primary = Arc::new(CaptureLogger::new());
    let secondary = Arc::new(CaptureLogger::new());
    let multi = MultiLogger::new(primary.clone(), Some(secondary.clone() as Arc<dyn DomainLogger>));

    multi.warn("crossing blocked");

    assert!(primary.contains("WARN:crossing blocked"));
    assert!(secondary.contains("WARN:crossing blocked"));

    let single = MultiLogger::new(primary.clone(), None);
    single.error("only primary");
    assert!(primary.contains("ERR:only primary"));
    assert!(!secondary.contains("only primary"));
}
