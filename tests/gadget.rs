//! Device behavior against real file descriptors.

mod common;

use common::{fast, Loopback};
use hidg::{Device, Error, GadgetConfig, HidgDevice, PumpState, ReadStats};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

#[test]
fn loopback_report_is_delivered_and_stream_stays_open() {
    let lb = Loopback::new();
    let dev = HidgDevice::open_with(&lb.path, fast()).unwrap();
    let rx = dev.read_ch();

    dev.write(&[0x00, 0x01, 0x02]).unwrap();

    let report = rx.recv_timeout(WAIT).expect("report");
    assert_eq!(report, [0x00, 0x01, 0x02]);
    assert_eq!(report.report_number(), Some(0x00));
    assert!(!rx.is_closed());
    assert_eq!(dev.state(), PumpState::Running);
    assert!(dev.read_error().is_none());
}

#[test]
fn reports_arrive_in_write_order() {
    let lb = Loopback::new();
    let dev = HidgDevice::open_with(&lb.path, fast()).unwrap();
    let rx = dev.read_ch();

    for i in 1..=5u8 {
        dev.write(&[i, i, i]).unwrap();
        // one report in the pipe at a time, so reads do not coalesce
        let report = rx.recv_timeout(WAIT).expect("report");
        assert_eq!(report, [i, i, i]);
    }
    assert_eq!(dev.stats().reports_queued, 5);
}

#[test]
fn close_ends_stream_with_closed_error() {
    let lb = Loopback::new();
    let dev = HidgDevice::open_with(&lb.path, fast()).unwrap();
    let rx = dev.read_ch();

    dev.close();

    assert_eq!(rx.recv_timeout(WAIT), None);
    assert!(rx.is_closed());
    assert!(matches!(dev.read_error(), Some(Error::Closed)));
    assert_eq!(dev.state(), PumpState::Terminated);
}

#[test]
fn write_fails_once_closed() {
    let lb = Loopback::new();
    let dev = HidgDevice::open_with(&lb.path, fast()).unwrap();
    dev.write(&[0x00, 0xFF]).unwrap();
    dev.close();
    assert!(matches!(dev.write(&[0x00, 0xFF]), Err(Error::Closed)));
}

#[test]
fn every_read_ch_handle_sees_one_queue() {
    let lb = Loopback::new();
    let dev = Arc::new(HidgDevice::open_with(&lb.path, fast()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dev = dev.clone();
            thread::spawn(move || dev.read_ch())
        })
        .collect();
    let streams: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    dev.write(&[0x02, 0x42]).unwrap();
    let first = streams[0].recv_timeout(WAIT).expect("report");
    assert_eq!(first, [0x02, 0x42]);

    // The report was consumed from the shared queue; no other handle has a copy.
    for rx in &streams {
        assert!(rx.try_recv().is_none());
    }
    assert_eq!(dev.stats().reports_read, 1);
}

#[test]
fn dropping_the_device_stops_the_pump() {
    let lb = Loopback::new();
    let dev = HidgDevice::open_with(&lb.path, fast()).unwrap();
    let rx = dev.read_ch();
    drop(dev);
    assert_eq!(rx.recv_timeout(WAIT), None);
    assert!(rx.is_closed());
}

#[test]
fn config_file_opens_the_device() {
    let lb = Loopback::new();
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("hidg.toml");
    std::fs::write(
        &cfg_path,
        format!(
            "path = {:?}\n\n[read]\nqueue_capacity = 4\npoll_interval_ms = 5\n",
            lb.path.to_str().unwrap()
        ),
    )
    .unwrap();

    let cfg = GadgetConfig::load(&cfg_path).unwrap();
    let dev = cfg.open().unwrap();
    assert_eq!(dev.path(), lb.path.as_path());
    assert_eq!(dev.read_ch().capacity(), 4);
}

#[test]
fn stats_serialize_as_json() {
    let lb = Loopback::new();
    let dev = HidgDevice::open_with(&lb.path, fast()).unwrap();
    let rx = dev.read_ch();
    dev.write(&[0x00, 0x07]).unwrap();
    rx.recv_timeout(WAIT).expect("report");

    let json = serde_json::to_value(dev.stats()).unwrap();
    assert_eq!(json["reports_read"], 1);
    assert_eq!(json["reports_queued"], 1);
    assert_eq!(json["reports_dropped"], 0);

    let back: ReadStats = serde_json::from_value(json).unwrap();
    assert_eq!(back, dev.stats());
}
