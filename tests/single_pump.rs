//! Counts live read threads, so it runs alone in its own test binary.

mod common;

use common::{fast, Loopback};
use hidg::{Device, HidgDevice};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn pump_threads() -> usize {
    std::fs::read_dir("/proc/self/task")
        .unwrap()
        .filter_map(|task| std::fs::read_to_string(task.ok()?.path().join("comm")).ok())
        .filter(|comm| comm.trim_end() == "hidg-read")
        .count()
}

#[test]
fn concurrent_first_read_ch_starts_one_pump() {
    let lb = Loopback::new();
    let dev = Arc::new(HidgDevice::open_with(&lb.path, fast()).unwrap());
    assert_eq!(pump_threads(), 0);

    let barrier = Arc::new(Barrier::new(16));
    let callers: Vec<_> = (0..16)
        .map(|_| {
            let dev = dev.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                dev.read_ch()
            })
        })
        .collect();
    let streams: Vec<_> = callers.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(pump_threads(), 1);

    dev.close();
    assert_eq!(streams[0].recv_timeout(Duration::from_secs(2)), None);
    assert!(streams.iter().all(|rx| rx.is_closed()));

    // the detached thread is gone shortly after it closes the queue
    let mut remaining = pump_threads();
    for _ in 0..200 {
        if remaining == 0 {
            break;
        }
        thread::sleep(Duration::from_millis(10));
        remaining = pump_threads();
    }
    assert_eq!(remaining, 0);
}
