//! Echo every input report back to the host as an output report.
//!
//! Usage: `cargo run --example echo -- <hidg device or config.toml>`

use hidg::{Device, GadgetConfig};

fn main() {
    let arg = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/hidg0".to_string());

    let cfg = if arg.ends_with(".toml") {
        GadgetConfig::load(&arg).expect("load config")
    } else {
        GadgetConfig::new(&arg)
    };

    let dev = cfg.open().expect("open gadget");
    println!("Opened {}", dev.path().display());

    // Unnumbered gadget: leading zero byte.
    if let Err(e) = dev.write(&[0x00, 0x00]) {
        eprintln!("initial write failed: {e}");
    }

    for report in dev.read_ch() {
        println!("<- {:02x?}", report.as_bytes());
        if let Err(e) = dev.write(&report) {
            eprintln!("echo failed: {e}");
            break;
        }
    }

    match dev.read_error() {
        Some(e) => println!("read stream ended: {e}"),
        None => println!("read stream still open"),
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&dev.stats()).expect("serialize stats")
    );
}
