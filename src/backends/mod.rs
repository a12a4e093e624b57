//! Device backends for `hidg`.
//!
//! Implementations of [`Device`](crate::device::Device) for platform device
//! interfaces. Only the Linux gadget character device (`/dev/hidgN`) exists
//! today.
//!
//! `hidg` talks to a gadget that already exists; it does not create or
//! configure gadgets (configfs, report descriptors).

pub mod gadget;

pub use gadget::{open, HidgDevice};
