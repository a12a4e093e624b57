//! Inbound HID reports.
//!
//! A [`Report`] is the byte sequence returned by one read of the gadget device.
//! Its contents are opaque: when the gadget uses numbered reports, the first
//! byte is the report number, and the host and the application agree on that
//! out of band. Nothing here validates the layout.
//!
//! Outbound reports are plain `&[u8]` passed to
//! [`Device::write`](crate::device::Device::write), with the same leading-byte
//! convention (zero when the gadget does not use numbered reports).

use std::fmt;
use std::ops::Deref;

/// One input report as read from the device.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Report(Vec<u8>);

impl Report {
    /// Wrap raw report bytes.
    #[inline]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The leading byte, which is the report number on numbered gadgets.
    ///
    /// `None` for an empty report.
    #[inline]
    pub fn report_number(&self) -> Option<u8> {
        self.0.first().copied()
    }

    /// Split into `(leading byte, remaining bytes)`.
    ///
    /// Only meaningful for gadgets that use numbered reports. An empty report
    /// splits into `(0, [])`.
    #[inline]
    pub fn split_numbered(&self) -> (u8, &[u8]) {
        match self.0.split_first() {
            Some((&number, payload)) => (number, payload),
            None => (0, &[]),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Report {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Report {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Report {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Report {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Report> for Vec<u8> {
    fn from(report: Report) -> Self {
        report.0
    }
}

impl PartialEq<[u8]> for Report {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Report {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.0 == other
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Report({:02x?})", self.0)
    }
}
