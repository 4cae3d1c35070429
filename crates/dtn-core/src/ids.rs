//! Strongly typed identifier wrappers.
//!
//! Devices and runs are named by free-form strings (a hostname, a sweep
//! label), so unlike integer indices these wrappers own a `String`.  They
//! are `Ord + Hash` so they can be used as map keys without ceremony.

use std::fmt;

/// Generate a typed wrapper around an owned `String`.
macro_rules! text_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                $name(value.into())
            }

            #[inline(always)]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(value)
            }
        }
    };
}

text_id! {
    /// Name of the device running the experiment (usually its hostname).
    pub struct DeviceId;
}

text_id! {
    /// Label of one sweep combination, e.g. `10_30_14.28`.
    pub struct RunId;
}

// ── MessageId ─────────────────────────────────────────────────────────────────

/// Identifier of a synthetic message: `{device}_{counter}`.
///
/// The counter is assigned by the generating device and never reused, so the
/// pair is globally unique as long as device names are.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageId {
    pub device:  DeviceId,
    pub counter: u64,
}

impl MessageId {
    pub fn new(device: DeviceId, counter: u64) -> Self {
        Self { device, counter }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.device, self.counter)
    }
}
