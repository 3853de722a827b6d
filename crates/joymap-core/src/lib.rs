//! joymap Core - Device records and button-map XML persistence
//!
//! This crate provides the foundational pieces for storing joystick mapping
//! metadata:
//! - Device records with identity, capability counts and axis calibration
//! - A narrow markup-tree interface plus an in-memory XML element tree
//! - Converters between device records and `<device>` elements
//! - Button-map documents holding many devices

pub mod buttonmap;
pub mod device;
pub mod device_xml;
pub mod error;
pub mod markup;
pub mod storage_utils;

pub use buttonmap::ButtonMap;
pub use device::{AxisProperties, Configuration, Device, HardwareId};
pub use error::ButtonMapError;
pub use markup::{Element, MarkupNode};
