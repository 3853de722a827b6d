//! Device record types for button-map persistence

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::storage_utils::format_hex_string;

/// USB hardware identity of a device
///
/// Vendor and product IDs only make sense as a pair, so a device either
/// knows both or neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum HardwareId {
    /// VID/PID not reported by the driver
    #[default]
    Unknown,
    /// Both VID and PID are known
    Known { vendor_id: u16, product_id: u16 },
}

impl HardwareId {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self::Known {
            vendor_id,
            product_id,
        }
    }

    /// Build an identity from optionally-present halves; a lone half is dropped
    pub fn from_parts(vendor_id: Option<u16>, product_id: Option<u16>) -> Self {
        match (vendor_id, product_id) {
            (Some(vendor_id), Some(product_id)) => Self::new(vendor_id, product_id),
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known { .. })
    }

    pub fn vendor_id(&self) -> Option<u16> {
        match self {
            Self::Known { vendor_id, .. } => Some(*vendor_id),
            Self::Unknown => None,
        }
    }

    pub fn product_id(&self) -> Option<u16> {
        match self {
            Self::Known { product_id, .. } => Some(*product_id),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for HardwareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known {
                vendor_id,
                product_id,
            } => write!(
                f,
                "{}:{}",
                format_hex_string(*vendor_id),
                format_hex_string(*product_id)
            ),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Calibration of a single axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisProperties {
    /// Driver axis index
    pub index: u32,
    /// Rest position reported by the axis
    pub center: i32,
    /// Deflection span from center to either extreme
    pub range: u32,
}

impl AxisProperties {
    pub fn new(index: u32, center: i32, range: u32) -> Self {
        Self {
            index,
            center,
            range,
        }
    }
}

/// Per-axis calibration entries belonging to a device, keyed by axis index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    axes: BTreeMap<u32, AxisProperties>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an axis under its own index, replacing any previous entry
    pub fn set_axis(&mut self, axis: AxisProperties) {
        self.axes.insert(axis.index, axis);
    }

    pub fn axis(&self, index: u32) -> Option<&AxisProperties> {
        self.axes.get(&index)
    }

    /// Axes in ascending index order
    pub fn axes(&self) -> impl Iterator<Item = &AxisProperties> {
        self.axes.values()
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn reset(&mut self) {
        self.axes.clear();
    }
}

/// An input device as recorded in a button map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Name reported by the driver
    pub name: String,
    /// Driver/API that exposes the device (e.g. "xpad", "linux", "xinput")
    pub provider: String,
    /// USB vendor/product pair
    #[serde(default)]
    pub hardware_id: HardwareId,
    #[serde(default)]
    pub button_count: u32,
    #[serde(default)]
    pub hat_count: u32,
    #[serde(default)]
    pub axis_count: u32,
    /// Distinguishes multiple identical devices
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub configuration: Configuration,
}

impl Device {
    /// Create a device with only its identity strings set
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            ..Self::default()
        }
    }

    /// Return to the empty default state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A device needs a name and provider to be looked up again later
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.provider.is_empty()
    }

    pub fn is_vid_pid_known(&self) -> bool {
        self.hardware_id.is_known()
    }

    /// Whether two records describe the same physical device slot
    ///
    /// Capability counts and calibration are ignored.
    pub fn same_identity(&self, other: &Device) -> bool {
        self.name == other.name
            && self.provider == other.provider
            && self.hardware_id == other.hardware_id
            && self.index == other.index
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) [{}] {} buttons, {} hats, {} axes",
            self.name, self.provider, self.hardware_id, self.button_count, self.hat_count, self.axis_count
        )?;
        if self.index != 0 {
            write!(f, " #{}", self.index)?;
        }
        if !self.configuration.is_empty() {
            write!(f, ", {} calibrated", self.configuration.len())?;
        }
        Ok(())
    }
}
