//! Button-map documents: a `<buttonmap>` root holding many `<device>` entries
//!
//! This is the persistence layer on top of [`crate::device_xml`]. Loading is
//! tolerant per device (a bad entry is dropped and counted); saving is not
//! (any device failure fails the whole save).

use std::path::Path;
use tracing::{debug, info, warn};

use crate::device::Device;
use crate::device_xml::{self, ELEM_DEVICE};
use crate::error::ButtonMapError;
use crate::markup::{Element, MarkupNode};

pub const ELEM_BUTTONMAP: &str = "buttonmap";

/// Default spaces per nesting level when writing
pub const DEFAULT_INDENT: usize = 2;

/// A set of device records stored together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonMap {
    devices: Vec<Device>,
    skipped: usize,
}

impl ButtonMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a button map from XML text
    pub fn from_xml(xml: &str) -> Result<Self, ButtonMapError> {
        let root = Element::parse(xml)?;
        Self::from_element(&root)
    }

    /// Parse a button map from a file
    pub fn from_file(path: &Path) -> Result<Self, ButtonMapError> {
        let content = std::fs::read_to_string(path)?;
        let map = Self::from_xml(&content)?;
        info!(
            path = %path.display(),
            devices = map.devices.len(),
            skipped = map.skipped,
            "Loaded button map"
        );
        Ok(map)
    }

    /// Read every `<device>` child of a `<buttonmap>` root
    pub fn from_element<N: MarkupNode>(root: &N) -> Result<Self, ButtonMapError> {
        if root.tag() != ELEM_BUTTONMAP {
            return Err(ButtonMapError::UnexpectedRoot {
                expected: ELEM_BUTTONMAP,
                found: root.tag().to_string(),
            });
        }

        let mut map = Self::new();
        for (position, device_elem) in root.children_named(ELEM_DEVICE).into_iter().enumerate() {
            let mut device = Device::default();
            match device_xml::deserialize(Some(device_elem), &mut device) {
                Ok(()) => {
                    debug!(device = %device, "Read device");
                    map.devices.push(device);
                }
                Err(e) => {
                    warn!(position, error = %e, "Skipping unreadable <{}> entry", ELEM_DEVICE);
                    map.skipped += 1;
                }
            }
        }
        Ok(map)
    }

    /// Build the `<buttonmap>` element tree for all devices
    pub fn to_element(&self) -> Result<Element, ButtonMapError> {
        let mut root = Element::new(ELEM_BUTTONMAP);
        for device in &self.devices {
            if !device.is_valid() {
                warn!(device = %device, "Writing device without name or provider");
            }
            device_xml::serialize(device, root.append_child(ELEM_DEVICE))?;
        }
        Ok(root)
    }

    /// Serialize to XML text with `indent` spaces per level
    pub fn to_xml(&self, indent: usize) -> Result<String, ButtonMapError> {
        self.to_element()?.to_xml(indent)
    }

    /// Write to a file, creating parent directories as needed
    pub fn to_file(&self, path: &Path, indent: usize) -> Result<(), ButtonMapError> {
        let xml = self.to_xml(indent)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, xml)?;
        info!(path = %path.display(), devices = self.devices.len(), "Saved button map");
        Ok(())
    }

    /// Add a device, replacing an existing one with the same identity
    pub fn add_device(&mut self, device: Device) {
        if let Some(existing) = self.devices.iter_mut().find(|d| d.same_identity(&device)) {
            *existing = device;
        } else {
            self.devices.push(device);
        }
    }

    /// Find the stored record for the same physical device slot as `probe`
    pub fn find(&self, probe: &Device) -> Option<&Device> {
        self.devices.iter().find(|d| d.same_identity(probe))
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Number of `<device>` entries dropped while loading
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{AxisProperties, HardwareId};

    fn sample_map() -> ButtonMap {
        let mut xbox = Device::new("Xbox 360", "xpad");
        xbox.hardware_id = HardwareId::new(0x045e, 0x028e);
        xbox.button_count = 11;
        xbox.axis_count = 6;
        xbox.configuration.set_axis(AxisProperties::new(0, 0, 32768));
        xbox.configuration.set_axis(AxisProperties::new(2, -32768, 65535));

        let mut stick = Device::new("Generic Stick", "linux");
        stick.hat_count = 1;
        stick.index = 1;

        let mut map = ButtonMap::new();
        map.add_device(xbox);
        map.add_device(stick);
        map
    }

    #[test]
    fn test_parse_buttonmap() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<buttonmap>
    <device name="Xbox 360" provider="xpad" vid="045e" pid="028e" buttoncount="11" axiscount="6">
        <configuration>
            <axis index="0" center="0" range="32768"/>
        </configuration>
    </device>
    <device name="Keyboard" provider="linux"/>
</buttonmap>"#;

        let map = ButtonMap::from_xml(xml).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.skipped(), 0);
        assert_eq!(map.devices()[0].hardware_id, HardwareId::new(0x045e, 0x028e));
        assert_eq!(map.devices()[1].name, "Keyboard");
    }

    #[test]
    fn test_unreadable_device_is_skipped() {
        let xml = r#"<buttonmap>
    <device provider="xpad"/>
    <device name="Pad" provider="linux">
        <configuration><axis index="0" center="0"/></configuration>
    </device>
    <device name="Good" provider="linux"/>
</buttonmap>"#;

        let map = ButtonMap::from_xml(xml).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.skipped(), 2);
        assert_eq!(map.devices()[0].name, "Good");
    }

    #[test]
    fn test_wrong_root() {
        let err = ButtonMap::from_xml("<devices/>").unwrap_err();
        assert!(matches!(err, ButtonMapError::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_round_trip() {
        let map = sample_map();
        let xml = map.to_xml(DEFAULT_INDENT).unwrap();
        assert!(xml.contains(r#"vid="045e" pid="028e""#));
        assert_eq!(ButtonMap::from_xml(&xml).unwrap(), map);
    }

    #[test]
    fn test_add_device_replaces_same_identity() {
        let mut map = sample_map();
        let mut updated = Device::new("Xbox 360", "xpad");
        updated.hardware_id = HardwareId::new(0x045e, 0x028e);
        updated.button_count = 15;
        map.add_device(updated.clone());

        assert_eq!(map.len(), 2);
        assert_eq!(map.find(&updated).map(|d| d.button_count), Some(15));

        let mut other = updated;
        other.index = 1;
        assert!(map.find(&other).is_none());
        map.add_device(other);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps").join("buttonmap.xml");

        let map = sample_map();
        map.to_file(&path, 4).unwrap();
        assert_eq!(ButtonMap::from_file(&path).unwrap(), map);
    }

    #[test]
    fn test_empty_map() {
        let xml = ButtonMap::new().to_xml(0).unwrap();
        assert!(xml.ends_with("<buttonmap/>"));
        assert!(ButtonMap::from_xml(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_json_dump() {
        let map = sample_map();
        let json = serde_json::to_value(map.devices()).unwrap();
        assert_eq!(json[0]["hardware_id"]["state"], "known");
        assert_eq!(json[0]["hardware_id"]["vendor_id"], 0x045e);
        assert_eq!(json[1]["hardware_id"]["state"], "unknown");
    }
}
