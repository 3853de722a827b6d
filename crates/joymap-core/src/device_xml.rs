//! Conversion between [`Device`] records and `<device>` markup
//!
//! ```xml
//! <device name="Xbox 360" provider="xpad" vid="045e" pid="028e" buttoncount="11" axiscount="6">
//!     <configuration>
//!         <axis index="0" center="0" range="32768"/>
//!     </configuration>
//! </device>
//! ```
//!
//! Identity strings are required on read. VID/PID are hex and written only
//! as a pair; counts are decimal and omitted when zero. Every `<axis>` must
//! carry `index`, `center` and `range`. Any violation fails the whole
//! device.
//!
//! Malformed numeric text reads as zero (with a warning) rather than
//! failing, matching how existing button-map files have always been read.
//! The one exception is an axis index outside `u32`: it keys the
//! configuration, so it fails the axis rather than landing on axis 0.

use tracing::{debug, error, warn};

use crate::device::{AxisProperties, Configuration, Device, HardwareId};
use crate::error::ButtonMapError;
use crate::markup::MarkupNode;
use crate::storage_utils::{
    format_hex_string, hex_string_to_int, is_clean_decimal, is_clean_hex, parse_decimal,
};

pub const ELEM_DEVICE: &str = "device";
pub const ELEM_CONFIGURATION: &str = "configuration";
pub const ELEM_AXIS: &str = "axis";

pub const ATTR_DEVICE_NAME: &str = "name";
pub const ATTR_DEVICE_PROVIDER: &str = "provider";
pub const ATTR_DEVICE_VID: &str = "vid";
pub const ATTR_DEVICE_PID: &str = "pid";
pub const ATTR_DEVICE_BUTTONCOUNT: &str = "buttoncount";
pub const ATTR_DEVICE_HATCOUNT: &str = "hatcount";
pub const ATTR_DEVICE_AXISCOUNT: &str = "axiscount";
pub const ATTR_DEVICE_INDEX: &str = "index";

pub const ATTR_AXIS_INDEX: &str = "index";
pub const ATTR_AXIS_CENTER: &str = "center";
pub const ATTR_AXIS_RANGE: &str = "range";

/// Write `record` into the attributes and children of `element`
pub fn serialize<N: MarkupNode>(record: &Device, element: Option<&mut N>) -> Result<(), ButtonMapError> {
    let element = element.ok_or(ButtonMapError::MissingTarget {
        element: ELEM_DEVICE,
    })?;

    element.set_attribute(ATTR_DEVICE_NAME, &record.name);
    element.set_attribute(ATTR_DEVICE_PROVIDER, &record.provider);
    if let HardwareId::Known {
        vendor_id,
        product_id,
    } = record.hardware_id
    {
        element.set_attribute(ATTR_DEVICE_VID, &format_hex_string(vendor_id));
        element.set_attribute(ATTR_DEVICE_PID, &format_hex_string(product_id));
    }
    set_count(element, ATTR_DEVICE_BUTTONCOUNT, record.button_count);
    set_count(element, ATTR_DEVICE_HATCOUNT, record.hat_count);
    set_count(element, ATTR_DEVICE_AXISCOUNT, record.axis_count);
    set_count(element, ATTR_DEVICE_INDEX, record.index);

    serialize_config(&record.configuration, element)
}

/// Rebuild `record` from a `<device>` element
///
/// `record` is reset first, so on error it holds only what was read before
/// the failure and must be discarded by the caller.
pub fn deserialize<N: MarkupNode>(element: Option<&N>, record: &mut Device) -> Result<(), ButtonMapError> {
    let element = element.ok_or(ButtonMapError::MissingTarget {
        element: ELEM_DEVICE,
    })?;

    record.reset();

    record.name = required(element, ELEM_DEVICE, ATTR_DEVICE_NAME)?.to_string();
    record.provider = required(element, ELEM_DEVICE, ATTR_DEVICE_PROVIDER)?.to_string();

    let vid = element.attribute(ATTR_DEVICE_VID).map(|v| read_hex(ATTR_DEVICE_VID, v));
    let pid = element.attribute(ATTR_DEVICE_PID).map(|v| read_hex(ATTR_DEVICE_PID, v));
    if vid.is_some() != pid.is_some() {
        debug!(
            device = %record.name,
            "<{}> has only one of \"{}\"/\"{}\", ignoring hardware ID",
            ELEM_DEVICE, ATTR_DEVICE_VID, ATTR_DEVICE_PID
        );
    }
    record.hardware_id = HardwareId::from_parts(vid, pid);

    record.button_count = read_count(element, ATTR_DEVICE_BUTTONCOUNT);
    record.hat_count = read_count(element, ATTR_DEVICE_HATCOUNT);
    record.axis_count = read_count(element, ATTR_DEVICE_AXISCOUNT);
    record.index = read_count(element, ATTR_DEVICE_INDEX);

    deserialize_config(element, &mut record.configuration)
}

fn serialize_config<N: MarkupNode>(config: &Configuration, element: &mut N) -> Result<(), ButtonMapError> {
    if config.is_empty() {
        return Ok(());
    }

    let config_elem = element
        .append_child(ELEM_CONFIGURATION)
        .ok_or(ButtonMapError::AppendFailed {
            element: ELEM_CONFIGURATION,
        })?;

    for axis in config.axes() {
        serialize_axis(axis, config_elem)?;
    }
    Ok(())
}

fn deserialize_config<N: MarkupNode>(element: &N, config: &mut Configuration) -> Result<(), ButtonMapError> {
    let Some(config_elem) = element.first_child(ELEM_CONFIGURATION) else {
        return Ok(());
    };

    for axis_elem in config_elem.children_named(ELEM_AXIS) {
        config.set_axis(deserialize_axis(axis_elem)?);
    }
    Ok(())
}

fn serialize_axis<N: MarkupNode>(axis: &AxisProperties, element: &mut N) -> Result<(), ButtonMapError> {
    let axis_elem = element
        .append_child(ELEM_AXIS)
        .ok_or(ButtonMapError::AppendFailed { element: ELEM_AXIS })?;

    axis_elem.set_int_attribute(ATTR_AXIS_INDEX, i64::from(axis.index));
    axis_elem.set_int_attribute(ATTR_AXIS_CENTER, i64::from(axis.center));
    axis_elem.set_int_attribute(ATTR_AXIS_RANGE, i64::from(axis.range));
    Ok(())
}

fn deserialize_axis<N: MarkupNode>(element: &N) -> Result<AxisProperties, ButtonMapError> {
    let index = required(element, ELEM_AXIS, ATTR_AXIS_INDEX)?;
    let center = required(element, ELEM_AXIS, ATTR_AXIS_CENTER)?;
    let range = required(element, ELEM_AXIS, ATTR_AXIS_RANGE)?;

    Ok(AxisProperties {
        index: axis_index(index)?,
        center: to_int(ATTR_AXIS_CENTER, center),
        range: to_int(ATTR_AXIS_RANGE, range),
    })
}

fn required<'a, N: MarkupNode>(
    element: &'a N,
    tag: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ButtonMapError> {
    element.attribute(attribute).ok_or_else(|| {
        error!("<{}> tag has no \"{}\" attribute", tag, attribute);
        ButtonMapError::MissingAttribute {
            element: tag,
            attribute,
        }
    })
}

fn set_count<N: MarkupNode>(element: &mut N, attribute: &str, value: u32) {
    if value != 0 {
        element.set_int_attribute(attribute, i64::from(value));
    }
}

fn read_count<N: MarkupNode>(element: &N, attribute: &str) -> u32 {
    element
        .attribute(attribute)
        .map(|text| to_int(attribute, text))
        .unwrap_or(0)
}

/// Lenient decimal conversion; unparseable or out-of-range text becomes 0
fn to_int<T: TryFrom<i64> + Default>(attribute: &str, text: &str) -> T {
    if !is_clean_decimal(text) {
        warn!(attribute, value = text, "Malformed decimal attribute, reading leading digits");
    }
    T::try_from(parse_decimal(text)).unwrap_or_else(|_| {
        warn!(attribute, value = text, "Decimal attribute out of range, using 0");
        T::default()
    })
}

/// Axis indices key the configuration, so one that does not fit fails the
/// axis instead of reading as 0 and replacing axis 0's calibration
fn axis_index(text: &str) -> Result<u32, ButtonMapError> {
    if !is_clean_decimal(text) {
        warn!(attribute = ATTR_AXIS_INDEX, value = text, "Malformed decimal attribute, reading leading digits");
    }
    u32::try_from(parse_decimal(text)).map_err(|_| {
        error!("<{}> tag has out-of-range \"{}\" value \"{}\"", ELEM_AXIS, ATTR_AXIS_INDEX, text);
        ButtonMapError::OutOfRange {
            element: ELEM_AXIS,
            attribute: ATTR_AXIS_INDEX,
            value: text.to_string(),
        }
    })
}

fn read_hex(attribute: &str, text: &str) -> u16 {
    if !is_clean_hex(text) {
        warn!(attribute, value = text, "Malformed hex attribute, reading leading digits");
    }
    u16::try_from(hex_string_to_int(text)).unwrap_or_else(|_| {
        warn!(attribute, value = text, "Hex attribute out of range, using 0");
        0
    })
}
