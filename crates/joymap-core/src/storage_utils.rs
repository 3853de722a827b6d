//! Numeric text encoding helpers and file naming for stored button maps
//!
//! Parsing here is deliberately forgiving: it follows C's `atoi`/`strtoul`
//! prefix rules, so text like `"12abc"` reads as 12 and `"abc"` reads as 0.
//! Callers decide whether to complain about unclean input.

use crate::device::{Device, HardwareId};

/// Format a USB ID as four lowercase hex digits, e.g. `045e`
pub fn format_hex_string(value: u16) -> String {
    format!("{:04x}", value)
}

/// Parse the longest hex-digit prefix of `text`, accepting an optional `0x`
///
/// Returns 0 when there are no digits. Values past `u32::MAX` saturate.
pub fn hex_string_to_int(text: &str) -> u32 {
    let trimmed = text.trim_start();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let mut value: u32 = 0;
    for c in digits.chars().map_while(|c| c.to_digit(16)) {
        value = value.saturating_mul(16).saturating_add(c);
    }
    value
}

/// Parse the longest signed decimal prefix of `text`, `atoi` style
pub fn parse_decimal(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative {
        -value
    } else {
        value
    }
}

/// Whether `text` is a complete decimal number with nothing left over
pub fn is_clean_decimal(text: &str) -> bool {
    text.trim().parse::<i64>().is_ok()
}

/// Whether `text` is a complete hex number (optionally `0x`-prefixed)
pub fn is_clean_hex(text: &str) -> bool {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Build a file name for storing a single device's button map
///
/// The name combines provider, device name, VID/PID when known, and the
/// index for duplicate devices, e.g. `xpad_Xbox_360_045e_028e.xml`.
pub fn device_file_name(device: &Device) -> String {
    let mut stem = format!("{}_{}", sanitize(&device.provider), sanitize(&device.name));
    if let HardwareId::Known {
        vendor_id,
        product_id,
    } = device.hardware_id
    {
        stem.push('_');
        stem.push_str(&format_hex_string(vendor_id));
        stem.push('_');
        stem.push_str(&format_hex_string(product_id));
    }
    if device.index != 0 {
        stem.push_str(&format!("_{}", device.index));
    }
    format!("{}.xml", stem)
}

fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex_string() {
        assert_eq!(format_hex_string(0x045e), "045e");
        assert_eq!(format_hex_string(0x028E), "028e");
        assert_eq!(format_hex_string(0), "0000");
        assert_eq!(format_hex_string(0xffff), "ffff");
    }

    #[test]
    fn test_hex_string_to_int() {
        assert_eq!(hex_string_to_int("045e"), 0x045e);
        assert_eq!(hex_string_to_int("0x028E"), 0x028e);
        assert_eq!(hex_string_to_int("12zz"), 0x12);
        assert_eq!(hex_string_to_int("zz"), 0);
        assert_eq!(hex_string_to_int(""), 0);
        assert_eq!(hex_string_to_int("fffffffffff"), u32::MAX);
    }

    #[test]
    fn test_parse_decimal_follows_atoi() {
        assert_eq!(parse_decimal("32768"), 32768);
        assert_eq!(parse_decimal("  -5"), -5);
        assert_eq!(parse_decimal("+7"), 7);
        assert_eq!(parse_decimal("11 buttons"), 11);
        assert_eq!(parse_decimal("eleven"), 0);
        assert_eq!(parse_decimal("-"), 0);
        assert_eq!(parse_decimal(""), 0);
    }

    #[test]
    fn test_clean_checks() {
        assert!(is_clean_decimal("42"));
        assert!(is_clean_decimal(" -1 "));
        assert!(!is_clean_decimal("4x"));
        assert!(is_clean_hex("045e"));
        assert!(is_clean_hex("0xABCD"));
        assert!(!is_clean_hex("0x"));
        assert!(!is_clean_hex("g1"));
    }

    #[test]
    fn test_device_file_name() {
        let mut device = Device::new("Xbox 360", "xpad");
        assert_eq!(device_file_name(&device), "xpad_Xbox_360.xml");

        device.hardware_id = HardwareId::new(0x045e, 0x028e);
        device.index = 2;
        assert_eq!(device_file_name(&device), "xpad_Xbox_360_045e_028e_2.xml");

        let unnamed = Device::new("", "linux");
        assert_eq!(device_file_name(&unnamed), "linux_unnamed.xml");
    }
}
