//! Report descriptor text formatter
//!
//! Renders a device's identity and collection structure for the device-info
//! panel. Output is deterministic and follows the order of the data model:
//!
//! ```text
//! productName: Gamepad
//! vendorId: 0x045E (1118)
//! productId: 0x028E (654)
//! opened: true
//! collections[0]
//! Usage 0001:0005
//! Input reports: 0x01
//! Input report 0x01
//!   8 bits (bits 0 to 7)
//!   4 bits (bits 8 to 11)
//! ```

use crate::hex::{hex16, hex8};
use crate::host::HostDevice;
use crate::types::{Collection, Report, ReportCategory, ReportItem};

/// Describe where an item's bits sit inside its report
///
/// `bit_offset` is the item's first bit. Single-bit items name one bit;
/// items made of one value, or of 1-bit values, are shown as a plain bit
/// run; everything else is shown as `count values * size bits`.
pub fn bit_layout(item: &ReportItem, bit_offset: u64) -> String {
    let bit_width = item.bit_width();
    if bit_width == 1 {
        return format!("1 bit (bit {bit_offset})");
    }

    let end_bit = (bit_offset + bit_width).saturating_sub(1);
    if item.report_count == 1 || item.report_size == 1 {
        return format!("{bit_width} bits (bits {bit_offset} to {end_bit})");
    }

    format!(
        "{} values * {} bits (bits {} to {})",
        item.report_count, item.report_size, bit_offset, end_bit
    )
}

/// Format a device's descriptor for display
pub fn format_device(device: &dyn HostDevice) -> String {
    let vendor_id = device.vendor_id();
    let product_id = device.product_id();

    let mut lines = vec![
        format!("productName: {}", device.product_name()),
        format!("vendorId: 0x{} ({})", hex16(vendor_id), vendor_id),
        format!("productId: 0x{} ({})", hex16(product_id), product_id),
        format!("opened: {}", device.opened()),
    ];
    format_collections(device.collections(), &mut lines);
    lines.join("\n")
}

fn format_collections(collections: &[Collection], lines: &mut Vec<String>) {
    if collections.is_empty() {
        lines.push("collections: None".to_string());
        return;
    }

    for (i, collection) in collections.iter().enumerate() {
        lines.push(format!("collections[{i}]"));
        lines.push(format!(
            "Usage {}:{}",
            hex16(collection.usage_page),
            hex16(collection.usage)
        ));
        for category in ReportCategory::ALL {
            let ids: Vec<String> = collection
                .reports(category)
                .map(|r| format!("0x{}", hex8(r.report_id)))
                .collect();
            if !ids.is_empty() {
                lines.push(format!("{} reports: {}", category.label(), ids.join(", ")));
            }
        }
    }

    for collection in collections {
        for category in ReportCategory::ALL {
            for report in collection.reports(category) {
                format_report(report, lines);
            }
        }
    }
}

fn format_report(report: &Report, lines: &mut Vec<String>) {
    lines.push(format!(
        "{} report 0x{}",
        report.category.label(),
        hex8(report.report_id)
    ));

    let mut bit_offset = 0u64;
    for item in &report.items {
        lines.push(format!("  {}", bit_layout(item, bit_offset)));
        bit_offset += item.bit_width();
    }
}
