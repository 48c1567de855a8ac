//! Report descriptor data model and shared types

use serde::{Deserialize, Serialize};

/// Report category within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportCategory {
    Input,
    Output,
    Feature,
}

impl ReportCategory {
    /// Categories in display order
    pub const ALL: [ReportCategory; 3] = [
        ReportCategory::Input,
        ReportCategory::Output,
        ReportCategory::Feature,
    ];

    /// Display label (`Input`, `Output`, `Feature`)
    pub fn label(&self) -> &'static str {
        match self {
            ReportCategory::Input => "Input",
            ReportCategory::Output => "Output",
            ReportCategory::Feature => "Feature",
        }
    }
}

/// One field definition inside a report
///
/// Both values are positive for descriptors produced by a host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    /// Bits per value
    pub report_size: u32,
    /// Number of repeated values
    pub report_count: u32,
}

impl ReportItem {
    pub fn new(report_size: u32, report_count: u32) -> Self {
        Self {
            report_size,
            report_count,
        }
    }

    /// Total bits occupied by this item
    pub fn bit_width(&self) -> u64 {
        u64::from(self.report_size) * u64::from(self.report_count)
    }
}

/// A report; item order defines the bit layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub category: ReportCategory,
    pub report_id: u8,
    #[serde(default)]
    pub items: Vec<ReportItem>,
}

impl Report {
    pub fn new(category: ReportCategory, report_id: u8, items: Vec<ReportItem>) -> Self {
        Self {
            category,
            report_id,
            items,
        }
    }
}

/// Reports grouped under a usage page/usage pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub usage_page: u16,
    pub usage: u16,
    /// All reports, tagged by category, in host order
    #[serde(default)]
    pub reports: Vec<Report>,
}

impl Collection {
    pub fn new(usage_page: u16, usage: u16) -> Self {
        Self {
            usage_page,
            usage,
            reports: Vec::new(),
        }
    }

    /// Builder-style report append
    pub fn with_report(mut self, report: Report) -> Self {
        self.reports.push(report);
        self
    }

    /// Reports of one category, order preserved
    pub fn reports(&self, category: ReportCategory) -> impl Iterator<Item = &Report> {
        self.reports.iter().filter(move |r| r.category == category)
    }
}

/// Inbound report as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputReport {
    pub report_id: u8,
    pub data: Vec<u8>,
}

/// Criteria for a device grant request
///
/// Every field that is set must match. Usage fields match when any of the
/// device's collections carries them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFilter {
    #[serde(default)]
    pub vendor_id: Option<u16>,
    #[serde(default)]
    pub product_id: Option<u16>,
    #[serde(default)]
    pub usage_page: Option<u16>,
    #[serde(default)]
    pub usage: Option<u16>,
}

impl DeviceFilter {
    /// Check a device's identity and collections against this filter
    pub fn matches(&self, vendor_id: u16, product_id: u16, collections: &[Collection]) -> bool {
        if self.vendor_id.is_some_and(|v| v != vendor_id) {
            return false;
        }
        if self.product_id.is_some_and(|p| p != product_id) {
            return false;
        }
        if self.usage_page.is_none() && self.usage.is_none() {
            return true;
        }
        collections.iter().any(|c| {
            self.usage_page.map_or(true, |p| p == c.usage_page)
                && self.usage.map_or(true, |u| u == c.usage)
        })
    }
}

/// Serializable description of a device, used to build virtual devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescription {
    pub product_name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl DeviceDescription {
    /// Parse a JSON description
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
