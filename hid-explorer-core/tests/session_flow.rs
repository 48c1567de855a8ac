//! End-to-end session tests over the in-memory host.
//!
//! These drive a `Session` the way a front end does: connect, pick devices,
//! send hex text and pump inbound reports, then inspect what reached the sink.

use std::sync::Arc;
use std::time::Duration;

use hid_explorer_core::{
    virtual_handle, Collection, Device, DeviceDescription, DeviceFilter, ExplorerError,
    RecordingSink, Report, ReportCategory, ReportItem, Session, VirtualDevice, VirtualHost,
};

fn session() -> Session<VirtualHost, RecordingSink> {
    Session::new(VirtualHost::new(), RecordingSink::new())
}

fn gamepad() -> (Arc<VirtualDevice>, Device) {
    virtual_handle(VirtualDevice::new(DeviceDescription {
        product_name: "Gamepad".to_string(),
        vendor_id: 0x045E,
        product_id: 0x028E,
        collections: vec![Collection::new(0x0001, 0x0005).with_report(Report::new(
            ReportCategory::Input,
            0x01,
            vec![ReportItem::new(8, 1), ReportItem::new(1, 4)],
        ))],
    }))
}

// ── Registry ──

#[tokio::test]
async fn adding_same_device_twice_keeps_one_entry() {
    let mut s = session();
    let (_, pad) = gamepad();
    assert!(s.add_device(pad.clone()).await);
    assert!(!s.add_device(pad.clone()).await);
    assert_eq!(s.registry().len(), 1);
    assert_eq!(s.sink().menu, vec!["Gamepad"]);
}

#[tokio::test]
async fn first_added_device_is_auto_selected() {
    let mut s = session();
    let (_, a) = virtual_handle(VirtualDevice::named("A", 1, 1));
    let (_, b) = virtual_handle(VirtualDevice::named("B", 1, 2));
    s.add_device(a.clone()).await;
    s.add_device(b).await;
    assert_eq!(s.selected_device(), Some(&a));
    assert_eq!(s.sink().menu, vec!["A", "B"]);
    assert_eq!(s.sink().menu_selected, Some(0));
}

#[tokio::test]
async fn connect_registers_authorized_then_granted() {
    let mut s = session();
    let (_, known) = virtual_handle(VirtualDevice::named("Known", 1, 1));
    let (_, fresh) = virtual_handle(VirtualDevice::named("Fresh", 1, 2));
    s.host().authorize(known.clone());
    s.host().queue_grant(vec![fresh.clone()]);

    s.connect(&[]).await.unwrap();

    let names: Vec<String> = s.registry().devices().iter().map(|d| d.product_name()).collect();
    assert_eq!(names, vec!["Known", "Fresh"]);
    assert_eq!(s.selected_device(), Some(&known));
}

#[tokio::test]
async fn grant_selects_first_granted_device_when_nothing_selected() {
    let mut s = session();
    let (_, a) = virtual_handle(VirtualDevice::named("A", 1, 1));
    let (_, b) = virtual_handle(VirtualDevice::named("B", 1, 2));
    s.host().queue_grant(vec![a.clone(), b]);

    let granted = s.request_device_grant(&[]).await.unwrap();
    assert_eq!(granted.len(), 2);
    assert_eq!(s.selected_device(), Some(&a));
}

#[tokio::test]
async fn grant_selects_first_granted_even_if_already_registered() {
    let mut s = session();
    let (_, a) = virtual_handle(VirtualDevice::named("A", 1, 1));
    let (_, b) = virtual_handle(VirtualDevice::named("B", 1, 2));
    s.add_device(a.clone()).await;
    s.select(None).await;
    s.host().queue_grant(vec![a.clone(), b]);

    s.request_device_grant(&[]).await.unwrap();
    assert_eq!(s.selected_device(), Some(&a));
    assert_eq!(s.sink().menu, vec!["A", "B"]);
    assert_eq!(s.sink().menu_selected, Some(0));
}

#[tokio::test]
async fn grant_keeps_existing_selection() {
    let mut s = session();
    let (_, a) = virtual_handle(VirtualDevice::named("A", 1, 1));
    let (_, b) = virtual_handle(VirtualDevice::named("B", 1, 2));
    s.add_device(a.clone()).await;
    s.host().queue_grant(vec![b]);

    s.request_device_grant(&[]).await.unwrap();
    assert_eq!(s.selected_device(), Some(&a));
    assert_eq!(s.sink().menu, vec!["A", "B"]);
}

#[tokio::test]
async fn declined_grant_is_empty_not_an_error() {
    let mut s = session();
    let granted = s.request_device_grant(&[]).await.unwrap();
    assert!(granted.is_empty());
    assert!(s.registry().is_empty());
    assert!(s.selected_device().is_none());
}

#[tokio::test]
async fn grant_honours_filters() {
    let mut s = session();
    let (_, pad) = gamepad();
    let (_, other) = virtual_handle(VirtualDevice::named("Other", 0x1234, 1));
    s.host().queue_grant(vec![other, pad.clone()]);

    let filter = DeviceFilter {
        usage_page: Some(0x0001),
        usage: Some(0x0005),
        ..Default::default()
    };
    let granted = s.request_device_grant(&[filter]).await.unwrap();
    assert_eq!(granted, vec![pad.clone()]);
    assert_eq!(s.selected_device(), Some(&pad));
}

// ── Descriptor display ──

#[tokio::test]
async fn selecting_shows_formatted_descriptor() {
    let mut s = session();
    let (_, pad) = gamepad();
    s.select(Some(pad)).await;

    let info = s.sink().device_info.clone();
    let lines: Vec<&str> = info.lines().collect();
    assert_eq!(lines[0], "productName: Gamepad");
    assert_eq!(lines[1], "vendorId: 0x045E (1118)");
    assert_eq!(lines[2], "productId: 0x028E (654)");
    assert_eq!(lines[3], "opened: true");
    assert!(lines.contains(&"Input report 0x01"));
    assert!(lines.contains(&"  8 bits (bits 0 to 7)"));
    assert!(lines.contains(&"  4 bits (bits 8 to 11)"));
}

#[tokio::test]
async fn device_without_collections_says_none() {
    let mut s = session();
    let (_, plain) = virtual_handle(VirtualDevice::named("Plain", 1, 1));
    s.select(Some(plain)).await;
    assert!(s.sink().device_info.lines().any(|l| l == "collections: None"));
}

// ── Inbound reports ──

#[tokio::test]
async fn inbound_report_replaces_panel_content() {
    let mut s = session();
    let (dev, pad) = gamepad();
    s.select(Some(pad)).await;

    assert!(dev.emit_input_report(0x01, &[0x10, 0x0F]));
    assert!(s.pump_input_report().await);
    assert_eq!(s.sink().input_report, "01 10 0F");

    assert!(dev.emit_input_report(0x02, &[0xFF]));
    assert!(s.pump_input_report().await);
    assert_eq!(s.sink().input_report, "02 FF");
    assert_eq!(s.sink().input_reports_seen, 2);
}

#[tokio::test]
async fn deselected_device_events_never_reach_the_sink() {
    let mut s = session();
    let (dev, pad) = gamepad();
    s.select(Some(pad)).await;
    s.select(None).await;

    assert!(!dev.emit_input_report(0x01, &[0xAA]));
    assert!(!s.pump_input_report().await);
    assert_eq!(s.sink().input_report, "");
    assert_eq!(s.sink().input_reports_seen, 0);
}

#[tokio::test]
async fn switching_devices_drops_reports_queued_for_the_old_one() {
    let mut s = session();
    let (a_dev, a) = virtual_handle(VirtualDevice::named("A", 1, 1));
    let (b_dev, b) = virtual_handle(VirtualDevice::named("B", 1, 2));
    s.select(Some(a)).await;
    assert!(a_dev.emit_input_report(0x0A, &[0x01]));

    s.select(Some(b)).await;
    assert!(!a_dev.emit_input_report(0x0A, &[0x02]));
    assert!(b_dev.emit_input_report(0x0B, &[0x03]));

    assert!(s.pump_input_report().await);
    assert_eq!(s.sink().input_report, "0B 03");

    let nothing_else = tokio::time::timeout(Duration::from_millis(20), s.next_input_report()).await;
    assert!(nothing_else.is_err(), "no further reports expected");
}

// ── Outbound reports ──

#[tokio::test]
async fn send_splits_report_id_and_canonicalizes_text() {
    let mut s = session();
    let (dev, pad) = gamepad();
    s.select(Some(pad)).await;

    s.send_output_report("0x02, ff 0a").await.unwrap();
    assert_eq!(dev.sent_reports(), vec![(0x02, vec![0xFF, 0x0A])]);
    assert_eq!(s.sink().output_report, "02 FF 0A");
}

#[tokio::test]
async fn send_with_only_a_report_id_has_empty_payload() {
    let mut s = session();
    let (dev, pad) = gamepad();
    s.select(Some(pad)).await;

    s.send_output_report("07").await.unwrap();
    assert_eq!(dev.sent_reports(), vec![(0x07, vec![])]);
}

#[tokio::test]
async fn malformed_or_empty_text_sends_nothing() {
    let mut s = session();
    let (dev, pad) = gamepad();
    s.select(Some(pad)).await;

    assert_eq!(
        s.send_output_report("01 2").await,
        Err(ExplorerError::MalformedHexInput { digits: 3 })
    );
    assert_eq!(s.send_output_report("  ").await, Err(ExplorerError::EmptyReport));
    assert!(dev.sent_reports().is_empty());
    assert_eq!(s.sink().output_report, "");
}

#[tokio::test]
async fn send_without_selection_is_a_no_op() {
    let mut s = session();
    assert_eq!(
        s.send_output_report("01 02").await,
        Err(ExplorerError::NoSelection)
    );
}

#[tokio::test]
async fn send_to_device_that_failed_to_open_reports_host_error() {
    let mut s = session();
    let (dev, pad) = gamepad();
    dev.set_fail_open(true);
    s.select(Some(pad.clone())).await;
    assert_eq!(s.selected_device(), Some(&pad));

    let result = s.send_output_report("01 02").await;
    assert!(matches!(result, Err(ExplorerError::Host(_))));
    assert!(dev.sent_reports().is_empty());
}

#[tokio::test]
async fn into_parts_detaches_active_subscription() {
    let mut s = session();
    let (dev, pad) = gamepad();
    s.select(Some(pad)).await;
    let (_host, sink) = s.into_parts();
    assert!(!dev.has_input_hook());
    assert!(sink.device_info.starts_with("productName: Gamepad"));
}
