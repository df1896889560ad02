//! # Shared Component Tests
//!
//! Address wrapping, register indexing and the per-instance event registry.

use std::cell::RefCell;
use std::rc::Rc;

use tandem_core::common::constants::{COMPUTE_MEMORY_SIZE, MEMORY_SIZE, REGISTER_COUNT};
use tandem_core::common::{ComputeAddr, EventBus, PrimaryAddr, Reg, RegisterFile};

use crate::common::r;

#[test]
fn test_primary_addr_wraps() {
    assert_eq!(PrimaryAddr::new(MEMORY_SIZE).val(), 0);
    assert_eq!(PrimaryAddr::new(0x1_0005).val(), 5);
    assert_eq!(PrimaryAddr::new(250).offset(10).val(), 4);
    assert_eq!(PrimaryAddr::new(0).pred().val(), MEMORY_SIZE - 1);
}

#[test]
fn test_compute_addr_wraps() {
    assert_eq!(ComputeAddr::new(COMPUTE_MEMORY_SIZE + 3).val(), 3);
    assert_eq!(ComputeAddr::new(120).offset(10).val(), 2);
}

#[test]
fn test_reg_rejects_out_of_range() {
    assert!(Reg::new(REGISTER_COUNT - 1).is_some());
    assert!(Reg::new(REGISTER_COUNT).is_none());
    assert_eq!(r(5).to_string(), "R5");
}

#[test]
fn test_register_file_reports_changes() {
    let mut regs = RegisterFile::new();
    let before = regs.values();
    regs.write(r(3), 9);
    regs.write(r(0), 1);
    regs.write(r(7), 0);
    assert_eq!(regs.changed_since(&before), vec![0, 3]);
}

#[test]
fn test_event_bus_delivers_in_subscription_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut bus: EventBus<u32> = EventBus::new();

    let first = Rc::clone(&log);
    let _ = bus.subscribe(move |e| first.borrow_mut().push(("first", *e)));
    let second = Rc::clone(&log);
    let _ = bus.subscribe(move |e| second.borrow_mut().push(("second", *e)));

    bus.emit(&7);
    assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
}

#[test]
fn test_event_bus_unsubscribe() {
    let count = Rc::new(RefCell::new(0));
    let mut bus: EventBus<()> = EventBus::new();
    let sink = Rc::clone(&count);
    let id = bus.subscribe(move |_| *sink.borrow_mut() += 1);

    bus.emit(&());
    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    bus.emit(&());

    assert_eq!(*count.borrow(), 1);
    assert!(!bus.has_listeners());
}

#[test]
fn test_event_bus_tracks_listeners() {
    let mut bus: EventBus<u8> = EventBus::default();
    assert!(!bus.has_listeners());
    let a = bus.subscribe(|_| {});
    let b = bus.subscribe(|_| {});
    assert_ne!(a, b);
    assert!(bus.unsubscribe(a));
    assert!(bus.has_listeners());
}
