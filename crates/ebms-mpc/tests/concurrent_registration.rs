//! Registry uniqueness under concurrent registration

#![allow(clippy::unwrap_used)]

use ebms_core::{CoreError, MpcId};
use ebms_mpc::{ChannelOrigin, MpcRegistry, Resolution};
use std::sync::Arc;
use std::thread;

#[test]
fn test_racing_creates_register_exactly_once() {
    let registry = Arc::new(MpcRegistry::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.register("urn:mpc:contended"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let created = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(CoreError::AlreadyExists { .. })))
        .count();

    assert_eq!(created, 1);
    assert_eq!(rejected, 15);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_racing_lazy_resolution_creates_one_record() {
    let registry = Arc::new(MpcRegistry::new());
    let id = MpcId::new("urn:mpc:declared").unwrap();
    registry.declare(id.clone());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            thread::spawn(move || registry.resolve(&id))
        })
        .collect();

    let created = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| matches!(r, Resolution::Created(_)))
        .count();

    assert_eq!(created, 1);
    assert_eq!(
        registry.lookup("urn:mpc:declared").unwrap().origin(),
        ChannelOrigin::Lazy
    );
}

#[test]
fn test_failed_create_after_lazy_keeps_lazy_record() {
    let registry = MpcRegistry::new();
    registry.declare(MpcId::new("urn:mpc:x").unwrap());
    assert!(matches!(
        registry.resolve(&MpcId::new("urn:mpc:x").unwrap()),
        Resolution::Created(_)
    ));

    assert!(registry.register("urn:mpc:x").is_err());
    assert_eq!(
        registry.lookup("urn:mpc:x").unwrap().origin(),
        ChannelOrigin::Lazy
    );
}
