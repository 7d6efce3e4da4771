#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;

use twlrelay_core::room_id::{RoomIdGenerator, DEFAULT_PREFIX};

#[test]
fn default_shape() {
    let gen = RoomIdGenerator::default();
    let id = gen.generate().unwrap();
    assert!(id.starts_with(DEFAULT_PREFIX));
    assert_eq!(id.len(), DEFAULT_PREFIX.len() + 8);
    assert!(gen.matches(&id));
}

#[test]
fn custom_prefix_and_length() {
    let gen = RoomIdGenerator::new("room-", 16).unwrap();
    let id = gen.generate().unwrap();
    assert!(id.starts_with("room-"));
    assert_eq!(id.len(), "room-".len() + 32);
    assert!(id["room-".len()..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn ids_are_distinct() {
    let gen = RoomIdGenerator::new("t-", 16).unwrap();
    let ids: HashSet<String> = (0..1000).map(|_| gen.generate().unwrap()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn rejects_bad_settings() {
    assert!(RoomIdGenerator::new("", 4).is_err());
    assert!(RoomIdGenerator::new("x-", 2).is_err());
    assert!(RoomIdGenerator::new("x-", 64).is_err());
}

#[test]
fn matches_rejects_foreign_ids() {
    let gen = RoomIdGenerator::default();
    assert!(!gen.matches("room-error"));
    assert!(!gen.matches("twl-server-ABCDEF01"));
    assert!(!gen.matches("twl-server-abc"));
}
