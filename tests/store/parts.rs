use stockroom::{Parameter, Part, StoreError, MPN_FIELD};
use tempfile::tempdir;

use crate::open_store;

#[test]
fn adding_a_taken_mpn_never_mutates_the_store() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store
        .add_part(Part::new("R1").with(Parameter::Stock, "10"))
        .unwrap();

    for _ in 0..3 {
        assert!(matches!(
            store.add_part(Part::new("R1").with(Parameter::Stock, "99")),
            Err(StoreError::DuplicateMpn(_))
        ));
    }
    assert_eq!(store.part_count().unwrap(), 1);
    assert_eq!(store.part("R1").unwrap().unwrap().stock(), 10);
}

#[test]
fn delete_then_re_add_leaves_no_residue() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store
        .add_part(
            Part::new("R1")
                .with(Parameter::Manufacturer, "Yageo")
                .with(Parameter::Stock, "10"),
        )
        .unwrap();

    let removed = store.delete_part("R1").unwrap();
    assert_eq!(removed.stock(), 10);
    assert_eq!(store.part_count().unwrap(), 0);

    store
        .add_part(Part::new("R1").with(Parameter::Stock, "2"))
        .unwrap();
    let readded = store.part("R1").unwrap().unwrap();
    assert_eq!(readded.stock(), 2);
    // nothing of the old record survives
    assert_eq!(readded.get(Parameter::Manufacturer), None);
}

#[test]
fn editing_relocates_or_rejects_mpn_changes() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store
        .add_part(
            Part::new("R1")
                .with(Parameter::Stock, "10")
                .with(Parameter::Location, "A3"),
        )
        .unwrap();
    store.add_part(Part::new("R2")).unwrap();

    // collision: nothing moves
    assert!(matches!(
        store.edit_part("R1", MPN_FIELD, "R2"),
        Err(StoreError::DuplicateMpn(_))
    ));
    assert!(store.part("R1").unwrap().is_some());

    // non-colliding rename relocates with every other field intact
    store.edit_part("R1", MPN_FIELD, "R7").unwrap();
    assert!(store.part("R1").unwrap().is_none());
    let moved = store.part("R7").unwrap().unwrap();
    assert_eq!(moved.stock(), 10);
    assert_eq!(moved.get(Parameter::Location), Some("A3"));
    assert_eq!(store.part_count().unwrap(), 2);
}

#[test]
fn parts_iterate_in_mpn_order() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    for mpn in ["LM317", "BC547", "R1", "1N4148"] {
        store.add_part(Part::new(mpn)).unwrap();
    }
    let order: Vec<&str> = store.parts().unwrap().map(|p| p.mpn()).collect();
    assert_eq!(order, vec!["1N4148", "BC547", "LM317", "R1"]);
}

#[test]
fn failed_edits_touch_nothing() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store
        .add_part(Part::new("R1").with(Parameter::Stock, "10"))
        .unwrap();

    assert!(store.edit_part("R9", "Stock", "5").is_err());
    assert!(store.edit_part("R1", "NoSuchField", "5").is_err());
    assert_eq!(store.part("R1").unwrap().unwrap().stock(), 10);
}
