use stockroom::{Material, Part, StoreError};
use tempfile::tempdir;

use crate::open_store;

#[test]
fn versions_iterate_semantically_regardless_of_insertion_order() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store.add_project("amp").unwrap();
    store.add_project("psu").unwrap();

    for v in ["1.10", "0.9", "1.2"] {
        store.add_version("amp", v).unwrap();
    }
    for v in ["0.9", "1.2", "1.10"] {
        store.add_version("psu", v).unwrap();
    }

    let amp: Vec<&str> = store.project("amp").unwrap().unwrap()
        .versions()
        .map(|v| v.version())
        .collect();
    let psu: Vec<&str> = store.project("psu").unwrap().unwrap()
        .versions()
        .map(|v| v.version())
        .collect();
    assert_eq!(amp, vec!["0.9", "1.2", "1.10"]);
    assert_eq!(psu, amp);
}

#[test]
fn duplicate_project_names_are_rejected() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store.add_project("amp").unwrap();
    assert!(matches!(
        store.add_project("amp"),
        Err(StoreError::DuplicateProject(_))
    ));
    assert_eq!(store.project_count().unwrap(), 1);
}

#[test]
fn bom_rows_keep_their_order_and_content() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store.add_part(Part::new("R1")).unwrap();
    store.add_part(Part::new("C1")).unwrap();
    store.add_project("amp").unwrap();
    store.add_version("amp", "1.0").unwrap();

    store
        .add_material("amp", "1.0", Material::new("R1", 4.0).with_reference("R1-R4"))
        .unwrap();
    store
        .add_material("amp", "1.0", Material::new("C1", 2.0))
        .unwrap();

    let version = store.project("amp").unwrap().unwrap().version("1.0").unwrap();
    assert_eq!(version.material_count(), 2);
    assert_eq!(version.materials()[0].mpn, "R1");
    assert_eq!(version.materials()[0].quantity, 4.0);
    assert_eq!(version.materials()[0].reference.as_deref(), Some("R1-R4"));
    assert_eq!(version.materials()[1].mpn, "C1");
}

#[test]
fn removing_materials_and_versions() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store.add_project("amp").unwrap();
    store.add_version("amp", "1.0").unwrap();
    store
        .add_material("amp", "1.0", Material::new("R1", 1.0))
        .unwrap();

    let removed = store.remove_material("amp", "1.0", 0).unwrap();
    assert_eq!(removed.mpn, "R1");

    let version = store.delete_version("amp", "1.0").unwrap();
    assert_eq!(version.version(), "1.0");
    assert_eq!(
        store.project("amp").unwrap().unwrap().version_count(),
        0
    );

    let project = store.delete_project("amp").unwrap();
    assert_eq!(project.name(), "amp");
    assert_eq!(store.project_count().unwrap(), 0);
}

#[test]
fn deleting_a_part_orphans_its_references() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store.add_part(Part::new("R1")).unwrap();
    store.add_project("amp").unwrap();
    store.add_version("amp", "1.0").unwrap();
    store
        .add_material("amp", "1.0", Material::new("R1", 1.0))
        .unwrap();

    store.delete_part("R1").unwrap();

    // the BOM row survives; resolution reports the orphan
    let material = store.project("amp").unwrap().unwrap().version("1.0").unwrap()
        .materials()[0]
        .clone();
    assert!(store.resolve(&material).unwrap().is_none());
}
