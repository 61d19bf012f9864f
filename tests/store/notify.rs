use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stockroom::{Material, Part};
use tempfile::tempdir;

use crate::{dataset_path, open_store};

fn counted_listener(counter: &Arc<AtomicUsize>) -> impl Fn(String) + Send + Sync + 'static {
    let counter = Arc::clone(counter);
    move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

// Delivery is synchronous: every assertion below runs immediately after the
// mutating call, with no waiting.
#[test]
fn part_mutations_raise_parts_changed() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);

    let count = Arc::new(AtomicUsize::new(0));
    store.on_parts_changed(counted_listener(&count));

    store.add_part(Part::new("R1")).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);

    store.edit_part("R1", "Stock", "5").unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);

    store.delete_part("R1").unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn failed_operations_raise_nothing() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);
    store.add_part(Part::new("R1")).unwrap();

    let count = Arc::new(AtomicUsize::new(0));
    store.on_parts_changed(counted_listener(&count));

    let _ = store.add_part(Part::new("R1"));
    let _ = store.edit_part("R1", "NoSuchField", "x");
    let _ = store.delete_part("R9");
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn project_mutations_raise_projects_changed_only() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);

    let parts = Arc::new(AtomicUsize::new(0));
    let projects = Arc::new(AtomicUsize::new(0));
    store.on_parts_changed(counted_listener(&parts));
    store.on_projects_changed(counted_listener(&projects));

    store.add_project("amp").unwrap();
    store.add_version("amp", "1.0").unwrap();
    store
        .add_material("amp", "1.0", Material::new("R1", 1.0))
        .unwrap();
    store.remove_material("amp", "1.0", 0).unwrap();
    store.delete_version("amp", "1.0").unwrap();
    store.delete_project("amp").unwrap();

    assert_eq!(projects.load(Ordering::SeqCst), 6);
    assert_eq!(parts.load(Ordering::SeqCst), 0);
}

// Listeners must re-read rather than expect a delta; the payload is empty.
#[test]
fn change_events_carry_no_payload() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);

    let payloads = Arc::new(std::sync::Mutex::new(Vec::new()));
    {
        let payloads = Arc::clone(&payloads);
        store.on_parts_changed(move |payload| payloads.lock().unwrap().push(payload));
    }

    store.add_part(Part::new("R1")).unwrap();
    assert_eq!(payloads.lock().unwrap().as_slice(), &[String::new()]);
}

#[test]
fn listeners_survive_close_and_reopen() {
    let dir = tempdir().unwrap();
    let mut store = open_store(&dir);

    let count = Arc::new(AtomicUsize::new(0));
    store.on_parts_changed(counted_listener(&count));

    store.add_part(Part::new("R1")).unwrap();
    store.close().unwrap();
    store.open(dataset_path(&dir)).unwrap();
    store.delete_part("R1").unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 2);
}
