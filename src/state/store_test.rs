use super::*;

// =============================================================
// Reads and writes
// =============================================================

#[test]
fn reader_sees_writer_replacement() {
    let (writer, store) = Store::new(1_u32);
    assert_eq!(*store.get(), 1);
    writer.replace(2);
    assert_eq!(*store.get(), 2);
}

#[test]
fn old_snapshot_is_unaffected_by_replacement() {
    let (writer, store) = Store::new(vec![1, 2]);
    let before = store.get();
    writer.replace(vec![3]);
    assert_eq!(*before, vec![1, 2]);
    assert_eq!(*store.get(), vec![3]);
}

#[test]
fn replace_if_changed_skips_equal_values() {
    let (writer, store) = Store::new("a".to_owned());
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let _sub = store.subscribe(move |_| h.set(h.get() + 1));

    assert!(!writer.replace_if_changed("a".to_owned()));
    assert_eq!(hits.get(), 0);
    assert!(writer.replace_if_changed("b".to_owned()));
    assert_eq!(hits.get(), 1);
}

// =============================================================
// Observers
// =============================================================

#[test]
fn observer_receives_new_value() {
    let (writer, store) = Store::new(0_i32);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let _sub = store.subscribe(move |v| s.borrow_mut().push(**v));
    writer.replace(5);
    writer.replace(7);
    assert_eq!(*seen.borrow(), vec![5, 7]);
}

#[test]
fn dropping_subscription_removes_observer() {
    let (writer, store) = Store::new(0_i32);
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let sub = store.subscribe(move |_| h.set(h.get() + 1));
    assert_eq!(store.observer_count(), 1);
    drop(sub);
    assert_eq!(store.observer_count(), 0);
    writer.replace(1);
    assert_eq!(hits.get(), 0);
}

#[test]
fn observer_may_read_store_reentrantly() {
    let (writer, store) = Store::new(0_i32);
    let reader = store.clone();
    let seen = Rc::new(Cell::new(0));
    let s = seen.clone();
    let _sub = store.subscribe(move |_| s.set(*reader.get()));
    writer.replace(9);
    assert_eq!(seen.get(), 9);
}

#[test]
fn writer_reader_shares_value() {
    let (writer, _store) = Store::new(3_u8);
    let reader = writer.reader();
    writer.replace(4);
    assert_eq!(*reader.get(), 4);
    assert_eq!(*writer.get(), 4);
}
