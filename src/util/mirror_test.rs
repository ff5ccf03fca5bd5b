use super::*;

#[test]
fn signal_starts_from_store_and_follows_writes() {
    let owner = Owner::new();
    owner.with(|| {
        let (writer, store) = Store::new(1_u32);
        let signal = mirror_store(&store);
        assert_eq!(signal.get_untracked(), 1);

        writer.replace(2);
        writer.replace(3);
        assert_eq!(signal.get_untracked(), 3);
    });
}

#[test]
fn observer_is_released_with_its_owner() {
    let owner = Owner::new();
    let (writer, store) = Store::new(String::from("a"));
    owner.with(|| {
        let _signal = mirror_store(&store);
    });
    assert_eq!(store.observer_count(), 1);

    owner.cleanup();
    assert_eq!(store.observer_count(), 0);
    writer.replace(String::from("b"));
}
