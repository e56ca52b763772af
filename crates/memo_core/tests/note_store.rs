use memo_core::{SteppingClock, InsertPosition, NoteChange, NoteStore};
use std::collections::HashSet;

fn store_with(count: usize, clock: &SteppingClock) -> (NoteStore, Vec<String>) {
    let mut store = NoteStore::new();
    let mut ids = Vec::new();
    for _ in 0..count {
        let note = store.create_note(clock);
        ids.push(note.id.clone());
        store.insert(note, InsertPosition::Back).unwrap();
    }
    (store, ids)
}

#[test]
fn create_note_does_not_insert() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let store = NoteStore::new();
    let _ = store.create_note(&clock);
    assert!(store.is_empty());
}

#[test]
fn update_refreshes_updated_at_and_keeps_created_at() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let (mut store, ids) = store_with(1, &clock);
    let before = store.find_by_id(&ids[0]).unwrap().clone();

    assert!(store.update(&ids[0], NoteChange::SetTitle("Groceries".to_string()), &clock));

    let after = store.find_by_id(&ids[0]).unwrap();
    assert_eq!(after.title, "Groceries");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[test]
fn update_unknown_id_is_noop() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let (mut store, _) = store_with(1, &clock);
    assert!(!store.update("missing", NoteChange::TogglePin, &clock));
}

#[test]
fn remove_selects_previous_note_in_collection_order() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let (mut store, ids) = store_with(3, &clock);
    store.set_active(&ids[2]);

    assert!(store.remove(&ids[2], &clock));
    assert_eq!(store.active_id(), Some(ids[1].as_str()));

    assert!(store.remove(&ids[0], &clock));
    assert_eq!(store.active_id(), Some(ids[1].as_str()));
}

#[test]
fn removing_last_note_synthesizes_replacement() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let (mut store, ids) = store_with(1, &clock);

    assert!(store.remove(&ids[0], &clock));
    assert_eq!(store.len(), 1);
    let replacement = store.active_note().unwrap();
    assert_ne!(replacement.id, ids[0]);
}

#[test]
fn set_active_ignores_unknown_and_current_ids() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let (mut store, ids) = store_with(2, &clock);

    assert!(store.set_active(&ids[0]));
    assert!(!store.set_active(&ids[0]));
    assert!(!store.set_active("missing"));
    assert_eq!(store.active_id(), Some(ids[0].as_str()));
}

#[test]
fn mixed_operation_sequence_keeps_ids_unique_and_store_non_empty() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let mut store = NoteStore::new();
    store.ensure_not_empty(&clock);

    for round in 0..40 {
        match round % 4 {
            0 | 1 => {
                let note = store.create_note(&clock);
                store.insert(note, InsertPosition::Front).unwrap();
            }
            2 => {
                let id = store.notes()[0].id.clone();
                store.update(&id, NoteChange::AddTag(format!("t{round}")), &clock);
            }
            _ => {
                let id = store.notes()[store.len() / 2].id.clone();
                store.remove(&id, &clock);
                let id = store.notes()[0].id.clone();
                store.remove(&id, &clock);
            }
        }

        assert!(!store.is_empty());
        let unique = store.notes().iter().map(|n| n.id.as_str()).collect::<HashSet<_>>();
        assert_eq!(unique.len(), store.len());
        if let Some(active) = store.active_id() {
            assert!(store.find_by_id(active).is_some());
        }
        for note in store.notes() {
            assert!(note.updated_at >= note.created_at);
        }
    }
}

#[test]
fn replace_all_regenerates_repeated_ids() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let mut store = NoteStore::new();
    let note = store.create_note(&clock);
    let mut twin = note.clone();
    twin.title = "twin".to_string();

    store.replace_all(vec![note.clone(), twin], &clock);

    assert_eq!(store.len(), 2);
    let unique = store.notes().iter().map(|n| n.id.as_str()).collect::<HashSet<_>>();
    assert_eq!(unique.len(), 2);
    assert_eq!(store.notes()[0].id, note.id);
    assert_eq!(store.notes()[1].title, "twin");
    let active = store.active_id().unwrap();
    assert!(store.find_by_id(active).is_some());
}
