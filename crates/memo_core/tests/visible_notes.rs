use memo_core::{visible_notes, FilterMode, SteppingClock, Note, NoteChange};

fn note(clock: &SteppingClock, title: &str) -> Note {
    let mut note = Note::new(clock);
    note.apply(NoteChange::SetTitle(title.to_string()), clock);
    note
}

#[test]
fn pinned_note_precedes_newer_unpinned_note() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let mut older_pinned = note(&clock, "B");
    older_pinned.pinned = true;
    let newer_unpinned = note(&clock, "A");
    assert!(newer_unpinned.updated_at > older_pinned.updated_at);

    let notes = vec![newer_unpinned.clone(), older_pinned.clone()];
    let visible = visible_notes(&notes, FilterMode::All, "");
    assert_eq!(visible[0].id, older_pinned.id);
    assert_eq!(visible[1].id, newer_unpinned.id);
}

#[test]
fn unpinned_notes_order_by_updated_at_descending() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let first = note(&clock, "first");
    let second = note(&clock, "second");
    let third = note(&clock, "third");

    let notes = vec![second.clone(), first.clone(), third.clone()];
    let ids = visible_notes(&notes, FilterMode::All, "")
        .into_iter()
        .map(|n| n.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn search_is_case_insensitive_across_title_content_and_tags() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let mut tagged = note(&clock, "meeting");
    tagged.apply(NoteChange::AddTag("Work".to_string()), &clock);
    let mut body = note(&clock, "misc");
    body.apply(NoteChange::SetContent("call the PLUMBER".to_string()), &clock);
    let notes = vec![tagged.clone(), body.clone()];

    let by_tag = visible_notes(&notes, FilterMode::All, "work");
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].id, tagged.id);

    let by_content = visible_notes(&notes, FilterMode::All, "  plumber ");
    assert_eq!(by_content.len(), 1);
    assert_eq!(by_content[0].id, body.id);

    assert_eq!(visible_notes(&notes, FilterMode::All, "   ").len(), 2);
}

#[test]
fn pinned_filter_keeps_only_pinned_notes() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let mut pinned = note(&clock, "keep");
    pinned.apply(NoteChange::SetPinned(true), &clock);
    let plain = note(&clock, "drop");
    let notes = vec![plain, pinned.clone()];

    let visible = visible_notes(&notes, FilterMode::Pinned, "");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, pinned.id);
}

#[test]
fn visible_notes_is_idempotent() {
    let clock = SteppingClock::starting_at_epoch_2024();
    let mut notes = (0..6).map(|i| note(&clock, &format!("n{i}"))).collect::<Vec<_>>();
    notes[2].pinned = true;
    notes[4].pinned = true;

    let first = visible_notes(&notes, FilterMode::All, "n");
    let second = visible_notes(&notes, FilterMode::All, "n");
    assert_eq!(first, second);
}
