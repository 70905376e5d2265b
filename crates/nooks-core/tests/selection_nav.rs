use nooks_core::{MemPrefs, MemStore, Nook, SelectionController};

fn nook(id: &str, name: &str) -> Nook {
    Nook {
        id: id.into(),
        name: name.into(),
        url: format!("nook://{id}"),
    }
}

fn seed() -> Vec<Nook> {
    vec![nook("1", "Alpha"), nook("2", "Beta"), nook("3", "Gamma")]
}

fn controller(nooks: Vec<Nook>) -> SelectionController {
    SelectionController::new(
        Box::new(MemStore::with_nooks(nooks)),
        Box::new(MemPrefs::new()),
    )
    .unwrap()
}

#[test]
fn next_walks_forward_and_previous_walks_back() {
    let mut c = controller(seed());
    assert!(c.selection().is_none());

    c.select_next();
    assert_eq!(c.selection().unwrap().name, "Alpha");
    c.select_next();
    assert_eq!(c.selection().unwrap().name, "Beta");
    c.select_previous();
    assert_eq!(c.selection().unwrap().name, "Alpha");
}

#[test]
fn navigation_wraps_at_both_ends() {
    let mut c = controller(seed());
    c.select_next(); // Alpha
    c.select_previous();
    assert_eq!(c.selection().unwrap().name, "Gamma");
    c.select_next();
    assert_eq!(c.selection().unwrap().name, "Alpha");
}

#[test]
fn previous_from_nothing_picks_the_last_visible() {
    let mut c = controller(seed());
    c.select_previous();
    assert_eq!(c.selection().unwrap().name, "Gamma");
}

#[test]
fn next_then_previous_is_identity() {
    let mut c = controller(seed());
    c.select_by_index(1); // Beta
    c.select_next();
    c.select_previous();
    assert_eq!(c.selection().unwrap().name, "Beta");
    c.select_previous();
    c.select_next();
    assert_eq!(c.selection().unwrap().name, "Beta");
}

#[test]
fn single_visible_nook_navigation_stays_put() {
    let mut c = controller(seed());
    c.set_filter_text("G");
    assert_eq!(c.visible_nooks().len(), 1);
    c.select_by_index(0);
    c.select_next();
    assert_eq!(c.selection().unwrap().name, "Gamma");
    c.select_previous();
    assert_eq!(c.selection().unwrap().name, "Gamma");
}

#[test]
fn navigation_on_empty_visible_set_is_a_no_op() {
    let mut c = controller(seed());
    c.select_by_index(0); // Alpha
    c.set_filter_text("zzz");
    assert!(c.visible_nooks().is_empty());
    c.select_next();
    assert_eq!(c.selection().unwrap().name, "Alpha");
    c.select_previous();
    assert_eq!(c.selection().unwrap().name, "Alpha");

    let mut empty = controller(Vec::new());
    empty.select_next();
    assert!(empty.selection().is_none());
}

#[test]
fn filter_change_does_not_clear_the_selection() {
    let mut c = controller(seed());
    c.select_by_index(1); // Beta
    c.set_filter_text("G");
    // Beta is no longer visible but stays selected.
    assert_eq!(c.selection().unwrap().name, "Beta");
    assert_eq!(c.visible_nooks().len(), 1);
}

#[test]
fn hidden_selection_falls_back_to_first_and_last_visible() {
    let mut c = controller(seed());
    c.select_by_index(1); // Beta
    c.set_filter_text("G");
    c.select_next();
    assert_eq!(c.selection().unwrap().name, "Gamma");

    let mut c = controller(seed());
    c.select_by_index(2); // Gamma
    c.set_filter_text("alp");
    c.select_previous();
    assert_eq!(c.selection().unwrap().name, "Alpha");
}
