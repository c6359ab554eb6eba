use super::*;
use crate::foundation::core::{GridSize, Rgb8};
use crate::grid::cell::Cell;
use store::MemoryStore;

fn art(id: &str) -> Artwork {
    Artwork {
        id: id.to_owned(),
        name: format!("art {id}"),
        created_at: 1_700_000_000_000,
        cells: vec![Cell::new(1, 2, Rgb8::new(10, 20, 30))],
        theme_color: Rgb8::new(10, 20, 30),
        grid_size: GridSize::Fifty,
    }
}

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> PixelflowResult<Option<String>> {
        Err(PixelflowError::persistence("disk on fire"))
    }

    fn set(&mut self, _key: &str, _value: &str) -> PixelflowResult<()> {
        Err(PixelflowError::persistence("disk on fire"))
    }
}

#[test]
fn add_prepends_and_persists() {
    let mut h = HistoryStore::load(MemoryStore::new());
    assert!(h.is_empty());
    h.add(art("a")).unwrap();
    h.add(art("b")).unwrap();

    let ids: Vec<&str> = h.items().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);

    let reloaded = HistoryStore::load(h.store().clone());
    assert_eq!(reloaded.items(), h.items());
}

#[test]
fn delete_missing_id_is_a_noop() {
    let mut h = HistoryStore::load(MemoryStore::new());
    h.add(art("a")).unwrap();
    h.add(art("b")).unwrap();
    let before = h.store().get(HISTORY_KEY).unwrap();

    assert!(!h.delete("zzz").unwrap());
    assert_eq!(h.len(), 2);
    assert_eq!(h.store().get(HISTORY_KEY).unwrap(), before);
}

#[test]
fn delete_removes_exactly_one_and_keeps_order() {
    let mut h = HistoryStore::load(MemoryStore::new());
    for id in ["a", "b", "c", "d"] {
        h.add(art(id)).unwrap();
    }
    assert!(h.delete("c").unwrap());

    let ids: Vec<&str> = h.items().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["d", "b", "a"]);
    assert!(h.get("c").is_none());

    let reloaded = HistoryStore::load(h.store().clone());
    assert_eq!(reloaded.items(), h.items());
}

#[test]
fn unreadable_or_corrupt_history_degrades_to_empty() {
    let h = HistoryStore::load(BrokenStore);
    assert!(h.is_empty());

    let mut raw = MemoryStore::new();
    raw.set(HISTORY_KEY, "{not json").unwrap();
    let h = HistoryStore::load(raw);
    assert!(h.is_empty());
}

#[test]
fn failed_write_keeps_in_memory_state() {
    let mut h = HistoryStore::load(BrokenStore);
    let err = h.add(art("a")).unwrap_err();
    assert!(matches!(err, PixelflowError::Persistence(_)));
    assert_eq!(h.len(), 1);
}

#[test]
fn record_layout_matches_stored_format() {
    let json = serde_json::to_value(art("42")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "42",
            "name": "art 42",
            "createdAt": 1_700_000_000_000u64,
            "pixels": [{"x": 1, "y": 2, "color": "#0a141e", "id": "px-1-2"}],
            "themeColor": "#0a141e",
            "gridSize": 50
        })
    );
}

#[test]
fn legacy_records_infer_grid_size() {
    let raw = r##"[
        {"id":"1","name":"big","createdAt":1,"themeColor":"#4f46e5",
         "pixels":[{"x":75,"y":3,"color":"#ff0000","id":"p"}]},
        {"id":"2","name":"small","createdAt":2,"themeColor":"#4f46e5",
         "pixels":[{"x":49,"y":49,"color":"#ff0000","id":"q"}]}
    ]"##;
    let mut s = MemoryStore::new();
    s.set(HISTORY_KEY, raw).unwrap();
    let h = HistoryStore::load(s);
    assert_eq!(h.len(), 2);
    assert_eq!(h.items()[0].grid_size, GridSize::Hundred);
    assert_eq!(h.items()[1].grid_size, GridSize::Fifty);
    assert_eq!(h.items()[1].cell_set().unwrap().len(), 1);
}
