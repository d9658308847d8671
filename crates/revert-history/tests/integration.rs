// Integration tests for the history engine.
//
// These tests drive a HistoryManager against a small key/value resource
// through the public API only, covering the full undo/redo lifecycle.

use std::collections::BTreeMap;

use revert_history::{HistoryConfig, HistoryError, HistoryManager, Operation, Outcome, Session};

type Store = BTreeMap<String, i32>;

#[derive(Debug, Clone, PartialEq)]
enum KvOp {
    Insert { key: String, value: i32 },
    Update { key: String, value: i32, previous: Option<i32> },
    Remove { key: String, removed: Option<i32> },
}

fn insert(key: &str, value: i32) -> KvOp {
    KvOp::Insert {
        key: key.to_string(),
        value,
    }
}

fn update(key: &str, value: i32) -> KvOp {
    KvOp::Update {
        key: key.to_string(),
        value,
        previous: None,
    }
}

fn remove(key: &str) -> KvOp {
    KvOp::Remove {
        key: key.to_string(),
        removed: None,
    }
}

impl Operation for KvOp {
    type Target = Store;
    type Error = String;

    fn apply(&mut self, store: &mut Store) -> Result<(), String> {
        match self {
            KvOp::Insert { key, value } => {
                if store.contains_key(key) {
                    return Err(format!("{key} exists"));
                }
                store.insert(key.clone(), *value);
            }
            KvOp::Update {
                key,
                value,
                previous,
            } => {
                let slot = store.get_mut(key).ok_or_else(|| format!("{key} missing"))?;
                *previous = Some(std::mem::replace(slot, *value));
            }
            KvOp::Remove { key, removed } => {
                *removed = Some(store.remove(key).ok_or_else(|| format!("{key} missing"))?);
            }
        }
        Ok(())
    }

    fn invert(&mut self, store: &mut Store) -> Result<(), String> {
        match self {
            KvOp::Insert { key, .. } => {
                store.remove(key).ok_or_else(|| format!("{key} missing"))?;
            }
            KvOp::Update { key, previous, .. } => {
                let previous = previous.ok_or("update was never applied")?;
                let slot = store.get_mut(key).ok_or_else(|| format!("{key} missing"))?;
                *slot = previous;
            }
            KvOp::Remove { key, removed } => {
                let removed = removed.ok_or("remove was never applied")?;
                if store.contains_key(key) {
                    return Err(format!("{key} exists"));
                }
                store.insert(key.clone(), removed);
            }
        }
        Ok(())
    }
}

fn keys(ops: &[KvOp]) -> Vec<&str> {
    ops.iter()
        .map(|op| match op {
            KvOp::Insert { key, .. } | KvOp::Update { key, .. } | KvOp::Remove { key, .. } => {
                key.as_str()
            }
        })
        .collect()
}

// ── Full Workflow ──────────────────────────────────────────────────────

#[test]
fn test_undo_n_restores_initial_state() {
    let mut store = Store::new();
    store.insert("seed".to_string(), 0);
    let initial = store.clone();

    let mut mgr = HistoryManager::new();
    mgr.execute(&mut store, insert("a", 1)).unwrap();
    mgr.execute(&mut store, update("a", 2)).unwrap();
    mgr.execute(&mut store, insert("b", 3)).unwrap();
    mgr.execute(&mut store, remove("seed")).unwrap();
    mgr.execute(&mut store, update("b", 4)).unwrap();

    for _ in 0..5 {
        assert_eq!(mgr.undo(&mut store).unwrap(), Outcome::Done);
    }
    assert_eq!(store, initial);
    assert_eq!(mgr.undo(&mut store).unwrap(), Outcome::EmptyHistory);

    // First executed is on top of the redo stack, so redo replays in order.
    assert_eq!(keys(mgr.redo_stack()), ["b", "seed", "b", "a", "a"]);
    while mgr.redo(&mut store).unwrap().is_done() {}
    let expected: Store = [("a".to_string(), 2), ("b".to_string(), 4)].into();
    assert_eq!(store, expected);
}

#[test]
fn test_execute_undo_redo_is_identity() {
    let mut store = Store::new();
    let mut mgr = HistoryManager::new();
    mgr.execute(&mut store, insert("k", 1)).unwrap();
    mgr.execute(&mut store, remove("k")).unwrap();
    let after_execute = store.clone();

    mgr.undo(&mut store).unwrap();
    assert_eq!(store.get("k"), Some(&1));
    mgr.redo(&mut store).unwrap();
    assert_eq!(store, after_execute);
}

// ── Redo Branch ────────────────────────────────────────────────────────

#[test]
fn test_new_work_discards_redo_branch() {
    let mut store = Store::new();
    let mut mgr = HistoryManager::new();
    mgr.execute(&mut store, insert("op1", 1)).unwrap();
    mgr.undo(&mut store).unwrap();
    mgr.execute(&mut store, insert("op2", 2)).unwrap();

    assert_eq!(mgr.undo_stack(), [insert("op2", 2)]);
    assert!(mgr.redo_stack().is_empty());
    assert_eq!(mgr.redo(&mut store).unwrap(), Outcome::EmptyHistory);
    assert!(!store.contains_key("op1"));
}

// ── Failures ───────────────────────────────────────────────────────────

#[test]
fn test_apply_failure_carries_reason() {
    let mut store = Store::new();
    let mut mgr = HistoryManager::new();
    mgr.execute(&mut store, insert("a", 1)).unwrap();
    let before: Vec<KvOp> = mgr.undo_stack().to_vec();

    let err = mgr.execute(&mut store, insert("a", 9)).unwrap_err();
    assert_eq!(err, HistoryError::ApplyFailed("a exists".to_string()));
    assert_eq!(err.reason().map(String::as_str), Some("a exists"));
    assert_eq!(mgr.undo_stack(), before.as_slice());
    assert_eq!(store.get("a"), Some(&1));
}

#[test]
fn test_invert_failure_requires_reconciliation() {
    let mut store = Store::new();
    let mut mgr = HistoryManager::new();
    mgr.execute(&mut store, insert("a", 1)).unwrap();
    mgr.execute(&mut store, remove("a")).unwrap();

    // Someone else recreates "a" behind the manager's back.
    store.insert("a".to_string(), 5);
    let err = mgr.undo(&mut store).unwrap_err();
    assert!(err.needs_reconciliation());
    assert_eq!(mgr.undo_len(), 1);
    assert_eq!(mgr.redo_len(), 0);

    // The remaining history is still usable after reconciliation.
    store.remove("a");
    store.insert("a".to_string(), 1);
    assert_eq!(mgr.undo(&mut store).unwrap(), Outcome::Done);
    assert!(store.is_empty());
}

// ── Capacity ───────────────────────────────────────────────────────────

#[test]
fn test_capacity_keeps_most_recent_in_order() {
    let mut store = Store::new();
    let mut mgr = HistoryManager::with_config(HistoryConfig::with_max_depth(3));
    for (i, key) in ["a", "b", "c", "d", "e", "f"].into_iter().enumerate() {
        mgr.execute(&mut store, insert(key, i as i32)).unwrap();
    }
    assert_eq!(keys(mgr.undo_stack()), ["d", "e", "f"]);
    assert_eq!(mgr.undo_all(&mut store).unwrap(), 3);
    assert_eq!(store.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
}

// ── Heterogeneous Operations ───────────────────────────────────────────

struct Scale(i32);

impl Operation for Scale {
    type Target = Store;
    type Error = String;

    fn apply(&mut self, store: &mut Store) -> Result<(), String> {
        store.values_mut().for_each(|v| *v *= self.0);
        Ok(())
    }

    fn invert(&mut self, store: &mut Store) -> Result<(), String> {
        store.values_mut().for_each(|v| *v /= self.0);
        Ok(())
    }
}

#[test]
fn test_boxed_operations_share_one_history() {
    let mut session: Session<Box<dyn Operation<Target = Store, Error = String>>> =
        Session::new(Store::new());
    session.execute(Box::new(insert("x", 2))).unwrap();
    session.execute(Box::new(Scale(10))).unwrap();
    assert_eq!(session.target().get("x"), Some(&20));
    assert_eq!(
        session.history().peek_undo().map(|op| op.describe()),
        Some("Scale".to_string())
    );

    session.undo().unwrap();
    session.undo().unwrap();
    assert!(session.target().is_empty());
}
