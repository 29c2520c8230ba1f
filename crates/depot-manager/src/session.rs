//! # Session State
//!
//! Per-caller state that lives between requests.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Fields                                       │
//! │                                                                         │
//! │  Field               Kind         Set by               Cleared by       │
//! │  ─────               ────         ──────               ──────────       │
//! │                                                                         │
//! │  current_warehouse   persistent   create / select      delete_current   │
//! │                                                        (or a snapshot   │
//! │                                                         that no longer  │
//! │                                                         finds it)       │
//! │                                                                         │
//! │  pending_error       one-shot     any rejection        every snapshot   │
//! │                                                                         │
//! │  pending_edit        one-shot     request_edit         every snapshot   │
//! │                                                                         │
//! │  POST /add_item ──► manager op ──► redirect ──► GET / ──► get_snapshot  │
//! │                     (may set a one-shot)                (takes both)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `known_warehouses` is not stored here. It is read from the catalog on
//! every snapshot, so sessions sharing a database always agree on it.

use depot_core::{Item, WarehouseName};

// =============================================================================
// OneShot
// =============================================================================

/// A value that is read at most once.
///
/// Setting replaces any previous value; taking leaves the slot empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneShot<T>(Option<T>);

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        OneShot(None)
    }
}

impl<T> OneShot<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        OneShot(None)
    }

    /// Stores a value, replacing any previous one.
    pub fn set(&mut self, value: T) {
        self.0 = Some(value);
    }

    /// Removes and returns the value.
    pub fn take(&mut self) -> Option<T> {
        self.0.take()
    }

    /// Looks at the value without consuming it.
    pub fn peek(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

// =============================================================================
// Session
// =============================================================================

/// The transient fields taken by one snapshot read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transient {
    pub pending_edit_payload: Option<Item>,
    pub pending_error: Option<String>,
}

/// State for one caller (one browser session, one test).
///
/// Sessions are independent: two sessions over the same database keep their
/// own selection and their own one-shot fields.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current_warehouse: Option<WarehouseName>,
    pending_error: OneShot<String>,
    pending_edit: OneShot<Item>,
}

impl Session {
    /// Creates a session with no selection and empty one-shot fields.
    pub fn new() -> Self {
        Session::default()
    }

    /// The selected warehouse, if any.
    pub fn current_warehouse(&self) -> Option<&WarehouseName> {
        self.current_warehouse.as_ref()
    }

    /// The pending error message, without consuming it.
    pub fn pending_error(&self) -> Option<&str> {
        self.pending_error.peek().map(String::as_str)
    }

    /// The staged edit payload, without consuming it.
    pub fn pending_edit(&self) -> Option<&Item> {
        self.pending_edit.peek()
    }

    /// Returns both one-shot fields and clears them.
    pub fn take_transient(&mut self) -> Transient {
        Transient {
            pending_edit_payload: self.pending_edit.take(),
            pending_error: self.pending_error.take(),
        }
    }

    pub(crate) fn select(&mut self, warehouse: WarehouseName) {
        self.current_warehouse = Some(warehouse);
    }

    pub(crate) fn clear_selection(&mut self) -> Option<WarehouseName> {
        self.current_warehouse.take()
    }

    pub(crate) fn record_error(&mut self, message: String) {
        self.pending_error.set(message);
    }

    pub(crate) fn stage_edit(&mut self, item: Item) {
        self.pending_edit.set(item);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_take_once() {
        let mut slot = OneShot::new();
        assert!(!slot.is_set());

        slot.set(1);
        slot.set(2);
        assert_eq!(slot.peek(), Some(&2));
        assert_eq!(slot.take(), Some(2));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_take_transient_clears_both() {
        let mut session = Session::new();
        let item = Item {
            name: "Bolt".to_string(),
            id: 1,
            quantity: 3,
            other: String::new(),
        };

        session.record_error("IDs must be unique.".to_string());
        session.stage_edit(item.clone());
        assert_eq!(session.pending_error(), Some("IDs must be unique."));

        let transient = session.take_transient();
        assert_eq!(transient.pending_edit_payload, Some(item));
        assert_eq!(transient.pending_error.as_deref(), Some("IDs must be unique."));

        assert_eq!(session.take_transient(), Transient::default());
    }

    #[test]
    fn test_selection_survives_take() {
        let mut session = Session::new();
        let main = WarehouseName::parse("Main").unwrap();

        session.select(main.clone());
        let _ = session.take_transient();
        assert_eq!(session.current_warehouse(), Some(&main));

        assert_eq!(session.clear_selection(), Some(main));
        assert!(session.current_warehouse().is_none());
    }
}
