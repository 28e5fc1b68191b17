use shared::ZoneId;

/// Zone selection state (single-select).
///
/// Invariant: a present id always refers to a zone in the current
/// layout; `retain_valid` is called after every layout change to keep
/// it that way.
#[derive(Default)]
pub struct SelectionState {
    selected: Option<ZoneId>,
}

impl SelectionState {
    /// Currently selected zone, if any
    pub fn selected(&self) -> Option<&ZoneId> {
        self.selected.as_ref()
    }

    /// Check if a zone is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Select a zone, replacing any previous selection
    pub fn select(&mut self, id: ZoneId) {
        self.selected = Some(id);
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if its zone no longer exists
    pub fn retain_valid<'a>(&mut self, live: impl Iterator<Item = &'a ZoneId>) {
        if let Some(id) = &self.selected {
            let mut live = live;
            if !live.any(|z| z == id) {
                self.selected = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_replaces_previous() {
        let mut sel = SelectionState::default();
        sel.select("a".to_string());
        sel.select("b".to_string());
        assert!(sel.is_selected("b"));
        assert!(!sel.is_selected("a"));
    }

    #[test]
    fn test_clear() {
        let mut sel = SelectionState::default();
        sel.select("a".to_string());
        sel.clear();
        assert!(sel.selected().is_none());
    }

    #[test]
    fn test_retain_valid_drops_dead_id() {
        let mut sel = SelectionState::default();
        sel.select("a".to_string());
        let live = ["b".to_string(), "c".to_string()];
        sel.retain_valid(live.iter());
        assert!(sel.selected().is_none());
    }

    #[test]
    fn test_retain_valid_keeps_live_id() {
        let mut sel = SelectionState::default();
        sel.select("b".to_string());
        let live = ["b".to_string()];
        sel.retain_valid(live.iter());
        assert!(sel.is_selected("b"));
    }
}
