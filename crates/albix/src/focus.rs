//! FocusRing: keyboard focus cycling between components.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = self.current.checked_sub(1).unwrap_or(self.items.len() - 1);
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Replace the ring contents, keeping the focused id when it survives.
    pub fn set_items(&mut self, items: Vec<ComponentId>) {
        let old = self.current();
        self.items = items;
        self.current = old
            .and_then(|id| self.items.iter().position(|&x| x == id))
            .unwrap_or(0);
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_and_keeps_focus_across_rebuilds() {
        let mut ring = FocusRing::new(vec![ComponentId::Playlist, ComponentId::Lyrics]);
        assert_eq!(ring.next(), Some(ComponentId::Lyrics));
        assert_eq!(ring.next(), Some(ComponentId::Playlist));
        assert_eq!(ring.prev(), Some(ComponentId::Lyrics));

        ring.set_items(vec![ComponentId::Lyrics]);
        assert!(ring.is_focused(ComponentId::Lyrics));

        ring.set_items(vec![ComponentId::Stations]);
        assert!(ring.is_focused(ComponentId::Stations));
        assert_eq!(FocusRing::default().next(), None);
    }
}
