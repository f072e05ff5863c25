//! Action list — the ordered actions of one phase.

use super::entry::ActionEntry;

/// Ordered, mutable collection of [`ActionEntry`].
///
/// Iteration order is execution order; nothing here ever reorders entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionList {
    entries: Vec<ActionEntry>,
}

impl ActionList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a default (`TurnOn`) entry and return its index.
    pub fn add(&mut self) -> usize {
        self.push(ActionEntry::default())
    }

    /// Append `entry` and return its index.
    pub fn push(&mut self, entry: ActionEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Remove and return the entry at `index`, or `None` if out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<ActionEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Replace every entry, keeping the order of `entries`.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = ActionEntry>) {
        self.entries = entries.into_iter().collect();
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActionEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ActionEntry> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActionEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ActionEntry> for ActionList {
    fn from_iter<I: IntoIterator<Item = ActionEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ActionList {
    type Item = &'a ActionEntry;
    type IntoIter = std::slice::Iter<'a, ActionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, FieldKey, FieldValue};

    fn kinds(list: &ActionList) -> Vec<ActionKind> {
        list.iter().map(ActionEntry::kind).collect()
    }

    #[test]
    fn should_append_default_turn_on_entry() {
        let mut list = ActionList::new();
        assert_eq!(list.add(), 0);
        assert_eq!(list.add(), 1);
        assert_eq!(kinds(&list), [ActionKind::TurnOn, ActionKind::TurnOn]);
    }

    #[test]
    fn should_keep_order_after_removal() {
        let mut list: ActionList = [
            ActionKind::TurnOn,
            ActionKind::RouteVideo,
            ActionKind::StartAutoshutdown,
        ]
        .into_iter()
        .map(ActionEntry::new)
        .collect();

        let removed = list.remove_at(1).unwrap();
        assert_eq!(removed.kind(), ActionKind::RouteVideo);
        assert_eq!(
            kinds(&list),
            [ActionKind::TurnOn, ActionKind::StartAutoshutdown]
        );
    }

    #[test]
    fn should_return_none_when_removing_out_of_range() {
        let mut list = ActionList::new();
        list.add();
        assert!(list.remove_at(3).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn should_replace_all_entries() {
        let mut list = ActionList::new();
        list.add();
        list.replace_all([
            ActionEntry::new(ActionKind::HidePage),
            ActionEntry::new(ActionKind::TurnOff),
        ]);
        assert_eq!(kinds(&list), [ActionKind::HidePage, ActionKind::TurnOff]);
    }

    #[test]
    fn should_edit_entry_in_place() {
        let mut list = ActionList::new();
        let index = list.add();
        list.get_mut(index)
            .unwrap()
            .set_field(FieldKey::Device, "proj1");
        assert_eq!(
            list.get(index).unwrap().field(FieldKey::Device),
            Some(&FieldValue::from("proj1"))
        );
    }
}
