//! Selection and navigation state over the nook collection.
//!
//! [`SelectionController`] owns a sorted cache of every nook, the live
//! filter text, and the current selection. Four kinds of stimuli move the
//! selection: explicit index selection, next/previous navigation, list
//! mutation (create/rename/delete/update), and startup restoration from
//! the last-viewed preference. Stale stimuli (an index from before a
//! filter change, navigation on an empty view) are silent no-ops.

use crate::{Nook, NookStore, PreferenceSink};
use tracing::warn;

/// State handed to change listeners after each state-changing operation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub nooks: Vec<Nook>,
    pub filter: String,
    pub selection: Option<Nook>,
}

type Listener = Box<dyn Fn(&Snapshot)>;

pub struct SelectionController {
    store: Box<dyn NookStore>,
    prefs: Box<dyn PreferenceSink>,
    // Cached projection of the store, always sorted by name ascending.
    nooks: Vec<Nook>,
    filter: String,
    selection: Option<Nook>,
    listeners: Vec<Listener>,
}

impl SelectionController {
    /// Fetches the nook list and restores the selection recorded by a
    /// previous session, if its url still resolves. Never writes to the
    /// store or the preference sink.
    pub fn new(
        store: Box<dyn NookStore>,
        prefs: Box<dyn PreferenceSink>,
    ) -> anyhow::Result<Self> {
        let mut nooks = store.fetch_all()?;
        nooks.sort_by(|a, b| a.name.cmp(&b.name));
        let selection = match prefs.last_viewed() {
            Ok(Some(url)) => nooks.iter().find(|n| n.url == url).cloned(),
            Ok(None) => None,
            Err(e) => {
                warn!("last-viewed preference unreadable: {e:#}");
                None
            }
        };
        Ok(Self {
            store,
            prefs,
            nooks,
            filter: String::new(),
            selection,
            listeners: Vec::new(),
        })
    }

    pub fn nooks(&self) -> &[Nook] {
        &self.nooks
    }

    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    pub fn selection(&self) -> Option<&Nook> {
        self.selection.as_ref()
    }

    /// Nooks whose name contains the filter text, case-insensitively, in
    /// list order. The whole list when the filter is empty.
    pub fn visible_nooks(&self) -> Vec<Nook> {
        self.visible_indices()
            .into_iter()
            .map(|i| self.nooks[i].clone())
            .collect()
    }

    /// Selects the `i`-th visible nook. Out-of-range indices are ignored:
    /// hotkey indices can be stale relative to a just-changed filter or
    /// list, and that must not be an error.
    pub fn select_by_index(&mut self, i: usize) {
        let vis = self.visible_indices();
        let Some(&ix) = vis.get(i) else { return };
        let nook = self.nooks[ix].clone();
        self.commit(nook);
    }

    /// Advances the selection to the next visible nook, wrapping at the
    /// end. With no usable current selection, starts at the first.
    pub fn select_next(&mut self) {
        let vis = self.visible_indices();
        if vis.is_empty() {
            return;
        }
        let target = match self.selected_pos(&vis) {
            Some(p) => (p + 1) % vis.len(),
            None => 0,
        };
        self.step_to(&vis, target);
    }

    /// Counterpart of [`select_next`](Self::select_next): moves backwards,
    /// wrapping at the start; with no usable selection, picks the last.
    pub fn select_previous(&mut self) {
        let vis = self.visible_indices();
        if vis.is_empty() {
            return;
        }
        let target = match self.selected_pos(&vis) {
            Some(p) => (p + vis.len() - 1) % vis.len(),
            None => vis.len() - 1,
        };
        self.step_to(&vis, target);
    }

    /// Re-fetches the list from the store. Selection and filter are left
    /// alone; a selection whose nook vanished underneath us is healed by
    /// the delete path, not here.
    pub fn refresh(&mut self) -> anyhow::Result<()> {
        self.reload()?;
        self.notify();
        Ok(())
    }

    /// Creates a nook, or selects the existing one when `name` collides
    /// case-insensitively with a nook we already have. Returns `None` when
    /// the store declines, leaving all state unchanged.
    pub fn create(&mut self, name: &str) -> Option<Nook> {
        let wanted = name.to_lowercase();
        if let Some(existing) = self
            .nooks
            .iter()
            .find(|n| n.name.to_lowercase() == wanted)
            .cloned()
        {
            self.commit(existing.clone());
            return Some(existing);
        }
        match self.store.create(name) {
            Ok(nook) => {
                if let Err(e) = self.reload() {
                    warn!("reload after create failed: {e:#}");
                }
                self.filter.clear();
                self.commit(nook.clone());
                Some(nook)
            }
            Err(e) => {
                warn!("create {name:?} declined: {e:#}");
                None
            }
        }
    }

    /// Deletes a nook, dropping it from the cache without a re-fetch and
    /// clearing the selection if it pointed at the deleted nook.
    pub fn delete(&mut self, nook: &Nook) -> anyhow::Result<()> {
        self.store.delete(nook)?;
        self.nooks.retain(|n| n.id != nook.id);
        if self.selection.as_ref().is_some_and(|s| s.id == nook.id) {
            self.selection = None;
        }
        self.notify();
        Ok(())
    }

    /// Renames a nook and focuses the result, whether or not it was
    /// selected before. Returns `None` when the store declines.
    pub fn rename(&mut self, nook: &Nook, new_name: &str) -> Option<Nook> {
        match self.store.rename(nook, new_name) {
            Ok(renamed) => {
                // Name is the sort key, so the cache must be re-sorted.
                if let Err(e) = self.reload() {
                    warn!("reload after rename failed: {e:#}");
                }
                self.commit(renamed.clone());
                Some(renamed)
            }
            Err(e) => {
                warn!("rename {} declined: {e:#}", nook.id);
                None
            }
        }
    }

    /// Applies a field update. The cache entry is swapped in place (only
    /// rename changes the sort key) and a matching selection follows the
    /// new data. Returns `None` when the store declines.
    pub fn update(&mut self, nook: &Nook) -> Option<Nook> {
        match self.store.update(nook) {
            Ok(updated) => {
                if let Some(slot) = self.nooks.iter_mut().find(|n| n.id == updated.id) {
                    *slot = updated.clone();
                }
                if self.selection.as_ref().is_some_and(|s| s.id == updated.id) {
                    self.selection = Some(updated.clone());
                }
                self.notify();
                Some(updated)
            }
            Err(e) => {
                warn!("update {} declined: {e:#}", nook.id);
                None
            }
        }
    }

    /// Replaces the filter text verbatim. The visible set changes
    /// implicitly; the selection is deliberately left alone even when the
    /// new filter hides it.
    pub fn set_filter_text<S: Into<String>>(&mut self, text: S) {
        self.filter = text.into();
        self.notify();
    }

    /// Registers a listener invoked with a state snapshot after every
    /// state-changing operation.
    pub fn subscribe<F: Fn(&Snapshot) + 'static>(&mut self, f: F) {
        self.listeners.push(Box::new(f));
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nooks: self.nooks.clone(),
            filter: self.filter.clone(),
            selection: self.selection.clone(),
        }
    }

    // Indices into `self.nooks` of the currently visible nooks.
    fn visible_indices(&self) -> Vec<usize> {
        if self.filter.is_empty() {
            return (0..self.nooks.len()).collect();
        }
        let needle = self.filter.to_lowercase();
        self.nooks
            .iter()
            .enumerate()
            .filter(|(_, n)| n.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    // Position of the current selection within the visible set, if it is
    // visible at all.
    fn selected_pos(&self, vis: &[usize]) -> Option<usize> {
        let sel = self.selection.as_ref()?;
        vis.iter().position(|&ix| self.nooks[ix].id == sel.id)
    }

    // Navigation landing on the nook already selected (a one-item view
    // wrapping onto itself) is a no-op: nothing changes, nothing persists.
    fn step_to(&mut self, vis: &[usize], pos: usize) {
        let nook = self.nooks[vis[pos]].clone();
        if self.selection.as_ref().is_some_and(|s| s.id == nook.id) {
            return;
        }
        self.commit(nook);
    }

    // Makes `nook` the selection and records it as last viewed.
    fn commit(&mut self, nook: Nook) {
        if let Err(e) = self.prefs.write_last_viewed(&nook) {
            warn!("persisting last-viewed failed: {e:#}");
        }
        self.selection = Some(nook);
        self.notify();
    }

    fn reload(&mut self) -> anyhow::Result<()> {
        let mut nooks = self.store.fetch_all()?;
        nooks.sort_by(|a, b| a.name.cmp(&b.name));
        self.nooks = nooks;
        Ok(())
    }

    fn notify(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let snap = self.snapshot();
        for l in &self.listeners {
            l(&snap);
        }
    }
}
