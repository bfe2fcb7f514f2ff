use std::collections::HashSet;

use tracing::debug;

use widgetcanvas_core::{Listeners, SelectionError, SubscriptionId, WidgetId};

use crate::model::Selectable;

/// Lookup the selection manager uses to reach widgets it does not own.
pub trait SelectableStore {
    /// Mutable access to a widget by identifier.
    fn selectable_mut(&mut self, id: &WidgetId) -> Option<&mut dyn Selectable>;
    /// Bring a widget to the front of the draw order.
    fn raise_to_top(&mut self, id: &WidgetId) -> bool;
}

/// Notifications published by [`SelectionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected { id: WidgetId },
    Deselected { id: WidgetId },
    MultiSelectEntered,
    Toggled { id: WidgetId, selected: bool },
    MultiSelectExited,
}

/// Selection mode and members.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// Exactly one widget selected.
    Single(WidgetId),
    /// Multi-select mode. `current` is the most recently added member.
    Multi {
        selected: Vec<WidgetId>,
        current: Option<WidgetId>,
    },
}

/// Manages widget selection state.
///
/// `SelectionManager` is responsible for:
/// - Tracking which widgets are registered and therefore selectable
/// - Enforcing single selection outside multi-select mode
/// - Toggling membership while multi-select mode is active
/// - Raising newly selected widgets to the front
/// - Notifying observers of every transition
///
/// # Selection Model
///
/// - **Idle**: no widget is selected
/// - **Single**: selecting a widget first deselects any other selected widget
/// - **Multi**: entered explicitly; toggling adds or removes widgets without
///   touching the rest of the set; exiting deselects everything
///
/// # Design
///
/// The manager does not own widgets. Every operation that changes a widget's
/// selected mark takes a [`SelectableStore`] to reach it.
#[derive(Debug, Default)]
pub struct SelectionManager {
    registered: HashSet<WidgetId>,
    state: SelectionState,
    listeners: Listeners<SelectionEvent>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no registered widgets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a widget selectable.
    ///
    /// # Returns
    ///
    /// `true` if the widget was not registered before.
    pub fn register(&mut self, item: &dyn Selectable) -> bool {
        self.register_id(item.identifier())
    }

    /// Makes a widget selectable by identifier.
    pub fn register_id(&mut self, id: WidgetId) -> bool {
        self.registered.insert(id)
    }

    /// Removes a widget from the selectable set.
    ///
    /// If the widget is selected it is deselected first, so the state never
    /// refers to an unregistered widget.
    ///
    /// # Arguments
    ///
    /// * `store` - Store used to clear the widget's selected mark
    /// * `id` - The widget to unregister
    pub fn unregister(&mut self, store: &mut dyn SelectableStore, id: &WidgetId) -> bool {
        if !self.registered.contains(id) {
            return false;
        }
        self.deselect(store, id);
        self.registered.remove(id)
    }

    pub fn is_registered(&self, id: &WidgetId) -> bool {
        self.registered.contains(id)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    /// Selects a widget.
    ///
    /// Outside multi-select mode any other selected widget is deselected
    /// first. In multi-select mode the widget is added to the set and becomes
    /// the current one. The widget is raised to the front either way.
    ///
    /// # Errors
    ///
    /// [`SelectionError::NotRegistered`] if the widget is unknown.
    pub fn select(
        &mut self,
        store: &mut dyn SelectableStore,
        id: &WidgetId,
    ) -> Result<(), SelectionError> {
        self.ensure_registered(id)?;

        match &mut self.state {
            SelectionState::Single(current) if current == id => {
                store.raise_to_top(id);
                return Ok(());
            }
            SelectionState::Single(current) => {
                let previous = *current;
                set_mark(store, &previous, false);
                self.state = SelectionState::Idle;
                self.listeners
                    .emit(&SelectionEvent::Deselected { id: previous });
            }
            SelectionState::Multi { selected, current } => {
                if !selected.contains(id) {
                    selected.push(*id);
                }
                *current = Some(*id);
                set_mark(store, id, true);
                store.raise_to_top(id);
                self.listeners.emit(&SelectionEvent::Selected { id: *id });
                return Ok(());
            }
            SelectionState::Idle => {}
        }

        set_mark(store, id, true);
        store.raise_to_top(id);
        self.state = SelectionState::Single(*id);
        debug!("Selected widget {}", id.short());
        self.listeners.emit(&SelectionEvent::Selected { id: *id });
        Ok(())
    }

    /// Deselects a widget if it is selected.
    ///
    /// # Returns
    ///
    /// `true` if the widget was selected.
    pub fn deselect(&mut self, store: &mut dyn SelectableStore, id: &WidgetId) -> bool {
        let was_selected = match &mut self.state {
            SelectionState::Single(current) => {
                let matches = *current == *id;
                if matches {
                    self.state = SelectionState::Idle;
                }
                matches
            }
            SelectionState::Multi { selected, current } => {
                let before = selected.len();
                selected.retain(|other| other != id);
                if current.as_ref() == Some(id) {
                    *current = selected.last().copied();
                }
                selected.len() != before
            }
            _ => false,
        };

        if was_selected {
            set_mark(store, id, false);
            self.listeners.emit(&SelectionEvent::Deselected { id: *id });
        }
        was_selected
    }

    /// Deselects every selected widget.
    ///
    /// Multi-select mode, if active, stays active with an empty set.
    ///
    /// # Returns
    ///
    /// The number of widgets that were deselected.
    pub fn deselect_all(&mut self, store: &mut dyn SelectableStore) -> usize {
        let ids = self.selected_ids();
        for id in &ids {
            self.deselect(store, id);
        }
        ids.len()
    }

    /// Enters multi-select mode.
    ///
    /// A widget that was singly selected becomes the first member of the set.
    /// Does nothing if multi-select mode is already active.
    pub fn enter_multi_select(&mut self) {
        let selected = match &self.state {
            SelectionState::Multi { .. } => return,
            SelectionState::Single(id) => vec![*id],
            SelectionState::Idle => Vec::new(),
        };
        let current = selected.last().copied();
        self.state = SelectionState::Multi { selected, current };
        debug!("Entered multi-select");
        self.listeners.emit(&SelectionEvent::MultiSelectEntered);
    }

    /// Adds the widget to the multi-selection, or removes it if present.
    ///
    /// Enters multi-select mode first when it is not active.
    ///
    /// # Returns
    ///
    /// Whether the widget is selected after the toggle.
    pub fn toggle_selection(
        &mut self,
        store: &mut dyn SelectableStore,
        id: &WidgetId,
    ) -> Result<bool, SelectionError> {
        self.ensure_registered(id)?;
        self.enter_multi_select();

        let SelectionState::Multi { selected, current } = &mut self.state else {
            return Ok(false);
        };

        let now_selected = if let Some(index) = selected.iter().position(|other| other == id) {
            selected.remove(index);
            if current.as_ref() == Some(id) {
                *current = selected.last().copied();
            }
            set_mark(store, id, false);
            false
        } else {
            selected.push(*id);
            *current = Some(*id);
            set_mark(store, id, true);
            store.raise_to_top(id);
            true
        };

        self.listeners.emit(&SelectionEvent::Toggled {
            id: *id,
            selected: now_selected,
        });
        Ok(now_selected)
    }

    /// Leaves multi-select mode, deselecting every member of the set.
    pub fn exit_multi_select(&mut self, store: &mut dyn SelectableStore) {
        if !self.is_multi_select() {
            return;
        }
        let SelectionState::Multi { selected, .. } = std::mem::take(&mut self.state) else {
            return;
        };
        for id in &selected {
            set_mark(store, id, false);
        }
        debug!("Exited multi-select ({} deselected)", selected.len());
        self.listeners.emit(&SelectionEvent::MultiSelectExited);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_multi_select(&self) -> bool {
        matches!(self.state, SelectionState::Multi { .. })
    }

    /// The single selected widget, or the current member in multi-select mode.
    pub fn current(&self) -> Option<WidgetId> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Single(id) => Some(*id),
            SelectionState::Multi { current, .. } => *current,
        }
    }

    /// Every selected widget, in selection order.
    pub fn selected_ids(&self) -> Vec<WidgetId> {
        match &self.state {
            SelectionState::Idle => Vec::new(),
            SelectionState::Single(id) => vec![*id],
            SelectionState::Multi { selected, .. } => selected.clone(),
        }
    }

    pub fn selected_count(&self) -> usize {
        match &self.state {
            SelectionState::Idle => 0,
            SelectionState::Single(_) => 1,
            SelectionState::Multi { selected, .. } => selected.len(),
        }
    }

    pub fn is_selected(&self, id: &WidgetId) -> bool {
        match &self.state {
            SelectionState::Idle => false,
            SelectionState::Single(current) => current == id,
            SelectionState::Multi { selected, .. } => selected.contains(id),
        }
    }

    /// Registers an observer for selection transitions.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&SelectionEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Forgets every registration and resets to idle without notifying.
    pub fn reset(&mut self) {
        self.registered.clear();
        self.state = SelectionState::Idle;
    }

    fn ensure_registered(&self, id: &WidgetId) -> Result<(), SelectionError> {
        if self.registered.contains(id) {
            Ok(())
        } else {
            Err(SelectionError::NotRegistered { id: *id })
        }
    }
}

fn set_mark(store: &mut dyn SelectableStore, id: &WidgetId, selected: bool) {
    if let Some(item) = store.selectable_mut(id) {
        if selected {
            item.show_selected();
        } else {
            item.hide_selected();
        }
    }
}
