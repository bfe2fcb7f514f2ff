//! Grouping Engine
//!
//! Combines two or more top-level widgets into a group widget whose frame is
//! the padded union of the members' frames. Members are reparented into the
//! group's local coordinate space, and a snapshot of the group frame and
//! every member frame at creation time is kept so later group resizes scale
//! members from that original state instead of compounding rounding.
//!
//! Ungrouping lifts members back to canvas coordinates at their current
//! visual positions and removes the group widget.

use std::collections::HashSet;

use tracing::{info, warn};

use widgetcanvas_core::{
    CanvasFrame, GroupLocalSpace, GroupingError, LocalFrame, Point, Rect, Size, WidgetId,
};

use crate::model::{Selectable, Widget, WidgetKind};
use crate::selection_manager::SelectionManager;
use crate::store::WidgetStore;

/// Group payload carried by [`WidgetKind::Group`].
#[derive(Debug, Clone)]
pub struct Group {
    members: Vec<Widget<GroupLocalSpace>>,
    original_frame: Rect,
    original_member_frames: Vec<LocalFrame>,
    /// Label of the set the members came from, if they share one.
    pub owner_label: Option<String>,
}

impl Group {
    /// Build a group from members already expressed in group-local space.
    ///
    /// `frame` is the group's canvas frame; it and the current member
    /// frames become the baseline for proportional resizing.
    pub fn new(
        members: Vec<Widget<GroupLocalSpace>>,
        frame: Rect,
        owner_label: Option<String>,
    ) -> Self {
        let original_member_frames = members.iter().map(|m| m.frame()).collect();
        Self {
            members,
            original_frame: frame,
            original_member_frames,
            owner_label,
        }
    }

    pub fn members(&self) -> &[Widget<GroupLocalSpace>] {
        &self.members
    }

    pub fn members_mut(&mut self) -> impl Iterator<Item = &mut Widget<GroupLocalSpace>> {
        self.members.iter_mut()
    }

    pub fn member_ids(&self) -> Vec<WidgetId> {
        self.members.iter().map(|m| m.id).collect()
    }

    pub fn original_frame(&self) -> Rect {
        self.original_frame
    }

    pub fn original_member_frames(&self) -> &[LocalFrame] {
        &self.original_member_frames
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Scale every member from its original frame to match a group size of `new_size`.
    ///
    /// Factors are per axis (`new.w / original.w`, `new.h / original.h`),
    /// applied to both origin and size in group-local space. Text members are
    /// re-baselined afterwards.
    pub fn apply_resize(&mut self, new_size: Size) {
        let original = self.original_frame.size();
        if original.is_empty() {
            return;
        }
        let sx = new_size.width / original.width;
        let sy = new_size.height / original.height;

        for (member, start) in self.members.iter_mut().zip(&self.original_member_frames) {
            let r = start.rect();
            member.set_frame(LocalFrame::from_xywh(
                r.x * sx,
                r.y * sy,
                r.width * sx,
                r.height * sy,
            ));
            member.rebaseline();
        }
    }

    /// Canvas-space copies of the members, given the group's current canvas origin.
    pub fn members_on_canvas(&self, group_origin: Point) -> Vec<Widget> {
        self.members
            .iter()
            .cloned()
            .map(|m| m.into_canvas(group_origin))
            .collect()
    }

    fn into_members(self) -> Vec<Widget<GroupLocalSpace>> {
        self.members
    }
}

/// Outcome of a conflict-policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPermission {
    Allowed,
    Denied(String),
}

/// Decides whether a set of widgets may be grouped together.
pub trait GroupConflictPolicy: Send + Sync {
    fn check(&self, candidates: &[&Widget]) -> GroupPermission;
}

/// Rejects groups mixing widgets from different provenance sets.
///
/// Widgets without provenance combine with anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvenancePolicy;

impl GroupConflictPolicy for ProvenancePolicy {
    fn check(&self, candidates: &[&Widget]) -> GroupPermission {
        let mut seen: Vec<&str> = Vec::new();
        for widget in candidates {
            if let Some(tag) = widget.provenance.as_deref() {
                if !seen.contains(&tag) {
                    seen.push(tag);
                }
            }
        }
        match seen.as_slice() {
            [first, second, ..] => GroupPermission::Denied(format!(
                "Widgets from the {} and {} sets can't be grouped together",
                first, second
            )),
            _ => GroupPermission::Allowed,
        }
    }
}

/// Creates and dissolves groups on a widget store.
pub struct GroupingEngine {
    padding: f64,
    policy: Box<dyn GroupConflictPolicy>,
}

impl std::fmt::Debug for GroupingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupingEngine")
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}

impl Default for GroupingEngine {
    fn default() -> Self {
        Self::new(widgetcanvas_core::constants::DEFAULT_GROUP_PADDING)
    }
}

impl GroupingEngine {
    pub fn new(padding: f64) -> Self {
        Self::with_policy(padding, Box::new(ProvenancePolicy))
    }

    pub fn with_policy(padding: f64, policy: Box<dyn GroupConflictPolicy>) -> Self {
        Self { padding, policy }
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Validate a group request without changing anything.
    ///
    /// Returns the distinct ids in draw order.
    pub fn check(
        &self,
        store: &WidgetStore,
        ids: &[WidgetId],
    ) -> Result<Vec<WidgetId>, GroupingError> {
        let mut seen = HashSet::new();
        let mut distinct: Vec<WidgetId> = ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if distinct.len() < 2 {
            return Err(GroupingError::TooFewWidgets {
                count: distinct.len(),
            });
        }

        let mut candidates = Vec::with_capacity(distinct.len());
        for id in &distinct {
            let widget = store
                .get(id)
                .ok_or(GroupingError::UnknownWidget { id: *id })?;
            if widget.is_group() {
                return Err(GroupingError::NestedGroup { id: *id });
            }
            candidates.push(widget);
        }

        if let GroupPermission::Denied(reason) = self.policy.check(&candidates) {
            return Err(GroupingError::Conflict { reason });
        }

        distinct.sort_by_key(|id| store.position(id).unwrap_or(usize::MAX));
        Ok(distinct)
    }

    /// Group the given widgets.
    ///
    /// On success the members leave the store and the selection registry,
    /// and the new group widget is inserted at the position of the topmost
    /// member, registered and selected. On error nothing changes.
    pub fn create_group(
        &self,
        store: &mut WidgetStore,
        selection: &mut SelectionManager,
        ids: &[WidgetId],
    ) -> Result<WidgetId, GroupingError> {
        let ordered = match self.check(store, ids) {
            Ok(ordered) => ordered,
            Err(err) => {
                warn!("Grouping rejected: {}", err);
                return Err(err);
            }
        };

        let bounds = Rect::union_all(
            ordered
                .iter()
                .filter_map(|id| store.get(id))
                .map(|w| w.rect()),
        )
        .ok_or(GroupingError::TooFewWidgets { count: 0 })?;
        let frame = bounds.expanded(self.padding);
        let origin = frame.origin();

        // Slot of the topmost member once the members are gone.
        let insert_at = (ordered
            .last()
            .and_then(|id| store.position(id))
            .unwrap_or(store.len())
            + 1)
        .saturating_sub(ordered.len());

        selection.exit_multi_select(store);
        let mut owner_label: Option<String> = None;
        let mut members = Vec::with_capacity(ordered.len());
        for id in &ordered {
            selection.unregister(store, id);
            if let Some(mut widget) = store.remove(id) {
                widget.hide_selected();
                if owner_label.is_none() {
                    owner_label = widget.provenance.clone();
                }
                members.push(widget.into_group_local(origin));
            }
        }

        let group = Group::new(members, frame, owner_label.clone());
        let mut widget = Widget::new(WidgetKind::Group(group), CanvasFrame::new(frame));
        widget.provenance = owner_label;
        let group_id = widget.id;

        store.insert_at(insert_at, widget);
        selection.register_id(group_id);
        if let Err(err) = selection.select(store, &group_id) {
            warn!("New group {} could not be selected: {}", group_id.short(), err);
        }

        info!(
            "Grouped {} widgets into {} at ({:.1}, {:.1}) {:.1}x{:.1}",
            ordered.len(),
            group_id.short(),
            frame.x,
            frame.y,
            frame.width,
            frame.height
        );
        Ok(group_id)
    }

    /// Dissolve a group back into top-level widgets.
    ///
    /// Members keep their current visual positions and take the group's
    /// place in the draw order. Returns the member ids.
    pub fn ungroup(
        &self,
        store: &mut WidgetStore,
        selection: &mut SelectionManager,
        group_id: &WidgetId,
    ) -> Result<Vec<WidgetId>, GroupingError> {
        let position = match store.get(group_id) {
            None => return Err(GroupingError::UnknownWidget { id: *group_id }),
            Some(widget) if !widget.is_group() => {
                return Err(GroupingError::NotAGroup { id: *group_id })
            }
            Some(_) => store.position(group_id).unwrap_or(store.len()),
        };

        selection.unregister(store, group_id);
        let Some(widget) = store.remove(group_id) else {
            return Err(GroupingError::UnknownWidget { id: *group_id });
        };
        let origin = widget.rect().origin();
        let WidgetKind::Group(group) = widget.kind else {
            return Err(GroupingError::NotAGroup { id: *group_id });
        };

        let mut ids = Vec::with_capacity(group.len());
        for (offset, member) in group.into_members().into_iter().enumerate() {
            let widget = member.into_canvas(origin);
            ids.push(widget.id);
            selection.register(&widget);
            store.insert_at(position + offset, widget);
        }

        info!("Ungrouped {} into {} widgets", group_id.short(), ids.len());
        Ok(ids)
    }
}

/// Resize a group widget to `frame`, scaling its members proportionally.
pub fn resize_group(widget: &mut Widget, frame: CanvasFrame) -> Result<(), GroupingError> {
    if !widget.is_group() {
        return Err(GroupingError::NotAGroup { id: widget.id });
    }
    widget.set_frame(frame);
    Ok(())
}
