use widgetcanvas_core::{CanvasFrame, GroupingError, Point, Rect, Size};
use widgetcanvas_designer::{
    Canvas, GesturePhase, GroupConflictPolicy, GroupPermission, GroupingEngine, HandleCorner,
    Widget, WidgetKind,
};

fn text(x: f64, y: f64) -> Widget {
    Widget::new(WidgetKind::text("Label"), CanvasFrame::from_xywh(x, y, 100.0, 50.0))
}

fn canvas() -> Canvas {
    let mut canvas = Canvas::default();
    canvas.layout(Size::new(360.0, 640.0));
    canvas
}

struct NoMaps;

impl GroupConflictPolicy for NoMaps {
    fn check(&self, candidates: &[&Widget]) -> GroupPermission {
        if candidates.iter().any(|w| w.type_tag() == "map") {
            GroupPermission::Denied("Maps can't be grouped".to_string())
        } else {
            GroupPermission::Allowed
        }
    }
}

#[test]
fn test_group_takes_place_of_topmost_member() {
    let mut canvas = canvas();
    let a = canvas.add_widget(text(20.0, 20.0));
    let middle = canvas.add_widget(text(20.0, 300.0));
    let b = canvas.add_widget(text(140.0, 20.0));

    let group = canvas.group(&[b, a]).unwrap();
    let order: Vec<_> = canvas.widgets().map(|w| w.id).collect();
    assert_eq!(order, vec![middle, group]);

    let members = canvas.widget(&group).unwrap().kind.as_group().unwrap().member_ids();
    assert_eq!(members, vec![a, b]);
}

#[test]
fn test_resizing_group_scales_members() {
    let mut canvas = canvas();
    let a = canvas.add_widget(text(20.0, 20.0));
    let b = canvas.add_widget(text(140.0, 20.0));
    let group = canvas.group(&[a, b]).unwrap();

    let grab = Point::new(256.0, 86.0);
    assert_eq!(canvas.handle_at(&grab), Some((group, HandleCorner::BottomRight)));
    canvas.handle_resize(GesturePhase::Began, &group, HandleCorner::BottomRight, grab);
    let frame = canvas
        .handle_resize(
            GesturePhase::Changed,
            &group,
            HandleCorner::BottomRight,
            Point::new(304.0, 90.0),
        )
        .unwrap();
    canvas.handle_resize(GesturePhase::Ended, &group, HandleCorner::BottomRight, grab);

    // Aspect-locked: width 300, height keeps 252:82
    assert_eq!(frame.width, 300.0);
    assert!((frame.height - 300.0 * 82.0 / 252.0).abs() < 1e-9);

    let scale = 300.0 / 252.0;
    let group_widget = canvas.widget(&group).unwrap();
    let members = group_widget.kind.as_group().unwrap().members();
    assert!(members[1]
        .rect()
        .approx_eq(&Rect::new(136.0 * scale, 16.0 * scale, 100.0 * scale, 50.0 * scale), 1e-9));

    canvas.ungroup(&group).unwrap();
    let b_rect = canvas.widget(&b).unwrap().rect();
    assert!((b_rect.x - (4.0 + 136.0 * scale)).abs() < 1e-9);
}

#[test]
fn test_repeated_group_resizes_do_not_compound() {
    let mut canvas = canvas();
    let a = canvas.add_widget(text(20.0, 20.0));
    let b = canvas.add_widget(text(138.0, 20.0));
    let group = canvas.group(&[a, b]).unwrap();

    // 180 is rejected: its height falls under the minimum
    for target in [400.0, 180.0, 335.0, 250.0] {
        let corner = canvas.widget(&group).unwrap().rect();
        let grab = Point::new(corner.max_x(), corner.max_y());
        canvas.begin_resize(&group, HandleCorner::BottomRight, grab).unwrap();
        let _ = canvas.resize_to(Point::new(4.0 + target, grab.y));
        canvas.end_resize();
    }
    assert!((canvas.widget(&group).unwrap().rect().width - 250.0).abs() < 1e-9);

    canvas.ungroup(&group).unwrap();
    assert!(canvas.widget(&a).unwrap().rect().approx_eq(&Rect::new(20.0, 20.0, 100.0, 50.0), 1e-9));
    assert!(canvas
        .widget(&b)
        .unwrap()
        .rect()
        .approx_eq(&Rect::new(138.0, 20.0, 100.0, 50.0), 1e-9));
}

#[test]
fn test_custom_policy_rejects_before_mutation() {
    let mut canvas = canvas().with_grouping(GroupingEngine::with_policy(16.0, Box::new(NoMaps)));
    let a = canvas.add_widget(text(20.0, 20.0));
    let map = canvas.add_widget(Widget::new(
        WidgetKind::map(),
        CanvasFrame::from_xywh(20.0, 100.0, 200.0, 200.0),
    ));
    canvas.enter_multi_select();
    canvas.toggle_selection(&a).unwrap();
    canvas.toggle_selection(&map).unwrap();

    let err = canvas.group_selected().unwrap_err();
    assert_eq!(
        err,
        GroupingError::Conflict {
            reason: "Maps can't be grouped".to_string()
        }
    );
    assert_eq!(err.to_string(), "Maps can't be grouped");
    assert_eq!(canvas.widget_count(), 2);
    assert_eq!(canvas.selection().selected_ids(), vec![a, map]);
}

#[test]
fn test_provenance_mix_rejected() {
    let mut canvas = canvas();
    let a = canvas.add_widget(text(20.0, 20.0).with_provenance("cycling"));
    let b = canvas.add_widget(text(140.0, 20.0).with_provenance("running"));
    let c = canvas.add_widget(text(20.0, 200.0));

    assert!(matches!(canvas.group(&[a, b]), Err(GroupingError::Conflict { .. })));
    let group = canvas.group(&[a, c]).unwrap();
    assert_eq!(canvas.widget(&group).unwrap().provenance.as_deref(), Some("cycling"));
}

#[test]
fn test_ungroup_non_group_fails() {
    let mut canvas = canvas();
    let a = canvas.add_widget(text(20.0, 20.0));
    assert_eq!(canvas.ungroup(&a), Err(GroupingError::NotAGroup { id: a }));
}
