use widgetcanvas_core::{CanvasFrame, Rect, Size};
use widgetcanvas_designer::{
    rescale_frame, CanvasRescaler, RescaleFactors, RescaleReason, Widget, WidgetKind,
};

#[test]
fn test_uniform_factor_is_geometric_mean() {
    let factors =
        RescaleFactors::between(Size::new(300.0, 400.0), Size::new(450.0, 500.0)).unwrap();
    assert_eq!(factors.scale_x, 1.5);
    assert_eq!(factors.scale_y, 1.25);
    assert!((factors.uniform - 1.875_f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_free_widget_keeps_its_own_proportions() {
    let factors =
        RescaleFactors::between(Size::new(360.0, 640.0), Size::new(360.0, 360.0)).unwrap();
    let rect = rescale_frame(
        &Rect::new(80.0, 290.0, 200.0, 60.0),
        &factors,
        Size::new(360.0, 360.0),
        0.0,
    );
    assert!((rect.width / rect.height - 200.0 / 60.0).abs() < 1e-9);
}

#[test]
fn test_margin_keeps_widgets_off_the_edge() {
    let factors =
        RescaleFactors::between(Size::new(100.0, 100.0), Size::new(200.0, 200.0)).unwrap();
    let rect = rescale_frame(
        &Rect::new(70.0, 70.0, 30.0, 30.0),
        &factors,
        Size::new(200.0, 200.0),
        10.0,
    );
    assert!(rect.max_x() <= 190.0 + 1e-9);
    assert!(rect.max_y() <= 190.0 + 1e-9);
}

#[test]
fn test_empty_size_is_ignored() {
    let mut rescaler = CanvasRescaler::new(0.0);
    rescaler.reset(Size::new(300.0, 300.0));
    let mut widget = Widget::new(WidgetKind::map(), CanvasFrame::from_xywh(0.0, 0.0, 100.0, 100.0));

    let factors = rescaler.resize_canvas(
        Size::zero(),
        RescaleReason::ViewportResized,
        std::iter::once(&mut widget),
    );
    assert!(factors.is_none());
    assert_eq!(rescaler.previous_size(), Size::new(300.0, 300.0));
}

#[test]
fn test_same_size_is_identity() {
    let mut rescaler = CanvasRescaler::new(0.0);
    rescaler.reset(Size::new(300.0, 300.0));
    let mut widget = Widget::new(
        WidgetKind::map(),
        CanvasFrame::from_xywh(10.0, 10.0, 100.0, 100.0),
    );

    let factors = rescaler.resize_canvas(
        Size::new(300.0, 300.0),
        RescaleReason::TemplateApplied,
        std::iter::once(&mut widget),
    );
    assert!(factors.is_none());
    assert_eq!(widget.rect(), Rect::new(10.0, 10.0, 100.0, 100.0));
}

#[test]
fn test_group_rescale_moves_members_with_group() {
    use widgetcanvas_core::Point;
    use widgetcanvas_designer::{AspectRatio, Canvas, GroupingEngine};

    let mut canvas = Canvas::default().with_grouping(GroupingEngine::new(0.0));
    canvas.set_aspect_ratio(AspectRatio::SQUARE);
    canvas.layout(Size::new(400.0, 400.0));
    let a = canvas.add_widget(Widget::new(
        WidgetKind::map(),
        CanvasFrame::from_xywh(100.0, 100.0, 100.0, 100.0),
    ));
    let b = canvas.add_widget(Widget::new(
        WidgetKind::map(),
        CanvasFrame::from_xywh(200.0, 200.0, 100.0, 100.0),
    ));
    let group = canvas.group(&[a, b]).unwrap();

    canvas.layout(Size::new(800.0, 800.0));
    assert_eq!(canvas.widget(&group).unwrap().rect(), Rect::new(200.0, 200.0, 400.0, 400.0));

    canvas.ungroup(&group).unwrap();
    assert_eq!(canvas.widget(&a).unwrap().rect(), Rect::new(200.0, 200.0, 200.0, 200.0));
    assert_eq!(canvas.widget(&b).unwrap().rect().origin(), Point::new(400.0, 400.0));
}
