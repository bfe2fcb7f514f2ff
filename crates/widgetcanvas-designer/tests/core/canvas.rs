use std::sync::Arc;

use parking_lot::Mutex;
use widgetcanvas_core::{CanvasFrame, Color, FontStyle, Point, Rect, Size};
use widgetcanvas_designer::{AspectRatio, Canvas, RescaleReason, Selectable, Widget, WidgetKind};

fn widget(kind: WidgetKind, x: f64, y: f64, w: f64, h: f64) -> Widget {
    Widget::new(kind, CanvasFrame::from_xywh(x, y, w, h))
}

#[test]
fn test_canvas_add_and_remove() {
    let mut canvas = Canvas::default();
    let a = canvas.add_widget(widget(WidgetKind::stat("pace"), 0.0, 0.0, 100.0, 60.0));
    let b = canvas.add_widget(widget(WidgetKind::map(), 0.0, 100.0, 200.0, 200.0));

    assert_eq!(canvas.widget_count(), 2);
    assert!(canvas.widget(&b).unwrap().aspect_locked);
    assert!(!canvas.widget(&a).unwrap().aspect_locked);

    canvas.remove_widget(&a);
    assert_eq!(canvas.widget_count(), 1);
    assert!(canvas.widget(&a).is_none());
}

#[test]
fn test_layout_notifies_canvas_listeners() {
    let mut canvas = Canvas::default();
    let reasons = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reasons);
    canvas.subscribe_canvas(move |event| sink.lock().push(event.reason));

    canvas.add_widget(widget(WidgetKind::text("10 km"), 20.0, 20.0, 120.0, 60.0));
    canvas.layout(Size::new(360.0, 640.0));
    canvas.layout(Size::new(450.0, 800.0));
    canvas.set_aspect_ratio(AspectRatio::PORTRAIT_POST);

    assert_eq!(
        *reasons.lock(),
        vec![RescaleReason::ViewportResized, RescaleReason::AspectRatioChanged]
    );
    assert_eq!(canvas.size().width, 450.0);
    assert!((canvas.size().height - 562.5).abs() < 1e-9);
}

#[test]
fn test_same_aspect_ratio_is_noop() {
    let mut canvas = Canvas::default();
    canvas.layout(Size::new(360.0, 640.0));
    assert!(canvas.set_aspect_ratio(AspectRatio::PORTRAIT_STORY).is_none());
}

#[test]
fn test_widgets_stay_inside_canvas_after_shrink() {
    let mut canvas = Canvas::default();
    canvas.layout(Size::new(1080.0, 1920.0));
    let id = canvas.add_widget(widget(WidgetKind::image("bg.png"), 900.0, 1700.0, 180.0, 220.0));

    canvas.set_aspect_ratio(AspectRatio::LANDSCAPE);
    let rect = canvas.widget(&id).unwrap().rect();
    let size = canvas.size();
    assert!(rect.min_x() >= 0.0 && rect.max_x() <= size.width + 1e-9);
    assert!(rect.min_y() >= 0.0 && rect.max_y() <= size.height + 1e-9);
}

#[test]
fn test_text_content_scale_survives_repeated_rescale() {
    let mut canvas = Canvas::default();
    canvas.layout(Size::new(360.0, 640.0));
    let id = canvas.add_widget(widget(WidgetKind::text("Hello"), 80.0, 300.0, 200.0, 40.0));

    canvas.layout(Size::new(720.0, 1280.0));
    canvas.layout(Size::new(180.0, 320.0));
    canvas.layout(Size::new(360.0, 640.0));

    let widget = canvas.widget(&id).unwrap();
    assert!((widget.effective_content_scale() - 1.0).abs() < 1e-9);
    assert!((widget.live_content_scale() - 1.0).abs() < 1e-9);
    assert!(widget.rect().approx_eq(&Rect::new(80.0, 300.0, 200.0, 40.0), 1e-9));
}

#[test]
fn test_apply_font_to_multi_selection() {
    let mut canvas = Canvas::default();
    let a = canvas.add_widget(widget(WidgetKind::stat("hr"), 0.0, 0.0, 100.0, 60.0));
    let b = canvas.add_widget(widget(WidgetKind::stat("cad"), 0.0, 80.0, 100.0, 60.0));
    let c = canvas.add_widget(widget(WidgetKind::stat("pwr"), 0.0, 160.0, 100.0, 60.0));

    canvas.toggle_selection(&a).unwrap();
    canvas.toggle_selection(&c).unwrap();
    let font = FontStyle::new("Avenir", 24.0).bold();
    assert_eq!(canvas.apply_font(&font), 2);
    assert_eq!(canvas.apply_color(Color::WHITE), 2);

    assert_eq!(canvas.widget(&a).unwrap().font_style(), &font);
    assert_eq!(canvas.widget(&b).unwrap().font_style(), &FontStyle::default());
    assert_eq!(canvas.widget(&c).unwrap().color(), Color::WHITE);
}

#[test]
fn test_rotate_keeps_frame() {
    let mut canvas = Canvas::default();
    let id = canvas.add_widget(widget(WidgetKind::text("tilt"), 10.0, 10.0, 100.0, 60.0));
    canvas.rotate(&id, 15.0).unwrap();

    let widget = canvas.widget(&id).unwrap();
    assert_eq!(widget.rotation, 15.0);
    assert_eq!(widget.rect(), Rect::new(10.0, 10.0, 100.0, 60.0));
    assert_eq!(canvas.widget_at(&Point::new(20.0, 20.0)), Some(id));
}
