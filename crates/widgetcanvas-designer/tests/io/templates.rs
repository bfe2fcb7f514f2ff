use widgetcanvas_core::{CanvasFrame, Color, DecodeError, Rect, Size};
use widgetcanvas_designer::{
    AspectRatio, Canvas, TemplateCodec, TemplateFile, TemplateVersion, Widget, WidgetKind,
};

const RATIO_TEMPLATE: &str = r##"{
  "id": "weekly-summary",
  "name": "Weekly Summary",
  "description": "Distance and map",
  "version": "2.0",
  "canvasSize": { "width": 360.0, "height": 640.0 },
  "items": [
    {
      "type": "stat",
      "ratioPosition": { "x": 0.1, "y": 0.05 },
      "ratioSize": { "width": 0.5, "height": 0.1 },
      "color": "#FF8800FF",
      "payload": { "metric": "distance" }
    },
    {
      "type": "map",
      "ratioPosition": { "x": 0.0, "y": 0.5 },
      "ratioSize": { "width": 1.0, "height": 0.5 },
      "rotation": 5.0
    },
    {
      "type": "sparkline",
      "ratioPosition": { "x": 0.0, "y": 0.0 },
      "ratioSize": { "width": 0.2, "height": 0.2 }
    }
  ],
  "backgroundTransform": { "scale": 1.2 },
  "minimumAppVersion": "3.1"
}"##;

const LEGACY_TEMPLATE: &str = r##"{
  "id": "old",
  "name": "Old Layout",
  "version": "1.0",
  "canvasSize": { "width": 375.0, "height": 667.0 },
  "items": [
    {
      "type": "text",
      "position": { "x": 37.5, "y": 66.7 },
      "size": { "width": 150.0, "height": 66.7 },
      "payload": { "content": "Hello" }
    }
  ]
}"##;

#[test]
fn test_decode_ratio_template_fixture() {
    let template = TemplateFile::from_json(RATIO_TEMPLATE).unwrap();
    assert_eq!(template.minimum_app_version.as_deref(), Some("3.1"));

    let decoded = TemplateCodec::default()
        .decode(&template, Size::new(720.0, 1280.0))
        .unwrap();
    assert_eq!(decoded.widgets.len(), 2);
    assert_eq!(decoded.skipped, vec!["sparkline".to_string()]);

    let stat = &decoded.widgets[0];
    assert!(matches!(stat.kind, WidgetKind::Stat { ref metric } if metric == "distance"));
    assert!(stat.rect().approx_eq(&Rect::new(72.0, 64.0, 360.0, 128.0), 1e-9));
    assert_eq!(stat.color, Color::rgb(255, 136, 0));

    let map = &decoded.widgets[1];
    assert_eq!(map.rotation, 5.0);
    assert!(map.aspect_locked);
    assert!(map.rect().approx_eq(&Rect::new(0.0, 640.0, 720.0, 640.0), 1e-9));
}

#[test]
fn test_legacy_template_is_migrated() {
    let template = TemplateFile::from_json(LEGACY_TEMPLATE).unwrap();
    let decoded = TemplateCodec::default()
        .decode(&template, Size::new(750.0, 1334.0))
        .unwrap();

    let rect = decoded.widgets[0].rect();
    assert!(rect.approx_eq(&Rect::new(75.0, 133.4, 300.0, 133.4), 1e-9));
}

#[test]
fn test_unsupported_version_rejected() {
    let json = RATIO_TEMPLATE.replace("\"2.0\"", "\"0.9\"");
    let template = TemplateFile::from_json(&json).unwrap();
    let err = TemplateCodec::default()
        .decode(&template, Size::new(360.0, 640.0))
        .unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnsupportedVersion {
            version: "0.9".to_string()
        }
    );
}

#[test]
fn test_failed_apply_leaves_canvas_untouched() {
    let mut canvas = Canvas::default();
    canvas.layout(Size::new(360.0, 640.0));
    let id = canvas.add_widget(Widget::new(
        WidgetKind::text("keep me"),
        CanvasFrame::from_xywh(10.0, 10.0, 100.0, 60.0),
    ));

    let json = RATIO_TEMPLATE.replace("\"ratioSize\": { \"width\": 1.0, \"height\": 0.5 },", "");
    let template = TemplateFile::from_json(&json).unwrap();
    assert!(matches!(
        canvas.apply_template(&template),
        Err(DecodeError::MissingGeometry { index: 1, .. })
    ));
    assert_eq!(canvas.widget_count(), 1);
    assert!(canvas.widget(&id).is_some());
}

#[test]
fn test_export_then_apply_round_trip() {
    let mut canvas = Canvas::default();
    canvas.layout(Size::new(360.0, 640.0));
    canvas.set_background(serde_json::json!({ "gradient": ["#000000", "#333333"] }));
    canvas.add_widget(
        Widget::new(WidgetKind::stat("pace"), CanvasFrame::from_xywh(30.0, 70.0, 300.0, 100.0))
            .with_color(Color::rgb(10, 200, 30))
            .with_payload(serde_json::json!({ "unit": "min/km" })),
    );

    let template = canvas.export_template("Pace card").unwrap();
    assert_eq!(template.version, "2.0");
    assert!(template.background_transform.is_some());
    let json = template.to_json().unwrap();

    let restored = TemplateFile::from_json(&json).unwrap();
    let decoded = TemplateCodec::default()
        .decode(&restored, Size::new(414.0, 896.0))
        .unwrap();
    assert!(decoded.widgets[0]
        .rect()
        .approx_eq(&Rect::new(34.5, 98.0, 345.0, 140.0), 1e-9));

    let mut other = Canvas::default();
    other.layout(Size::new(720.0, 1280.0));
    other.apply_template(&restored).unwrap();

    let widget = other.widgets().next().unwrap();
    assert!(widget.rect().approx_eq(&Rect::new(60.0, 140.0, 600.0, 200.0), 1e-9));
    assert_eq!(widget.color, Color::rgb(10, 200, 30));
    assert_eq!(widget.payload, serde_json::json!({ "unit": "min/km" }));
    assert_eq!(other.background(), canvas.background());
}

#[test]
fn test_template_before_first_layout_is_placed_on_layout() {
    let template = TemplateFile::from_json(RATIO_TEMPLATE).unwrap();
    let mut canvas = Canvas::default();
    canvas.apply_template(&template).unwrap();
    assert!(canvas
        .widgets()
        .next()
        .unwrap()
        .rect()
        .approx_eq(&Rect::new(36.0, 32.0, 180.0, 64.0), 1e-9));

    canvas.layout(Size::new(720.0, 1280.0));
    let rect = canvas.widgets().next().unwrap().rect();
    assert!(rect.approx_eq(&Rect::new(72.0, 64.0, 360.0, 128.0), 1e-9));
}

#[test]
fn test_template_placement_ignores_layout_order() {
    let mut source = Canvas::default();
    source.layout(Size::new(360.0, 640.0));
    source.add_widget(Widget::new(
        WidgetKind::text("Tempo"),
        CanvasFrame::from_xywh(30.0, 70.0, 300.0, 100.0),
    ));
    source.add_widget(Widget::new(
        WidgetKind::map(),
        CanvasFrame::from_xywh(60.0, 300.0, 240.0, 240.0),
    ));
    let template = source.export_template("Tempo").unwrap();

    let mut after = Canvas::default();
    after.set_aspect_ratio(AspectRatio::SQUARE);
    after.layout(Size::new(500.0, 500.0));
    after.apply_template(&template).unwrap();

    let mut before = Canvas::default();
    before.set_aspect_ratio(AspectRatio::SQUARE);
    before.apply_template(&template).unwrap();
    before.layout(Size::new(500.0, 500.0));

    assert_eq!(before.size(), after.size());
    let expected: Vec<Rect> = after.widgets().map(|w| w.rect()).collect();
    let placed: Vec<Rect> = before.widgets().map(|w| w.rect()).collect();
    assert_eq!(placed.len(), 2);
    for (placed, expected) in placed.iter().zip(&expected) {
        assert!(placed.approx_eq(expected, 1e-9), "{:?} != {:?}", placed, expected);
    }
    assert!(expected[0].approx_eq(&Rect::new(500.0 / 12.0, 54.6875, 1250.0 / 3.0, 78.125), 1e-9));

    // Later layouts rescale as usual
    let text = before.widgets().next().unwrap();
    assert!((text.effective_content_scale() - 1.0).abs() < 1e-9);
    before.layout(Size::new(250.0, 250.0));
    let after_shrink = before.widgets().next().unwrap().rect();
    assert!((after_shrink.center().x - expected[0].center().x / 2.0).abs() < 1e-9);
}

#[test]
fn test_legacy_template_before_first_layout() {
    let template = TemplateFile::from_json(LEGACY_TEMPLATE).unwrap();
    assert_eq!(
        TemplateVersion::parse(&template.version).unwrap(),
        TemplateVersion::Legacy
    );

    let mut canvas = Canvas::default();
    canvas.apply_template(&template).unwrap();
    canvas.layout(Size::new(750.0, 1334.0));

    let size = canvas.size();
    let rect = canvas.widgets().next().unwrap().rect();
    let expected = Rect::new(
        0.1 * size.width,
        0.1 * size.height,
        0.4 * size.width,
        0.1 * size.height,
    );
    assert!(rect.approx_eq(&expected, 1e-9));
}

#[test]
fn test_unsized_template_needs_a_laid_out_canvas() {
    let json = RATIO_TEMPLATE.replace(
        "\"canvasSize\": { \"width\": 360.0, \"height\": 640.0 }",
        "\"canvasSize\": { \"width\": 0.0, \"height\": 0.0 }",
    );
    let template = TemplateFile::from_json(&json).unwrap();

    let mut canvas = Canvas::default();
    assert!(matches!(
        canvas.apply_template(&template),
        Err(DecodeError::MissingGeometry { index: 0, ref field }) if field == "canvasSize"
    ));
    assert_eq!(canvas.widget_count(), 0);

    canvas.layout(Size::new(720.0, 1280.0));
    canvas.apply_template(&template).unwrap();
    assert_eq!(canvas.widget_count(), 2);
}
