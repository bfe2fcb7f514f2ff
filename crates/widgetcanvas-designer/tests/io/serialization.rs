use serde_json::Value;
use tempfile::TempDir;
use widgetcanvas_core::{CanvasFrame, Color, DecodeError, Rect, Size};
use widgetcanvas_designer::{AspectRatio, Canvas, DesignDocument, Widget, WidgetKind};

fn text(x: f64, y: f64) -> Widget {
    Widget::new(WidgetKind::text("Label"), CanvasFrame::from_xywh(x, y, 100.0, 50.0))
}

fn design() -> Canvas {
    let mut canvas = Canvas::default();
    canvas.layout(Size::new(360.0, 640.0));
    canvas.set_background(serde_json::json!({ "photo": "track.jpg" }));
    canvas
}

#[test]
fn test_save_and_load_on_larger_canvas() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("design.json");

    let mut canvas = design();
    let id = canvas.add_widget(
        Widget::new(WidgetKind::text("Hello"), CanvasFrame::from_xywh(80.0, 300.0, 200.0, 40.0))
            .with_color(Color::rgb(200, 40, 40))
            .with_rotation(12.0),
    );
    canvas.save_to_file(&path)?;

    let mut restored = Canvas::default();
    restored.layout(Size::new(720.0, 1280.0));
    let skipped = restored.load_from_file(&path)?;
    assert!(skipped.is_empty());

    let widget = restored.widget(&id).unwrap();
    assert!(widget.rect().approx_eq(&Rect::new(160.0, 600.0, 400.0, 80.0), 1e-9));
    assert_eq!(widget.color, Color::rgb(200, 40, 40));
    assert_eq!(widget.rotation, 12.0);
    assert_eq!(restored.background(), canvas.background());
    Ok(())
}

#[test]
fn test_groups_survive_save_and_load() -> anyhow::Result<()> {
    let mut canvas = design();
    let a = canvas.add_widget(text(20.0, 20.0));
    let b = canvas.add_widget(text(140.0, 20.0));
    let loose = canvas.add_widget(text(20.0, 400.0));
    let group = canvas.group(&[a, b])?;

    let json = canvas.snapshot().to_json()?;
    let mut restored = Canvas::default();
    restored.layout(Size::new(360.0, 640.0));
    restored.restore(&DesignDocument::from_json(&json)?)?;

    let order: Vec<_> = restored.widgets().map(|w| w.id).collect();
    assert_eq!(order, vec![group, loose]);
    assert!(restored
        .widget(&group)
        .unwrap()
        .rect()
        .approx_eq(&Rect::new(4.0, 4.0, 252.0, 82.0), 1e-9));

    restored.ungroup(&group)?;
    assert!(restored
        .widget(&a)
        .unwrap()
        .rect()
        .approx_eq(&Rect::new(20.0, 20.0, 100.0, 50.0), 1e-9));
    assert!(restored
        .widget(&b)
        .unwrap()
        .rect()
        .approx_eq(&Rect::new(140.0, 20.0, 100.0, 50.0), 1e-9));
    Ok(())
}

#[test]
fn test_unknown_widget_type_is_skipped() -> anyhow::Result<()> {
    let mut canvas = design();
    let keep = canvas.add_widget(text(20.0, 20.0));
    canvas.add_widget(Widget::new(
        WidgetKind::stat("heart_rate"),
        CanvasFrame::from_xywh(20.0, 100.0, 120.0, 60.0),
    ));

    let mut value: Value = serde_json::from_str(&canvas.snapshot().to_json()?)?;
    value["widgets"][1]["typeTag"] = Value::from("hologram");
    let document = DesignDocument::from_json(&value.to_string())?;

    let mut restored = Canvas::default();
    let skipped = restored.restore(&document)?;
    assert_eq!(skipped, vec!["hologram".to_string()]);
    assert_eq!(restored.widget_count(), 1);
    assert!(restored.widget(&keep).is_some());
    assert_eq!(restored.size(), Size::new(360.0, 640.0));
    Ok(())
}

#[test]
fn test_restore_adopts_saved_aspect_ratio() -> anyhow::Result<()> {
    let mut canvas = Canvas::default();
    canvas.set_aspect_ratio(AspectRatio::SQUARE);
    canvas.layout(Size::new(400.0, 700.0));
    canvas.add_widget(text(150.0, 175.0));

    let mut restored = Canvas::default();
    restored.layout(Size::new(800.0, 1400.0));
    restored.restore(&canvas.snapshot())?;

    assert_eq!(restored.aspect_ratio(), AspectRatio::SQUARE);
    assert_eq!(restored.size(), Size::new(800.0, 800.0));
    let rect = restored.widgets().next().unwrap().rect();
    assert!(rect.approx_eq(&Rect::new(300.0, 350.0, 200.0, 100.0), 1e-9));
    Ok(())
}

#[test]
fn test_broken_documents_are_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json")?;

    let mut canvas = design();
    let id = canvas.add_widget(text(20.0, 20.0));
    assert!(matches!(canvas.load_from_file(&path), Err(DecodeError::Malformed { .. })));
    assert!(matches!(
        canvas.load_from_file(dir.path().join("missing.json")),
        Err(DecodeError::Io { .. })
    ));

    let mut value: Value = serde_json::from_str(&canvas.snapshot().to_json()?)?;
    value["version"] = Value::from("2.0");
    assert!(matches!(
        DesignDocument::from_json(&value.to_string()),
        Err(DecodeError::UnsupportedVersion { .. })
    ));

    value["version"] = Value::from("1.0");
    value["widgets"][0]["identifier"] = Value::from("not-a-uuid");
    let document = DesignDocument::from_json(&value.to_string())?;
    assert!(matches!(
        canvas.restore(&document),
        Err(DecodeError::InvalidIdentifier { .. })
    ));
    assert!(canvas.widget(&id).is_some());
    Ok(())
}

#[tokio::test]
async fn test_save_in_background() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("async.json");

    let mut canvas = design();
    let id = canvas.add_widget(text(40.0, 40.0));
    let pending = canvas.save_in_background(path.clone());
    // Edits after the snapshot are not written
    canvas.remove_widget(&id);
    pending.await?;

    let document = DesignDocument::load_from_file(&path)?;
    assert_eq!(document.widgets.len(), 1);
    assert_eq!(document.widgets[0].identifier, id.to_string());
    assert_eq!(document.canvas_size, Size::new(360.0, 640.0));
    Ok(())
}

#[test]
fn test_missing_canvas_size_keeps_stored_frames() -> anyhow::Result<()> {
    let mut source = design();
    let id = source.add_widget(
        Widget::new(WidgetKind::stat("pace"), CanvasFrame::from_xywh(80.0, 300.0, 200.0, 60.0))
            .with_rotation(8.0),
    );
    let json = source.snapshot().to_json()?;

    for size in [
        serde_json::json!({ "width": 0.0, "height": 0.0 }),
        serde_json::json!({ "width": -1.0, "height": -1.0 }),
    ] {
        let mut value: Value = serde_json::from_str(&json)?;
        value["canvasSize"] = size;
        let document = DesignDocument::from_json(&value.to_string())?;

        let mut restored = Canvas::default();
        restored.layout(Size::new(720.0, 1280.0));
        restored.restore(&document)?;
        assert_eq!(restored.size(), Size::new(720.0, 1280.0));
        let widget = restored.widget(&id).unwrap();
        assert_eq!(widget.rect(), Rect::new(80.0, 300.0, 200.0, 60.0));
        assert_eq!(widget.rotation, 8.0);

        let mut unsized_canvas = Canvas::default();
        unsized_canvas.restore(&document)?;
        assert_eq!(unsized_canvas.size(), Size::zero());
        assert_eq!(
            unsized_canvas.widget(&id).unwrap().rect(),
            Rect::new(80.0, 300.0, 200.0, 60.0)
        );
    }
    Ok(())
}
