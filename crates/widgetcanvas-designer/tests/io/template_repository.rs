use tempfile::TempDir;
use widgetcanvas_core::{CanvasFrame, Rect, RepositoryError, Size};
use widgetcanvas_designer::{
    Canvas, DirectoryTemplateRepository, TemplateFile, TemplateRepository, Widget, WidgetKind,
};

#[test]
fn test_exported_template_reloads_from_directory() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut repo = DirectoryTemplateRepository::open(dir.path())?;

    let mut canvas = Canvas::default();
    canvas.layout(Size::new(360.0, 640.0));
    canvas.add_widget(Widget::new(
        WidgetKind::stat("distance"),
        CanvasFrame::from_xywh(36.0, 64.0, 180.0, 64.0),
    ));
    let template = canvas.export_template("Long Run")?;
    repo.save(&template)?;

    let loaded = repo.get(&template.id)?;
    assert_eq!(loaded, template);

    let mut target = Canvas::default();
    target.layout(Size::new(720.0, 1280.0));
    target.apply_template(&loaded)?;
    let rect = target.widgets().next().unwrap().rect();
    assert!(rect.approx_eq(&Rect::new(72.0, 128.0, 360.0, 128.0), 1e-9));
    Ok(())
}

#[test]
fn test_directory_listing_ignores_foreign_files() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut repo = DirectoryTemplateRepository::open(dir.path())?;
    repo.save(
        &TemplateFile::new("tempo", "Tempo Session", Size::new(360.0, 640.0))
            .with_description("Splits and pace"),
    )?;
    std::fs::write(dir.path().join("notes.txt"), "not a template")?;
    std::fs::write(dir.path().join("corrupt.json"), "{ \"id\": ")?;

    let listed = repo.list()?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "tempo");
    assert_eq!(repo.search("splits")?.len(), 1);
    assert!(repo.search("swim")?.is_empty());

    assert!(matches!(repo.get("corrupt"), Err(RepositoryError::Decode(_))));
    assert!(matches!(repo.get("a/b"), Err(RepositoryError::InvalidId { .. })));
    Ok(())
}
