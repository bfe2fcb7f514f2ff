use proptest::prelude::*;
use widgetcanvas_core::{CanvasFrame, Point, Rect, Size, WidgetId};
use widgetcanvas_designer::{
    snap_to_center, Canvas, CanvasRescaler, HandleCorner, RatioFrame, RescaleReason,
    ResizeHandleController, Widget, WidgetKind,
};

fn corner_strategy() -> impl Strategy<Value = HandleCorner> {
    prop::sample::select(HandleCorner::ALL.to_vec())
}

fn close(a: f64, b: f64, relative: f64) -> bool {
    (a - b).abs() <= relative * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn ratio_frame_round_trips(
        width in 100.0f64..2000.0,
        height in 100.0f64..2000.0,
        fx in 0.0f64..0.9,
        fy in 0.0f64..0.9,
        fw in 0.01f64..0.1,
        fh in 0.01f64..0.1,
    ) {
        let canvas = Size::new(width, height);
        let frame = Rect::new(fx * width, fy * height, fw * width, fh * height);
        let decoded = RatioFrame::encode(&frame, canvas).unwrap().decode(canvas);

        prop_assert!(close(decoded.x, frame.x, 1e-6));
        prop_assert!(close(decoded.y, frame.y, 1e-6));
        prop_assert!(close(decoded.width, frame.width, 1e-6));
        prop_assert!(close(decoded.height, frame.height, 1e-6));
    }

    #[test]
    fn rescale_there_and_back_restores_frame(
        width in 200.0f64..1500.0,
        height in 200.0f64..1500.0,
        sx in 0.5f64..2.0,
        sy in 0.5f64..2.0,
        cx in 0.3f64..0.7,
        cy in 0.3f64..0.7,
        size in 0.02f64..0.1,
    ) {
        let from = Size::new(width, height);
        let to = Size::new(width * sx, height * sy);
        let side = size * width.min(height);
        let frame = Rect::from_center(
            Point::new(cx * width, cy * height),
            Size::new(side * 1.5, side),
        );

        let mut widget = Widget::new(WidgetKind::map(), CanvasFrame::new(frame));
        let mut rescaler = CanvasRescaler::new(0.0);
        rescaler.reset(from);
        rescaler.resize_canvas(to, RescaleReason::ViewportResized, std::iter::once(&mut widget));
        rescaler.resize_canvas(from, RescaleReason::ViewportResized, std::iter::once(&mut widget));

        prop_assert!(widget.rect().approx_eq(&frame, 1e-6));
    }

    #[test]
    fn resize_never_commits_below_minimum(
        corner in corner_strategy(),
        aspect_locked in any::<bool>(),
        width in 60.0f64..300.0,
        height in 60.0f64..300.0,
        moves in prop::collection::vec((-400.0f64..400.0, -400.0f64..400.0), 1..20),
    ) {
        let start = Rect::new(100.0, 100.0, width, height);
        let grab = corner.position_on(&start);
        let mut controller = ResizeHandleController::default();
        controller.begin(WidgetId::new(), corner, start, aspect_locked, grab);

        for (dx, dy) in moves {
            if let Some(rect) = controller.update(Point::new(grab.x + dx, grab.y + dy)) {
                prop_assert!(rect.width >= 60.0);
                prop_assert!(rect.height >= 60.0);
            }
        }
        let (_, last) = controller.end().unwrap();
        prop_assert!(last.width >= 60.0 && last.height >= 60.0);
    }

    #[test]
    fn group_then_ungroup_is_identity(
        ax in 0.0f64..200.0,
        ay in 0.0f64..400.0,
        bx in 0.0f64..200.0,
        by in 0.0f64..400.0,
        aw in 60.0f64..150.0,
        bh in 60.0f64..150.0,
    ) {
        let mut canvas = Canvas::default();
        canvas.layout(Size::new(360.0, 640.0));
        let a_frame = Rect::new(ax, ay, aw, 60.0);
        let b_frame = Rect::new(bx, by, 80.0, bh);
        let a = canvas.add_widget(Widget::new(WidgetKind::text("a"), CanvasFrame::new(a_frame)));
        let b = canvas.add_widget(Widget::new(WidgetKind::map(), CanvasFrame::new(b_frame)));

        let group = canvas.group(&[a, b]).unwrap();
        canvas.ungroup(&group).unwrap();

        prop_assert!(canvas.widget(&a).unwrap().rect().approx_eq(&a_frame, 1e-9));
        prop_assert!(canvas.widget(&b).unwrap().rect().approx_eq(&b_frame, 1e-9));
    }

    #[test]
    fn snap_threshold_is_sharp(
        threshold in 2.0f64..30.0,
        negative in any::<bool>(),
        horizontal in any::<bool>(),
    ) {
        let canvas = Size::new(400.0, 600.0);
        let center = Point::new(200.0, 300.0);
        let sign = if negative { -1.0 } else { 1.0 };
        let place = |distance: f64| {
            let offset = sign * distance;
            let c = if horizontal {
                Point::new(center.x + offset, 100.0)
            } else {
                Point::new(50.0, center.y + offset)
            };
            Rect::from_center(c, Size::new(80.0, 60.0))
        };

        let far = snap_to_center(&place(threshold + 1.0), canvas, threshold);
        let near = snap_to_center(&place(threshold - 1.0), canvas, threshold);

        if horizontal {
            prop_assert!(!far.snapped_x);
            prop_assert!(near.snapped_x);
            prop_assert_eq!(near.frame.center().x, center.x);
        } else {
            prop_assert!(!far.snapped_y);
            prop_assert!(near.snapped_y);
            prop_assert_eq!(near.frame.center().y, center.y);
        }
    }
}
