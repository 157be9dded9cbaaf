//! Magnifier placement - resolves the zoom inset to a clamped source
//! rectangle and an on-canvas position

use super::shapes::{label, DrawOp, MagnifierView, Rect};
use crate::config::OverlaySettings;
use crate::geometry::{CanvasSize, Point};

/// Gap between the pointer and the inset when following the mouse
const FOLLOW_OFFSET: f64 = 20.0;
/// Inset margin from the canvas edge in fixed mode
const EDGE_MARGIN: f64 = 10.0;

/// Square of side `size / zoom` centered on `focus`, shifted (not
/// shrunk) to stay inside the canvas. Shrinks only when the canvas
/// itself is smaller than the square.
pub fn source_rect(focus: Point, size: f64, zoom: f64, canvas: CanvasSize) -> Rect {
    let side = size / zoom;
    let width = side.min(canvas.width).max(0.0);
    let height = side.min(canvas.height).max(0.0);

    let x = (focus.x - width / 2.0).clamp(0.0, (canvas.width - width).max(0.0));
    let y = (focus.y - height / 2.0).clamp(0.0, (canvas.height - height).max(0.0));
    Rect { x, y, width, height }
}

/// Where the inset is drawn. Following: beside the pointer, flipped to
/// the other side near the right/bottom edge. Fixed: top-right corner.
fn inset_center(pointer: Option<Point>, follow: bool, size: f64, canvas: CanvasSize) -> Point {
    let half = size / 2.0;
    match (follow, pointer) {
        (true, Some(p)) => {
            let mut x = p.x + FOLLOW_OFFSET + half;
            if x + half > canvas.width {
                x = p.x - FOLLOW_OFFSET - half;
            }
            let mut y = p.y + FOLLOW_OFFSET + half;
            if y + half > canvas.height {
                y = p.y - FOLLOW_OFFSET - half;
            }
            Point::new(x, y)
        }
        _ => Point::new(canvas.width - half - EDGE_MARGIN, half + EDGE_MARGIN),
    }
}

/// Inset plus its zoom label. Nothing when disabled, when the canvas has
/// no size, or when following the mouse with no pointer over the canvas.
pub fn build_magnifier_ops(settings: &OverlaySettings, pointer: Option<Point>, canvas: CanvasSize) -> Vec<DrawOp> {
    if !settings.magnifier_enabled || canvas.is_empty() {
        return Vec::new();
    }
    if settings.magnifier_follow_mouse && pointer.is_none() {
        return Vec::new();
    }

    let focus = match (settings.magnifier_follow_mouse, pointer) {
        (true, Some(p)) => p,
        _ => Point::new(canvas.width / 2.0, canvas.height / 2.0),
    };
    let size = settings.magnifier_size;
    let center = inset_center(pointer, settings.magnifier_follow_mouse, size, canvas);

    let view = MagnifierView {
        source: source_rect(focus, size, settings.magnifier_zoom, canvas),
        center,
        size,
        zoom: settings.magnifier_zoom,
        grid: settings.magnifier_grid,
        crosshair: settings.magnifier_crosshair,
    };

    vec![
        DrawOp::Magnifier(view),
        label(
            center.offset(-size / 4.0, size / 2.0 - 12.0),
            format!("{:.1}x", settings.magnifier_zoom),
            "#ffffff",
            12.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CanvasSize {
        CanvasSize::new(640.0, 480.0)
    }

    #[test]
    fn test_source_rect_centered() {
        let r = source_rect(Point::new(320.0, 240.0), 180.0, 3.0, canvas());
        assert_eq!(r, Rect { x: 290.0, y: 210.0, width: 60.0, height: 60.0 });
    }

    #[test]
    fn test_source_rect_clamped_at_edges() {
        let r = source_rect(Point::new(5.0, 478.0), 180.0, 3.0, canvas());
        assert_eq!(r.x, 0.0);
        assert_eq!(r.y, 420.0);
        assert_eq!(r.width, 60.0);

        let r = source_rect(Point::new(700.0, -50.0), 180.0, 3.0, canvas());
        assert_eq!(r.x, 580.0);
        assert_eq!(r.y, 0.0);
    }

    #[test]
    fn test_source_rect_on_tiny_canvas() {
        let r = source_rect(Point::new(10.0, 10.0), 300.0, 1.5, CanvasSize::new(50.0, 40.0));
        assert_eq!(r, Rect { x: 0.0, y: 0.0, width: 50.0, height: 40.0 });
    }

    #[test]
    fn test_disabled_or_no_pointer() {
        let settings = OverlaySettings::default();
        assert!(build_magnifier_ops(&settings, Some(Point::new(1.0, 1.0)), canvas()).is_empty());

        let settings = OverlaySettings { magnifier_enabled: true, ..Default::default() };
        assert!(build_magnifier_ops(&settings, None, canvas()).is_empty());
    }

    #[test]
    fn test_fixed_position() {
        let settings = OverlaySettings {
            magnifier_enabled: true,
            magnifier_follow_mouse: false,
            ..Default::default()
        };
        let ops = build_magnifier_ops(&settings, None, canvas());
        match &ops[0] {
            DrawOp::Magnifier(view) => {
                assert_eq!(view.center, Point::new(640.0 - 90.0 - 10.0, 100.0));
                assert_eq!(view.source.x, 320.0 - 30.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_follow_flips_near_edge() {
        let settings = OverlaySettings { magnifier_enabled: true, ..Default::default() };
        let ops = build_magnifier_ops(&settings, Some(Point::new(600.0, 100.0)), canvas());
        match &ops[0] {
            DrawOp::Magnifier(view) => {
                assert!(view.center.x < 600.0);
                assert!(view.center.y > 100.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&ops[1], DrawOp::Label { text, .. } if text == "3.0x"));
    }
}
