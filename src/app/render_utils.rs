use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use bibnet::network::ZoomTransform;

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::WHITE);
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn polyline_visible(rect: Rect, points: &[Pos2], padding: f32) -> bool {
    let bounds = Rect::from_points(points).expand(padding);
    bounds.intersects(rect)
}

pub(super) fn world_to_screen(rect: Rect, transform: &ZoomTransform, world: Vec2) -> Pos2 {
    rect.min + transform.apply(world)
}

pub(super) fn screen_to_world(rect: Rect, transform: &ZoomTransform, screen: Pos2) -> Vec2 {
    transform.invert(screen - rect.min)
}

/// Strokes `points` with an on/off `pattern` (screen units). An empty
/// pattern draws a solid line.
pub(super) fn draw_dashed_polyline(
    painter: &Painter,
    points: &[Pos2],
    stroke: Stroke,
    pattern: &[f32],
) {
    if points.len() < 2 {
        return;
    }
    let pattern_length: f32 = pattern.iter().sum();
    if pattern.is_empty() || pattern_length <= f32::EPSILON {
        painter.line(points.to_vec(), stroke);
        return;
    }

    let mut slot = 0;
    let mut remaining = pattern[0];
    let mut dash = Vec::new();
    for segment in points.windows(2) {
        let (mut start, end) = (segment[0], segment[1]);
        let mut length = start.distance(end);
        while length > 0.0 {
            let drawing = slot % 2 == 0;
            if drawing && dash.is_empty() {
                dash.push(start);
            }

            let advance = remaining.min(length);
            let next = start + (end - start) * (advance / length);
            length -= advance;
            remaining -= advance;
            start = next;

            if drawing {
                dash.push(next);
            }
            if remaining <= f32::EPSILON {
                if drawing {
                    painter.line(std::mem::take(&mut dash), stroke);
                }
                slot = (slot + 1) % pattern.len();
                remaining = pattern[slot];
            }
        }
    }
    if dash.len() >= 2 {
        painter.line(dash, stroke);
    }
}
