use std::f32::consts::FRAC_PI_3;

use eframe::egui::{Color32, Vec2, vec2};

use super::graph::KeywordLink;

pub const DEFAULT_NODE_COLOR: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);
pub const HIGHLIGHTED_NODE_COLOR: Color32 = Color32::BLACK;
pub const NEIGHBOR_NODE_COLOR: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);

const LIGHT_LINK: Color32 = Color32::from_rgb(0xdd, 0xdd, 0xdd);
const DARK_LINK: Color32 = Color32::from_rgb(0x00, 0x00, 0x00);
const SHADOW_IMPORTANCE: f64 = 0.7;
const HOVERED_LINK_WIDTH_SCALE: f32 = 1.5;

pub fn node_radius(frequency: usize) -> f32 {
    3.0 + (frequency as f32).sqrt() * 0.2
}

/// Offset of a node's label from its center.
pub fn label_offset(frequency: usize) -> Vec2 {
    let grow = (frequency as f32).sqrt() * 0.2;
    vec2(6.0 + grow, 3.0 + grow)
}

fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}

pub fn link_color(importance: f64) -> Color32 {
    let t = (importance as f32).clamp(0.0, 1.0);
    Color32::from_rgb(
        lerp_channel(LIGHT_LINK.r(), DARK_LINK.r(), t),
        lerp_channel(LIGHT_LINK.g(), DARK_LINK.g(), t),
        lerp_channel(LIGHT_LINK.b(), DARK_LINK.b(), t),
    )
}

pub fn link_opacity(importance: f64) -> f32 {
    (0.5 + 0.5 * importance.max(0.0).powf(0.8)) as f32
}

pub fn link_width(weight: f64, max_width: f32) -> f32 {
    (1.0 + 3.0 * weight.max(0.0).powf(1.5) as f32).min(max_width)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashPattern {
    Solid,
    FineDash,
    DashDot,
    SparseDots,
}

impl DashPattern {
    pub fn for_weight(weight: f64) -> Self {
        if weight > 0.95 {
            Self::Solid
        } else if weight > 0.8 {
            Self::FineDash
        } else if weight > 0.6 {
            Self::DashDot
        } else {
            Self::SparseDots
        }
    }

    /// Alternating on/off lengths in stroke units; empty for a solid line.
    pub fn segments(self) -> &'static [f32] {
        match self {
            Self::Solid => &[],
            Self::FineDash => &[4.0, 2.0],
            Self::DashDot => &[6.0, 2.0, 1.0, 2.0],
            Self::SparseDots => &[2.0, 2.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
    pub color: Color32,
    pub opacity: f32,
    pub width: f32,
    pub dash: DashPattern,
    pub shadow: bool,
}

impl LinkStyle {
    /// Premultiplied stroke color with the opacity applied.
    pub fn stroke_color(&self) -> Color32 {
        self.color.gamma_multiply(self.opacity.clamp(0.0, 1.0))
    }
}

/// Width is capped by the smaller endpoint radius so links never outgrow nodes.
pub fn link_style(
    link: &KeywordLink,
    source_radius: f32,
    target_radius: f32,
    hovered: bool,
) -> LinkStyle {
    let max_width = source_radius.min(target_radius);
    let width = link_width(link.weight, max_width);
    let opacity = link_opacity(link.importance);

    LinkStyle {
        color: link_color(link.importance),
        opacity: if hovered { 1.0 } else { opacity },
        width: if hovered {
            width * HOVERED_LINK_WIDTH_SCALE
        } else {
            width
        },
        dash: DashPattern::for_weight(link.weight),
        shadow: link.importance > SHADOW_IMPORTANCE,
    }
}

/// Samples the clockwise (on screen) arc from `source` to `target` whose
/// radius equals the chord length.
pub fn link_arc(source: Vec2, target: Vec2, segments: usize) -> Vec<Vec2> {
    let chord = target - source;
    let length = chord.length();
    if length <= f32::EPSILON || segments == 0 {
        return vec![source, target];
    }

    // Chord equals radius, so the arc spans 60 degrees.
    let normal = vec2(-chord.y, chord.x) / length;
    let center = source + chord * 0.5 + normal * (length * 3.0_f32.sqrt() * 0.5);
    let start = source - center;
    let start_angle = start.y.atan2(start.x);

    let mut points = Vec::with_capacity(segments + 1);
    points.push(source);
    for step in 1..segments {
        let angle = start_angle + FRAC_PI_3 * (step as f32 / segments as f32);
        points.push(center + vec2(angle.cos(), angle.sin()) * length);
    }
    points.push(target);
    points
}
