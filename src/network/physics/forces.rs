use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadTree;

/// Barnes-Hut opening criterion, squared.
const THETA_SQ: f32 = 0.81;
const DISTANCE_MIN_SQ: f32 = 1.0;

/// Deterministic sub-pixel noise used to separate coincident nodes.
#[derive(Clone, Debug)]
pub(super) struct Jiggle {
    state: u32,
}

impl Jiggle {
    pub(super) fn new(seed: u32) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    pub(super) fn next(&mut self) -> f32 {
        // xorshift32
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        let value = ((x as f32 / u32::MAX as f32) - 0.5) * 1e-6;
        if value == 0.0 {
            1e-7
        } else {
            value
        }
    }

    fn nudge(&mut self, delta: Vec2) -> Vec2 {
        vec2(
            if delta.x == 0.0 { self.next() } else { delta.x },
            if delta.y == 0.0 { self.next() } else { delta.y },
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct LinkSpring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    /// Share of the correction applied to the target.
    pub(super) bias: f32,
}

pub(super) fn apply_links(
    springs: &[LinkSpring],
    rest_length: f32,
    alpha: f32,
    positions: &[Vec2],
    velocities: &mut [Vec2],
    jiggle: &mut Jiggle,
) {
    for spring in springs {
        let (source, target) = (spring.source, spring.target);
        if source == target || source >= positions.len() || target >= positions.len() {
            continue;
        }

        let delta = jiggle.nudge(
            positions[target] + velocities[target] - positions[source] - velocities[source],
        );
        let length = delta.length();
        let scale = (length - rest_length) / length * alpha * spring.strength;
        let correction = delta * scale;

        velocities[target] -= correction * spring.bias;
        velocities[source] += correction * (1.0 - spring.bias);
    }
}

fn charge_contribution(delta: Vec2, distance_sq: f32, charge: f32, alpha: f32) -> Vec2 {
    let distance_sq = if distance_sq < DISTANCE_MIN_SQ {
        (DISTANCE_MIN_SQ * distance_sq).sqrt()
    } else {
        distance_sq
    };
    delta * (charge * alpha / distance_sq)
}

fn accumulate_charge(
    tree: &QuadTree,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    alpha: f32,
    jiggle: &mut Jiggle,
    velocity: &mut Vec2,
) {
    if tree.count == 0 {
        return;
    }

    let point = positions[index];

    if tree.is_leaf() {
        for &other in &tree.indices {
            if other == index {
                continue;
            }
            let delta = jiggle.nudge(positions[other] - point);
            *velocity += charge_contribution(delta, delta.length_sq(), strength, alpha);
        }
        return;
    }

    let delta = tree.center_of_mass - point;
    let distance_sq = delta.length_sq();
    let width = tree.cell.width();
    if width * width / THETA_SQ < distance_sq {
        let charge = strength * tree.count as f32;
        *velocity += charge_contribution(jiggle.nudge(delta), distance_sq, charge, alpha);
        return;
    }

    for child in tree.children.iter().flatten() {
        accumulate_charge(child, index, positions, strength, alpha, jiggle, velocity);
    }
}

/// Uniform many-body force; negative strength repels.
pub(super) fn apply_charge(
    strength: f32,
    alpha: f32,
    positions: &[Vec2],
    velocities: &mut [Vec2],
    jiggle: &mut Jiggle,
) {
    if positions.len() < 2 {
        return;
    }

    let Some(tree) = QuadTree::build(positions) else {
        return;
    };

    for (index, velocity) in velocities.iter_mut().enumerate() {
        accumulate_charge(&tree, index, positions, strength, alpha, jiggle, velocity);
    }
}

/// Pulls every node toward `center` on both axes.
pub(super) fn apply_centering(
    center: Vec2,
    strength: f32,
    alpha: f32,
    positions: &[Vec2],
    velocities: &mut [Vec2],
) {
    for (position, velocity) in positions.iter().zip(velocities.iter_mut()) {
        *velocity += (center - *position) * (strength * alpha);
    }
}
