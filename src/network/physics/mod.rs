mod forces;
mod quadtree;

use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};

use super::graph::IndexedGraph;
use forces::{Jiggle, LinkSpring, apply_centering, apply_charge, apply_links};

const TICK_SECONDS: f32 = 1.0 / 60.0;
const MAX_TICKS_PER_STEP: usize = 4;
const INITIAL_RADIUS: f32 = 10.0;

/// Tuning shared by every simulation built for a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    pub edge_strength: f32,
    pub charge_strength: f32,
    pub link_distance: f32,
    pub center: Vec2,
    pub center_strength: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            edge_strength: 1.0,
            charge_strength: -100.0,
            link_distance: 30.0,
            center: Vec2::ZERO,
            center_strength: 0.1,
        }
    }
}

/// The physics behind a network view, addressed by node index.
pub trait ForceSimulation {
    fn from_graph(graph: &IndexedGraph, params: SimulationParams) -> Self
    where
        Self: Sized;

    /// Advances by `dt` seconds and returns the node positions.
    fn step(&mut self, dt: f32) -> &[Vec2];

    fn positions(&self) -> &[Vec2];

    /// Fixes a node at `position` until [`ForceSimulation::unpin`].
    fn pin(&mut self, index: usize, position: Vec2);

    fn unpin(&mut self, index: usize);

    fn set_alpha_target(&mut self, target: f32);

    /// Resumes ticking after the simulation cooled down.
    fn restart(&mut self);

    fn is_settled(&self) -> bool;

    fn set_center(&mut self, center: Vec2);
}

/// Per-link pull: `edge_strength * (0.9 * importance * weight + 0.1)`.
pub fn link_strength(edge_strength: f32, importance: f64, weight: f64) -> f32 {
    edge_strength * (0.9 * (importance * weight) as f32 + 0.1)
}

/// Force-directed layout that cools down as `alpha` decays toward its target.
#[derive(Clone, Debug)]
pub struct ForceLayout {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    pinned: Vec<Option<Vec2>>,
    springs: Vec<LinkSpring>,
    params: SimulationParams,
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_retention: f32,
    running: bool,
    accumulator: f32,
    jiggle: Jiggle,
}

impl ForceLayout {
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Runs a single fixed tick regardless of the cooling state.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        apply_links(
            &self.springs,
            self.params.link_distance,
            self.alpha,
            &self.positions,
            &mut self.velocities,
            &mut self.jiggle,
        );
        apply_charge(
            self.params.charge_strength,
            self.alpha,
            &self.positions,
            &mut self.velocities,
            &mut self.jiggle,
        );
        apply_centering(
            self.params.center,
            self.params.center_strength,
            self.alpha,
            &self.positions,
            &mut self.velocities,
        );

        for ((position, velocity), pinned) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(&self.pinned)
        {
            if let Some(pin) = pinned {
                *position = *pin;
                *velocity = Vec2::ZERO;
                continue;
            }

            *velocity *= self.velocity_retention;
            if !velocity.x.is_finite() || !velocity.y.is_finite() {
                *velocity = Vec2::ZERO;
            }
            *position += *velocity;
        }
    }

    fn initial_positions(count: usize, center: Vec2) -> Vec<Vec2> {
        let angle_step = PI * (3.0 - 5.0_f32.sqrt());
        (0..count)
            .map(|index| {
                let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
                let angle = index as f32 * angle_step;
                center + vec2(angle.cos(), angle.sin()) * radius
            })
            .collect()
    }
}

impl ForceSimulation for ForceLayout {
    fn from_graph(graph: &IndexedGraph, params: SimulationParams) -> Self {
        let node_count = graph.node_count();

        let mut degree = vec![0usize; node_count];
        for &(source, target) in &graph.endpoints {
            degree[source] += 1;
            degree[target] += 1;
        }

        let springs = graph
            .endpoints
            .iter()
            .zip(&graph.graph.links)
            .map(|(&(source, target), link)| LinkSpring {
                source,
                target,
                strength: link_strength(params.edge_strength, link.importance, link.weight),
                bias: degree[source] as f32 / (degree[source] + degree[target]) as f32,
            })
            .collect();

        Self {
            positions: Self::initial_positions(node_count, params.center),
            velocities: vec![Vec2::ZERO; node_count],
            pinned: vec![None; node_count],
            springs,
            params,
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: 1.0 - 0.001_f32.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_retention: 0.6,
            running: node_count > 0,
            accumulator: 0.0,
            jiggle: Jiggle::new(node_count as u32 ^ 0x9e37_79b9),
        }
    }

    fn step(&mut self, dt: f32) -> &[Vec2] {
        if !self.running {
            return &self.positions;
        }

        let budget = TICK_SECONDS * MAX_TICKS_PER_STEP as f32;
        self.accumulator = (self.accumulator + dt.max(0.0)).min(budget);
        while self.accumulator >= TICK_SECONDS {
            self.accumulator -= TICK_SECONDS;
            self.tick();
            if self.alpha < self.alpha_min {
                self.running = false;
                self.accumulator = 0.0;
                break;
            }
        }

        &self.positions
    }

    fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(pinned) = self.pinned.get_mut(index) {
            *pinned = Some(position);
            self.positions[index] = position;
        }
    }

    fn unpin(&mut self, index: usize) {
        if let Some(pinned) = self.pinned.get_mut(index) {
            *pinned = None;
        }
    }

    fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.max(0.0);
    }

    fn restart(&mut self) {
        self.running = !self.positions.is_empty();
    }

    fn is_settled(&self) -> bool {
        !self.running
    }

    fn set_center(&mut self, center: Vec2) {
        self.params.center = center;
    }
}
