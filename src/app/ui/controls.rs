use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, RichText, Ui, emath::Numeric};

use bibnet::config::{EDGE_WEIGHT_STEPS, MAX_EDGE_WEIGHT};
use bibnet::selectors::SelectorService;

use super::super::ViewModel;

const ARROW_BASE_RATE: f64 = 10.0;
const ARROW_RAMP_PER_SEC: f64 = 9.0;
const ARROW_MAX_SPEEDUP: f64 = 40.0;

/// How long an arrow key has been held on a focused slider, plus the
/// movement not yet applied because it is below the slider's resolution.
#[derive(Clone, Copy, Default)]
struct ArrowHold {
    direction: i8,
    secs: f64,
    carry: f64,
}

impl ArrowHold {
    fn steps_per_sec(&self) -> f64 {
        let ramp = self.secs * ARROW_RAMP_PER_SEC;
        ARROW_BASE_RATE * (1.0 + ramp + ramp * ramp * 0.15).min(ARROW_MAX_SPEEDUP)
    }
}

/// Moves a focused slider's value while an arrow key is held, speeding up
/// the longer the key stays down. With a `resolution` the value only moves
/// in whole multiples of it; integral values always use at least 1.
/// Returns whether the value changed.
fn nudge_with_arrow_keys<N: Numeric>(
    ui: &Ui,
    response: &Response,
    value: &mut N,
    range: RangeInclusive<N>,
    step: f64,
    resolution: Option<f64>,
) -> bool {
    let hold_id = response.id.with("arrow_hold");
    if !response.has_focus() {
        ui.ctx().data_mut(|data| data.remove::<ArrowHold>(hold_id));
        return false;
    }

    let (dt, up, down) = ui.input(|input| {
        (
            f64::from(input.stable_dt.min(0.1)),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });
    let direction = i8::from(up) - i8::from(down);
    if direction == 0 {
        ui.ctx().data_mut(|data| data.remove::<ArrowHold>(hold_id));
        return false;
    }

    let mut hold = ui
        .ctx()
        .data(|data| data.get_temp::<ArrowHold>(hold_id))
        .filter(|hold| hold.direction == direction)
        .unwrap_or(ArrowHold {
            direction,
            ..ArrowHold::default()
        });
    hold.secs += dt;
    hold.carry += f64::from(direction) * step * hold.steps_per_sec() * dt;
    let resolution = if N::INTEGRAL {
        Some(resolution.unwrap_or(1.0).max(1.0))
    } else {
        resolution.filter(|resolution| *resolution > 0.0)
    };
    let delta = match resolution {
        Some(resolution) => (hold.carry / resolution).trunc() * resolution,
        None => hold.carry,
    };
    hold.carry -= delta;
    ui.ctx().data_mut(|data| data.insert_temp(hold_id, hold));
    ui.ctx().request_repaint();

    let before = value.to_f64();
    let after = (before + delta).clamp(range.start().to_f64(), range.end().to_f64());
    *value = N::from_f64(after);
    value.to_f64() != before
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Keyword Network");
        ui.separator();
        ui.add_space(4.0);

        let mut changed = false;

        changed |= ui
            .checkbox(&mut self.config.hidden, "Hide network")
            .on_hover_text("Show or hide keyword relationships as a network.")
            .changed();

        let entry_count = self.store.entry_count();
        let mut min_frequency = self.config.effective_min_tag_frequency(entry_count);
        ui.horizontal(|ui| {
            ui.label("Min frequency")
                .on_hover_text("Tags and keywords below this frequency are left out.");
            if ui
                .add_enabled(min_frequency > 1, egui::Button::new("-").small())
                .clicked()
            {
                min_frequency -= 1;
            }
            ui.label(RichText::new(min_frequency.to_string()).strong());
            if ui.add(egui::Button::new("+").small()).clicked() {
                min_frequency += 1;
            }
        });
        if min_frequency != self.config.effective_min_tag_frequency(entry_count) {
            self.config.min_tag_frequency = Some(min_frequency);
            self.config.min_keyword_frequency = Some(min_frequency);
            changed = true;
        }

        let mut min_edge_weight = self.config.min_edge_weight;
        let min_edge_weight_slider = ui
            .add(
                egui::Slider::new(&mut min_edge_weight, 0.0..=MAX_EDGE_WEIGHT)
                    .text("Min edge weight")
                    .fixed_decimals(2)
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Links need a normalized co-occurrence strictly above this.");
        if min_edge_weight_slider.hovered() {
            min_edge_weight_slider.request_focus();
        }
        let mut edge_weight_changed = min_edge_weight_slider.changed();
        edge_weight_changed |= nudge_with_arrow_keys(
            ui,
            &min_edge_weight_slider,
            &mut min_edge_weight,
            0.0..=MAX_EDGE_WEIGHT,
            0.005,
            Some(1.0 / EDGE_WEIGHT_STEPS),
        );
        if edge_weight_changed {
            self.config.set_min_edge_weight(min_edge_weight);
            changed = true;
        }

        ui.collapsing("Layout tuning", |ui| {
            let edge_strength_slider = ui
                .add(
                    egui::Slider::new(&mut self.config.edge_strength, 0.0..=2.0)
                        .text("Edge strength")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How strongly linked keywords pull toward each other.");
            if edge_strength_slider.hovered() {
                edge_strength_slider.request_focus();
            }
            changed |= edge_strength_slider.changed();
            changed |= nudge_with_arrow_keys(
                ui,
                &edge_strength_slider,
                &mut self.config.edge_strength,
                0.0..=2.0,
                0.01,
                None,
            );

            let label_count_slider = ui
                .add(
                    egui::Slider::new(&mut self.config.label_count, 0..=60)
                        .text("Labels")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How many keywords are labeled when the whole network is visible.");
            if label_count_slider.hovered() {
                label_count_slider.request_focus();
            }
            changed |= label_count_slider.changed();
            changed |= nudge_with_arrow_keys(
                ui,
                &label_count_slider,
                &mut self.config.label_count,
                0..=60,
                1.0,
                None,
            );
        });

        if changed {
            self.network_dirty = true;
        }

        ui.separator();
        self.draw_selectors(ui);
    }

    fn draw_selectors(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Selectors").strong());
            let clear = ui.add_enabled(
                !self.selectors.active().is_empty(),
                egui::Button::new("Clear").small(),
            );
            if clear.clicked() {
                self.selectors.clear();
            }
        });

        if self.selectors.active().is_empty() {
            ui.label("Click a keyword or tag to filter entries.");
            return;
        }

        let mut lock_change = None;
        let mut removed = None;
        for (index, selector) in self.selectors.active().iter().enumerate() {
            ui.horizontal(|ui| {
                let mut lock = selector.lock;
                if ui
                    .checkbox(&mut lock, "")
                    .on_hover_text("Locked selectors keep filtering but are ignored by tag agreement.")
                    .changed()
                {
                    lock_change = Some((index, lock));
                }
                ui.label(format!("{}: {}", selector.field.title(), selector.value));
                if ui.small_button("x").clicked() {
                    removed = Some((selector.field, selector.value.clone()));
                }
            });
        }

        if let Some((index, lock)) = lock_change {
            self.selectors.set_lock(index, lock);
        }
        if let Some((field, value)) = removed {
            self.selectors.toggle_selector(field.key(), &value);
        }
    }
}
