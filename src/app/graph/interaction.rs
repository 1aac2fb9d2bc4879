use eframe::egui::{self, Rect, Ui};

use bibnet::network::RenderInstructions;

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;

/// Pointer slop around links, in screen pixels.
const LINK_HOVER_TOLERANCE: f32 = 3.0;

impl ViewModel {
    pub(in crate::app) fn handle_network_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.network.zoom_at(pointer - rect.min, zoom_factor);
    }

    pub(in crate::app) fn handle_network_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
            || (response.dragged_by(egui::PointerButton::Primary)
                && self.network.interaction().dragged_node.is_none())
        {
            self.network.pan_by(response.drag_delta());
        }
    }

    /// Updates hover from the pointer; returns whether it changed.
    pub(in crate::app) fn handle_network_hover(
        &mut self,
        ui: &Ui,
        rect: Rect,
        instructions: &RenderInstructions,
    ) -> bool {
        let before = *self.network.interaction();
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer));

        match pointer {
            Some(pointer) => {
                let transform = *self.network.transform();
                let world = screen_to_world(rect, &transform, pointer);
                let node = self.network.node_at(world, instructions);
                let link = if node.is_none() {
                    self.network
                        .link_at(world, LINK_HOVER_TOLERANCE / transform.scale, instructions)
                } else {
                    None
                };
                self.network.hover_node(node);
                self.network.hover_link(link);
            }
            None => {
                self.network.hover_node(None);
                self.network.hover_link(None);
            }
        }

        *self.network.interaction() != before
    }

    pub(in crate::app) fn handle_network_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let hovered = self.network.interaction().hovered_node;

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            self.network.drag_start(index);
        }

        let Some(dragged) = self.network.interaction().dragged_node else {
            return;
        };

        if response.drag_stopped() || !ui.input(|input| input.pointer.primary_down()) {
            self.network.drag_end(dragged);
            return;
        }

        if let Some(pointer) = ui.input(|input| input.pointer.interact_pos()) {
            let world = screen_to_world(rect, self.network.transform(), pointer);
            self.network.drag_to(dragged, world);
        }
    }

    pub(in crate::app) fn handle_network_click(&mut self, response: &egui::Response) {
        if !response.clicked_by(egui::PointerButton::Primary) {
            return;
        }
        if let Some(index) = self.network.interaction().hovered_node {
            self.network.click_node(index, &mut self.selectors);
        }
    }
}
