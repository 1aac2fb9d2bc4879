use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use bibnet::network::{RenderInstructions, label_offset, link_arc};

use super::super::ViewModel;
use super::super::render_utils::{
    circle_visible, draw_background, draw_dashed_polyline, polyline_visible, world_to_screen,
};

const ARC_SEGMENTS: usize = 16;
const LABEL_FONT_SIZE: f32 = 11.0;
const SHADOW_OFFSET: f32 = 1.0;
const SHADOW_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 51);

impl ViewModel {
    pub(in crate::app) fn draw_network(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);
        self.network.set_size(rect.size());

        self.handle_network_zoom(ui, rect, &response);

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(0.0, 1.0 / 15.0);
        let moving = self.network.tick(frame_delta_seconds);

        let mut instructions = self.network.render_instructions();
        if self.handle_network_hover(ui, rect, &instructions) {
            instructions = self.network.render_instructions();
        }
        self.handle_network_drag(ui, rect, &response);
        self.handle_network_pan(&response);
        self.handle_network_click(&response);

        let interaction = *self.network.interaction();
        if interaction.hovered_node.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
        if moving || interaction.dragged_node.is_some() || response.dragged() {
            ui.ctx().request_repaint();
        }

        let Some(graph) = self.network.graph() else {
            return;
        };
        if graph.node_count() == 0 {
            ui.put(
                rect,
                egui::Label::new("No keyword reaches the minimum frequency."),
            );
            return;
        }

        let transform = *self.network.transform();
        let positions = self.network.positions();
        let screen = positions
            .iter()
            .map(|position| world_to_screen(rect, &transform, *position))
            .collect::<Vec<Pos2>>();

        for (link_index, &(source, target)) in graph.endpoints.iter().enumerate() {
            let Some(link) = instructions.links.get(link_index).filter(|link| link.visible) else {
                continue;
            };
            let (Some(&from), Some(&to)) = (positions.get(source), positions.get(target)) else {
                continue;
            };

            let arc = link_arc(from, to, ARC_SEGMENTS)
                .into_iter()
                .map(|point| world_to_screen(rect, &transform, point))
                .collect::<Vec<_>>();
            let width = link.style.width * transform.scale;
            if !polyline_visible(rect, &arc, width) {
                continue;
            }

            let pattern = link
                .style
                .dash
                .segments()
                .iter()
                .map(|length| length * transform.scale)
                .collect::<Vec<_>>();

            if link.style.shadow {
                let offset = vec2(0.0, SHADOW_OFFSET * transform.scale);
                let shadow = arc.iter().map(|point| *point + offset).collect::<Vec<_>>();
                draw_dashed_polyline(
                    &painter,
                    &shadow,
                    Stroke::new(width + transform.scale, SHADOW_COLOR),
                    &pattern,
                );
            }
            draw_dashed_polyline(
                &painter,
                &arc,
                Stroke::new(width, link.style.stroke_color()),
                &pattern,
            );
        }

        Self::draw_nodes(&painter, rect, &screen, &instructions, transform.scale);

        for &index in &instructions.draw_order {
            let (Some(node), Some(instruction), Some(position)) = (
                graph.node(index),
                instructions.nodes.get(index),
                screen.get(index),
            ) else {
                continue;
            };
            if !instruction.visible || !instruction.label_visible {
                continue;
            }

            let anchor = *position + label_offset(node.frequency) * transform.scale;
            let font = FontId::proportional(LABEL_FONT_SIZE * transform.scale.sqrt());
            // The default fonts have no bold face; overstrike instead.
            if instruction.label_bold {
                painter.text(
                    anchor + vec2(0.7, 0.0),
                    Align2::LEFT_BOTTOM,
                    &node.id,
                    font.clone(),
                    Color32::BLACK,
                );
            }
            painter.text(anchor, Align2::LEFT_BOTTOM, &node.id, font, Color32::BLACK);
        }

        painter.rect_stroke(
            rect,
            0.0,
            Stroke::new(1.0, Color32::BLACK),
            egui::StrokeKind::Inside,
        );
    }

    fn draw_nodes(
        painter: &egui::Painter,
        rect: egui::Rect,
        screen: &[Pos2],
        instructions: &RenderInstructions,
        scale: f32,
    ) {
        for &index in &instructions.draw_order {
            let (Some(instruction), Some(position)) =
                (instructions.nodes.get(index), screen.get(index))
            else {
                continue;
            };
            let radius = instruction.radius * scale;
            if !instruction.visible || !circle_visible(rect, *position, radius) {
                continue;
            }
            painter.circle_filled(*position, radius, instruction.fill.color());
        }
    }
}
