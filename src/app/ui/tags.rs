use eframe::egui::{self, Color32, FontId, RichText, Sense, Ui, vec2};

use bibnet::bib::TagField;
use bibnet::selectors::SelectorService;
use bibnet::tags::{Tag, TagCloud, matches_filter};
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::ViewModel;

const SPARKLINE_BAR_WIDTH: f32 = 3.0;
const SPARKLINE_HEIGHT: f32 = 10.0;

fn tag_font_size(frequency: usize) -> f32 {
    match frequency {
        0..=4 => 12.0,
        5..=9 => 13.0,
        10..=19 => 14.5,
        _ => 16.0,
    }
}

/// One bar per selector, height by agreement.
fn draw_sparkline(ui: &mut Ui, agreement: &[f64]) {
    if agreement.is_empty() {
        return;
    }
    let width = agreement.len() as f32 * (SPARKLINE_BAR_WIDTH + 1.0);
    let (rect, _) = ui.allocate_exact_size(vec2(width, SPARKLINE_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    for (index, value) in agreement.iter().enumerate() {
        let height = (value.clamp(0.0, 1.0) as f32 * SPARKLINE_HEIGHT).max(1.0);
        let left = rect.left() + index as f32 * (SPARKLINE_BAR_WIDTH + 1.0);
        let bar = egui::Rect::from_min_max(
            egui::pos2(left, rect.bottom() - height),
            egui::pos2(left + SPARKLINE_BAR_WIDTH, rect.bottom()),
        );
        painter.rect_filled(bar, 0.0, Color32::from_gray(110));
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_tag_clouds(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("Filter");
            ui.text_edit_singleline(&mut self.tag_filter)
                .on_hover_text("Hide tags that do not fuzzy-match this text.");
        });
        ui.add_space(4.0);

        let query = self.tag_filter.trim().to_owned();
        let selector_count = self.selectors.active().len();
        let mut toggled = None;

        egui::ScrollArea::vertical()
            .id_salt("tag_clouds_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for cloud in &self.clouds {
                    egui::CollapsingHeader::new(cloud.field.title())
                        .id_salt(cloud.field.key())
                        .default_open(true)
                        .show(ui, |ui| {
                            let clicked =
                                Self::draw_cloud(ui, cloud, &self.matcher, &query, selector_count);
                            if clicked.is_some() {
                                toggled = clicked;
                            }
                        });
                }
            });

        if let Some((field, value)) = toggled {
            self.selectors.toggle_selector(field.key(), &value);
        }
    }

    /// Draws one cloud's categories and returns the tag clicked, if any.
    fn draw_cloud(
        ui: &mut Ui,
        cloud: &TagCloud,
        matcher: &SkimMatcherV2,
        query: &str,
        selector_count: usize,
    ) -> Option<(TagField, String)> {
        if cloud.tag_count() == 0 {
            ui.label(format!("No tags occur at least {} times.", cloud.min_tag_frequency));
            return None;
        }

        let field_title = cloud.field.title();
        let mut clicked = None;
        for category in &cloud.categories {
            let tags = category
                .tags
                .iter()
                .filter(|tag| matches_filter(matcher, tag.label(), query))
                .collect::<Vec<_>>();
            if tags.is_empty() {
                continue;
            }

            if !category.name.is_empty() {
                ui.label(RichText::new(format!("{}:", category.name)).weak());
            }
            ui.horizontal_wrapped(|ui| {
                for tag in tags {
                    if Self::draw_tag(ui, tag, field_title, selector_count) {
                        clicked = Some((cloud.field, tag.id.clone()));
                    }
                }
            });
            ui.add_space(4.0);
        }
        clicked
    }

    fn draw_tag(ui: &mut Ui, tag: &Tag, field_title: &str, selector_count: usize) -> bool {
        let font = FontId::proportional(tag_font_size(tag.frequency));
        let text = RichText::new(tag.label()).font(font);
        let response = ui
            .horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 2.0;
                draw_sparkline(ui, &tag.agreement);
                let response = ui.selectable_label(tag.active, text);
                ui.small(tag.frequency.to_string());
                response
            })
            .inner;

        let clicked = response.clicked();
        response.on_hover_ui(|ui| {
            ui.label(RichText::new(format!("{field_title}: {}", tag.id)).strong());
            ui.label(format!("# publications: {}", tag.frequency));
            if selector_count > 0 {
                ui.label(format!("selector agreement: {:.2}", tag.total_agreement()));
            }
        });
        clicked
    }
}
