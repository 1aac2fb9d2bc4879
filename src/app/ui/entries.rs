use eframe::egui::{self, RichText, Ui};

use bibnet::bib::TagField;
use bibnet::selectors::SelectorService;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_entries(&mut self, ui: &mut Ui) {
        ui.heading("Entries");
        ui.label(format!(
            "{} of {} shown",
            self.store.filtered_count(),
            self.store.entry_count()
        ));
        ui.add_space(6.0);

        let row_count = self.store.filtered_count().min(self.entry_rows_visible);
        if row_count == 0 {
            ui.label("No entry matches every selector.");
            return;
        }

        let mut should_load_more = false;
        let mut toggled = None;

        egui::ScrollArea::vertical()
            .id_salt("entries_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in self.store.filtered_entries().take(row_count) {
                    let title = entry.title().unwrap_or(entry.id.as_str());
                    ui.label(RichText::new(title).strong());
                    let mut byline = entry.authors.join(", ");
                    if let Some(year) = entry.year() {
                        if !byline.is_empty() {
                            byline.push_str(", ");
                        }
                        byline.push_str(year);
                    }
                    if !byline.is_empty() {
                        ui.small(byline);
                    }

                    ui.horizontal_wrapped(|ui| {
                        for keyword in &entry.keywords {
                            let active = self.selectors.is_active(TagField::Keywords, keyword);
                            if ui
                                .selectable_label(active, RichText::new(keyword.as_str()).small())
                                .clicked()
                            {
                                toggled = Some(keyword.clone());
                            }
                        }
                    });
                    ui.separator();
                }

                if row_count < self.store.filtered_count() && ui.button("Show more").clicked() {
                    should_load_more = true;
                }
            });

        if should_load_more {
            self.entry_rows_visible = (self.entry_rows_visible + Self::ENTRY_PAGE_ROWS)
                .min(self.store.filtered_count());
        }
        if let Some(keyword) = toggled {
            self.selectors
                .toggle_selector(TagField::Keywords.key(), &keyword);
        }
    }
}
