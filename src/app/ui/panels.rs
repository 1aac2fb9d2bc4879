use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, vec2};
use fuzzy_matcher::skim::SkimMatcherV2;

use bibnet::bib::{EntryStore, TagField};
use bibnet::config::NetworkConfig;
use bibnet::network::ViewState;
use bibnet::selectors::Selectors;
use bibnet::tags::{build_tag_cloud, keyword_frequencies};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) const INITIAL_ENTRY_ROWS: usize = 40;
    pub(in crate::app) const ENTRY_PAGE_ROWS: usize = 40;

    pub(in crate::app) fn new(store: EntryStore, config: NetworkConfig) -> Self {
        let network = ViewState::new(
            config.simulation_params(),
            config.label_density(),
            vec2(640.0, 480.0),
        );

        Self {
            store,
            selectors: Selectors::default(),
            config,
            network,
            clouds: Vec::new(),
            tag_filter: String::new(),
            matcher: SkimMatcherV2::default(),
            applied_selectors: None,
            network_dirty: true,
            entry_rows_visible: Self::INITIAL_ENTRY_ROWS,
        }
    }

    /// Brings the filtered collection, the clouds and the network in line
    /// with the selectors and the config.
    pub(in crate::app) fn refresh(&mut self) {
        if self.applied_selectors != Some(self.selectors.revision()) {
            self.selectors.apply(&mut self.store);
            self.applied_selectors = Some(self.selectors.revision());
            self.entry_rows_visible = Self::INITIAL_ENTRY_ROWS;
            self.network_dirty = true;
        }

        if !self.network_dirty {
            return;
        }
        self.network_dirty = false;

        let entry_count = self.store.entry_count();
        let min_tag_frequency = self.config.effective_min_tag_frequency(entry_count);
        self.clouds = TagField::ALL
            .into_iter()
            .map(|field| build_tag_cloud(&self.store, field, &self.selectors, min_tag_frequency))
            .collect();

        let frequencies = keyword_frequencies(&self.store);
        self.network
            .set_params(self.config.simulation_params(), self.config.label_density());
        self.network.rebuild(
            &self.store,
            &frequencies,
            self.config.thresholds(entry_count),
            self.config.hidden,
        );
        tracing::debug!(
            filtered = self.store.filtered_count(),
            revision = self.network.revision(),
            "refreshed views"
        );
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        entries_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.refresh();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("bibnet");
                    ui.separator();
                    ui.label(format!("source: {}", entries_path.display()));
                    ui.label(format!(
                        "entries: {} / {}",
                        self.store.filtered_count(),
                        self.store.entry_count()
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload entries"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(graph) = self.network.graph() {
                            ui.label(format!(
                                "keywords: {}  links: {}",
                                graph.node_count(),
                                graph.link_count()
                            ));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                self.draw_controls(ui);
                ui.separator();
                self.draw_tag_clouds(ui);
            });

        egui::SidePanel::right("entries")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_entries(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading bibliography...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else if self.network.is_hidden() {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.label("Keyword network is hidden.");
                });
            } else {
                self.draw_network(ui);
            }
        });

        // Clicks in any panel land in the selectors; pick them up next frame.
        if self.applied_selectors != Some(self.selectors.revision()) || self.network_dirty {
            ctx.request_repaint();
        }
    }
}
