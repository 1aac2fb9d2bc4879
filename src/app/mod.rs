use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use fuzzy_matcher::skim::SkimMatcherV2;

use bibnet::bib::{EntryStore, load_entry_store};
use bibnet::config::NetworkConfig;
use bibnet::network::ViewState;
use bibnet::selectors::Selectors;
use bibnet::tags::TagCloud;

mod graph;
mod render_utils;
mod ui;

pub struct BibApp {
    entries_path: PathBuf,
    config: NetworkConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<EntryStore, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<EntryStore, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    store: EntryStore,
    selectors: Selectors,
    config: NetworkConfig,
    network: ViewState,
    clouds: Vec<TagCloud>,
    tag_filter: String,
    matcher: SkimMatcherV2,
    applied_selectors: Option<u64>,
    network_dirty: bool,
    entry_rows_visible: usize,
}

impl BibApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        entries_path: PathBuf,
        config: NetworkConfig,
    ) -> Self {
        let state = Self::start_load(entries_path.clone());
        Self {
            entries_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(entries_path: PathBuf) -> Receiver<Result<EntryStore, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_entry_store(&entries_path).map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                tracing::error!(%error, "loading entries failed");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(entries_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(entries_path),
        }
    }
}

impl eframe::App for BibApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(store) => AppState::Ready(Box::new(ViewModel::new(
                                store,
                                self.config.clone(),
                            ))),
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading bibliography...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load bibliography");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.entries_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.entries_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.entries_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(store) => AppState::Ready(Box::new(ViewModel::new(
                                    store,
                                    model.config.clone(),
                                ))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
