use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::navigator::{CollectionStats, DocumentNavigator};
use crate::theme;

#[derive(Resource, Default)]
pub struct StatsWindowState {
    pub is_open: bool,
}

/// Collection statistics, recomputed while the window is open
pub fn stats_window_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<StatsWindowState>,
    navigator: Res<DocumentNavigator>,
    config: Res<AppConfig>,
) -> Result {
    if !state.is_open {
        return Ok(());
    }
    let stats = navigator.statistics();

    let mut is_open = state.is_open;
    egui::Window::new("Statistics")
        .open(&mut is_open)
        .collapsible(true)
        .resizable(true)
        .default_width(320.0)
        .show(contexts.ctx_mut()?, |ui| {
            let Some(stats) = stats else {
                ui.label(egui::RichText::new("No collection open").weak().italics());
                return;
            };

            ui.group(|ui| {
                ui.label(egui::RichText::new("Collection").strong());
                egui::Grid::new("stats_totals")
                    .num_columns(2)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        let rows = [
                            ("Documents", stats.documents),
                            ("Sentences", stats.sentences),
                            ("Tokens", stats.tokens),
                            ("Entities", stats.entities),
                            ("Relations", stats.relations),
                            ("Unannotated documents", stats.unannotated_documents),
                        ];
                        for (name, value) in rows {
                            ui.label(name);
                            ui.label(value.to_string());
                            ui.end_row();
                        }
                    });
            });

            ui.add_space(8.0);
            histogram(ui, "Entity types", &stats.entity_labels, &config);
            ui.add_space(8.0);
            histogram(ui, "Relation types", &stats.relation_labels, &config);
        });
    state.is_open = is_open;

    Ok(())
}

fn histogram(ui: &mut egui::Ui, title: &str, counts: &BTreeMap<String, usize>, config: &AppConfig) {
    ui.group(|ui| {
        ui.label(egui::RichText::new(title).strong());
        let ranked = CollectionStats::ranked(counts);
        let Some(&(_, max)) = ranked.first() else {
            ui.label(egui::RichText::new("None").weak().italics());
            return;
        };
        for (label, count) in ranked {
            ui.horizontal(|ui| {
                ui.add_sized([120.0, 16.0], egui::Label::new(label).truncate());
                let color = theme::label_color(&config.data.label_colors, label);
                ui.add(
                    egui::ProgressBar::new(count as f32 / max as f32)
                        .desired_width(140.0)
                        .fill(color)
                        .text(count.to_string()),
                );
            });
        }
    });
}
