use super::models::FespriteGui;
use crate::types::CompositeMode;
use eframe::egui::{Align, Color32, ComboBox, Frame, Layout, RichText, Ui};

const COMPONENT_HEIGHT: f32 = 80.0;
const COMPONENT_WIDTH: f32 = 120.0;

fn path_label(ui: &mut Ui, path: Option<&std::path::PathBuf>) {
    if let Some(path) = path {
        ui.label(RichText::new(path.to_string_lossy()).color(Color32::from_rgb(255, 165, 0)));
    } else {
        ui.label(RichText::new("None selected").color(Color32::from_gray(120)));
    }
}

pub struct ModeSelectionComponent;

impl ModeSelectionComponent {
    pub fn render(ui: &mut Ui, app: &mut FespriteGui) {
        ui.heading("Compositing Mode");

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_height(COMPONENT_HEIGHT * 0.6);
            ui.set_min_width(COMPONENT_WIDTH);
            ui.horizontal(|ui| {
                ui.radio_value(&mut app.batch_mode, false, "Single Pair");
                ui.radio_value(&mut app.batch_mode, true, "Batch");
            });

            if app.batch_mode {
                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    ui.label("Composites the head with every body class");
                });
            }
        });
    }
}

pub struct SheetSelectionComponent;

impl SheetSelectionComponent {
    pub fn render(ui: &mut Ui, app: &mut FespriteGui) {
        ui.heading("Sheet Selection");

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_height(COMPONENT_HEIGHT);
            ui.set_min_width(COMPONENT_WIDTH);

            ui.horizontal(|ui| {
                ui.label("Input Directory:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Browse").clicked() {
                        app.select_input_directory();
                    }
                });
            });
            ui.label(
                RichText::new(app.input_dir.to_string_lossy())
                    .color(Color32::from_rgb(255, 165, 0)),
            );

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                if ui.button("Reload tables").clicked() {
                    app.refresh_tables();
                }
                if ui.button("Rescan sheets").clicked() {
                    app.rescan_sheets();
                }
            });

            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.label("Head:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let selected = if app.head.is_empty() {
                        "None".to_string()
                    } else {
                        app.head.clone()
                    };
                    ComboBox::from_id_salt("head_sheet")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for name in app.head_choices.clone() {
                                ui.selectable_value(&mut app.head, name.clone(), name);
                            }
                        });
                });
            });

            if !app.batch_mode {
                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    ui.label("Body:");
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let selected = if app.body.is_empty() {
                            "None".to_string()
                        } else {
                            app.body.clone()
                        };
                        ComboBox::from_id_salt("body_sheet")
                            .selected_text(selected)
                            .show_ui(ui, |ui| {
                                for name in app.body_choices.clone() {
                                    ui.selectable_value(&mut app.body, name.clone(), name);
                                }
                            });
                    });
                });
            }
        });
    }
}

pub struct OutputOptionsComponent;

impl OutputOptionsComponent {
    pub fn render(ui: &mut Ui, app: &mut FespriteGui) {
        ui.heading("Output Options");

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_height(COMPONENT_HEIGHT);
            ui.set_min_width(COMPONENT_WIDTH);

            ui.horizontal(|ui| {
                ui.label("Frames:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ComboBox::from_id_salt("composite_mode")
                        .selected_text(format!("{:?}", app.mode))
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut app.mode, CompositeMode::Idle, "Idle only");
                            ui.selectable_value(&mut app.mode, CompositeMode::Full, "Idle + move");
                        });
                });
            });

            ui.add_space(5.0);

            ui.checkbox(&mut app.alpha, "Transparent background");
            ui.checkbox(&mut app.sidecar, "Write metadata sidecar");

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.label("Source offset:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.add(
                        eframe::egui::TextEdit::singleline(&mut app.offset_y)
                            .desired_width(32.0)
                            .hint_text("Y"),
                    );
                    ui.label("Y");
                    ui.add(
                        eframe::egui::TextEdit::singleline(&mut app.offset_x)
                            .desired_width(32.0)
                            .hint_text("X"),
                    );
                    ui.label("X");
                });
            });
        });
    }
}

pub struct FileSelectionComponent;

impl FileSelectionComponent {
    pub fn render_single_file(ui: &mut Ui, app: &mut FespriteGui) {
        ui.heading("Output File");

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_height(COMPONENT_HEIGHT * 0.6);
            ui.set_min_width(COMPONENT_WIDTH);

            ui.horizontal(|ui| {
                ui.label("Output Sheet:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Browse").clicked() {
                        app.select_output_file();
                    }
                });
            });
            path_label(ui, app.output_path.as_ref());
        });
    }

    pub fn render_batch_mode(ui: &mut Ui, app: &mut FespriteGui) {
        ui.heading("Output Directory");

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_height(COMPONENT_HEIGHT * 0.6);
            ui.set_min_width(COMPONENT_WIDTH);

            ui.horizontal(|ui| {
                ui.label("Output Directory:");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Browse").clicked() {
                        app.select_output_directory();
                    }
                });
            });
            path_label(ui, app.output_dir_path.as_ref());
        });
    }
}

pub struct PresetComponent;

impl PresetComponent {
    pub fn render(ui: &mut Ui, app: &mut FespriteGui) {
        ui.heading("Presets");

        Frame::NONE.inner_margin(0.0).show(ui, |ui| {
            ui.set_min_width(COMPONENT_WIDTH);
            ui.horizontal(|ui| {
                if ui.button("Save preset").clicked() {
                    if let Err(e) = app.save_preset() {
                        tracing::error!("Could not save preset: {}", e);
                    }
                }
                if ui.button("Load preset").clicked() {
                    if let Err(e) = app.load_preset() {
                        tracing::error!("Could not load preset: {}", e);
                    }
                }
            });

            ui.add_space(5.0);
            ui.label(RichText::new("CLI equivalent:").color(Color32::from_gray(150)));
            ui.label(
                RichText::new(app.generate_cli_command())
                    .color(Color32::from_gray(150))
                    .monospace()
                    .size(10.0),
            );
        });
    }
}

pub struct FooterComponent;

impl FooterComponent {
    pub fn render(ui: &mut Ui, app: &mut FespriteGui) {
        app.update_system_stats();

        ui.horizontal(|ui| {
            if app.is_processing {
                ui.spinner();
                ui.label("Compositing...");
            } else {
                ui.label(&app.status_message);
            }

            if let Some(duration) = app.last_processing_duration {
                ui.label(
                    RichText::new(format!("last run {:.2?}", duration))
                        .color(Color32::from_gray(150)),
                );
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(
                    RichText::new(format!(
                        "CPU {:.0}%  MEM {:.0}/{:.0} MB",
                        app.cpu_usage, app.memory_usage_mb, app.total_memory_mb
                    ))
                    .color(Color32::from_gray(150))
                    .monospace(),
                );

                if ui.button("Save logs").clicked() {
                    if let Err(e) = app.save_logs_to_file() {
                        tracing::error!("Could not save logs: {}", e);
                    }
                }
            });
        });
    }
}
