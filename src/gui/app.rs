//*** START FILE: src/gui/app.rs ***//
use eframe::{egui, App, NativeOptions};
use std::path::PathBuf;

use crate::form::{ConfigStyle, FormData, FormKind, MotifNumber, SectionRecord};
use crate::generator::uid::RandomUids;
use crate::submit::Session;
use crate::url_builder;

enum Status {
    Success(String),
    Error(String),
}

pub struct ConfiguratorApp {
    session: Option<Session>,
    session_error: Option<String>,
    form: FormData,
    form_file: PathBuf,
    output_file: PathBuf,
    status: Option<Status>,
    generated_json: String,
}

impl ConfiguratorApp {
    fn new(
        _cc: &eframe::CreationContext<'_>,
        session: Result<Session, String>,
        form_file: PathBuf,
        output_file: PathBuf,
    ) -> Self {
        let (session, session_error) = match session {
            Ok(session) => (Some(session), None),
            Err(err) => (None, Some(err)),
        };
        tracing::info!("Application initialized successfully.");

        Self {
            session,
            session_error,
            form: FormData::default(),
            form_file,
            output_file,
            status: None,
            generated_json: String::new(),
        }
    }

    fn color_names(&self) -> Vec<String> {
        self.session
            .as_ref()
            .map(|s| s.colors.names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn base_url(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.config.base_url.clone())
            .unwrap_or_default()
    }

    fn add_section(&mut self) {
        let first_color = self.color_names().into_iter().next().unwrap_or_default();
        let count = self.form.add_section();
        if let Some(section) = self.form.sections.last_mut() {
            section.color = first_color;
        }
        tracing::info!("Added image input set #{}", count);
    }

    fn submit_form(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.status = Some(Status::Error("Cannot submit: startup failed".to_string()));
            return;
        };

        match session.submit(&self.form, &self.output_file, RandomUids) {
            Ok((document, report)) => {
                self.generated_json = match document.to_pretty_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Error rendering generated JSON: {}", e);
                        String::new()
                    }
                };
                self.status = Some(Status::Success(format!(
                    "Saved {} ({} images, last image id {}). Check the log for details.",
                    report.output_file.display(),
                    report.image_count,
                    report.counter_value
                )));
            }
            Err(e) => {
                tracing::error!("Error submitting form: {}", e);
                self.status = Some(Status::Error(format!("Failed to submit form: {}", e)));
            }
        }
    }

    fn save_form(&mut self) {
        self.status = Some(match self.form.save(&self.form_file) {
            Ok(()) => Status::Success(format!("Form saved to {}", self.form_file.display())),
            Err(e) => {
                tracing::error!("{}", e);
                Status::Error(e.to_string())
            }
        });
    }

    fn load_form(&mut self) {
        match FormData::load(&self.form_file) {
            Ok(form) => {
                self.form = form;
                self.status = Some(Status::Success(format!(
                    "Form loaded from {}",
                    self.form_file.display()
                )));
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.status = Some(Status::Error(e.to_string()));
            }
        }
    }

    fn global_settings_ui(&mut self, ui: &mut egui::Ui) {
        let form = &mut self.form;
        egui::Grid::new("global_settings").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
            ui.label("Name a Configurator:");
            ui.text_edit_singleline(&mut form.name);
            ui.end_row();

            ui.label("Choose Style:");
            egui::ComboBox::from_id_source("style_combo")
                .selected_text(form.style.label())
                .show_ui(ui, |ui| {
                    for style in ConfigStyle::ALL {
                        ui.selectable_value(&mut form.style, style, style.label());
                    }
                });
            ui.end_row();

            ui.label("Custom CSS:");
            ui.text_edit_singleline(&mut form.custom_css);
            ui.end_row();

            ui.label("Custom JS:");
            ui.text_edit_singleline(&mut form.custom_js);
            ui.end_row();

            ui.label("Choose Form:");
            egui::ComboBox::from_id_source("form_combo")
                .selected_text(form.form.label())
                .show_ui(ui, |ui| {
                    for kind in FormKind::ALL {
                        ui.selectable_value(&mut form.form, kind, kind.label());
                    }
                });
            ui.end_row();

            ui.label("Base Price:");
            ui.add(egui::TextEdit::singleline(&mut form.base_price).desired_width(120.0));
            ui.end_row();
        });
    }

    fn group_layer_ui(&mut self, ui: &mut egui::Ui) {
        let group_layer = &mut self.form.group_layer;
        egui::Grid::new("group_layer").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
            ui.label("Required:");
            ui.checkbox(&mut group_layer.required, "Is this required?");
            ui.end_row();

            ui.label("Hide Control:");
            ui.checkbox(&mut group_layer.hide_control, "Hide this and child layers in control");
            ui.end_row();

            ui.label("Image Layer FULL URL from WordPress:");
            ui.add(egui::TextEdit::singleline(&mut group_layer.image_url).desired_width(380.0));
            ui.end_row();

            ui.label("Image Size (W × H):");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut group_layer.width).speed(1.0).clamp_range(1..=20_000));
                ui.label("×");
                ui.add(egui::DragValue::new(&mut group_layer.height).speed(1.0).clamp_range(1..=20_000));
            });
            ui.end_row();
        });
    }

    fn sections_ui(&mut self, ui: &mut egui::Ui) {
        let color_names = self.color_names();
        let base_url = self.base_url();
        let mut remove_idx = None;

        for (i, section) in self.form.sections.iter_mut().enumerate() {
            egui::CollapsingHeader::new(format!("Section {}", i + 1))
                .id_source(("section", i))
                .default_open(true)
                .show(ui, |ui| {
                    section_fields_ui(ui, i, section, &color_names, &base_url);
                    if ui.button("Remove Section").clicked() {
                        remove_idx = Some(i);
                    }
                });
        }

        if let Some(i) = remove_idx {
            self.form.sections.remove(i);
            tracing::info!("Removed section #{}", i + 1);
        }
    }
}

fn section_fields_ui(
    ui: &mut egui::Ui,
    i: usize,
    section: &mut SectionRecord,
    color_names: &[String],
    base_url: &str,
) {
    egui::Grid::new(("section_grid", i)).num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        ui.label("Motif Name:");
        ui.text_edit_singleline(&mut section.motif);
        ui.end_row();

        ui.label("Motif Num:");
        egui::ComboBox::from_id_source(("motif_number", i))
            .selected_text(section.motif_number.to_string())
            .show_ui(ui, |ui| {
                for motif_number in MotifNumber::all() {
                    ui.selectable_value(&mut section.motif_number, motif_number, motif_number.to_string());
                }
            });
        ui.end_row();

        ui.label("Date Uploaded (YYYY/MM):");
        ui.text_edit_singleline(&mut section.date);
        ui.end_row();

        ui.label("Width:");
        ui.text_edit_singleline(&mut section.width);
        ui.end_row();

        ui.label("Height:");
        ui.text_edit_singleline(&mut section.height);
        ui.end_row();

        ui.label("Sample Color:");
        egui::ComboBox::from_id_source(("sample_color", i))
            .selected_text(section.color.as_str())
            .show_ui(ui, |ui| {
                for name in color_names {
                    ui.selectable_value(&mut section.color, name.clone(), name.as_str());
                }
            });
        ui.end_row();

        ui.label("Product Type:");
        ui.text_edit_singleline(&mut section.product_type);
        ui.end_row();

        // Recomputed every frame so it tracks the motif, date and color fields.
        ui.label("Product Image URL:");
        let mut preview = url_builder::preview_url(base_url, section);
        ui.add(
            egui::TextEdit::singleline(&mut preview)
                .interactive(false)
                .desired_width(420.0),
        );
        ui.end_row();
    });
}

impl App for ConfiguratorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            match &self.status {
                Some(Status::Success(msg)) => {
                    ui.colored_label(egui::Color32::GREEN, msg);
                }
                Some(Status::Error(msg)) => {
                    ui.colored_label(egui::Color32::RED, msg);
                }
                None => {
                    ui.label(format!("Output: {}", self.output_file.display()));
                }
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                if let Some(err) = &self.session_error {
                    ui.colored_label(egui::Color32::RED, format!("Startup: {}", err));
                }
                if let Some(err) = self.session.as_ref().and_then(|s| s.color_error.as_ref()) {
                    ui.colored_label(egui::Color32::RED, format!("Colors: {}", err));
                }

                ui.group(|ui| {
                    ui.heading("Global Settings");
                    self.global_settings_ui(ui);
                });
                ui.add_space(6.0);

                ui.group(|ui| {
                    ui.heading("Group Layer 1");
                    self.group_layer_ui(ui);
                    ui.add_space(4.0);
                    if ui.button("Add Section").clicked() {
                        self.add_section();
                    }
                    self.sections_ui(ui);
                });
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Submit").clicked() {
                        self.submit_form();
                    }
                    if ui.button("Save Form").clicked() {
                        self.save_form();
                    }
                    if ui.button("Load Form").clicked() {
                        self.load_form();
                    }
                });

                if !self.generated_json.is_empty() {
                    ui.separator();
                    ui.collapsing("Generated JSON", |ui| {
                        let mut json_display = self.generated_json.clone();
                        ui.add(
                            egui::TextEdit::multiline(&mut json_display)
                                .font(egui::TextStyle::Monospace)
                                .desired_width(f32::INFINITY)
                                .interactive(false),
                        );
                    });
                }
            });
        });
    }
}

pub fn run_gui(
    session: Result<Session, String>,
    form_file: PathBuf,
    output_file: PathBuf,
) -> Result<(), eframe::Error> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 900.0])
            .with_min_inner_size([560.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Configurator",
        options,
        Box::new(move |cc| Box::new(ConfiguratorApp::new(cc, session, form_file, output_file))),
    )
}
//*** END FILE: src/gui/app.rs ***//
