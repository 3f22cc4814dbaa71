use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::SyncSender;

use eframe::egui;
use log::error;

use crate::converter::{
    self, CollisionDecision, ConversionJob, JobSummary, Outcome, TargetFormat, WorkerEvent,
    WorkerHandle,
};
use crate::style::{ColorPalette, ThemeMode};

/// One collision question waiting for the user. While this is set, the
/// worker thread is blocked on the reply channel.
struct PendingQuestion {
    source: PathBuf,
    dest: PathBuf,
    reply: SyncSender<CollisionDecision>,
}

pub struct ConverterApp {
    files: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    target_format: TargetFormat,
    worker: Option<WorkerHandle>,
    progress_percent: u8,
    pending: Option<PendingQuestion>,
    last_summary: Option<JobSummary>,
    status: String,
}

impl ConverterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            files: Vec::new(),
            output_dir: None,
            target_format: TargetFormat::Jpeg,
            worker: None,
            progress_percent: 0,
            pending: None,
            last_summary: None,
            status: String::new(),
        }
    }

    fn add_files(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            if path.is_file() && !self.files.iter().any(|p| p == &path) {
                self.files.push(path);
            }
        }
    }

    /// Adds every HEIC/HEIF file found directly in `dir`, in name order.
    fn add_folder(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                error!("Failed to read {}: {err}", dir.display());
                self.status = format!("Could not read folder: {}", dir.display());
                return;
            }
        };

        let mut found: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| matches!(e.to_lowercase().as_str(), "heic" | "heif"))
            })
            .collect();
        found.sort();
        self.add_files(found);
    }

    fn start_conversion(&mut self) {
        let Some(output_dir) = self.output_dir.clone() else {
            self.status = "Select an output directory first.".to_string();
            return;
        };

        let job = ConversionJob::new(self.files.clone(), output_dir, self.target_format);
        match job.validate() {
            Ok(()) => {
                self.progress_percent = 0;
                self.last_summary = None;
                self.status = "Converting...".to_string();
                self.worker = Some(converter::spawn(job));
            }
            Err(err) => {
                error!("{err}");
                self.status = err.to_string();
            }
        }
    }

    fn drain_worker_events(&mut self) {
        let Some(worker) = &self.worker else {
            return;
        };

        let mut finished = None;
        while let Some(event) = worker.try_event() {
            match event {
                WorkerEvent::Progress(percent) => self.progress_percent = percent,
                WorkerEvent::Collision {
                    source,
                    dest,
                    reply,
                } => {
                    self.pending = Some(PendingQuestion {
                        source,
                        dest,
                        reply,
                    });
                }
                WorkerEvent::Finished(summary) => finished = Some(summary),
            }
        }

        if let Some(summary) = finished {
            if let Some(worker) = self.worker.take() {
                worker.join();
            }
            self.status = summary_text(&summary);
            self.last_summary = Some(summary);
        }
    }

    fn answer_question(&mut self, decision: CollisionDecision) {
        if let Some(pending) = self.pending.take() {
            // The worker is blocked on the matching recv, so this rendezvous
            // completes immediately.
            let _ = pending.reply.send(decision);
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui, theme: ThemeMode) {
        ui.vertical(|ui| {
            ui.add_space(12.0);

            let title_color = if matches!(theme, ThemeMode::Dark) {
                ColorPalette::ZINC_100
            } else {
                ColorPalette::ZINC_900
            };
            ui.label(egui::RichText::new("HEIC Converter").size(24.0).color(title_color));

            ui.add_space(4.0);

            let subtitle_color = if matches!(theme, ThemeMode::Dark) {
                ColorPalette::ZINC_400
            } else {
                ColorPalette::ZINC_600
            };
            ui.label(
                egui::RichText::new("Convert HEIC photos to JPEG or PNG")
                    .size(13.0)
                    .color(subtitle_color),
            );

            ui.add_space(12.0);
        });
    }

    fn render_format_selector(&mut self, ui: &mut egui::Ui, theme: ThemeMode) {
        let (panel_bg, border_color, text_color) = panel_colors(theme);

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Target Format").size(14.0).color(text_color));
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    for format in TargetFormat::all() {
                        let is_selected = self.target_format == format;
                        let (bg_color, txt_color) = if is_selected {
                            (ColorPalette::BLUE_600, egui::Color32::WHITE)
                        } else if matches!(theme, ThemeMode::Dark) {
                            (ColorPalette::ZINC_700, ColorPalette::ZINC_300)
                        } else {
                            (ColorPalette::GRAY_200, ColorPalette::GRAY_800)
                        };

                        let button = egui::Button::new(
                            egui::RichText::new(format.as_str()).size(13.0).color(txt_color),
                        )
                        .fill(bg_color)
                        .stroke(egui::Stroke::NONE)
                        .corner_radius(6.0)
                        .min_size(egui::vec2(70.0, 32.0));

                        if ui.add(button).clicked() {
                            self.target_format = format;
                        }
                    }
                });
            });
    }

    fn render_output_directory(&mut self, ui: &mut egui::Ui, theme: ThemeMode) {
        let (panel_bg, border_color, text_color) = panel_colors(theme);
        let label_color = if matches!(theme, ThemeMode::Dark) {
            ColorPalette::ZINC_400
        } else {
            ColorPalette::ZINC_600
        };

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Output Directory").size(14.0).color(text_color));
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let dir_text = match &self.output_dir {
                        Some(dir) => dir.to_string_lossy().to_string(),
                        None => "Not selected".to_string(),
                    };
                    ui.label(egui::RichText::new(dir_text).color(label_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Browse").clicked() {
                            if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                                self.output_dir = Some(dir);
                            }
                        }
                    });
                });
            });
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui, theme: ThemeMode) {
        let (panel_bg, border_color, text_color) = panel_colors(theme);
        let weak_color = ColorPalette::ZINC_500;

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Files ({})", self.files.len()))
                            .size(14.0)
                            .color(text_color),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if !self.files.is_empty() && ui.button("Clear All").clicked() {
                            self.files.clear();
                        }
                        if ui.button("Add Folder").clicked() {
                            if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                                self.add_folder(&dir);
                            }
                        }
                        if ui.button("Add Files").clicked() {
                            if let Some(paths) = rfd::FileDialog::new()
                                .add_filter("HEIC images", &["heic", "heif"])
                                .pick_files()
                            {
                                self.add_files(paths);
                            }
                        }
                    });
                });

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if self.files.is_empty() {
                    ui.label(
                        egui::RichText::new("No files selected")
                            .size(12.0)
                            .color(weak_color),
                    );
                    return;
                }

                egui::ScrollArea::vertical()
                    .max_height(220.0)
                    .show(ui, |ui| {
                        let mut to_remove = None;
                        for (idx, file) in self.files.iter().enumerate() {
                            ui.horizontal(|ui| {
                                let name = file
                                    .file_name()
                                    .map(|n| n.to_string_lossy().to_string())
                                    .unwrap_or_else(|| file.to_string_lossy().to_string());
                                ui.label(egui::RichText::new(name).size(13.0).color(text_color));

                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        if ui.button("Remove").clicked() {
                                            to_remove = Some(idx);
                                        }
                                    },
                                );
                            });
                        }
                        if let Some(idx) = to_remove {
                            self.files.remove(idx);
                        }
                    });
            });
    }

    fn render_progress(&self, ui: &mut egui::Ui, theme: ThemeMode) {
        if self.worker.is_none() && self.last_summary.is_none() {
            return;
        }
        let (panel_bg, border_color, text_color) = panel_colors(theme);

        egui::Frame::new()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .corner_radius(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Progress").size(14.0).color(text_color));
                ui.add_space(8.0);

                let progress_bg = if matches!(theme, ThemeMode::Dark) {
                    ColorPalette::ZINC_700
                } else {
                    ColorPalette::GRAY_200
                };
                let progress_fill = match self.last_summary.as_ref().map(|s| s.outcome) {
                    None => ColorPalette::BLUE_500,
                    Some(Outcome::Success) => ColorPalette::GREEN_500,
                    Some(Outcome::NothingConverted) => ColorPalette::RED_500,
                    Some(Outcome::Cancelled) => ColorPalette::ZINC_500,
                };

                let (rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), 24.0),
                    egui::Sense::hover(),
                );
                ui.painter().rect_filled(rect, 4.0, progress_bg);

                let fraction = f32::from(self.progress_percent) / 100.0;
                let fill_rect = egui::Rect::from_min_size(
                    rect.min,
                    egui::vec2(rect.width() * fraction, rect.height()),
                );
                ui.painter().rect_filled(fill_rect, 4.0, progress_fill);

                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}%", self.progress_percent),
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
            });
    }

    fn render_start_button(&mut self, ui: &mut egui::Ui, theme: ThemeMode) {
        let can_start =
            !self.files.is_empty() && self.output_dir.is_some() && self.worker.is_none();

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let (button_bg, button_text) = if can_start {
                (ColorPalette::BLUE_600, egui::Color32::WHITE)
            } else if matches!(theme, ThemeMode::Dark) {
                (ColorPalette::ZINC_700, ColorPalette::ZINC_500)
            } else {
                (ColorPalette::GRAY_300, ColorPalette::GRAY_500)
            };

            let button = egui::Button::new(
                egui::RichText::new("Start Conversion")
                    .size(15.0)
                    .color(button_text),
            )
            .fill(button_bg)
            .min_size(egui::vec2(150.0, 40.0))
            .corner_radius(6.0);

            if ui.add_enabled(can_start, button).clicked() {
                self.start_conversion();
            }

            if !self.status.is_empty() {
                ui.label(egui::RichText::new(&self.status).size(12.0));
            }
        });
    }

    fn render_collision_modal(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending else {
            return;
        };
        let source = pending.source.clone();
        let dest = pending.dest.clone();

        let mut decision = None;
        egui::Window::new("File already exists")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Converting: {}", source.display()));
                ui.label(format!("Already exists: {}", dest.display()));
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("Overwrite").clicked() {
                        decision = Some(CollisionDecision::Overwrite);
                    }
                    if ui.button("Overwrite All").clicked() {
                        decision = Some(CollisionDecision::OverwriteAll);
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Skip").clicked() {
                        decision = Some(CollisionDecision::Skip);
                    }
                    if ui.button("Skip All").clicked() {
                        decision = Some(CollisionDecision::SkipAll);
                    }
                });
                ui.add_space(4.0);
                if ui.button("Cancel Conversion").clicked() {
                    decision = Some(CollisionDecision::Cancel);
                }
            });

        if let Some(decision) = decision {
            self.answer_question(decision);
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_worker_events();

        let theme = if ctx.style().visuals.dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.render_header(ui, theme);

                    self.render_format_selector(ui, theme);
                    ui.add_space(12.0);
                    self.render_output_directory(ui, theme);
                    ui.add_space(12.0);
                    self.render_file_list(ui, theme);
                    ui.add_space(12.0);
                    self.render_progress(ui, theme);
                    self.render_start_button(ui, theme);

                    ui.add_space(16.0);
                });
        });

        self.render_collision_modal(ctx);

        if self.worker.is_some() {
            ctx.request_repaint();
        }
    }
}

fn panel_colors(theme: ThemeMode) -> (egui::Color32, egui::Color32, egui::Color32) {
    if matches!(theme, ThemeMode::Dark) {
        (ColorPalette::ZINC_800, ColorPalette::ZINC_700, ColorPalette::ZINC_200)
    } else {
        (ColorPalette::GRAY_50, ColorPalette::GRAY_300, ColorPalette::GRAY_800)
    }
}

fn summary_text(summary: &JobSummary) -> String {
    let prefix = match summary.outcome {
        Outcome::Cancelled => "Cancelled",
        Outcome::Success => "Finished",
        Outcome::NothingConverted => "Finished, nothing converted",
    };
    format!(
        "{prefix}: {} converted, {} skipped, {} failed",
        summary.converted, summary.skipped, summary.failed
    )
}
