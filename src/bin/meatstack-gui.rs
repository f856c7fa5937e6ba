/*!
 * Desktop viewer for meatstack-rs
 *
 * - Pick the consumption CSV and the country code CSV
 * - Optionally narrow rows by year and measure, or load a JSON chart config
 * - Load them in the background
 * - Switch between stacked, separated, and percentage layouts with animated bars
 *
 * Platform support: Windows, macOS, Linux
 */

use ahash::AHashMap;
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use meatstack_rs::chart::Scene;
use meatstack_rs::models::{CountryRecord, StackMode};
use meatstack_rs::toggle::{RadioToggleGroup, stack_options};
use meatstack_rs::transform::{CountryNames, RowFilter, process_data};
use meatstack_rs::transition::Animator;
use meatstack_rs::viz::icon::rasterize_icon;
use meatstack_rs::viz::style::SeriesStyle;
use meatstack_rs::{ChartConfig, StackedBarChart, config, storage};

/// Pixel size icons are rasterized at before scaling into their box.
const ICON_PX: u32 = 64;

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 680.0])
            .with_min_inner_size([640.0, 420.0])
            .with_title("Meat Consumption - meatstack-rs"),
        ..Default::default()
    };

    eframe::run_native(
        "Meat Consumption",
        options,
        Box::new(|_cc| Ok(Box::new(MeatstackApp::new()))),
    )
}

type LoadResult = Result<(ChartConfig, Vec<CountryRecord>), String>;

/// Icon textures by path; `None` marks an icon that failed to load.
#[derive(Default)]
struct IconCache {
    textures: AHashMap<String, Option<egui::TextureHandle>>,
}

impl IconCache {
    fn get(&mut self, ctx: &egui::Context, path: &str) -> Option<&egui::TextureHandle> {
        if path.is_empty() {
            return None;
        }
        self.textures
            .entry(path.to_string())
            .or_insert_with(|| match rasterize_icon(path, ICON_PX) {
                Ok(img) => {
                    let size = [img.width as usize, img.height as usize];
                    let image = egui::ColorImage::from_rgba_premultiplied(size, &img.rgba);
                    Some(ctx.load_texture(path, image, egui::TextureOptions::LINEAR))
                }
                Err(err) => {
                    log::warn!("{err}");
                    None
                }
            })
            .as_ref()
    }
}

/// Main application state
struct MeatstackApp {
    data_path: String,
    countries_path: String,
    config_path: String,
    year: String,
    measure: String,
    config: ChartConfig,

    toggle: RadioToggleGroup<StackMode>,
    mode_receiver: mpsc::Receiver<StackMode>,

    chart: Option<StackedBarChart>,
    scene: Option<Scene>,
    animator: Animator,
    icons: IconCache,

    is_loading: bool,
    status_message: String,
    error_message: String,
    load_receiver: Option<mpsc::Receiver<LoadResult>>,
}

impl MeatstackApp {
    fn new() -> Self {
        let data_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let (mode_tx, mode_rx) = mpsc::channel();
        let toggle = RadioToggleGroup::new(
            "Choose stacking",
            "stack-option",
            stack_options(),
            StackMode::Stacked,
            move |mode: &StackMode| {
                let _ = mode_tx.send(*mode);
            },
        );

        Self {
            data_path: data_dir.join("meat-consumption.csv").to_string_lossy().to_string(),
            countries_path: data_dir.join("country-codes.csv").to_string_lossy().to_string(),
            config_path: String::new(),
            year: String::new(),
            measure: String::new(),
            config: ChartConfig::default(),
            toggle,
            mode_receiver: mode_rx,
            chart: None,
            scene: None,
            animator: Animator::new(),
            icons: IconCache::default(),
            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            load_receiver: None,
        }
    }

    fn start_load(&mut self) {
        self.is_loading = true;
        self.error_message.clear();
        self.status_message = "Loading datasets...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.load_receiver = Some(receiver);

        let data_path = PathBuf::from(self.data_path.trim());
        let countries_path = PathBuf::from(self.countries_path.trim());
        let config_path = self.config_path.trim().to_string();
        let filter = RowFilter::from_text(&self.year, &self.measure);

        thread::spawn(move || {
            let result = (|| -> anyhow::Result<(ChartConfig, Vec<CountryRecord>)> {
                let cfg = if config_path.is_empty() {
                    ChartConfig::default()
                } else {
                    config::load_config(&config_path)?
                };
                let rows = storage::load_consumption_csv(&data_path)?;
                let codes = storage::load_country_codes_csv(&countries_path)?;
                let names = CountryNames::from_rows(&codes);
                let records = process_data(&rows, &names, &cfg.excluded_codes, &filter, &cfg.icon_dir)?;
                Ok((cfg, records))
            })()
            .map_err(|e| format!("{e:#}"));
            let _ = sender.send(result);
        });
    }

    fn check_load_result(&mut self, now: Duration) {
        let Some(receiver) = &self.load_receiver else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.is_loading = false;
        self.load_receiver = None;

        let built = result.and_then(|(cfg, records)| {
            self.config = cfg.clone();
            StackedBarChart::new(records, &cfg.count_label, &cfg.percentage_label, cfg.clone())
                .map_err(|e| e.to_string())
        });
        match built {
            Ok(chart) => {
                self.status_message = format!("Loaded {} countries", chart.records().len());
                self.chart = Some(chart);
                self.animator = Animator::new();
                self.apply_mode(*self.toggle.selected(), now);
            }
            Err(err) => {
                log::error!("load failed: {err}");
                self.error_message = err;
                self.status_message.clear();
            }
        }
    }

    fn apply_mode(&mut self, mode: StackMode, now: Duration) {
        if let Some(chart) = self.chart.as_mut() {
            let state = chart.on_stack_change(mode).clone();
            let scene = chart.scene(&state);
            self.animator.retarget(&scene, now);
            self.scene = Some(scene);
        }
    }

    fn drain_mode_changes(&mut self, now: Duration) {
        // Only the latest pending change matters; it supersedes the rest.
        let mut latest = None;
        while let Ok(mode) = self.mode_receiver.try_recv() {
            latest = Some(mode);
        }
        if let Some(mode) = latest {
            self.apply_mode(mode, now);
        }
    }

    fn toggle_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.toggle.title().to_string());
            let options: Vec<(StackMode, String)> = self
                .toggle
                .options()
                .iter()
                .map(|o| (o.value, o.text.clone()))
                .collect();
            for (value, text) in options {
                let checked = *self.toggle.selected() == value;
                if ui.radio(checked, text).clicked() && self.toggle.select(value) {
                    // the mode arrives over the channel; draw it without waiting for input
                    ui.ctx().request_repaint();
                }
            }
        });
    }
}

fn color_of(style: &SeriesStyle) -> egui::Color32 {
    egui::Color32::from_rgb(style.rgb.r, style.rgb.g, style.rgb.b)
}

fn paint_chart(
    ui: &mut egui::Ui,
    scene: &Scene,
    animator: &Animator,
    now: Duration,
    icons: &mut IconCache,
) {
    let size = egui::vec2(ui.available_width(), ui.available_height().max(240.0));
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;
    let sx = rect.width() / scene.width as f32;
    let sy = rect.height() / scene.height as f32;
    let to_screen =
        |x: f64, y: f64| egui::pos2(rect.left() + x as f32 * sx, rect.top() + y as f32 * sy);
    let text_color = ui.visuals().text_color();
    let font = egui::FontId::proportional(11.0);

    for tick in &scene.y_ticks {
        let p = to_screen(scene.axis_x, tick.y);
        painter.line_segment([p, p - egui::vec2(6.0, 0.0)], (1.0, text_color));
        painter.text(
            p - egui::vec2(9.0, 0.0),
            egui::Align2::RIGHT_CENTER,
            &tick.label,
            font.clone(),
            text_color,
        );
    }
    painter.text(
        to_screen(scene.y_title_pos.0, scene.y_title_pos.1),
        egui::Align2::LEFT_BOTTOM,
        &scene.y_title,
        font.clone(),
        text_color,
    );

    for tick in &scene.x_ticks {
        let p = to_screen(tick.x, scene.baseline_y);
        painter.line_segment([p, p + egui::vec2(0.0, 6.0)], (1.0, text_color));
        painter.text(
            p + egui::vec2(0.0, 9.0),
            egui::Align2::CENTER_TOP,
            &tick.code,
            font.clone(),
            text_color,
        );
        // icon box is relative to the tick centre on the axis line
        let (ix, iy, size) = tick.icon_box;
        let icon_rect = egui::Rect::from_min_max(
            to_screen(tick.x + ix, scene.baseline_y + iy),
            to_screen(tick.x + ix + size, scene.baseline_y + iy + size),
        );
        if let Some(texture) = icons.get(ui.ctx(), &tick.icon) {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), icon_rect, uv, egui::Color32::WHITE);
        }
    }

    let frame = animator.frame(now);
    for (bar, geom) in scene.bars.iter().zip(frame) {
        let style = SeriesStyle::for_subject(&bar.key, bar.series_index);
        let r = egui::Rect::from_min_max(
            to_screen(geom.x, geom.y),
            to_screen(geom.x + geom.width, geom.y + geom.height),
        );
        painter.rect_filled(r, 0.0, color_of(&style));
        if let Some(pos) = response.hover_pos() {
            if r.contains(pos) {
                response
                    .clone()
                    .on_hover_text(format!("{} {}: {:.1}", bar.code, bar.key, bar.value));
            }
        }
    }

    // Legend along the top edge.
    let mut x = rect.left() + 60.0;
    for (i, key) in scene.keys.iter().enumerate() {
        let style = SeriesStyle::for_subject(key, i);
        let swatch = egui::Rect::from_min_size(egui::pos2(x, rect.top() + 2.0), egui::vec2(10.0, 10.0));
        painter.rect_filled(swatch, 0.0, color_of(&style));
        painter.text(
            egui::pos2(x + 14.0, rect.top() + 7.0),
            egui::Align2::LEFT_CENTER,
            key,
            font.clone(),
            text_color,
        );
        x += 20.0 + key.len() as f32 * 7.0;
    }
}

impl eframe::App for MeatstackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Duration::from_secs_f64(ctx.input(|i| i.time));
        self.check_load_result(now);
        self.drain_mode_changes(now);

        if self.is_loading || self.animator.is_running(now) {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("inputs").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Consumption CSV:");
                ui.text_edit_singleline(&mut self.data_path);
                if ui.button("Browse").clicked() {
                    if let Some(path) = rfd::FileDialog::new().add_filter("CSV", &["csv"]).pick_file() {
                        self.data_path = path.to_string_lossy().to_string();
                    }
                }
            });
            ui.horizontal(|ui| {
                ui.label("Country codes CSV:");
                ui.text_edit_singleline(&mut self.countries_path);
                if ui.button("Browse").clicked() {
                    if let Some(path) = rfd::FileDialog::new().add_filter("CSV", &["csv"]).pick_file() {
                        self.countries_path = path.to_string_lossy().to_string();
                    }
                }
            });
            ui.horizontal(|ui| {
                ui.label("Config JSON (optional):");
                ui.text_edit_singleline(&mut self.config_path);
                if ui.button("Browse").clicked() {
                    if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
                        self.config_path = path.to_string_lossy().to_string();
                    }
                }
            });
            ui.horizontal(|ui| {
                ui.label("Year:");
                ui.add(egui::TextEdit::singleline(&mut self.year).desired_width(60.0));
                ui.label("Measure:");
                ui.add(egui::TextEdit::singleline(&mut self.measure).desired_width(90.0).hint_text("KG_CAP"));
            });
            ui.horizontal(|ui| {
                if ui.add_enabled(!self.is_loading, egui::Button::new("Load")).clicked() {
                    self.start_load();
                }
                if self.is_loading {
                    ui.spinner();
                }
                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }
                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }
            });
            ui.add_space(4.0);
            self.toggle_ui(ui);
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| match &self.scene {
            Some(scene) => paint_chart(ui, scene, &self.animator, now, &mut self.icons),
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("Load both CSV files to draw the chart.");
                });
            }
        });
    }
}
