use eframe::egui;
use egui_extras::RetainedImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use lobby_core::{resolve_illustration, Illustration, Lobby, PlayerId, ReferenceData, Team};

const ATTACKER_RED: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
const DEFENDER_BLUE: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);
const MAP_GREEN: egui::Color32 = egui::Color32::from_rgb(74, 222, 128);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GuiConfig {
    #[serde(default)]
    assets_dir: String,
    #[serde(default)]
    catalog_path: String,
}

fn config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir().or_else(dirs::data_dir)?;
    base.push("LobbyRandomiser");
    base.push("gui_config.json");
    Some(base)
}

fn load_config() -> GuiConfig {
    if let Some(path) = config_path() {
        if let Ok(data) = fs::read_to_string(&path) {
            match serde_json::from_str::<GuiConfig>(&data) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring unreadable {}: {e}", path.display()),
            }
        }
    }
    GuiConfig::default()
}

fn save_config(cfg: &GuiConfig) {
    let Some(path) = config_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match serde_json::to_string_pretty(cfg) {
        Ok(data) => {
            if let Err(e) = fs::write(&path, data) {
                log::warn!("could not save {}: {e}", path.display());
            }
        }
        Err(e) => log::warn!("could not encode GUI config: {e}"),
    }
}

/// Built-in data when `path` is blank; otherwise the catalog file, falling
/// back to built-in data with an error message.
fn load_reference_data(path: &str) -> (ReferenceData, Option<String>) {
    let path = path.trim();
    if path.is_empty() {
        return (ReferenceData::builtin(), None);
    }
    match ReferenceData::load(Path::new(path)) {
        Ok(data) => (data, None),
        Err(e) => {
            log::error!("catalog {path} rejected: {e}");
            (ReferenceData::builtin(), Some(format!("Catalog error: {e}")))
        }
    }
}

enum MapArt {
    Image(RetainedImage),
    Placeholder(String),
}

struct ShownMap {
    map: String,
    art: MapArt,
}

fn decode_illustration(path: &Path) -> Result<RetainedImage, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    let rgba = image::load_from_memory(&bytes)
        .map_err(|e| e.to_string())?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Ok(RetainedImage::from_color_image(path.display().to_string(), color))
}

fn load_map_art(assets_dir: &str, map: &str) -> MapArt {
    let dir = assets_dir.trim();
    let dir = (!dir.is_empty()).then(|| Path::new(dir));
    match resolve_illustration(dir, map) {
        Illustration::File(path) => match decode_illustration(&path) {
            Ok(image) => MapArt::Image(image),
            Err(e) => {
                log::error!("Failed to load image for map: {map} ({e})");
                MapArt::Placeholder(lobby_core::placeholder_url(map))
            }
        },
        Illustration::Placeholder(url) => MapArt::Placeholder(url),
    }
}

struct RenameEdit {
    team: Team,
    id: PlayerId,
    buffer: String,
    wants_focus: bool,
}

struct LobbyApp {
    lobby: Lobby,
    data: ReferenceData,
    config: GuiConfig,
    new_player_name: String,
    editing: Option<RenameEdit>,
    shown_map: Option<ShownMap>,
    status: String,
}

impl Default for LobbyApp {
    fn default() -> Self {
        let config = load_config();
        let (data, status) = load_reference_data(&config.catalog_path);

        Self {
            lobby: Lobby::new(data.maps.clone()),
            data,
            config,
            new_player_name: String::new(),
            editing: None,
            shown_map: None,
            status: status.unwrap_or_default(),
        }
    }
}

impl LobbyApp {
    fn add_player(&mut self, team: Team) {
        if self.lobby.add_player(team, &self.new_player_name).is_some() {
            self.new_player_name.clear();
        }
    }

    fn randomize_agents(&mut self) {
        let mut rng = rand::thread_rng();
        match self.lobby.randomize_agents(&self.data.catalog, &mut rng) {
            Ok(()) => self.status.clear(),
            Err(e) => {
                log::error!("agent roll failed: {e}");
                self.status = format!("Randomiser error: {e}");
            }
        }
    }

    fn randomize_map(&mut self) {
        let mut rng = rand::thread_rng();
        match self.lobby.randomize_map(&mut rng) {
            Ok(map) => {
                log::info!("map rolled: {map}");
                self.status.clear();
            }
            Err(e) => {
                log::error!("map roll failed: {e}");
                self.status = format!("Randomiser error: {e}");
            }
        }
    }

    fn apply_settings(&mut self) {
        save_config(&self.config);

        let (data, status) = load_reference_data(&self.config.catalog_path);
        self.lobby.set_map_pool(data.maps.clone());
        self.data = data;
        self.status = status.unwrap_or_default();
        self.shown_map = None;
    }

    fn refresh_map_art(&mut self) {
        let current = self.lobby.current_map();
        let stale = self.shown_map.as_ref().map_or(true, |shown| shown.map != current);
        if stale {
            let map = current.to_string();
            let art = load_map_art(&self.config.assets_dir, &map);
            self.shown_map = Some(ShownMap { map, art });
        }
    }

    fn settings_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Map art folder:");
            ui.text_edit_singleline(&mut self.config.assets_dir);
            if ui.button("Browse...").clicked() {
                let mut dialog = rfd::FileDialog::new();
                if !self.config.assets_dir.trim().is_empty() {
                    dialog = dialog.set_directory(self.config.assets_dir.trim());
                }
                if let Some(path) = dialog.pick_folder() {
                    self.config.assets_dir = path.display().to_string();
                }
            }
        });

        ui.horizontal(|ui| {
            ui.label("Catalog file:");
            ui.text_edit_singleline(&mut self.config.catalog_path);
            if ui.button("Browse...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                {
                    self.config.catalog_path = path.display().to_string();
                }
            }
        });

        if ui.button("Apply").clicked() {
            self.apply_settings();
        }
    }

    fn map_header(&self, ui: &mut egui::Ui) {
        let map = self.lobby.current_map();
        ui.vertical_centered(|ui| {
            match self.shown_map.as_ref().map(|shown| &shown.art) {
                Some(MapArt::Image(image)) => {
                    image.show_max_size(ui, egui::vec2(480.0, 240.0));
                }
                Some(MapArt::Placeholder(url)) => {
                    egui::Frame::group(ui.style())
                        .fill(egui::Color32::from_rgb(45, 55, 72))
                        .show(ui, |ui| {
                            ui.set_min_size(egui::vec2(300.0, 150.0));
                            ui.centered_and_justified(|ui| {
                                ui.label(egui::RichText::new(map).size(20.0));
                            });
                        })
                        .response
                        .on_hover_text(url.as_str());
                }
                None => {}
            }
            ui.label(
                egui::RichText::new(format!("Map: {map}"))
                    .size(24.0)
                    .strong()
                    .color(MAP_GREEN),
            );
        });
    }

    fn team_column(&mut self, ui: &mut egui::Ui, team: Team) {
        let accent = match team {
            Team::Attackers => ATTACKER_RED,
            Team::Defenders => DEFENDER_BLUE,
        };
        ui.vertical_centered(|ui| {
            ui.heading(egui::RichText::new(team.label()).strong().color(accent));
        });

        let players = self.lobby.players(team).to_vec();
        let mut start_edit: Option<(PlayerId, String)> = None;
        let mut commit: Option<(PlayerId, String)> = None;

        for player in &players {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_min_width(ui.available_width());

                let edit = self
                    .editing
                    .as_mut()
                    .filter(|edit| edit.team == team && edit.id == player.id);
                match edit {
                    Some(edit) => {
                        let resp = ui.text_edit_singleline(&mut edit.buffer);
                        if edit.wants_focus {
                            resp.request_focus();
                            edit.wants_focus = false;
                        }
                        if resp.lost_focus() {
                            commit = Some((edit.id, edit.buffer.clone()));
                        }
                    }
                    None => {
                        let name = egui::RichText::new(&player.name).strong().size(18.0);
                        let resp = ui.add(egui::Label::new(name).sense(egui::Sense::click()));
                        if resp.double_clicked() {
                            start_edit = Some((player.id, player.name.clone()));
                        }
                    }
                }
                ui.label(player.agent.to_string());
            });
        }

        for _ in 0..self.lobby.open_slots(team) {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.weak("Open Slot");
            });
        }

        if let Some((id, buffer)) = commit {
            // blank input keeps the old name
            self.lobby.rename_player(team, id, &buffer);
            self.editing = None;
        }
        if let Some((id, name)) = start_edit {
            self.editing = Some(RenameEdit {
                team,
                id,
                buffer: name,
                wants_focus: true,
            });
        }
    }
}

impl eframe::App for LobbyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_map_art();

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.vertical_centered(|ui| {
                ui.weak("Enter a name above and add players to a team.");
                if !self.status.is_empty() {
                    ui.colored_label(ATTACKER_RED, self.status.as_str());
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Valorant Randomizer")
                            .size(36.0)
                            .strong(),
                    );
                });

                ui.collapsing("Settings", |ui| self.settings_ui(ui));
                ui.separator();

                self.map_header(ui);
                ui.separator();

                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.new_player_name)
                            .hint_text("Enter player name"),
                    );
                    let has_name = !self.new_player_name.trim().is_empty();
                    let attackers = egui::Button::new("Add to Attackers").fill(ATTACKER_RED);
                    if ui.add_enabled(has_name, attackers).clicked() {
                        self.add_player(Team::Attackers);
                    }
                    let defenders = egui::Button::new("Add to Defenders").fill(DEFENDER_BLUE);
                    if ui.add_enabled(has_name, defenders).clicked() {
                        self.add_player(Team::Defenders);
                    }
                });

                ui.horizontal(|ui| {
                    if ui.button("Randomize All Agents").clicked() {
                        self.randomize_agents();
                    }
                    if ui.button("Randomize Map").clicked() {
                        self.randomize_map();
                    }
                });

                ui.separator();

                ui.columns(2, |cols| {
                    self.team_column(&mut cols[0], Team::Attackers);
                    self.team_column(&mut cols[1], Team::Defenders);
                });
            });
        });
    }
}

fn main() -> eframe::Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([980.0, 820.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Lobby Randomiser",
        native_options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());

            let mut style = (*cc.egui_ctx.style()).clone();
            style.visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
            cc.egui_ctx.set_style(style);

            Box::new(LobbyApp::default())
        }),
    )
}
