mod audio;
mod config;
mod preset;
mod scene;
mod ui;

use nannou::prelude::*;
use std::env;
use std::path::PathBuf;

use audio::AudioEngine;
use config::Config;
use preset::{list_presets, PresetWatcher, ScenePreset};
use scene::{Camera, ElementLayer, FrameInput, Resolution, SceneManager};
use soundscene_core::{
    BeatDetector, BeatInfo, ElementSet, FrequencySnapshot, SceneKind, SceneParams,
    SpectrumAnalyzer,
};
use ui::{
    draw_debug, draw_device_search, draw_scene_picker, parse_key, Action, DeviceSearch,
    HelpOverlay, ScenePicker,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.contains(&"--list-devices".to_string()) {
        audio::list_devices();
        return;
    }

    nannou::app(model).update(update).run();
}

struct Model {
    config: Config,
    engine: AudioEngine,
    analyzer: SpectrumAnalyzer,
    detector: BeatDetector,
    scenes: SceneManager,
    camera: Camera,
    elements: ElementLayer,
    picker: ScenePicker,
    search: DeviceSearch,
    help: HelpOverlay,

    presets: Vec<PathBuf>,
    preset_idx: usize,
    current_preset: Option<PathBuf>,
    watcher: Option<PresetWatcher>,

    last_snapshot: FrequencySnapshot,
    last_beat: BeatInfo,
    /// Border flash level, decaying after each beat
    beat_flash: f32,
    debug: bool,
}

fn model(app: &App) -> Model {
    let args: Vec<String> = env::args().collect();
    let windowed = args.contains(&"--windowed".to_string()) || args.contains(&"-w".to_string());
    let live = args.contains(&"--live".to_string());
    let file: Option<PathBuf> = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with('-'))
        .map(PathBuf::from);

    let resolution = Resolution::current(windowed);
    app.set_exit_on_escape(false);

    let mut win = app
        .new_window()
        .title("soundscene")
        .view(view)
        .key_pressed(key_pressed)
        .size(resolution.width, resolution.height)
        .min_size(400, 400);

    if resolution.fullscreen {
        win = win.fullscreen();
    }

    win.build().unwrap();

    let config = Config::load();
    let detection = config.detection();

    // Pick the audio source: file > live capture > synthesized tone
    let mut engine = AudioEngine::new();
    let mut startup_note = None;
    if let Some(path) = file {
        if let Err(e) = engine.play_file(&path) {
            startup_note = Some(format!("{} - falling back to tone", e));
        }
    } else if live {
        let devices = engine.devices();
        let idx = audio::preferred_device(
            devices,
            config.last_device.as_deref(),
            config.last_device_is_input.unwrap_or(true),
        );
        match engine.select_device(idx) {
            Some((_, true)) => {}
            _ => engine.play_synth(),
        }
    } else {
        engine.play_synth();
    }

    let params = SceneParams::default();
    let mut scenes = SceneManager::new(params, config.cycle_cooldown_frames());
    scenes.show_notification(format!("Source: {}", engine.source_label()));
    if let Some(note) = startup_note {
        scenes.show_notification(note);
    }

    let presets = config
        .presets_dir()
        .map(|dir| list_presets(&dir))
        .unwrap_or_default();
    let watcher = config
        .presets_dir()
        .filter(|dir| dir.exists())
        .and_then(|dir| PresetWatcher::start(&dir));

    let search = DeviceSearch::new(engine.device_names());
    let analyzer = SpectrumAnalyzer::with_smoothing(44100.0, detection.smoothing());

    Model {
        config,
        engine,
        analyzer,
        detector: BeatDetector::with_config(detection),
        scenes,
        camera: Camera::new(),
        elements: ElementLayer::new(ElementSet::default_scene()),
        picker: ScenePicker::new(),
        search,
        help: HelpOverlay::new(),
        presets,
        preset_idx: 0,
        current_preset: None,
        watcher,
        last_snapshot: FrequencySnapshot::silent(),
        last_beat: BeatInfo::default(),
        beat_flash: 0.0,
        debug: args.contains(&"--debug".to_string()) || args.contains(&"-d".to_string()),
    }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    // Analysis pipeline: samples -> snapshot -> bands + beat
    let samples = model.engine.samples();
    let snapshot = model.analyzer.analyze(&samples);
    let now_ms = app.time as f64 * 1000.0;
    let beat = model.detector.detect(&snapshot, now_ms);

    let params = model.scenes.params().clone();
    model.camera.update(&beat, &params);
    model.elements.update(&beat, app.time, &params);

    {
        let frame = FrameInput {
            snapshot: &snapshot,
            beat: &beat,
            time: app.time,
            params: &params,
        };
        model.scenes.update(&frame);
    }

    // Beat flash for the border indicator
    if params.beat_detection && beat.is_beat {
        model.beat_flash = 1.0;
    } else {
        model.beat_flash *= 0.85;
    }

    model.last_snapshot = snapshot;
    model.last_beat = beat;

    // Hot reload: re-apply the current preset when its file changes
    if let Some(watcher) = &model.watcher {
        let changed = watcher.changed_presets();
        if let Some(current) = model.current_preset.clone() {
            if changed.iter().any(|p| *p == current) {
                match ScenePreset::load(&current) {
                    Ok(preset) => {
                        let name = preset.name.clone();
                        apply_preset(model, preset);
                        model
                            .scenes
                            .show_notification(format!("Reloaded preset: {}", name));
                    }
                    Err(e) => {
                        model
                            .scenes
                            .show_notification(format!("Preset reload failed: {}", e));
                    }
                }
            }
        }
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let bounds = app.window_rect();

    frame.clear(BLACK);

    model.elements.draw_background(&draw, bounds);
    model.scenes.draw(&draw, bounds, &model.camera);
    model.elements.draw(&draw, bounds, &model.camera);

    // Beat indicator: a border that lights on every beat
    if model.beat_flash > 0.02 {
        draw.rect()
            .xy(bounds.xy())
            .wh(bounds.wh())
            .stroke(srgba(255, 255, 255, (model.beat_flash * 130.0) as u8))
            .stroke_weight(4.0)
            .no_fill();
    }

    draw_progress(&draw, bounds, model);
    model.scenes.draw_notification(&draw, bounds);

    if model.debug {
        draw_debug(
            &draw,
            bounds,
            &model.last_snapshot,
            &model.last_beat,
            model.detector.cutoff(),
        );
    }

    if model.search.active {
        draw_device_search(&draw, bounds, &model.search);
    }
    if model.picker.active {
        draw_scene_picker(&draw, bounds, &model.picker);
    }
    model.help.draw(&draw, bounds);

    draw.to_frame(app, &frame).unwrap();
}

/// Thin playback progress line along the bottom edge.
fn draw_progress(draw: &Draw, bounds: Rect, model: &Model) {
    let (current, duration) = match model.engine.progress() {
        Some(p) => p,
        None => return,
    };
    if duration <= 0.0 {
        return;
    }

    let t = (current / duration).clamp(0.0, 1.0);
    let y = bounds.bottom() + 4.0;

    draw.line()
        .start(pt2(bounds.left(), y))
        .end(pt2(bounds.right(), y))
        .weight(2.0)
        .color(srgba(255u8, 255, 255, 40));
    draw.line()
        .start(pt2(bounds.left(), y))
        .end(pt2(bounds.left() + bounds.w() * t, y))
        .weight(2.0)
        .color(srgba(120u8, 200, 255, 180));
}

fn apply_preset(model: &mut Model, preset: ScenePreset) {
    model.scenes.set_params(preset.params);
    if !preset.elements.is_empty() {
        model.elements.set_elements(preset.elements);
    }
}

fn select_scene(model: &mut Model, kind: SceneKind) {
    if let Some(name) = model.scenes.set_kind(kind) {
        model.scenes.show_notification(name.to_string());
    }
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    let shift = app.keys.mods.shift();
    let action = parse_key(key, shift, model.search.active, model.picker.active);

    match action {
        Some(Action::Quit) => app.quit(),
        Some(Action::ShowHelp) => {
            model.help.toggle();
            model.picker.hide();
        }

        // Device search mode
        Some(Action::SearchCancel) => model.search.cancel(),
        Some(Action::SearchMoveUp) => model.search.move_up(),
        Some(Action::SearchMoveDown) => model.search.move_down(),
        Some(Action::SearchBackspace) => model.search.backspace(),
        Some(Action::SearchInput(c)) => model.search.append_char(c),
        Some(Action::SearchConfirm) => {
            if let Some((name, idx)) = model.search.selection() {
                let msg = match model.engine.select_device(idx) {
                    Some((_, true)) => {
                        let is_input = model
                            .engine
                            .devices()
                            .get(idx)
                            .map_or(true, |d| d.is_input);
                        model.config.set_device(&name, is_input);
                        format!("[{}] {}", idx, name)
                    }
                    Some((_, false)) => format!("[{}] {} - FAILED", idx, name),
                    None => format!("[{}] {} - INVALID", idx, name),
                };
                model.scenes.show_notification(msg);
            }
            model.search.cancel();
        }

        // Scene picker mode
        Some(Action::PickerShow) => {
            model.help.hide();
            model.picker.show(model.scenes.kind());
        }
        Some(Action::PickerHide) => model.picker.hide(),
        Some(Action::PickerMoveUp) => model.picker.move_up(),
        Some(Action::PickerMoveDown) => model.picker.move_down(),
        Some(Action::PickerSelect) => {
            let kind = model.picker.selected();
            select_scene(model, kind);
            model.picker.hide();
        }

        // Normal mode
        Some(Action::StartSearch) => {
            model.search = DeviceSearch::new(model.engine.device_names());
            model.search.start();
        }
        Some(Action::CycleScene) => {
            if let Some(name) = model.scenes.cycle_next() {
                model.scenes.show_notification(name.to_string());
            }
        }
        Some(Action::SelectScene(idx)) => {
            if let Some(&kind) = SceneKind::ALL.get(idx) {
                select_scene(model, kind);
            }
        }
        Some(Action::TogglePlayback) => {
            if let Some(playing) = model.engine.toggle_playback() {
                let status = if playing { "Playing" } else { "Paused" };
                model.scenes.show_notification(status.to_string());
            }
        }
        Some(Action::SeekForward) => model.engine.skip(5.0),
        Some(Action::SeekBackward) => model.engine.skip(-5.0),

        Some(Action::CyclePreset) => cycle_preset(model),
        Some(Action::SavePreset) => save_preset(model),

        Some(Action::ToggleGrid) => {
            if let Some(visible) = model.elements.elements_mut().toggle_visible("grid-lines") {
                let status = if visible { "shown" } else { "hidden" };
                model.scenes.show_notification(format!("Grid {}", status));
            }
        }
        Some(Action::ToggleDebug) => model.debug = !model.debug,
        Some(Action::ToggleWireframe) => {
            let mut params = model.scenes.params().clone();
            params.wireframe = !params.wireframe;
            let status = if params.wireframe { "on" } else { "off" };
            model.scenes.set_params(params);
            model
                .scenes
                .show_notification(format!("Wireframe {}", status));
        }

        None => {} // Unhandled key
    }
}

fn cycle_preset(model: &mut Model) {
    if model.presets.is_empty() {
        if let Some(dir) = model.config.presets_dir() {
            model.presets = list_presets(&dir);
        }
    }
    if model.presets.is_empty() {
        model
            .scenes
            .show_notification("No presets found".to_string());
        return;
    }

    let path = model.presets[model.preset_idx % model.presets.len()].clone();
    model.preset_idx = (model.preset_idx + 1) % model.presets.len();

    match ScenePreset::load(&path) {
        Ok(preset) => {
            let name = preset.name.clone();
            apply_preset(model, preset);
            model.current_preset = Some(path);
            model.scenes.show_notification(format!("Preset: {}", name));
        }
        Err(e) => {
            model
                .scenes
                .show_notification(format!("Preset load failed: {}", e));
        }
    }
}

fn save_preset(model: &mut Model) {
    let dir = match model.config.presets_dir() {
        Some(dir) => dir,
        None => return,
    };

    let name = format!("{} scene", model.scenes.kind().name());
    let preset = ScenePreset::new(
        &name,
        model.scenes.params().clone(),
        model.elements.elements().clone(),
    );

    match preset.save(&dir) {
        Ok(path) => {
            model.presets = list_presets(&dir);
            if model.watcher.is_none() {
                model.watcher = PresetWatcher::start(&dir);
            }
            model.current_preset = Some(path);
            model.scenes.show_notification(format!("Saved: {}", name));
        }
        Err(e) => {
            model
                .scenes
                .show_notification(format!("Preset save failed: {}", e));
        }
    }
}
