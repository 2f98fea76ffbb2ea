//! Overlay pickers: scene selection and audio device search.
//!
//! The scene picker is a fixed list; the device search filters the
//! device list as the user types.

use nannou::prelude::*;
use soundscene_core::SceneKind;

/// Scene picker overlay state
pub struct ScenePicker {
    pub active: bool,
    pub selected_idx: usize,
}

impl ScenePicker {
    pub fn new() -> Self {
        Self {
            active: false,
            selected_idx: 0,
        }
    }

    pub fn show(&mut self, current: SceneKind) {
        self.active = true;
        self.selected_idx = SceneKind::ALL
            .iter()
            .position(|&k| k == current)
            .unwrap_or(0);
    }

    pub fn hide(&mut self) {
        self.active = false;
    }

    pub fn move_up(&mut self) {
        let len = SceneKind::ALL.len();
        self.selected_idx = (self.selected_idx + len - 1) % len;
    }

    pub fn move_down(&mut self) {
        self.selected_idx = (self.selected_idx + 1) % SceneKind::ALL.len();
    }

    pub fn selected(&self) -> SceneKind {
        SceneKind::ALL[self.selected_idx]
    }
}

impl Default for ScenePicker {
    fn default() -> Self {
        Self::new()
    }
}

/// Incremental device search overlay state
pub struct DeviceSearch {
    pub active: bool,
    pub query: String,
    devices: Vec<String>,
    filtered: Vec<usize>,
    pub selected_idx: usize,
}

impl DeviceSearch {
    pub fn new(devices: Vec<String>) -> Self {
        let filtered = (0..devices.len()).collect();
        Self {
            active: false,
            query: String::new(),
            devices,
            filtered,
            selected_idx: 0,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.query.clear();
        self.refilter();
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.query.clear();
    }

    pub fn append_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn backspace(&mut self) {
        self.query.pop();
        self.refilter();
    }

    pub fn move_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len();
        self.selected_idx = (self.selected_idx + len - 1) % len;
    }

    pub fn move_down(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected_idx = (self.selected_idx + 1) % self.filtered.len();
    }

    /// The selected device as (name, index into the full device list).
    pub fn selection(&self) -> Option<(String, usize)> {
        let device_idx = *self.filtered.get(self.selected_idx)?;
        Some((self.devices[device_idx].clone(), device_idx))
    }

    /// Matching rows as (full-list index, name).
    pub fn matches(&self) -> Vec<(usize, &str)> {
        self.filtered
            .iter()
            .map(|&i| (i, self.devices[i].as_str()))
            .collect()
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.filtered = self
            .devices
            .iter()
            .enumerate()
            .filter(|(_, name)| needle.is_empty() || name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.selected_idx = 0;
    }
}

/// Shared overlay chrome: dark panel with a thin border.
fn draw_panel(draw: &Draw, x: f32, y: f32, w: f32, h: f32) {
    draw.rect().x_y(x, y).w_h(w, h).color(rgba(0.0, 0.0, 0.0, 0.85));
    draw.rect()
        .x_y(x, y)
        .w_h(w, h)
        .stroke(rgba(1.0, 1.0, 1.0, 0.3))
        .stroke_weight(1.0)
        .no_fill();
}

/// Draw the scene picker overlay at the top right.
pub fn draw_scene_picker(draw: &Draw, bounds: Rect, picker: &ScenePicker) {
    let padding = 20.0;
    let line_height = 22.0;
    let font_size = 18;

    let overlay_width = 300.0;
    let rows = SceneKind::ALL.len();
    let overlay_height = line_height * (rows as f32 + 2.0) + padding * 2.0;

    let overlay_x = bounds.right() - overlay_width / 2.0 - padding;
    let overlay_y = bounds.top() - overlay_height / 2.0 - padding;

    draw_panel(draw, overlay_x, overlay_y, overlay_width, overlay_height);

    let title_y = overlay_y + overlay_height / 2.0 - padding - line_height / 2.0;
    draw.text("Scenes")
        .x_y(overlay_x, title_y)
        .w_h(overlay_width - padding * 2.0, line_height)
        .center_justify()
        .color(rgba(0.5, 0.8, 1.0, 0.9))
        .font_size(font_size);

    let sep_y = title_y - line_height * 0.7;
    draw.line()
        .start(pt2(overlay_x - overlay_width / 2.0 + padding, sep_y))
        .end(pt2(overlay_x + overlay_width / 2.0 - padding, sep_y))
        .color(rgba(1.0, 1.0, 1.0, 0.3))
        .weight(1.0);

    for (i, kind) in SceneKind::ALL.iter().enumerate() {
        let item_y = sep_y - line_height * (i as f32 + 1.0);
        let is_selected = i == picker.selected_idx;

        let prefix = if is_selected { "> " } else { "  " };
        let text = format!("{}{} {}", prefix, i + 1, kind.name());

        let color = if is_selected {
            rgb(0.3, 0.8, 1.0)
        } else {
            rgb(1.0, 1.0, 1.0)
        };

        draw.text(&text)
            .x_y(overlay_x, item_y)
            .w_h(overlay_width - padding * 2.0, line_height)
            .left_justify()
            .no_line_wrap()
            .color(color)
            .font_size(font_size);
    }

    let help_y = sep_y - line_height * (rows as f32 + 1.5);
    draw.text("Enter: select | Esc: close")
        .x_y(overlay_x, help_y)
        .w_h(overlay_width - padding * 2.0, line_height)
        .center_justify()
        .color(rgba(1.0, 1.0, 1.0, 0.5))
        .font_size(14);
}

/// Draw the device search overlay, centered.
pub fn draw_device_search(draw: &Draw, bounds: Rect, search: &DeviceSearch) {
    let padding = 20.0;
    let line_height = 22.0;
    let max_visible = 12;

    let matches = search.matches();
    let visible = matches.len().min(max_visible);
    let overlay_width = (bounds.w() * 0.6).min(640.0);
    let overlay_height = line_height * (visible as f32 + 2.0) + padding * 2.0;

    draw_panel(draw, 0.0, 0.0, overlay_width, overlay_height);

    let query_y = overlay_height / 2.0 - padding - line_height / 2.0;
    let query_text = format!("/{}", search.query);
    draw.text(&query_text)
        .x_y(0.0, query_y)
        .w_h(overlay_width - padding * 2.0, line_height)
        .left_justify()
        .no_line_wrap()
        .color(rgb(0.3, 0.8, 1.0))
        .font_size(18);

    for (row, (device_idx, name)) in matches.iter().take(max_visible).enumerate() {
        let item_y = query_y - line_height * (row as f32 + 1.0);
        let is_selected = row == search.selected_idx;

        let prefix = if is_selected { "> " } else { "  " };
        let text = format!("{}[{}] {}", prefix, device_idx, name);

        let color = if is_selected {
            rgb(0.3, 0.8, 1.0)
        } else {
            rgb(1.0, 1.0, 1.0)
        };

        draw.text(&text)
            .x_y(0.0, item_y)
            .w_h(overlay_width - padding * 2.0, line_height)
            .left_justify()
            .no_line_wrap()
            .color(color)
            .font_size(16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_with(names: &[&str]) -> DeviceSearch {
        DeviceSearch::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn scene_picker_opens_on_current_kind() {
        let mut picker = ScenePicker::new();
        picker.show(SceneKind::Liquid);
        assert_eq!(picker.selected(), SceneKind::Liquid);

        picker.move_down();
        assert_eq!(picker.selected(), SceneKind::CyberGrid);
    }

    #[test]
    fn scene_picker_wraps_both_directions() {
        let mut picker = ScenePicker::new();
        picker.show(SceneKind::Spectrum);
        picker.move_up();
        assert_eq!(picker.selected(), SceneKind::Biomorphic);
        picker.move_down();
        assert_eq!(picker.selected(), SceneKind::Spectrum);
    }

    #[test]
    fn search_filters_case_insensitively() {
        let mut search = search_with(&["pipewire", "pulse", "HDA Intel"]);
        search.start();
        search.append_char('p');

        let names: Vec<&str> = search.matches().iter().map(|(_, n)| *n).collect();
        assert_eq!(names, vec!["pipewire", "pulse"]);

        search.append_char('u');
        assert_eq!(search.selection().map(|(n, _)| n), Some("pulse".to_string()));
    }

    #[test]
    fn search_reports_full_list_indices() {
        let mut search = search_with(&["a", "b", "match"]);
        search.start();
        for c in "match".chars() {
            search.append_char(c);
        }
        assert_eq!(search.selection(), Some(("match".to_string(), 2)));
    }

    #[test]
    fn backspace_widens_the_filter() {
        let mut search = search_with(&["alpha", "beta"]);
        search.start();
        search.append_char('z');
        assert!(search.matches().is_empty());
        assert_eq!(search.selection(), None);

        search.backspace();
        assert_eq!(search.matches().len(), 2);
    }
}
