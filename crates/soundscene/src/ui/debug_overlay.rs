//! Debug overlay: band meters, beat state, and the adaptive cutoff.

use nannou::prelude::*;
use soundscene_core::{BeatInfo, FrequencyBand, FrequencySnapshot};

/// Draw band meters along the bottom left plus beat/cutoff readouts.
pub fn draw_debug(
    draw: &Draw,
    bounds: Rect,
    snapshot: &FrequencySnapshot,
    beat: &BeatInfo,
    cutoff: f32,
) {
    let left = bounds.left() + 20.0;
    let bottom = bounds.bottom() + 30.0;
    let bar_w = 40.0;
    let bar_max_h = 120.0;

    for (i, band) in FrequencyBand::ALL.iter().enumerate() {
        let level = beat.bands.get(*band);
        let x = left + i as f32 * (bar_w + 8.0) + bar_w / 2.0;
        let h = (level * bar_max_h).max(1.0);

        draw.rect()
            .x_y(x, bottom + h / 2.0)
            .w_h(bar_w, h)
            .color(srgba(80u8, 200, 255, 180));

        draw.text(band.name())
            .x_y(x, bottom - 12.0)
            .w_h(bar_w + 8.0, 14.0)
            .center_justify()
            .font_size(11)
            .color(srgba(255u8, 255, 255, 160));
    }

    // Cutoff threshold line across the meters
    let cutoff_y = bottom + (cutoff.min(1.0)) * bar_max_h;
    let meters_w = FrequencyBand::ALL.len() as f32 * (bar_w + 8.0);
    draw.line()
        .start(pt2(left, cutoff_y))
        .end(pt2(left + meters_w, cutoff_y))
        .weight(1.5)
        .color(srgba(255u8, 120, 120, 200));

    // Beat dot and strength readout
    let dot_x = left + meters_w + 30.0;
    let dot_color = if beat.is_beat {
        srgba(255u8, 255, 255, 255)
    } else {
        srgba(120u8, 120, 120, 120)
    };
    draw.ellipse()
        .x_y(dot_x, bottom + 10.0)
        .w_h(16.0, 16.0)
        .color(dot_color);

    let text = format!(
        "strength {:.2} | cutoff {:.2} | spectrum avg {:.2}",
        beat.strength,
        cutoff,
        snapshot.average()
    );
    draw.text(&text)
        .x_y(dot_x + 160.0, bottom + 10.0)
        .w_h(320.0, 16.0)
        .left_justify()
        .no_line_wrap()
        .font_size(12)
        .color(srgba(255u8, 255, 255, 200));
}
