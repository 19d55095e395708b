// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewer theme.
//!
//! Dark baseline tuned for chart reading: muted chrome so the series colors
//! stay the brightest elements on screen.

use egui::{Color32, Context, Rounding, Stroke, Visuals};

/// Viewer color theme
#[derive(Debug, Clone)]
pub struct ViewerTheme {
    /// Primary background color
    pub bg_primary: Color32,
    /// Secondary background (panels, widgets)
    pub bg_secondary: Color32,
    /// Primary text color
    pub text_primary: Color32,
    /// Accent color for selections and slider handles
    pub accent: Color32,
}

impl Default for ViewerTheme {
    fn default() -> Self {
        Self {
            bg_primary: Color32::from_gray(24),
            bg_secondary: Color32::from_gray(34),
            text_primary: Color32::from_gray(205),
            accent: Color32::from_rgb(66, 133, 244),
        }
    }
}

impl ViewerTheme {
    /// Apply the theme to an egui context
    pub fn apply(&self, ctx: &Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = Color32::from_gray(16);
        visuals.override_text_color = Some(self.text_primary);

        visuals.selection.bg_fill = self.accent.linear_multiply(0.4);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.inactive.bg_fill = Color32::from_gray(44);
        visuals.widgets.hovered.bg_fill = Color32::from_gray(56);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.active.bg_fill = self.accent.linear_multiply(0.5);

        let rounding = Rounding::same(3.0);
        visuals.widgets.noninteractive.rounding = rounding;
        visuals.widgets.inactive.rounding = rounding;
        visuals.widgets.hovered.rounding = rounding;
        visuals.widgets.active.rounding = rounding;
        visuals.widgets.open.rounding = rounding;

        ctx.set_visuals(visuals);
    }
}
