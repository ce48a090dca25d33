//! The "/" view: a landing panel pointing at the art scene.

use crate::routes::Route;

const INTRO: &[&str] = &[
    "A small real-time scene: a reflective water plane, a color sphere,",
    "a mirrored sphere and a refracting liquid sphere that drifts on its own.",
    "",
    "Open the Art page to explore it. Drag to orbit, shift + drag to pan,",
    "scroll to zoom and shift + C to reset the camera.",
];

/// Draws the landing window. Returns the route requested by its button, if any.
pub fn draw(ui: &imgui::Ui) -> Option<Route> {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return None;
    }

    let size = [(display_size[0] * 0.5).clamp(360.0, 640.0), 260.0];
    let position = [
        (display_size[0] - size[0]) * 0.5,
        (display_size[1] - size[1]) * 0.4,
    ];

    let mut requested = None;
    ui.window("Welcome")
        .size(size, imgui::Condition::Always)
        .position(position, imgui::Condition::Always)
        .resizable(false)
        .collapsible(false)
        .movable(false)
        .build(|| {
            for line in INTRO {
                ui.text_wrapped(line);
            }
            ui.spacing();
            ui.separator();
            if ui.button("Go to Art") {
                requested = Some(Route::Art);
            }
        });
    requested
}
