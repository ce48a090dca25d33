//! Menu bar with one link per route

use crate::routes::Route;

/// Draws the main menu bar. Returns the clicked route, if any.
pub fn draw(ui: &imgui::Ui, current: Route) -> Option<Route> {
    let mut requested = None;
    if let Some(_menu_bar) = ui.begin_main_menu_bar() {
        for route in Route::ALL {
            if ui
                .menu_item_config(route.label())
                .selected(route == current)
                .build()
            {
                requested = Some(route);
            }
        }

        let fps = ui.io().framerate;
        ui.same_line_with_pos(ui.window_size()[0] - 110.0);
        ui.text_disabled(format!("{:.0} fps", fps));
    }
    requested
}
