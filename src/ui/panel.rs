//! Control panel bound to the options store
//!
//! Every widget edit goes through [`OptionsStore::set`], so the scene
//! bindings fire the same way whether a value comes from the panel or code.

use crate::{
    gfx::scene::Scene,
    options::{store::OptionsStore, OptionField, OptionKind, OptionValue},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widget {
    Slider { min: f64, max: f64 },
    Checkbox,
    ColorPicker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelField {
    pub field: OptionField,
    pub label: &'static str,
    pub widget: Widget,
}

impl PanelField {
    pub fn new(field: OptionField, widget: Widget) -> Self {
        Self {
            field,
            label: field.name(),
            widget,
        }
    }

    /// Widget matching the kind of `field`, with the demo's slider ranges
    pub fn for_field(field: OptionField) -> Self {
        let widget = match field.kind() {
            OptionKind::Color => Widget::ColorPicker,
            OptionKind::Bool => Widget::Checkbox,
            OptionKind::Number => match field {
                OptionField::RotationSpeedX
                | OptionField::RotationSpeedY
                | OptionField::MovementSpeedX
                | OptionField::MovementSpeedY
                | OptionField::MovementSpeedZ => Widget::Slider { min: 0.0, max: 10.0 },
                _ => Widget::Slider { min: 0.0, max: 1.0 },
            },
        };
        Self::new(field, widget)
    }
}

pub struct ControlPanel {
    title: String,
    fields: Vec<PanelField>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new("Controls", default_fields())
    }
}

/// Every option except `glassOpacity`, which nothing in the scene reads
pub fn default_fields() -> Vec<PanelField> {
    OptionField::ALL
        .into_iter()
        .filter(|field| *field != OptionField::GlassOpacity)
        .map(PanelField::for_field)
        .collect()
}

impl ControlPanel {
    pub fn new(title: &str, fields: Vec<PanelField>) -> Self {
        Self {
            title: title.to_string(),
            fields,
        }
    }

    pub fn fields(&self) -> &[PanelField] {
        &self.fields
    }

    /// Draws the panel window. Returns how many fields changed this frame.
    pub fn draw(&self, ui: &imgui::Ui, store: &mut OptionsStore<Scene>, scene: &mut Scene) -> usize {
        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return 0;
        }

        let mut changed = 0;
        ui.window(&self.title)
            .size([340.0, 460.0], imgui::Condition::FirstUseEver)
            .position([display_size[0] - 360.0, 40.0], imgui::Condition::FirstUseEver)
            .resizable(true)
            .collapsible(true)
            .build(|| {
                for panel_field in &self.fields {
                    if let Some(value) = edit(ui, panel_field, store.get(panel_field.field)) {
                        if commit(store, scene, panel_field.field, value) {
                            changed += 1;
                        }
                    }
                }
            });
        changed
    }
}

/// Shows one widget; returns the new value if the user changed it
fn edit(ui: &imgui::Ui, panel_field: &PanelField, current: OptionValue) -> Option<OptionValue> {
    match (panel_field.widget, current) {
        (Widget::Slider { min, max }, OptionValue::Number(mut number)) => ui
            .slider(panel_field.label, min, max, &mut number)
            .then_some(OptionValue::Number(number)),
        (Widget::Checkbox, OptionValue::Bool(mut flag)) => ui
            .checkbox(panel_field.label, &mut flag)
            .then_some(OptionValue::Bool(flag)),
        (Widget::ColorPicker, OptionValue::Color(color)) => {
            let mut rgb = color.to_array();
            ui.color_edit3(panel_field.label, &mut rgb)
                .then(|| OptionValue::Color(rgb.into()))
        }
        (widget, value) => {
            log::warn!("{:?} cannot edit {} value {:?}", widget, panel_field.label, value);
            None
        }
    }
}

/// Writes an edited value through the store. Rejections are logged.
pub fn commit(
    store: &mut OptionsStore<Scene>,
    scene: &mut Scene,
    field: OptionField,
    value: OptionValue,
) -> bool {
    match store.set(field, value, scene) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Panel edit rejected: {}", e);
            false
        }
    }
}
