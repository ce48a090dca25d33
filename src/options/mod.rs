//! # Demo Options
//!
//! The flat record of user-tunable values that drive the scene, and the
//! [`OptionsStore`] that dispatches change callbacks when a field is set.
//!
//! Every field has a stable panel name (the key shown in the control panel
//! and accepted by [`OptionsStore::set_by_name`]) and a kind (number,
//! boolean or color). Values are never range-checked here; bounding is the
//! job of the widget that produced them.

pub mod store;

pub use store::{OptionsError, OptionsStore};

use std::fmt;

/// RGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Type of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Number,
    Bool,
    Color,
}

/// A value read from or written to a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionValue {
    Number(f64),
    Bool(bool),
    Color(Color),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Number(_) => OptionKind::Number,
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Color(_) => OptionKind::Color,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            OptionValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            OptionValue::Color(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<Color> for OptionValue {
    fn from(value: Color) -> Self {
        OptionValue::Color(value)
    }
}

/// Every tunable field of [`Options`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
    SphereColor,
    LiquidOpacity,
    ColorSphereOpacity,
    TextureOpacity,
    GlassOpacity,
    AmbientLight,
    DirectionalLight,
    AffectedByLight,
    Enable,
    RotationSpeedX,
    RotationSpeedY,
    MovementSpeedX,
    MovementSpeedY,
    MovementSpeedZ,
}

impl OptionField {
    pub const ALL: [OptionField; 14] = [
        OptionField::SphereColor,
        OptionField::LiquidOpacity,
        OptionField::ColorSphereOpacity,
        OptionField::TextureOpacity,
        OptionField::GlassOpacity,
        OptionField::AmbientLight,
        OptionField::DirectionalLight,
        OptionField::AffectedByLight,
        OptionField::Enable,
        OptionField::RotationSpeedX,
        OptionField::RotationSpeedY,
        OptionField::MovementSpeedX,
        OptionField::MovementSpeedY,
        OptionField::MovementSpeedZ,
    ];

    /// Panel name of the field. `shpereColor` keeps its historical spelling.
    pub fn name(self) -> &'static str {
        match self {
            OptionField::SphereColor => "shpereColor",
            OptionField::LiquidOpacity => "liquidOpacity",
            OptionField::ColorSphereOpacity => "colorSphereOpacity",
            OptionField::TextureOpacity => "textureOpacity",
            OptionField::GlassOpacity => "glassOpacity",
            OptionField::AmbientLight => "ambientLight",
            OptionField::DirectionalLight => "directionalLight",
            OptionField::AffectedByLight => "affectedByLight",
            OptionField::Enable => "enable",
            OptionField::RotationSpeedX => "rotationSpeedX",
            OptionField::RotationSpeedY => "rotationSpeedY",
            OptionField::MovementSpeedX => "movementSpeedX",
            OptionField::MovementSpeedY => "movementSpeedY",
            OptionField::MovementSpeedZ => "movementSpeedZ",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn kind(self) -> OptionKind {
        match self {
            OptionField::SphereColor => OptionKind::Color,
            OptionField::AmbientLight
            | OptionField::DirectionalLight
            | OptionField::AffectedByLight
            | OptionField::Enable => OptionKind::Bool,
            _ => OptionKind::Number,
        }
    }
}

impl fmt::Display for OptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The tunable values of the demo
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub sphere_color: Color,
    pub liquid_opacity: f64,
    pub color_sphere_opacity: f64,
    pub texture_opacity: f64,
    /// Carried for completeness; nothing in the scene reads it
    pub glass_opacity: f64,
    pub ambient_light: bool,
    pub directional_light: bool,
    pub affected_by_light: bool,
    pub enable: bool,
    pub rotation_speed_x: f64,
    pub rotation_speed_y: f64,
    pub movement_speed_x: f64,
    pub movement_speed_y: f64,
    pub movement_speed_z: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sphere_color: Color::from_hex(0xff4d6d),
            liquid_opacity: 0.6,
            color_sphere_opacity: 1.0,
            texture_opacity: 1.0,
            glass_opacity: 1.0,
            ambient_light: true,
            directional_light: true,
            affected_by_light: true,
            enable: true,
            rotation_speed_x: 1.0,
            rotation_speed_y: 1.0,
            movement_speed_x: 1.0,
            movement_speed_y: 1.0,
            movement_speed_z: 1.0,
        }
    }
}

impl Options {
    pub fn get(&self, field: OptionField) -> OptionValue {
        match field {
            OptionField::SphereColor => OptionValue::Color(self.sphere_color),
            OptionField::AmbientLight => OptionValue::Bool(self.ambient_light),
            OptionField::DirectionalLight => OptionValue::Bool(self.directional_light),
            OptionField::AffectedByLight => OptionValue::Bool(self.affected_by_light),
            OptionField::Enable => OptionValue::Bool(self.enable),
            number => OptionValue::Number(*self.number_slot(number)),
        }
    }

    /// Writes a value of the field's kind. Wrong kinds leave the record unchanged.
    fn assign(&mut self, field: OptionField, value: OptionValue) -> Result<(), OptionsError> {
        match (field.kind(), value) {
            (OptionKind::Color, OptionValue::Color(color)) => self.sphere_color = color,
            (OptionKind::Bool, OptionValue::Bool(flag)) => *self.bool_slot(field) = flag,
            (OptionKind::Number, OptionValue::Number(number)) => {
                *self.number_slot_mut(field) = number
            }
            (expected, value) => {
                return Err(OptionsError::TypeMismatch {
                    field: field.name(),
                    expected,
                    found: value.kind(),
                })
            }
        }
        Ok(())
    }

    fn number_slot(&self, field: OptionField) -> &f64 {
        match field {
            OptionField::LiquidOpacity => &self.liquid_opacity,
            OptionField::ColorSphereOpacity => &self.color_sphere_opacity,
            OptionField::TextureOpacity => &self.texture_opacity,
            OptionField::GlassOpacity => &self.glass_opacity,
            OptionField::RotationSpeedX => &self.rotation_speed_x,
            OptionField::RotationSpeedY => &self.rotation_speed_y,
            OptionField::MovementSpeedX => &self.movement_speed_x,
            OptionField::MovementSpeedY => &self.movement_speed_y,
            OptionField::MovementSpeedZ => &self.movement_speed_z,
            other => unreachable!("{} is not a number field", other),
        }
    }

    fn number_slot_mut(&mut self, field: OptionField) -> &mut f64 {
        match field {
            OptionField::LiquidOpacity => &mut self.liquid_opacity,
            OptionField::ColorSphereOpacity => &mut self.color_sphere_opacity,
            OptionField::TextureOpacity => &mut self.texture_opacity,
            OptionField::GlassOpacity => &mut self.glass_opacity,
            OptionField::RotationSpeedX => &mut self.rotation_speed_x,
            OptionField::RotationSpeedY => &mut self.rotation_speed_y,
            OptionField::MovementSpeedX => &mut self.movement_speed_x,
            OptionField::MovementSpeedY => &mut self.movement_speed_y,
            OptionField::MovementSpeedZ => &mut self.movement_speed_z,
            other => unreachable!("{} is not a number field", other),
        }
    }

    fn bool_slot(&mut self, field: OptionField) -> &mut bool {
        match field {
            OptionField::AmbientLight => &mut self.ambient_light,
            OptionField::DirectionalLight => &mut self.directional_light,
            OptionField::AffectedByLight => &mut self.affected_by_light,
            OptionField::Enable => &mut self.enable,
            other => unreachable!("{} is not a boolean field", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in OptionField::ALL {
            assert_eq!(OptionField::from_name(field.name()), Some(field));
        }
        assert_eq!(OptionField::from_name("sphereColor"), None);
    }

    #[test]
    fn test_defaults_respect_ranges() {
        let options = Options::default();
        for field in OptionField::ALL {
            if let OptionValue::Number(value) = options.get(field) {
                assert!(value >= 0.0, "{} is negative", field);
            }
        }
        assert!((0.0..=1.0).contains(&options.liquid_opacity));
        assert!(options.enable);
    }

    #[test]
    fn test_get_reports_field_kind() {
        let options = Options::default();
        for field in OptionField::ALL {
            assert_eq!(options.get(field).kind(), field.kind());
        }
    }

    #[test]
    fn test_color_hex_conversions() {
        let color = Color::from_hex(0xff4d6d);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.to_hex(), 0xff4d6d);
        assert_eq!(color.to_string(), "#ff4d6d");
        assert_eq!(Color::from([0.0, 0.0, 1.0]).to_hex(), 0x0000ff);
    }
}
