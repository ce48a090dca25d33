use std::collections::HashMap;

use thiserror::Error;

use super::{Color, OptionField, OptionKind, OptionValue, Options};

#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("unknown option '{0}'")]
    UnknownField(String),

    #[error("option '{field}' holds a {expected:?} value, got {found:?}")]
    TypeMismatch {
        field: &'static str,
        expected: OptionKind,
        found: OptionKind,
    },
}

type Binding<C> = Box<dyn FnMut(&OptionValue, &mut C)>;

/// Options plus the table of callbacks bound to each field
///
/// `C` is the context handed to callbacks when a field changes, usually the
/// scene the bindings act on.
pub struct OptionsStore<C> {
    values: Options,
    bindings: HashMap<OptionField, Vec<Binding<C>>>,
}

impl<C> Default for OptionsStore<C> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<C> OptionsStore<C> {
    pub fn new(values: Options) -> Self {
        Self {
            values,
            bindings: HashMap::new(),
        }
    }

    pub fn values(&self) -> &Options {
        &self.values
    }

    pub fn get(&self, field: OptionField) -> OptionValue {
        self.values.get(field)
    }

    pub fn get_by_name(&self, name: &str) -> Result<OptionValue, OptionsError> {
        let field = lookup(name)?;
        Ok(self.get(field))
    }

    /// Stores `value` and runs the field's callbacks in registration order
    /// before returning. A value of the wrong kind changes nothing.
    pub fn set(
        &mut self,
        field: OptionField,
        value: impl Into<OptionValue>,
        ctx: &mut C,
    ) -> Result<(), OptionsError> {
        let value = value.into();
        self.values.assign(field, value)?;

        if let Some(callbacks) = self.bindings.get_mut(&field) {
            log::trace!("{} = {:?}, {} binding(s)", field, value, callbacks.len());
            for callback in callbacks.iter_mut() {
                callback(&value, ctx);
            }
        }
        Ok(())
    }

    pub fn set_by_name(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
        ctx: &mut C,
    ) -> Result<(), OptionsError> {
        let field = lookup(name)?;
        self.set(field, value, ctx)
    }

    /// Registers an untyped callback for `field`
    pub fn on_change<F>(&mut self, field: OptionField, callback: F)
    where
        F: FnMut(&OptionValue, &mut C) + 'static,
    {
        self.bindings
            .entry(field)
            .or_default()
            .push(Box::new(callback));
    }

    pub fn on_number<F>(&mut self, field: OptionField, mut callback: F) -> Result<(), OptionsError>
    where
        F: FnMut(f64, &mut C) + 'static,
    {
        expect_kind(field, OptionKind::Number)?;
        self.on_change(field, move |value, ctx| {
            if let Some(number) = value.as_number() {
                callback(number, ctx);
            }
        });
        Ok(())
    }

    pub fn on_bool<F>(&mut self, field: OptionField, mut callback: F) -> Result<(), OptionsError>
    where
        F: FnMut(bool, &mut C) + 'static,
    {
        expect_kind(field, OptionKind::Bool)?;
        self.on_change(field, move |value, ctx| {
            if let Some(flag) = value.as_bool() {
                callback(flag, ctx);
            }
        });
        Ok(())
    }

    pub fn on_color<F>(&mut self, field: OptionField, mut callback: F) -> Result<(), OptionsError>
    where
        F: FnMut(Color, &mut C) + 'static,
    {
        expect_kind(field, OptionKind::Color)?;
        self.on_change(field, move |value, ctx| {
            if let Some(color) = value.as_color() {
                callback(color, ctx);
            }
        });
        Ok(())
    }

    pub fn binding_count(&self, field: OptionField) -> usize {
        self.bindings.get(&field).map_or(0, Vec::len)
    }
}

fn lookup(name: &str) -> Result<OptionField, OptionsError> {
    OptionField::from_name(name).ok_or_else(|| OptionsError::UnknownField(name.to_string()))
}

fn expect_kind(field: OptionField, kind: OptionKind) -> Result<(), OptionsError> {
    if field.kind() == kind {
        Ok(())
    } else {
        Err(OptionsError::TypeMismatch {
            field: field.name(),
            expected: field.kind(),
            found: kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_runs_callbacks_in_order() {
        let mut store: OptionsStore<Vec<String>> = OptionsStore::default();
        store
            .on_number(OptionField::LiquidOpacity, |v, calls| calls.push(format!("first {v}")))
            .unwrap();
        store.on_change(OptionField::LiquidOpacity, |v, calls| {
            calls.push(format!("second {:?}", v))
        });

        let mut calls = Vec::new();
        store.set(OptionField::LiquidOpacity, 0.25, &mut calls).unwrap();

        assert_eq!(calls, vec!["first 0.25", "second Number(0.25)"]);
        assert_eq!(store.values().liquid_opacity, 0.25);
    }

    #[test]
    fn test_set_without_bindings_only_stores() {
        let mut store: OptionsStore<()> = OptionsStore::default();
        store.set(OptionField::GlassOpacity, 0.1, &mut ()).unwrap();
        assert_eq!(store.get(OptionField::GlassOpacity), OptionValue::Number(0.1));
    }

    #[test]
    fn test_out_of_range_values_are_kept_verbatim() {
        let mut store: OptionsStore<()> = OptionsStore::default();
        store.set(OptionField::RotationSpeedX, -3.5, &mut ()).unwrap();
        store.set(OptionField::TextureOpacity, 7.0, &mut ()).unwrap();
        assert_eq!(store.values().rotation_speed_x, -3.5);
        assert_eq!(store.values().texture_opacity, 7.0);
    }

    #[test]
    fn test_wrong_kind_is_rejected_without_callbacks() {
        let mut store: OptionsStore<u32> = OptionsStore::default();
        store.on_change(OptionField::Enable, |_, count| *count += 1);

        let mut count = 0;
        let err = store.set(OptionField::Enable, 1.0, &mut count).unwrap_err();

        assert_eq!(
            err,
            OptionsError::TypeMismatch {
                field: "enable",
                expected: OptionKind::Bool,
                found: OptionKind::Number,
            }
        );
        assert_eq!(count, 0);
        assert!(store.values().enable);
    }

    #[test]
    fn test_set_by_name() {
        let mut store: OptionsStore<()> = OptionsStore::default();
        let red = Color::new(1.0, 0.0, 0.0);
        store.set_by_name("shpereColor", red, &mut ()).unwrap();
        assert_eq!(store.get_by_name("shpereColor"), Ok(OptionValue::Color(red)));

        assert_eq!(
            store.set_by_name("nope", true, &mut ()),
            Err(OptionsError::UnknownField("nope".into()))
        );
    }

    #[test]
    fn test_typed_registration_checks_kind() {
        let mut store: OptionsStore<()> = OptionsStore::default();
        assert!(store.on_bool(OptionField::SphereColor, |_, _| {}).is_err());
        assert!(store.on_color(OptionField::SphereColor, |_, _| {}).is_ok());
        assert_eq!(store.binding_count(OptionField::SphereColor), 1);
        assert_eq!(store.binding_count(OptionField::Enable), 0);
    }
}
