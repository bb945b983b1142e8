//! Named parameters consumed by a per-pixel program.
//!
//! An effect declares its uniforms up front; the host records new values with
//! [`UniformBinding::set`] and [`UniformBinding::flush`] pushes only the values
//! that changed into the effect right before the next render pass.

use crate::{Effect, ImageEffectError, ImageEffectResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Float2,
    Int,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Float2([f32; 2]),
    Int(i32),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Float2(_) => UniformKind::Float2,
            UniformValue::Int(_) => UniformKind::Int,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformDecl {
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        Self { name, kind }
    }
}

/// Checks a declaration list the way a program compiler would.
pub fn validate_decls(decls: &[UniformDecl]) -> ImageEffectResult<()> {
    for (i, decl) in decls.iter().enumerate() {
        if decl.name.is_empty() {
            return Err(ImageEffectError::Unavailable(format!(
                "uniform #{i} has an empty name"
            )));
        }

        if decls[..i].iter().any(|other| other.name == decl.name) {
            return Err(ImageEffectError::Unavailable(format!(
                "uniform `{}` declared twice",
                decl.name
            )));
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
struct Slot {
    decl: UniformDecl,
    value: Option<UniformValue>,
    dirty: bool,
}

#[derive(Debug, Clone)]
pub struct UniformBinding {
    slots: Vec<Slot>,
}

impl UniformBinding {
    pub fn new(decls: &[UniformDecl]) -> Self {
        Self {
            slots: decls
                .iter()
                .map(|decl| Slot {
                    decl: *decl,
                    value: None,
                    dirty: false,
                })
                .collect(),
        }
    }

    pub fn for_effect(effect: &dyn Effect) -> Self {
        Self::new(effect.uniforms())
    }

    /// Records `value` for `name`. Returns whether the bound value changed.
    pub fn try_set(&mut self, name: &str, value: UniformValue) -> ImageEffectResult<bool> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.decl.name == name)
            .ok_or_else(|| ImageEffectError::UnknownUniform(name.to_string()))?;

        if slot.decl.kind != value.kind() {
            return Err(ImageEffectError::UniformType {
                name: name.to_string(),
                expected: slot.decl.kind,
                actual: value.kind(),
            });
        }

        if slot.value == Some(value) {
            return Ok(false);
        }

        slot.value = Some(value);
        slot.dirty = true;
        Ok(true)
    }

    /// Like [`Self::try_set`], but a name or kind the effect does not declare
    /// is a programming error: it panics in debug builds and is dropped in release.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        match self.try_set(name, value) {
            Ok(changed) => changed,
            Err(e) => {
                debug_assert!(false, "{e}");
                log::warn!("ignore uniform update: {e}");
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.slots
            .iter()
            .find(|slot| slot.decl.name == name)
            .and_then(|slot| slot.value)
    }

    pub fn is_dirty(&self) -> bool {
        self.slots.iter().any(|slot| slot.dirty)
    }

    pub fn decls(&self) -> impl Iterator<Item = &UniformDecl> {
        self.slots.iter().map(|slot| &slot.decl)
    }

    /// Pushes every changed value into `effect`. Returns how many were pushed.
    pub fn flush(&mut self, effect: &mut dyn Effect) -> ImageEffectResult<usize> {
        let mut pushed = 0;

        for slot in self.slots.iter_mut().filter(|slot| slot.dirty) {
            if let Some(value) = slot.value {
                effect.set_uniform(slot.decl.name, value)?;
                pushed += 1;
            }
            slot.dirty = false;
        }

        Ok(pushed)
    }
}
