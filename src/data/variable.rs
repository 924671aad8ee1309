//! Monitored variables and the name-indexed registry that owns them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::VarScopeError;

/// Stable numeric identifier for a variable, assigned at creation.
///
/// Series bind to variables through this handle, so renaming a variable never
/// leaves a dangling key behind: the name is only a secondary, unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl VarId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU32 = AtomicU32::new(1);
        VarId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Scalar kind of a monitored target variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl VarType {
    /// Size of one value of this type on the target, in bytes.
    pub fn size(&self) -> usize {
        match self {
            VarType::U8 | VarType::I8 => 1,
            VarType::U16 | VarType::I16 => 2,
            VarType::U32 | VarType::I32 | VarType::F32 => 4,
            VarType::F64 => 8,
        }
    }

    /// All scalar kinds, in declaration order (for UI combo boxes).
    pub fn all() -> &'static [VarType] {
        &[
            VarType::U8,
            VarType::I8,
            VarType::U16,
            VarType::I16,
            VarType::U32,
            VarType::I32,
            VarType::F32,
            VarType::F64,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::U8 => "u8",
            VarType::I8 => "i8",
            VarType::U16 => "u16",
            VarType::I16 => "i16",
            VarType::U32 => "u32",
            VarType::I32 => "i32",
            VarType::F32 => "f32",
            VarType::F64 => "f64",
        }
    }
}

impl std::str::FromStr for VarType {
    type Err = VarScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static BY_NAME: Lazy<HashMap<&'static str, VarType>> = Lazy::new(|| {
            VarType::all().iter().map(|ty| (ty.as_str(), *ty)).collect()
        });
        BY_NAME
            .get(s)
            .copied()
            .ok_or_else(|| VarScopeError::NotFound(s.to_string()))
    }
}

/// RGBA color used for line/bar styling of a variable's series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const GRAY: Rgba = Rgba([128, 128, 128, 255]);

    /// Allocate a distinct color for the given variable index.
    pub fn alloc(index: usize) -> Rgba {
        const PALETTE: [Rgba; 10] = [
            Rgba([31, 119, 180, 255]),
            Rgba([255, 127, 14, 255]),
            Rgba([44, 160, 44, 255]),
            Rgba([214, 39, 40, 255]),
            Rgba([148, 103, 189, 255]),
            Rgba([140, 86, 75, 255]),
            Rgba([227, 119, 194, 255]),
            Rgba([127, 127, 127, 255]),
            Rgba([188, 189, 34, 255]),
            Rgba([23, 190, 207, 255]),
        ];
        PALETTE[index % PALETTE.len()]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::GRAY
    }
}

/// One monitored target variable: identity, location and display metadata.
#[derive(Debug, Clone)]
pub struct Variable {
    pub id: VarId,
    pub name: String,
    pub address: u64,
    pub ty: VarType,
    pub color: Rgba,
}

impl Variable {
    pub fn new<S: Into<String>>(name: S, address: u64, ty: VarType, color: Rgba) -> Self {
        Self {
            id: VarId::next(),
            name: name.into(),
            address,
            ty,
            color,
        }
    }
}

/// Owns all variables, keyed by [`VarId`] with a unique name index on top.
/// Iteration follows insertion order so variable tables render stably.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    vars: HashMap<VarId, Variable>,
    by_name: HashMap<String, VarId>,
    order: Vec<VarId>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Register a variable. Fails with `NameConflict` if the name is taken;
    /// the registry is left unchanged in that case.
    pub fn insert(&mut self, var: Variable) -> Result<VarId, VarScopeError> {
        if self.by_name.contains_key(&var.name) {
            return Err(VarScopeError::NameConflict(var.name));
        }
        let id = var.id;
        self.by_name.insert(var.name.clone(), id);
        self.vars.insert(id, var);
        self.order.push(id);
        Ok(id)
    }

    /// Remove a variable by name. Returns the removed variable, or `None`
    /// (no-op) if the name is unknown.
    pub fn remove_by_name(&mut self, name: &str) -> Option<Variable> {
        let id = self.by_name.remove(name)?;
        self.order.retain(|v| *v != id);
        self.vars.remove(&id)
    }

    /// Rename a variable, atomically relocating its name-index entry.
    /// Fails with `NameConflict` if `new` is already taken (renaming a
    /// variable to its own name is allowed) and `NotFound` if `old` is
    /// unknown; either way nothing is modified on failure.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), VarScopeError> {
        if old == new {
            return Ok(());
        }
        if self.by_name.contains_key(new) {
            return Err(VarScopeError::NameConflict(new.to_string()));
        }
        let id = self
            .by_name
            .remove(old)
            .ok_or_else(|| VarScopeError::NotFound(old.to_string()))?;
        self.by_name.insert(new.to_string(), id);
        if let Some(var) = self.vars.get_mut(&id) {
            var.name = new.to_string();
        }
        Ok(())
    }

    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.vars.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Variable> {
        self.by_name.get(name).and_then(|id| self.vars.get(id))
    }

    pub fn id_of(&self, name: &str) -> Option<VarId> {
        self.by_name.get(name).copied()
    }

    /// Variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.order.iter().filter_map(|id| self.vars.get(id))
    }

    /// Mutable iteration in arbitrary order (used for address resolution,
    /// where order does not matter).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Variable> {
        self.vars.values_mut()
    }
}
