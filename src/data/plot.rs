//! Plots and the per-variable series bound to them.

use serde::{Deserialize, Serialize};

use crate::data::buffer::{BufferSnapshot, ScrollingBuffer};
use crate::data::variable::{Rgba, VarId, VariableRegistry};
use crate::error::VarScopeError;

/// Visualization kind of a plot. All three kinds share the same underlying
/// sample data; switching between them is purely a rendering-mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotKind {
    Curve,
    Bar,
    Table,
}

/// One variable's sample history within one plot.
///
/// The series only borrows the variable's identity through its [`VarId`];
/// name, address and color stay owned by the registry, so renaming a
/// variable never strands a series.
#[derive(Debug)]
pub struct Series {
    pub var: VarId,
    pub buffer: ScrollingBuffer<f64>,
}

/// A named visualization unit: a shared time axis plus one series per
/// bound variable, held in insertion order for stable table rendering.
#[derive(Debug)]
pub struct Plot {
    name: String,
    kind: PlotKind,
    visible: bool,
    capacity: usize,
    time: ScrollingBuffer<f64>,
    series: Vec<Series>,
}

/// Snapshot of one series, paired with the display metadata the renderer
/// needs (resolved from the registry at snapshot time).
#[derive(Debug, Clone)]
pub struct SeriesSnapshot {
    pub name: String,
    pub address: u64,
    pub color: Rgba,
    pub values: BufferSnapshot<f64>,
    pub last: Option<f64>,
}

/// Consistent point-in-time copy of a whole plot: the time axis and every
/// series, all taken inside the same critical section.
#[derive(Debug, Clone)]
pub struct PlotSnapshot {
    pub name: String,
    pub kind: PlotKind,
    pub visible: bool,
    pub time: BufferSnapshot<f64>,
    pub series: Vec<SeriesSnapshot>,
}

impl Plot {
    /// Create an empty plot. Fresh plots default to a visible curve.
    pub(crate) fn new<S: Into<String>>(name: S, capacity: usize) -> Result<Self, VarScopeError> {
        Ok(Self {
            name: name.into(),
            kind: PlotKind::Curve,
            visible: true,
            capacity,
            time: ScrollingBuffer::new(capacity)?,
            series: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: PlotKind) {
        self.kind = kind;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Bind a variable to this plot. Idempotent: re-adding a variable that is
    /// already bound keeps its accumulated history.
    pub fn add_series(&mut self, var: VarId) -> Result<(), VarScopeError> {
        if self.series.iter().any(|s| s.var == var) {
            return Ok(());
        }
        self.series.push(Series {
            var,
            buffer: ScrollingBuffer::new(self.capacity)?,
        });
        Ok(())
    }

    /// Unbind a variable, discarding its history. No-op when not bound.
    pub fn remove_series(&mut self, var: VarId) {
        self.series.retain(|s| s.var != var);
    }

    pub(crate) fn series_mut(&mut self, var: VarId) -> Option<&mut Series> {
        self.series.iter_mut().find(|s| s.var == var)
    }

    pub(crate) fn series_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.series.iter().map(|s| s.var)
    }

    pub(crate) fn time_mut(&mut self) -> &mut ScrollingBuffer<f64> {
        &mut self.time
    }

    /// Drop all accumulated samples, keeping the series bindings.
    pub fn clear_data(&mut self) {
        self.time.clear();
        for s in self.series.iter_mut() {
            s.buffer.clear();
        }
    }

    /// Copy out the time axis and every series. Caller must hold the owning
    /// handler lock for the duration of the copy.
    pub(crate) fn snapshot(&self, registry: &VariableRegistry) -> PlotSnapshot {
        let series = self
            .series
            .iter()
            .filter_map(|s| {
                let var = registry.get(s.var)?;
                Some(SeriesSnapshot {
                    name: var.name.clone(),
                    address: var.address,
                    color: var.color,
                    values: s.buffer.snapshot(),
                    last: s.buffer.last(),
                })
            })
            .collect();
        PlotSnapshot {
            name: self.name.clone(),
            kind: self.kind,
            visible: self.visible,
            time: self.time.snapshot(),
            series,
        }
    }
}
