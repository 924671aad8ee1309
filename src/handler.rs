//! PlotHandler: owner of every plot, the variable registry and the single
//! lock that serializes the acquisition and render actors.
//!
//! Locking protocol: one mutex guards all structural state and all sample
//! buffers. The acquisition tick takes it once to append a whole batch, the
//! renderer takes it once per plot to copy a snapshot, and every structural
//! mutation (add/remove/rename of plots, series and variables) runs inside
//! it as one atomic step. Target I/O never happens while it is held: a tick
//! first collects the sampling plan, then reads the target, then re-locks
//! to append.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use crate::config::AcquisitionConfig;
use crate::data::plot::{Plot, PlotKind, PlotSnapshot};
use crate::data::variable::{Rgba, Variable, VariableRegistry, VarId, VarType};
use crate::error::VarScopeError;
use crate::source::{resolve_addresses, SymbolResolver, TargetSource};

/// Acquisition state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Stopped,
    Running,
}

/// Definition of one plot without its sample data: what persistence and
/// tree views need, cheap to copy out regardless of buffer capacity.
#[derive(Debug, Clone)]
pub struct PlotDef {
    pub name: String,
    pub kind: PlotKind,
    pub visible: bool,
    /// Bound variable names, in series insertion order.
    pub series: Vec<String>,
}

struct SharedState {
    registry: VariableRegistry,
    plots: Vec<Plot>,
    epoch: Instant,
    // palette allocation index; never reused so colors stay distinct even
    // after variables are removed
    color_seq: usize,
}

/// Aggregate owner of all plots and the acquisition/view state machine.
///
/// All methods take `&self`; the handler is meant to be shared between the
/// acquisition thread and the render loop behind an `Arc`.
pub struct PlotHandler {
    config: AcquisitionConfig,
    shared: Mutex<SharedState>,
    source: Mutex<Option<Box<dyn TargetSource + Send>>>,
    running: AtomicBool,
}

impl PlotHandler {
    pub fn new(config: AcquisitionConfig) -> Result<Self, VarScopeError> {
        config.validate()?;
        Ok(Self {
            config,
            shared: Mutex::new(SharedState {
                registry: VariableRegistry::new(),
                plots: Vec::new(),
                epoch: Instant::now(),
                color_seq: 0,
            }),
            source: Mutex::new(None),
            running: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    // ---------- state machine ----------

    pub fn state(&self) -> ViewerState {
        if self.running.load(Ordering::SeqCst) {
            ViewerState::Running
        } else {
            ViewerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Attach a target connection and switch to Running. Existing plot data
    /// is kept; discarding it is an explicit [`erase_all_plot_data`] call.
    ///
    /// [`erase_all_plot_data`]: PlotHandler::erase_all_plot_data
    pub fn start(&self, source: Box<dyn TargetSource + Send>) {
        *self.source.lock().unwrap() = Some(source);
        self.running.store(true, Ordering::SeqCst);
        log::info!("acquisition started");
    }

    /// Switch to Stopped and drop the target connection. Paused data stays
    /// visible to the renderer.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        *self.source.lock().unwrap() = None;
        log::info!("acquisition stopped");
    }

    /// Clear every time and series buffer and restart the sample clock.
    /// Series bindings and plot definitions are untouched.
    pub fn erase_all_plot_data(&self) {
        let mut shared = self.shared.lock().unwrap();
        for plot in shared.plots.iter_mut() {
            plot.clear_data();
        }
        shared.epoch = Instant::now();
    }

    // ---------- variables ----------

    /// Register a new variable, allocating the next palette color.
    pub fn add_variable<S: Into<String>>(
        &self,
        name: S,
        address: u64,
        ty: VarType,
    ) -> Result<VarId, VarScopeError> {
        let mut shared = self.shared.lock().unwrap();
        let color = Rgba::alloc(shared.color_seq);
        let id = shared.registry.insert(Variable::new(name, address, ty, color))?;
        shared.color_seq += 1;
        Ok(id)
    }

    /// Register a new variable with an explicit color.
    pub fn add_variable_with_color<S: Into<String>>(
        &self,
        name: S,
        address: u64,
        ty: VarType,
        color: Rgba,
    ) -> Result<VarId, VarScopeError> {
        let mut shared = self.shared.lock().unwrap();
        shared.registry.insert(Variable::new(name, address, ty, color))
    }

    /// Remove a variable and strip its series from every plot. No-op when
    /// the name is unknown.
    pub fn remove_variable(&self, name: &str) {
        let mut shared = self.shared.lock().unwrap();
        if let Some(var) = shared.registry.remove_by_name(name) {
            for plot in shared.plots.iter_mut() {
                plot.remove_series(var.id);
            }
        }
    }

    /// Rename a variable. Series stay bound (they key on [`VarId`]), only
    /// the registry's name index moves.
    pub fn rename_variable(&self, old: &str, new: &str) -> Result<(), VarScopeError> {
        self.shared.lock().unwrap().registry.rename(old, new)
    }

    /// Clone of every registered variable, in insertion order.
    pub fn variables(&self) -> Vec<Variable> {
        self.shared.lock().unwrap().registry.iter().cloned().collect()
    }

    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.shared.lock().unwrap().registry.get_by_name(name).cloned()
    }

    /// Re-resolve every variable's address, e.g. after reloading the ELF.
    /// Unresolvable symbols keep their previous address.
    pub fn update_addresses(&self, resolver: &dyn SymbolResolver) {
        let mut shared = self.shared.lock().unwrap();
        resolve_addresses(&mut shared.registry, resolver);
    }

    // ---------- plots ----------

    /// Create an empty plot (Curve, visible). Fails with `NameConflict` if
    /// the name is taken.
    pub fn add_plot<S: Into<String>>(&self, name: S) -> Result<(), VarScopeError> {
        let name = name.into();
        let mut shared = self.shared.lock().unwrap();
        if shared.plots.iter().any(|p| p.name() == name) {
            return Err(VarScopeError::NameConflict(name));
        }
        let plot = Plot::new(name, self.config.buffer_capacity)?;
        shared.plots.push(plot);
        Ok(())
    }

    /// Remove a plot and discard its series and buffers. An empty or unknown
    /// name is a no-op ("no deletion requested" is the common case).
    pub fn remove_plot(&self, name: &str) {
        if name.is_empty() {
            return;
        }
        let mut shared = self.shared.lock().unwrap();
        shared.plots.retain(|p| p.name() != name);
    }

    /// Rename a plot. Fails with `NameConflict` when the new name is taken
    /// and `NotFound` when the old one is unknown; both plots are left
    /// unchanged on failure.
    pub fn rename_plot(&self, old: &str, new: &str) -> Result<(), VarScopeError> {
        if old == new {
            return Ok(());
        }
        let mut shared = self.shared.lock().unwrap();
        if shared.plots.iter().any(|p| p.name() == new) {
            return Err(VarScopeError::NameConflict(new.to_string()));
        }
        let plot = shared
            .plots
            .iter_mut()
            .find(|p| p.name() == old)
            .ok_or_else(|| VarScopeError::NotFound(old.to_string()))?;
        plot.set_name(new);
        Ok(())
    }

    pub fn set_plot_kind(&self, name: &str, kind: PlotKind) -> Result<(), VarScopeError> {
        let mut shared = self.shared.lock().unwrap();
        let plot = shared
            .plots
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| VarScopeError::NotFound(name.to_string()))?;
        plot.set_kind(kind);
        Ok(())
    }

    /// Toggle rendering of a plot. An invisible plot keeps accumulating
    /// samples: its variables may feed other plots, and acquisition writes
    /// once per variable per tick.
    pub fn set_plot_visibility(&self, name: &str, visible: bool) -> Result<(), VarScopeError> {
        let mut shared = self.shared.lock().unwrap();
        let plot = shared
            .plots
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| VarScopeError::NotFound(name.to_string()))?;
        plot.set_visible(visible);
        Ok(())
    }

    /// Bind a variable to a plot (the drag-and-drop target operation).
    /// Idempotent for an already-bound variable.
    pub fn add_series(&self, plot_name: &str, var_name: &str) -> Result<(), VarScopeError> {
        let mut shared = self.shared.lock().unwrap();
        let var = shared
            .registry
            .id_of(var_name)
            .ok_or_else(|| VarScopeError::NotFound(var_name.to_string()))?;
        let plot = shared
            .plots
            .iter_mut()
            .find(|p| p.name() == plot_name)
            .ok_or_else(|| VarScopeError::NotFound(plot_name.to_string()))?;
        plot.add_series(var)
    }

    /// Unbind a variable from a plot. Unknown plot or variable names are
    /// no-ops.
    pub fn remove_series(&self, plot_name: &str, var_name: &str) {
        let mut shared = self.shared.lock().unwrap();
        let Some(var) = shared.registry.id_of(var_name) else {
            return;
        };
        if let Some(plot) = shared.plots.iter_mut().find(|p| p.name() == plot_name) {
            plot.remove_series(var);
        }
    }

    pub fn plot_count(&self) -> usize {
        self.shared.lock().unwrap().plots.len()
    }

    /// Count of visible plots, for subplot layout.
    pub fn visible_plot_count(&self) -> usize {
        self.shared
            .lock()
            .unwrap()
            .plots
            .iter()
            .filter(|p| p.visible())
            .count()
    }

    /// Plot names in creation order.
    pub fn plot_names(&self) -> Vec<String> {
        self.shared
            .lock()
            .unwrap()
            .plots
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Definitions of all plots (name, kind, visibility, bound variable
    /// names), without touching any sample buffer.
    pub fn plot_definitions(&self) -> Vec<PlotDef> {
        let shared = self.shared.lock().unwrap();
        shared
            .plots
            .iter()
            .map(|p| PlotDef {
                name: p.name().to_string(),
                kind: p.kind(),
                visible: p.visible(),
                series: p
                    .series_vars()
                    .filter_map(|id| shared.registry.get(id).map(|v| v.name.clone()))
                    .collect(),
            })
            .collect()
    }

    // ---------- render-side snapshots ----------

    /// Copy out one plot's time axis and series in a single critical
    /// section. The renderer calls this once per plot per frame, bounding
    /// lock hold time to one plot's buffers.
    pub fn plot_snapshot(&self, name: &str) -> Option<PlotSnapshot> {
        let shared = self.shared.lock().unwrap();
        shared
            .plots
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.snapshot(&shared.registry))
    }

    /// Snapshots of all plots, taking and releasing the lock once per plot.
    /// Plots removed between iterations are simply absent from the result.
    pub fn snapshots(&self) -> Vec<PlotSnapshot> {
        self.plot_names()
            .iter()
            .filter_map(|name| self.plot_snapshot(name))
            .collect()
    }

    // ---------- acquisition ----------

    /// One sampling cycle. Reads every variable referenced by at least one
    /// series (once, even when bound to several plots), then appends the
    /// batch and the elapsed-seconds timestamp under the lock. A failed read
    /// skips that variable for this tick only.
    pub fn tick(&self) {
        if !self.is_running() {
            return;
        }

        // Sampling plan: unique (id, address, type) across all series.
        let plan: Vec<(VarId, u64, VarType)> = {
            let shared = self.shared.lock().unwrap();
            let mut plan = Vec::new();
            for plot in shared.plots.iter() {
                for var in plot.series_vars() {
                    if plan.iter().any(|(id, _, _)| *id == var) {
                        continue;
                    }
                    if let Some(v) = shared.registry.get(var) {
                        plan.push((var, v.address, v.ty));
                    }
                }
            }
            plan
        };

        // Target I/O happens outside the data lock.
        let mut samples: Vec<(VarId, f64)> = Vec::with_capacity(plan.len());
        {
            let mut source = self.source.lock().unwrap();
            let Some(source) = source.as_mut() else {
                return;
            };
            for (id, address, ty) in plan {
                match source.read_value(address, ty) {
                    Ok(value) => samples.push((id, value)),
                    Err(e) => log::warn!("skipping variable read this tick: {e}"),
                }
            }
        }

        let mut shared = self.shared.lock().unwrap();
        let t = shared.epoch.elapsed().as_secs_f64();
        for plot in shared.plots.iter_mut() {
            plot.time_mut().push(t);
            for (id, value) in samples.iter() {
                if let Some(series) = plot.series_mut(*id) {
                    series.buffer.push(*value);
                }
            }
        }
    }

    /// Write a new value for a variable back to the live target. Returns
    /// `false` while Stopped, for unknown variables, and on target I/O
    /// failure; never panics or aborts the session.
    pub fn write_series_value(&self, var_name: &str, value: f64) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some((address, ty)) = ({
            let shared = self.shared.lock().unwrap();
            shared.registry.get_by_name(var_name).map(|v| (v.address, v.ty))
        }) else {
            return false;
        };
        let mut source = self.source.lock().unwrap();
        let Some(source) = source.as_mut() else {
            return false;
        };
        match source.write_value(address, ty, value) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("write-back of '{var_name}' failed: {e}");
                false
            }
        }
    }
}
