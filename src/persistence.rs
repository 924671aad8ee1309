//! Project persistence: save and load the monitoring setup (variables, plot
//! definitions, ELF path) as JSON or YAML.
//!
//! Serializable mirror types keep the live data model free of serde concerns;
//! sample history is deliberately not persisted (only the configured window
//! of live data exists, and it belongs to the session, not the project).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::plot::PlotKind;
use crate::data::variable::{Rgba, Variable, VarType};
use crate::error::VarScopeError;
use crate::handler::PlotHandler;

/// Serializable version of a monitored variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSerde {
    pub name: String,
    pub address: u64,
    pub ty: VarType,
    pub color_rgba: [u8; 4],
}

impl From<&Variable> for VariableSerde {
    fn from(v: &Variable) -> Self {
        Self {
            name: v.name.clone(),
            address: v.address,
            ty: v.ty,
            color_rgba: v.color.0,
        }
    }
}

/// Serializable version of a plot definition. Series are stored as variable
/// names and rebound on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotSerde {
    pub name: String,
    pub kind: PlotKind,
    pub visible: bool,
    pub series: Vec<String>,
}

/// Full project state (for save/load).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSerde {
    pub elf_path: Option<String>,
    pub variables: Vec<VariableSerde>,
    pub plots: Vec<PlotSerde>,
}

impl ProjectSerde {
    /// Capture the current setup of a handler. Only definitions are read;
    /// no sample buffer is copied.
    pub fn capture(handler: &PlotHandler) -> Self {
        let variables = handler.variables().iter().map(VariableSerde::from).collect();
        let plots = handler
            .plot_definitions()
            .into_iter()
            .map(|def| PlotSerde {
                name: def.name,
                kind: def.kind,
                visible: def.visible,
                series: def.series,
            })
            .collect();
        Self {
            elf_path: handler
                .config()
                .elf_path
                .as_ref()
                .map(|p| p.display().to_string()),
            variables,
            plots,
        }
    }

    /// Recreate the stored setup on a handler. Existing plots and variables
    /// are replaced; series referencing unknown variable names are skipped
    /// with a warning.
    pub fn apply_to(&self, handler: &PlotHandler) -> Result<(), VarScopeError> {
        for name in handler.plot_names() {
            handler.remove_plot(&name);
        }
        for var in handler.variables() {
            handler.remove_variable(&var.name);
        }
        for v in &self.variables {
            handler.add_variable_with_color(&v.name, v.address, v.ty, Rgba(v.color_rgba))?;
        }
        for p in &self.plots {
            handler.add_plot(&p.name)?;
            handler.set_plot_kind(&p.name, p.kind)?;
            handler.set_plot_visibility(&p.name, p.visible)?;
            for var_name in &p.series {
                if let Err(e) = handler.add_series(&p.name, var_name) {
                    log::warn!("skipping series '{var_name}' of plot '{}': {e}", p.name);
                }
            }
        }
        Ok(())
    }
}

// ---------- Public API ----------

/// Serialize the project as pretty JSON.
pub fn project_to_json(project: &ProjectSerde) -> Result<String, VarScopeError> {
    serde_json::to_string_pretty(project).map_err(|e| VarScopeError::Persistence(e.to_string()))
}

/// Deserialize a project from JSON.
pub fn project_from_json(json: &str) -> Result<ProjectSerde, VarScopeError> {
    serde_json::from_str(json).map_err(|e| VarScopeError::Persistence(e.to_string()))
}

/// Serialize the project as YAML.
pub fn project_to_yaml(project: &ProjectSerde) -> Result<String, VarScopeError> {
    serde_yaml::to_string(project).map_err(|e| VarScopeError::Persistence(e.to_string()))
}

/// Deserialize a project from YAML.
pub fn project_from_yaml(yaml: &str) -> Result<ProjectSerde, VarScopeError> {
    serde_yaml::from_str(yaml).map_err(|e| VarScopeError::Persistence(e.to_string()))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Save the project to a file; YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn save_project_to_path(project: &ProjectSerde, path: &Path) -> Result<(), VarScopeError> {
    let txt = if is_yaml(path) {
        project_to_yaml(project)?
    } else {
        project_to_json(project)?
    };
    std::fs::write(path, txt).map_err(|e| VarScopeError::Persistence(e.to_string()))
}

/// Load a project from a file; format chosen by extension as in
/// [`save_project_to_path`].
pub fn load_project_from_path(path: &Path) -> Result<ProjectSerde, VarScopeError> {
    let txt =
        std::fs::read_to_string(path).map_err(|e| VarScopeError::Persistence(e.to_string()))?;
    if is_yaml(path) {
        project_from_yaml(&txt)
    } else {
        project_from_json(&txt)
    }
}
