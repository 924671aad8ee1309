//! VarScope crate root: re-exports and module wiring.
//!
//! Core of a live variable-monitoring tool for embedded targets: an
//! acquisition thread samples memory-mapped variables through a
//! [`TargetSource`] and a render loop copies consistent snapshots out of
//! fixed-capacity scrolling buffers, one plot at a time.
//!
//! Module map:
//! - `data`: scrolling buffers, the variable registry, plots and series
//! - `handler`: the shared-lock orchestrator both actors go through
//! - `session`: lifecycle of the acquisition thread
//! - `source`: traits for the target connection and symbol resolution
//! - `config`: acquisition settings
//! - `persistence`: project save/load (JSON/YAML)

pub mod config;
pub mod data;
pub mod error;
pub mod handler;
pub mod persistence;
pub mod session;
pub mod source;

// Public re-exports for a compact external API
pub use config::AcquisitionConfig;
pub use data::buffer::{BufferSnapshot, ScrollingBuffer};
pub use data::plot::{PlotKind, PlotSnapshot, SeriesSnapshot};
pub use data::variable::{Rgba, Variable, VariableRegistry, VarId, VarType};
pub use error::VarScopeError;
pub use handler::{PlotDef, PlotHandler, ViewerState};
pub use persistence::{load_project_from_path, save_project_to_path, ProjectSerde};
pub use session::AcquisitionSession;
pub use source::{SymbolResolver, TargetSource};
