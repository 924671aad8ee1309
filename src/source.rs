//! Traits for the external collaborators: the target connection that samples
//! and writes variable memory, and the symbol resolver that maps names to
//! addresses (typically backed by an ELF reader).

use crate::data::variable::{VariableRegistry, VarType};
use crate::error::VarScopeError;

/// Connection to the running target. Implementations wrap the actual debug
/// probe / transport; all values cross this boundary widened to `f64`.
pub trait TargetSource {
    /// Read the current value of one variable. A failure here is recoverable:
    /// the acquisition tick skips the variable and carries on.
    fn read_value(&mut self, address: u64, ty: VarType) -> Result<f64, VarScopeError>;

    /// Write a new value back to the target.
    fn write_value(&mut self, address: u64, ty: VarType, value: f64) -> Result<(), VarScopeError>;
}

/// Resolves variable names to target addresses, e.g. from an ELF symbol table.
pub trait SymbolResolver {
    /// Address for `name`, or `None` if the symbol is unknown.
    fn address_of(&self, name: &str) -> Option<u64>;
}

/// Update every variable's address from the resolver. Unresolvable symbols
/// keep their previous address.
pub fn resolve_addresses(registry: &mut VariableRegistry, resolver: &dyn SymbolResolver) {
    for var in registry.iter_mut() {
        match resolver.address_of(&var.name) {
            Some(addr) => var.address = addr,
            None => log::debug!("no symbol for variable '{}', keeping address {:#x}", var.name, var.address),
        }
    }
}
