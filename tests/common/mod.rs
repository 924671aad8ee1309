//! Shared test doubles: an in-memory target and a map-backed symbol resolver.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use varscope::{SymbolResolver, TargetSource, VarScopeError, VarType};

/// Target memory shared between the test and the source handed to the
/// handler, so tests can mutate cells and observe write-backs.
#[derive(Clone, Default)]
pub struct SharedMem(pub Arc<Mutex<HashMap<u64, f64>>>);

impl SharedMem {
    pub fn set(&self, address: u64, value: f64) {
        self.0.lock().unwrap().insert(address, value);
    }

    pub fn get(&self, address: u64) -> Option<f64> {
        self.0.lock().unwrap().get(&address).copied()
    }
}

/// Test double for the device connection: reads and writes `SharedMem`
/// cells, with an optional set of addresses that always fail to read.
pub struct MemorySource {
    pub mem: SharedMem,
    pub fail_reads: HashSet<u64>,
}

impl MemorySource {
    pub fn new(mem: SharedMem) -> Self {
        Self {
            mem,
            fail_reads: HashSet::new(),
        }
    }
}

impl TargetSource for MemorySource {
    fn read_value(&mut self, address: u64, _ty: VarType) -> Result<f64, VarScopeError> {
        if self.fail_reads.contains(&address) {
            return Err(VarScopeError::TargetRead { address });
        }
        self.mem
            .get(address)
            .ok_or(VarScopeError::TargetRead { address })
    }

    fn write_value(&mut self, address: u64, _ty: VarType, value: f64) -> Result<(), VarScopeError> {
        self.mem.set(address, value);
        Ok(())
    }
}

/// Symbol resolver backed by a plain name → address map.
pub struct MapResolver(pub HashMap<String, u64>);

impl SymbolResolver for MapResolver {
    fn address_of(&self, name: &str) -> Option<u64> {
        self.0.get(name).copied()
    }
}
