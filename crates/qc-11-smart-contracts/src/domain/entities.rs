//! Outcome types the executor (qc-12) dispatches on. Only the
//! snapshot/gas interface of the VM is specified here — opcode semantics
//! are an external collaborator.

use shared_types::Address;

#[derive(Debug, Clone)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<[u8; 32]>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ContractOutcome {
    pub success: bool,
    pub gas_used: u64,
    pub logs: Vec<Log>,
    pub contract_address: Option<Address>,
}

impl ContractOutcome {
    pub fn failed(gas_used: u64) -> Self {
        Self { success: false, gas_used, logs: Vec::new(), contract_address: None }
    }
}
