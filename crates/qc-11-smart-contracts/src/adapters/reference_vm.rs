//! Reference VM: a deterministic stand-in for the real contract engine.
//! Since the VM's opcode semantics are out of scope (spec §1), this
//! adapter only honors the snapshot/gas calling convention the executor
//! depends on — deploy persists code and charges a flat create cost plus
//! a per-byte price, call requires code to already exist and charges a
//! flat invocation cost. Swapping in a real interpreter means replacing
//! this file; the `ContractVm` port stays the same.

use crate::domain::entities::ContractOutcome;
use crate::domain::errors::ContractError;
use crate::ports::inbound::ContractVm;
use qc_04_state_management::AccountDB;
use shared_types::Address;

/// Mirrors `CodeBytePrice` in spec §6, applied to deployed bytecode size.
const CODE_BYTE_PRICE_NUM: u64 = 3814697265625;
const CODE_BYTE_PRICE_DEN: u64 = 10_000_000_000_000;
const CREATE_BASE_GAS: u64 = 32_000;
const CALL_BASE_GAS: u64 = 700;

#[derive(Default)]
pub struct ReferenceVm;

impl ReferenceVm {
    pub fn new() -> Self {
        Self
    }
}

fn code_deploy_cost(code_len: usize) -> u64 {
    CREATE_BASE_GAS + (code_len as u64 * CODE_BYTE_PRICE_NUM) / CODE_BYTE_PRICE_DEN
}

impl ContractVm for ReferenceVm {
    fn deploy(&self, db: &mut dyn AccountDB, contract_addr: &Address, code: &[u8], gas_limit: u64) -> Result<ContractOutcome, ContractError> {
        if db.exists(contract_addr) && db.get_code_hash(contract_addr) != [0u8; 32] {
            return Err(ContractError::ContractAddressConflict);
        }
        let cost = code_deploy_cost(code.len());
        if gas_limit < cost {
            return Err(ContractError::DeployGasNotEnough);
        }
        db.set_code(contract_addr, code.to_vec());
        Ok(ContractOutcome {
            success: true,
            gas_used: cost,
            logs: Vec::new(),
            contract_address: Some(*contract_addr),
        })
    }

    fn call(&self, db: &mut dyn AccountDB, target: &Address, _data: &[u8], gas_limit: u64) -> Result<ContractOutcome, ContractError> {
        if db.get_code_hash(target) == [0u8; 32] {
            return Err(ContractError::NoCode);
        }
        if gas_limit < CALL_BASE_GAS {
            return Err(ContractError::TvmGasNotEnough);
        }
        Ok(ContractOutcome {
            success: true,
            gas_used: CALL_BASE_GAS,
            logs: Vec::new(),
            contract_address: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_04_state_management::InMemoryAccountDb;

    #[test]
    fn deploy_then_call_round_trips() {
        let mut db = InMemoryAccountDb::new();
        let vm = ReferenceVm::new();
        let addr = Address([5u8; 32]);

        let outcome = vm.deploy(&mut db, &addr, &[0xde, 0xad, 0xbe, 0xef], 100_000).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.contract_address, Some(addr));

        let call = vm.call(&mut db, &addr, &[], 10_000).unwrap();
        assert!(call.success);
    }

    #[test]
    fn call_without_code_is_rejected() {
        let mut db = InMemoryAccountDb::new();
        let vm = ReferenceVm::new();
        let addr = Address([6u8; 32]);
        assert_eq!(vm.call(&mut db, &addr, &[], 10_000).unwrap_err(), ContractError::NoCode);
    }

    #[test]
    fn deploy_insufficient_gas_is_rejected() {
        let mut db = InMemoryAccountDb::new();
        let vm = ReferenceVm::new();
        let addr = Address([7u8; 32]);
        assert_eq!(vm.deploy(&mut db, &addr, &[1, 2, 3], 10).unwrap_err(), ContractError::DeployGasNotEnough);
    }
}
