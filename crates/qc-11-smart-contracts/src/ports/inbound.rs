//! # Inbound Ports (Driving Ports / API)
//!
//! The snapshot/gas interface the transaction executor (qc-12) dispatches
//! `ContractCreate`/`ContractCall` through. Opcode-level VM semantics are
//! out of scope (spec §1); this crate only fixes the calling convention
//! and gas accounting the executor relies on.

use crate::domain::entities::ContractOutcome;
use crate::domain::errors::ContractError;
use qc_04_state_management::AccountDB;
use shared_types::Address;

pub trait ContractVm: Send + Sync {
    /// Deploys `code` at `contract_addr` (computed by the caller as
    /// `hash(source ‖ nonce)`), charging gas against `gas_limit`.
    fn deploy(&self, db: &mut dyn AccountDB, contract_addr: &Address, code: &[u8], gas_limit: u64) -> Result<ContractOutcome, ContractError>;

    /// Invokes the contract at `target` with `data`, charging gas against
    /// `gas_limit`. Returns `NoCode` if `target` has no deployed code.
    fn call(&self, db: &mut dyn AccountDB, target: &Address, data: &[u8], gas_limit: u64) -> Result<ContractOutcome, ContractError>;
}
