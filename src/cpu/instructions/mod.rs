// Instruction implementations, grouped by family
//
// Every function takes the decoded `AddressingResult` and applies the
// instruction's effect. Branch-family functions return the extra cycles
// they consumed; everything else reports its full cost through the opcode
// table.

pub mod arithmetic;
pub mod branch;
pub mod compare;
pub mod flags;
pub mod jump_subroutine;
pub mod load_store;
pub mod logic;
pub mod miscellaneous;
pub mod shift_rotate;
pub mod stack;
pub mod transfer;
pub mod unofficial;

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;

impl crate::cpu::Cpu {
    /// Fetch the operand: inline value for immediate/accumulator modes,
    /// a bus read otherwise.
    #[inline]
    pub(crate) fn read_operand(&self, bus: &mut Bus, addr_result: &AddressingResult) -> u8 {
        if let Some(value) = addr_result.value {
            value
        } else {
            bus.read(addr_result.address)
        }
    }
}
