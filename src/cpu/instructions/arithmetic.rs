// Arithmetic instructions
//
// The 2A03 has no decimal mode: ADC and SBC are pure binary regardless of
// the D flag.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    /// ADC - Add with Carry: A = A + M + C. Flags: C, Z, V, N
    ///
    /// V is set when both operands share a sign and the result does not:
    /// `~(A^M) & (A^R) & $80`.
    pub fn adc(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.add_to_accumulator(value);
    }

    /// SBC - Subtract with Carry: A = A - M - (1-C), i.e. A + !M + C.
    /// Flags: C, Z, V, N
    pub fn sbc(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.add_to_accumulator(!value);
    }

    /// Shared ADC/SBC core: add `value` and the carry into A.
    pub(crate) fn add_to_accumulator(&mut self, value: u8) {
        let carry = self.get_carry() as u16;
        let sum = self.a as u16 + value as u16 + carry;

        let result = sum as u8;
        self.set_carry(sum > 0xFF);
        self.set_overflow((self.a ^ result) & (value ^ result) & 0x80 != 0);
        self.a = result;
        self.update_zero_and_negative_flags(result);
    }

    /// INC - Increment Memory. Flags: Z, N
    pub fn inc(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let result = bus.read(addr_result.address).wrapping_add(1);
        bus.write(addr_result.address, result);
        self.update_zero_and_negative_flags(result);
    }

    /// DEC - Decrement Memory. Flags: Z, N
    pub fn dec(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let result = bus.read(addr_result.address).wrapping_sub(1);
        bus.write(addr_result.address, result);
        self.update_zero_and_negative_flags(result);
    }

    /// INX - Increment X. Flags: Z, N
    pub fn inx(&mut self) {
        self.x = self.x.wrapping_add(1);
        self.update_zero_and_negative_flags(self.x);
    }

    /// INY - Increment Y. Flags: Z, N
    pub fn iny(&mut self) {
        self.y = self.y.wrapping_add(1);
        self.update_zero_and_negative_flags(self.y);
    }

    /// DEX - Decrement X. Flags: Z, N
    pub fn dex(&mut self) {
        self.x = self.x.wrapping_sub(1);
        self.update_zero_and_negative_flags(self.x);
    }

    /// DEY - Decrement Y. Flags: Z, N
    pub fn dey(&mut self) {
        self.y = self.y.wrapping_sub(1);
        self.update_zero_and_negative_flags(self.y);
    }
}
