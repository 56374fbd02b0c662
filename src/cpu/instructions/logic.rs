// Bitwise logic instructions

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    /// AND - Bitwise AND with accumulator. Flags: Z, N
    pub fn and(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        self.a &= self.read_operand(bus, addr_result);
        self.update_zero_and_negative_flags(self.a);
    }

    /// ORA - Bitwise OR with accumulator. Flags: Z, N
    pub fn ora(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        self.a |= self.read_operand(bus, addr_result);
        self.update_zero_and_negative_flags(self.a);
    }

    /// EOR - Bitwise exclusive OR with accumulator. Flags: Z, N
    pub fn eor(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        self.a ^= self.read_operand(bus, addr_result);
        self.update_zero_and_negative_flags(self.a);
    }

    /// BIT - Bit Test. Z from A & M; N and V copied from operand bits 7/6.
    pub fn bit(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.set_zero(self.a & value == 0);
        self.set_negative(value & 0x80 != 0);
        self.set_overflow(value & 0x40 != 0);
    }
}
