// Shift and rotate instructions
//
// Each comes in an accumulator form and a read-modify-write memory form;
// the shifted-out bit always lands in C.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    /// ASL - Arithmetic Shift Left. Flags: C, Z, N
    pub fn asl(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) {
        if accumulator {
            self.set_carry(self.a & 0x80 != 0);
            self.a <<= 1;
            self.update_zero_and_negative_flags(self.a);
        } else {
            let value = bus.read(addr_result.address);
            self.set_carry(value & 0x80 != 0);
            let result = value << 1;
            bus.write(addr_result.address, result);
            self.update_zero_and_negative_flags(result);
        }
    }

    /// LSR - Logical Shift Right. Flags: C, Z, N (N always clear)
    pub fn lsr(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) {
        if accumulator {
            self.set_carry(self.a & 0x01 != 0);
            self.a >>= 1;
            self.update_zero_and_negative_flags(self.a);
        } else {
            let value = bus.read(addr_result.address);
            self.set_carry(value & 0x01 != 0);
            let result = value >> 1;
            bus.write(addr_result.address, result);
            self.update_zero_and_negative_flags(result);
        }
    }

    /// ROL - Rotate Left through carry. Flags: C, Z, N
    pub fn rol(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) {
        let carry_in = self.get_carry() as u8;
        if accumulator {
            self.set_carry(self.a & 0x80 != 0);
            self.a = (self.a << 1) | carry_in;
            self.update_zero_and_negative_flags(self.a);
        } else {
            let value = bus.read(addr_result.address);
            self.set_carry(value & 0x80 != 0);
            let result = (value << 1) | carry_in;
            bus.write(addr_result.address, result);
            self.update_zero_and_negative_flags(result);
        }
    }

    /// ROR - Rotate Right through carry. Flags: C, Z, N
    pub fn ror(&mut self, bus: &mut Bus, addr_result: &AddressingResult, accumulator: bool) {
        let carry_in = (self.get_carry() as u8) << 7;
        if accumulator {
            self.set_carry(self.a & 0x01 != 0);
            self.a = (self.a >> 1) | carry_in;
            self.update_zero_and_negative_flags(self.a);
        } else {
            let value = bus.read(addr_result.address);
            self.set_carry(value & 0x01 != 0);
            let result = (value >> 1) | carry_in;
            bus.write(addr_result.address, result);
            self.update_zero_and_negative_flags(result);
        }
    }
}
