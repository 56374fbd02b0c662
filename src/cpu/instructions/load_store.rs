// Load and store instructions

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    /// LDA - Load Accumulator. Flags: Z, N
    pub fn lda(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.a = value;
        self.update_zero_and_negative_flags(value);
    }

    /// LDX - Load X Register. Flags: Z, N
    pub fn ldx(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.x = value;
        self.update_zero_and_negative_flags(value);
    }

    /// LDY - Load Y Register. Flags: Z, N
    pub fn ldy(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.y = value;
        self.update_zero_and_negative_flags(value);
    }

    /// STA - Store Accumulator. No flags.
    pub fn sta(&self, bus: &mut Bus, addr_result: &AddressingResult) {
        bus.write(addr_result.address, self.a);
    }

    /// STX - Store X Register. No flags.
    pub fn stx(&self, bus: &mut Bus, addr_result: &AddressingResult) {
        bus.write(addr_result.address, self.x);
    }

    /// STY - Store Y Register. No flags.
    pub fn sty(&self, bus: &mut Bus, addr_result: &AddressingResult) {
        bus.write(addr_result.address, self.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lda_sets_zero_flag() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.lda(&mut bus, &AddressingResult::immediate(0x00));
        assert_eq!(cpu.a, 0);
        assert!(cpu.get_zero());
        assert!(!cpu.get_negative());
    }

    #[test]
    fn test_lda_sets_negative_flag() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.lda(&mut bus, &AddressingResult::immediate(0x80));
        assert!(cpu.get_negative());
        assert!(!cpu.get_zero());
    }

    #[test]
    fn test_store_and_load_memory() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.a = 0x42;
        cpu.sta(&mut bus, &AddressingResult::new(0x0010));
        assert_eq!(bus.read(0x0010), 0x42);

        cpu.ldx(&mut bus, &AddressingResult::new(0x0010));
        assert_eq!(cpu.x, 0x42);
    }
}
