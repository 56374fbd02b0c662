// End-to-end CPU scenarios run through the bus, plus the published
// round-trip laws

use famicore::cpu::flags;
use famicore::{Bus, Cpu};

/// Load a program into the open cartridge window and reset into it.
fn boot(program: &[u8], origin: u16) -> (Cpu, Bus) {
    let mut cpu = Cpu::new();
    let mut bus = Bus::new();
    for (i, &byte) in program.iter().enumerate() {
        bus.write(origin.wrapping_add(i as u16), byte);
    }
    bus.write_u16(0xFFFC, origin);
    cpu.reset(&mut bus);
    (cpu, bus)
}

#[test]
fn lda_immediate_sets_n_and_z() {
    // LDA #$00; BRK
    let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0x00], 0x8000);
    bus.write_u16(0xFFFE, 0xA123);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 2, "LDA immediate is 2 cycles");
    assert_eq!(cpu.a, 0);
    assert!(cpu.get_zero());
    assert!(!cpu.get_negative());

    cpu.step(&mut bus);
    assert_eq!(cpu.pc, 0xA123, "BRK vectors through $FFFE");
}

#[test]
fn adc_overflow_scenario() {
    // CLC; LDA #$50; ADC #$50
    let (mut cpu, mut bus) = boot(&[0x18, 0xA9, 0x50, 0x69, 0x50], 0x8000);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    cpu.step(&mut bus);

    assert_eq!(cpu.a, 0xA0);
    assert!(!cpu.get_carry());
    assert!(cpu.get_overflow(), "positive + positive -> negative sets V");
    assert!(cpu.get_negative());
    assert!(!cpu.get_zero());
}

#[test]
fn branch_page_cross_costs_four_cycles() {
    // LDA #$00; CMP #$00; BEQ +$7F at $80F0: the taken branch crosses
    // from page $80 into page $81
    let (mut cpu, mut bus) = boot(&[0xA9, 0x00, 0xC9, 0x00, 0xF0, 0x7F], 0x80F0);

    cpu.step(&mut bus); // LDA
    cpu.step(&mut bus); // CMP: equal -> Z set, C set
    assert!(cpu.get_zero());

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, 4, "2 base + 1 taken + 1 page cross");
    assert_eq!(cpu.pc, 0x80F6 + 0x7F);
}

#[test]
fn php_plp_preserves_flags_except_b_and_u() {
    // SEC; SED; PHP; CLC; CLD; PLP
    let (mut cpu, mut bus) = boot(&[0x38, 0xF8, 0x08, 0x18, 0xD8, 0x28], 0x8000);

    for _ in 0..6 {
        cpu.step(&mut bus);
    }
    assert!(cpu.get_flag(flags::CARRY), "C restored by PLP");
    assert!(cpu.get_flag(flags::DECIMAL), "D restored by PLP");
    assert!(!cpu.get_flag(flags::BREAK), "B forced clear");
    assert!(cpu.get_flag(flags::UNUSED), "bit 5 forced set");
}

#[test]
fn jsr_rts_returns_past_the_operand() {
    // $8000: JSR $8010; NOP       $8010: RTS
    let (mut cpu, mut bus) = boot(&[0x20, 0x10, 0x80], 0x8000);
    bus.write(0x8010, 0x60);

    cpu.step(&mut bus);
    assert_eq!(cpu.pc, 0x8010);

    cpu.step(&mut bus);
    assert_eq!(cpu.pc, 0x8003, "RTS lands one past the JSR operand bytes");
}

#[test]
fn jmp_indirect_page_wrap_bug() {
    // JMP ($02FF): low byte from $02FF, high byte from $0200 (not $0300)
    let (mut cpu, mut bus) = boot(&[0x6C, 0xFF, 0x02], 0x8000);
    bus.write(0x02FF, 0x34);
    bus.write(0x0200, 0x12);
    bus.write(0x0300, 0x56);

    cpu.step(&mut bus);
    assert_eq!(cpu.pc, 0x1234, "the page-wrap bug reads $0200 for the high byte");
}

#[test]
fn interrupt_masking_follows_i_flag() {
    // SEI; NOP...: IRQ is refused, NMI is not
    let (mut cpu, mut bus) = boot(&[0x78, 0xEA, 0xEA], 0x8000);
    bus.write_u16(0xFFFE, 0x9000);
    bus.write_u16(0xFFFA, 0xA000);

    cpu.step(&mut bus); // SEI
    assert_eq!(cpu.irq(&mut bus), 0, "IRQ masked by I");
    assert_eq!(cpu.nmi(&mut bus), 7, "NMI is never masked");
    assert_eq!(cpu.pc, 0xA000);
}

#[test]
fn published_cycle_counts_for_common_opcodes() {
    // (opcode bytes, expected cycles) with any setup done via registers
    let cases: &[(&[u8], u8)] = &[
        (&[0xEA], 2),             // NOP
        (&[0xA9, 0x10], 2),       // LDA #imm
        (&[0xA5, 0x10], 3),       // LDA zp
        (&[0xB5, 0x10], 4),       // LDA zp,X
        (&[0xAD, 0x10, 0x02], 4), // LDA abs
        (&[0x85, 0x10], 3),       // STA zp
        (&[0x8D, 0x10, 0x02], 4), // STA abs
        (&[0xE6, 0x10], 5),       // INC zp
        (&[0xEE, 0x10, 0x02], 6), // INC abs
        (&[0x48], 3),             // PHA
        (&[0x68], 4),             // PLA
        (&[0x20, 0x00, 0x90], 6), // JSR
        (&[0x4C, 0x00, 0x90], 3), // JMP abs
        (&[0x6C, 0x00, 0x02], 5), // JMP (ind)
        (&[0xA1, 0x10], 6),       // LDA (zp,X)
        (&[0xB1, 0x10], 5),       // LDA (zp),Y no cross
    ];

    for (program, expected) in cases {
        let (mut cpu, mut bus) = boot(program, 0x8000);
        let cycles = cpu.step(&mut bus);
        assert_eq!(
            cycles, *expected,
            "cycle count for opcode {:02X}",
            program[0]
        );
    }
}

#[test]
fn undocumented_lax_and_sax_cooperate() {
    // LAX $10; SAX $11
    let (mut cpu, mut bus) = boot(&[0xA7, 0x10, 0x87, 0x11], 0x8000);
    bus.write(0x0010, 0xF0);

    cpu.step(&mut bus);
    assert_eq!(cpu.a, 0xF0);
    assert_eq!(cpu.x, 0xF0);

    cpu.step(&mut bus);
    assert_eq!(bus.read(0x0011), 0xF0, "A & X stored");
}

#[test]
fn jam_opcode_loops_forever() {
    let (mut cpu, mut bus) = boot(&[0x02], 0x8000);
    for _ in 0..10 {
        let cycles = cpu.step(&mut bus);
        assert_eq!(cycles, 2);
        assert_eq!(cpu.pc, 0x8000, "KIL pins PC to the jam opcode");
    }
}
