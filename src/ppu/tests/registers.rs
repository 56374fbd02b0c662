// Register behavior: loopy write sequences, status side effects, OAM port

use super::*;

#[test]
fn test_ctrl_write_sets_nametable_bits_in_t() {
    let mut ppu = Ppu::new();
    ppu.write_register(0, 0x03);
    assert_eq!(ppu.t & 0x0C00, 0x0C00);

    ppu.write_register(0, 0x00);
    assert_eq!(ppu.t & 0x0C00, 0x0000);
}

#[test]
fn test_status_read_clears_vblank_and_latch() {
    let mut ppu = Ppu::new();
    ppu.ppustatus = 0xE0;
    ppu.write_latch = true;

    let status = ppu.read_register(2);
    assert_eq!(status, 0xE0);
    assert_eq!(ppu.ppustatus & 0x80, 0, "vblank cleared by the read");
    assert!(!ppu.write_latch, "write toggle reset");
    assert_eq!(ppu.ppustatus & 0x60, 0x60, "sprite bits survive");
}

#[test]
fn test_write_toggle_parity() {
    let mut ppu = Ppu::new();
    assert!(!ppu.write_latch);

    // Any mix of $2005/$2006 writes flips the shared toggle
    ppu.write_register(5, 0x10);
    assert!(ppu.write_latch);
    ppu.write_register(6, 0x20);
    assert!(!ppu.write_latch);
    ppu.write_register(6, 0x00);
    assert!(ppu.write_latch);
    ppu.write_register(5, 0x00);
    assert!(!ppu.write_latch);
}

#[test]
fn test_scroll_writes_update_t_and_fine_x() {
    let mut ppu = Ppu::new();

    // First write: X = $7D -> coarse X 15, fine X 5
    ppu.write_register(5, 0x7D);
    assert_eq!(ppu.t & 0x001F, 15);
    assert_eq!(ppu.fine_x, 5);

    // Second write: Y = $5E -> coarse Y 11, fine Y 6
    ppu.write_register(5, 0x5E);
    assert_eq!((ppu.t >> 5) & 0x001F, 11);
    assert_eq!((ppu.t >> 12) & 0x07, 6);
}

#[test]
fn test_addr_writes_copy_t_to_v_on_second() {
    let mut ppu = Ppu::new();

    ppu.write_register(6, 0x21);
    assert_eq!(ppu.v, 0, "v unchanged after the first write");
    ppu.write_register(6, 0x08);
    assert_eq!(ppu.v, 0x2108);
    assert_eq!(ppu.t, 0x2108);
}

#[test]
fn test_addr_first_write_clamps_high_bits() {
    let mut ppu = Ppu::new();
    ppu.write_register(6, 0xFF); // only the low 6 bits land in t
    ppu.write_register(6, 0x00);
    assert_eq!(ppu.v, 0x3F00);
}

#[test]
fn test_data_read_is_buffered() {
    let mut ppu = ppu_with_chr_ram();

    // Write $55 to VRAM $2005 via the data port
    ppu.write_register(6, 0x20);
    ppu.write_register(6, 0x05);
    ppu.write_register(7, 0x55);

    // Point back and read: first read returns the stale buffer
    ppu.write_register(6, 0x20);
    ppu.write_register(6, 0x05);
    let first = ppu.read_register(7);
    let second = ppu.read_register(7);
    assert_ne!(first, 0x55, "first read returns the old buffer contents");
    assert_eq!(second, 0x55, "second read returns the real byte");
}

#[test]
fn test_palette_read_is_immediate() {
    let mut ppu = Ppu::new();
    ppu.palette_ram[1] = 0x2A;

    ppu.write_register(6, 0x3F);
    ppu.write_register(6, 0x01);
    assert_eq!(ppu.read_register(7), 0x2A, "palette reads skip the buffer");
}

#[test]
fn test_data_access_increments_by_ctrl_step() {
    let mut ppu = ppu_with_chr_ram();

    ppu.write_register(6, 0x20);
    ppu.write_register(6, 0x00);
    ppu.write_register(7, 0x00);
    assert_eq!(ppu.v, 0x2001, "+1 when CTRL bit 2 clear");

    ppu.write_register(0, 0x04);
    ppu.write_register(7, 0x00);
    assert_eq!(ppu.v, 0x2021, "+32 when CTRL bit 2 set");
}

#[test]
fn test_oam_port_roundtrip() {
    let mut ppu = Ppu::new();

    ppu.write_register(3, 0x10);
    ppu.write_register(4, 0xAB);
    assert_eq!(ppu.oam[0x10], 0xAB);
    assert_eq!(ppu.oam_addr, 0x11, "OAMDATA write post-increments");

    ppu.write_register(3, 0x10);
    assert_eq!(ppu.read_register(4), 0xAB);
    assert_eq!(ppu.oam_addr, 0x11, "OAMDATA read post-increments too");
}

#[test]
fn test_oam_sequential_read_covers_all_of_oam() {
    let mut ppu = Ppu::new();
    for i in 0..=255u16 {
        ppu.oam[i as usize] = i as u8;
    }

    // 256 reads from a written start address walk the whole table in order
    ppu.write_register(3, 0x40);
    for i in 0..=255u16 {
        let expected = ((0x40 + i) & 0xFF) as u8;
        assert_eq!(ppu.read_register(4), expected);
    }
}

#[test]
fn test_nmi_enable_during_vblank_fires_immediately() {
    let mut ppu = Ppu::new();
    ppu.ppustatus = 0x80;
    ppu.write_register(0, 0x80);
    assert!(ppu.nmi_pending(), "enabling NMI mid-vblank raises it");

    // Disabling cancels a pending edge
    ppu.write_register(0, 0x00);
    assert!(!ppu.nmi_pending());
}
