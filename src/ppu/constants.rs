// PPU constants (NTSC timing)

/// PPU register select mask; the eight registers mirror through $2000-$3FFF
pub(super) const PPU_REGISTER_MASK: u16 = 0x0007;

/// One nametable (32x30 tiles + attribute table)
pub(super) const NAMETABLE_SIZE: usize = 1024;

/// Palette RAM size
pub(super) const PALETTE_SIZE: usize = 32;

/// Output resolution
pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;

/// PPU cycles per scanline
pub(super) const CYCLES_PER_SCANLINE: u16 = 341;

/// Scanline numbering: -1 is the pre-render line
pub(super) const PRERENDER_SCANLINE: i16 = -1;
pub(super) const LAST_VISIBLE_SCANLINE: i16 = 239;
pub(super) const POSTRENDER_SCANLINE: i16 = 240;
pub(super) const FIRST_VBLANK_SCANLINE: i16 = 241;
pub(super) const LAST_VBLANK_SCANLINE: i16 = 260;
