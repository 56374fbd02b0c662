// Battery-backed PRG-RAM persistence
//
// The save file is a raw dump of the work RAM, named by the CRC32 of the
// PRG image so renamed ROM files keep their saves. Writes go through a
// temporary file and an atomic rename. I/O failures are logged and
// swallowed: a missing or unwritable save file degrades to zeroed RAM,
// never to a refused load.

use crate::cartridge::Cartridge;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Handle to one cartridge's save file
pub struct Battery {
    path: PathBuf,
}

impl Battery {
    /// Derive the save path for a cartridge in the default directory.
    pub fn for_cartridge(cartridge: &Cartridge) -> Self {
        Self::with_directory(Path::new("saves"), cartridge)
    }

    /// Derive the save path under an explicit directory.
    pub fn with_directory(directory: &Path, cartridge: &Cartridge) -> Self {
        Battery {
            path: directory.join(format!("{:08x}.sav", cartridge.prg_checksum())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore saved RAM contents into `ram`. Size mismatches and missing
    /// files leave the RAM zeroed.
    pub fn load_into(&self, ram: &mut [u8]) {
        match fs::read(&self.path) {
            Ok(data) => {
                let n = data.len().min(ram.len());
                ram[..n].copy_from_slice(&data[..n]);
                log::info!("restored {} bytes of battery RAM from {:?}", n, self.path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                log::warn!("battery load failed ({:?}): {}; using zeroed RAM", self.path, e);
            }
        }
    }

    /// Write RAM contents out atomically (temp file + rename).
    pub fn save(&self, ram: &[u8]) {
        if let Err(e) = self.try_save(ram) {
            log::warn!("battery save failed ({:?}): {}", self.path, e);
        }
    }

    fn try_save(&self, ram: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("sav.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(ram)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Mirroring;

    fn test_cartridge() -> Cartridge {
        Cartridge {
            prg_rom: vec![0x5A; 16 * 1024],
            chr_rom: vec![0; 8 * 1024],
            chr_is_ram: true,
            mapper: 1,
            mirroring: Mirroring::Horizontal,
            has_battery: true,
        }
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("famicore-battery-{}", tag));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = temp_dir("roundtrip");
        let battery = Battery::with_directory(&dir, &test_cartridge());

        let saved: Vec<u8> = (0..8192u32).map(|i| (i % 251) as u8).collect();
        battery.save(&saved);

        let mut restored = vec![0u8; 8192];
        battery.load_into(&mut restored);
        assert_eq!(saved, restored, "battery-load after battery-save is identity");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_leaves_ram_zeroed() {
        let dir = temp_dir("missing");
        let battery = Battery::with_directory(&dir, &test_cartridge());

        let mut ram = vec![0u8; 8192];
        battery.load_into(&mut ram);
        assert!(ram.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_path_derives_from_prg_checksum() {
        let dir = temp_dir("naming");
        let a = Battery::with_directory(&dir, &test_cartridge());
        let b = Battery::with_directory(&dir, &test_cartridge());
        assert_eq!(a.path(), b.path(), "same PRG image, same save file");

        let mut other = test_cartridge();
        other.prg_rom[0] = 0x00;
        let c = Battery::with_directory(&dir, &other);
        assert_ne!(a.path(), c.path());
    }
}
