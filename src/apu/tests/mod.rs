// APU tests exercised through the register interface, grouped by concern


use super::Apu;

/// Run the APU for a number of CPU cycles.
pub(super) fn run(apu: &mut Apu, cycles: u32) {
    for _ in 0..cycles {
        apu.tick();
    }
}
