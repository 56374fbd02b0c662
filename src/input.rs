// Input module - NES standard controller emulation
//
// Two controller ports live at $4016/$4017. Writing 1 then 0 to $4016
// latches the current button state into a shift register; each read of
// $4016/$4017 then returns one bit in the documented order (A, B, Select,
// Start, Up, Down, Left, Right) followed by 1s. While the strobe is held
// high the shift register keeps reloading, so reads repeatedly return the
// A button.

/// Snapshot of the eight buttons on a standard controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controller {
    pub button_a: bool,
    pub button_b: bool,
    pub select: bool,
    pub start: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button state by shift order index (0 = A ... 7 = Right).
    fn get_button(&self, index: u8) -> bool {
        match index {
            0 => self.button_a,
            1 => self.button_b,
            2 => self.select,
            3 => self.start,
            4 => self.up,
            5 => self.down,
            6 => self.left,
            7 => self.right,
            _ => false,
        }
    }

    /// Pack the buttons into the latch byte, bit 0 = A.
    fn as_bits(&self) -> u8 {
        (0..8).fold(0u8, |bits, i| bits | ((self.get_button(i) as u8) << i))
    }
}

/// The two controller ports and their shift registers
pub struct ControllerIO {
    controller1: Controller,
    controller2: Controller,
    /// Latched shift registers; bits shift out LSB first
    shift1: u8,
    shift2: u8,
    /// Number of bits already shifted out of each register
    index1: u8,
    index2: u8,
    /// While high, the shift registers continuously reload
    strobe: bool,
}

impl ControllerIO {
    pub fn new() -> Self {
        ControllerIO {
            controller1: Controller::new(),
            controller2: Controller::new(),
            shift1: 0,
            shift2: 0,
            index1: 0,
            index2: 0,
            strobe: false,
        }
    }

    /// Update the live button state for port 1 (from the host layer).
    pub fn set_controller1(&mut self, state: Controller) {
        self.controller1 = state;
        if self.strobe {
            self.reload();
        }
    }

    /// Update the live button state for port 2.
    pub fn set_controller2(&mut self, state: Controller) {
        self.controller2 = state;
        if self.strobe {
            self.reload();
        }
    }

    fn reload(&mut self) {
        self.shift1 = self.controller1.as_bits();
        self.shift2 = self.controller2.as_bits();
        self.index1 = 0;
        self.index2 = 0;
    }

    /// $4016 write: bit 0 is the strobe. The 1 -> 0 transition freezes the
    /// latched state for shifting.
    pub fn write_strobe(&mut self, value: u8) {
        let strobe = value & 1 != 0;
        if strobe {
            self.reload();
        }
        self.strobe = strobe;
    }

    /// $4016 read: next bit of controller 1.
    pub fn read_controller1(&mut self) -> u8 {
        if self.strobe {
            // Continuous reload: always the A button
            return self.controller1.button_a as u8;
        }
        if self.index1 >= 8 {
            // Official controllers return 1 after the eighth read
            return 1;
        }
        let bit = (self.shift1 >> self.index1) & 1;
        self.index1 += 1;
        bit
    }

    /// $4017 read: next bit of controller 2.
    pub fn read_controller2(&mut self) -> u8 {
        if self.strobe {
            return self.controller2.button_a as u8;
        }
        if self.index2 >= 8 {
            return 1;
        }
        let bit = (self.shift2 >> self.index2) & 1;
        self.index2 += 1;
        bit
    }
}

impl Default for ControllerIO {
    fn default() -> Self {
        Self::new()
    }
}
