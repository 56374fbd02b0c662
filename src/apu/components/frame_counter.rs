//! Frame sequencer
//!
//! Divides the CPU clock into quarter-frame and half-frame events for the
//! envelope, linear counter, length counter, and sweep units. Two modes:
//! 4-step (with a frame IRQ on the last step) and 5-step (no IRQ).
//!
//! A $4017 write does not land immediately: it applies 2 CPU cycles later
//! when written on an even cycle, 3 when written on an odd one. Entering
//! 5-step mode also clocks a quarter and half frame on the spot.

use crate::apu::constants::{FRAME_4_STEP_PERIOD, FRAME_5_STEP_PERIOD, FRAME_STEP_CYCLES};

/// Events the sequencer hands back to the APU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Clock envelopes and the triangle linear counter
    QuarterFrame,
    /// Additionally clock length counters and sweep units
    HalfFrame,
    /// Raise the frame IRQ flag (4-step mode, inhibit clear)
    SetIrq,
}

/// Sequencer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    FourStep,
    FiveStep,
}

#[derive(Debug, Clone)]
pub struct FrameCounter {
    mode: FrameMode,
    /// CPU cycles into the current sequence
    cycle: u32,
    irq_inhibit: bool,
    irq_pending: bool,
    /// A $4017 value waiting out its write delay
    pending_write: Option<(u8, u8)>,
}

impl FrameCounter {
    pub fn new() -> Self {
        FrameCounter {
            mode: FrameMode::FourStep,
            cycle: 0,
            irq_inhibit: false,
            irq_pending: false,
            pending_write: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Register a $4017 write. `even_cycle` is the parity of the CPU cycle
    /// the write landed on; it decides the 2-vs-3 cycle application delay.
    pub fn write_control(&mut self, value: u8, even_cycle: bool) {
        let delay = if even_cycle { 2 } else { 3 };
        self.pending_write = Some((value, delay));

        // The inhibit bit clears the IRQ flag immediately
        if value & 0x40 != 0 {
            self.irq_pending = false;
        }
    }

    /// Advance one CPU cycle; returns the events due this cycle.
    pub fn clock(&mut self) -> Vec<FrameEvent> {
        let mut events = Vec::new();

        if let Some((value, delay)) = self.pending_write {
            if delay == 0 {
                self.apply_write(value, &mut events);
                self.pending_write = None;
            } else {
                self.pending_write = Some((value, delay - 1));
            }
        }

        self.cycle += 1;

        match self.mode {
            FrameMode::FourStep => self.clock_4_step(&mut events),
            FrameMode::FiveStep => self.clock_5_step(&mut events),
        }

        events
    }

    /// The delayed effect of a $4017 write: reset the sequence, adopt the
    /// mode, and in 5-step mode clock a quarter+half frame immediately.
    fn apply_write(&mut self, value: u8, events: &mut Vec<FrameEvent>) {
        self.mode = if value & 0x80 != 0 {
            FrameMode::FiveStep
        } else {
            FrameMode::FourStep
        };
        self.irq_inhibit = value & 0x40 != 0;
        if self.irq_inhibit {
            self.irq_pending = false;
        }
        self.cycle = 0;

        if self.mode == FrameMode::FiveStep {
            events.push(FrameEvent::QuarterFrame);
            events.push(FrameEvent::HalfFrame);
        }
    }

    fn clock_4_step(&mut self, events: &mut Vec<FrameEvent>) {
        match self.cycle {
            c if c == FRAME_STEP_CYCLES[0] => events.push(FrameEvent::QuarterFrame),
            c if c == FRAME_STEP_CYCLES[1] => {
                events.push(FrameEvent::QuarterFrame);
                events.push(FrameEvent::HalfFrame);
            }
            c if c == FRAME_STEP_CYCLES[2] => events.push(FrameEvent::QuarterFrame),
            c if c == FRAME_STEP_CYCLES[3] => {
                events.push(FrameEvent::QuarterFrame);
                events.push(FrameEvent::HalfFrame);
                if !self.irq_inhibit {
                    self.irq_pending = true;
                    events.push(FrameEvent::SetIrq);
                }
            }
            _ => {}
        }

        if self.cycle >= FRAME_4_STEP_PERIOD {
            self.cycle = 0;
        }
    }

    fn clock_5_step(&mut self, events: &mut Vec<FrameEvent>) {
        match self.cycle {
            c if c == FRAME_STEP_CYCLES[0] => events.push(FrameEvent::QuarterFrame),
            c if c == FRAME_STEP_CYCLES[1] => {
                events.push(FrameEvent::QuarterFrame);
                events.push(FrameEvent::HalfFrame);
            }
            c if c == FRAME_STEP_CYCLES[2] => events.push(FrameEvent::QuarterFrame),
            // Step 4 (29829) is silent in 5-step mode
            c if c == FRAME_STEP_CYCLES[4] => {
                events.push(FrameEvent::QuarterFrame);
                events.push(FrameEvent::HalfFrame);
            }
            _ => {}
        }

        if self.cycle >= FRAME_5_STEP_PERIOD {
            self.cycle = 0;
        }
    }

    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    /// $4015 read side effect.
    pub fn clear_irq(&mut self) {
        self.irq_pending = false;
    }

    pub fn mode(&self) -> FrameMode {
        self.mode
    }

    pub fn irq_inhibited(&self) -> bool {
        self.irq_inhibit
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fc: &mut FrameCounter, cycles: u32) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        for _ in 0..cycles {
            events.extend(fc.clock());
        }
        events
    }

    #[test]
    fn test_4_step_sequence_positions() {
        let mut fc = FrameCounter::new();

        let events = run(&mut fc, 7457);
        assert!(events.contains(&FrameEvent::QuarterFrame));
        assert!(!events.contains(&FrameEvent::HalfFrame));

        let events = run(&mut fc, 14913 - 7457);
        assert!(events.contains(&FrameEvent::HalfFrame));

        let events = run(&mut fc, 22371 - 14913);
        assert!(events.contains(&FrameEvent::QuarterFrame));
        assert!(!events.contains(&FrameEvent::HalfFrame));

        let events = run(&mut fc, 29829 - 22371);
        assert!(events.contains(&FrameEvent::HalfFrame));
        assert!(events.contains(&FrameEvent::SetIrq));
        assert!(fc.irq_pending());
    }

    #[test]
    fn test_no_irq_before_29829() {
        let mut fc = FrameCounter::new();
        run(&mut fc, 29828);
        assert!(!fc.irq_pending(), "IRQ must not fire early");
        fc.clock();
        assert!(fc.irq_pending(), "IRQ lands exactly at 29829");
    }

    #[test]
    fn test_5_step_mode_has_no_irq() {
        let mut fc = FrameCounter::new();
        fc.write_control(0x80, true);
        let events = run(&mut fc, 40000);
        assert!(!events.contains(&FrameEvent::SetIrq));
        assert!(!fc.irq_pending());
    }

    #[test]
    fn test_5_step_write_clocks_immediately() {
        let mut fc = FrameCounter::new();
        fc.write_control(0x80, true);
        // The write applies after the 2-cycle delay and brings a
        // quarter+half clock with it
        let events = run(&mut fc, 3);
        assert!(events.contains(&FrameEvent::QuarterFrame));
        assert!(events.contains(&FrameEvent::HalfFrame));
    }

    #[test]
    fn test_write_delay_parity() {
        // Even-cycle write applies one cycle sooner than an odd-cycle one
        let mut even = FrameCounter::new();
        even.write_control(0x80, true);
        assert!(even.clock().is_empty());
        assert!(even.clock().is_empty());
        assert!(!even.clock().is_empty(), "applies on the third clock");

        let mut odd = FrameCounter::new();
        odd.write_control(0x80, false);
        assert!(odd.clock().is_empty());
        assert!(odd.clock().is_empty());
        assert!(odd.clock().is_empty());
        assert!(!odd.clock().is_empty(), "applies on the fourth clock");
    }

    #[test]
    fn test_inhibit_clears_and_blocks_irq() {
        let mut fc = FrameCounter::new();
        run(&mut fc, 29829);
        assert!(fc.irq_pending());

        fc.write_control(0x40, true);
        assert!(!fc.irq_pending(), "inhibit write clears the flag");

        run(&mut fc, 40000);
        assert!(!fc.irq_pending(), "and keeps it clear");
    }

    #[test]
    fn test_irq_clears_on_status_read() {
        let mut fc = FrameCounter::new();
        run(&mut fc, 29829);
        assert!(fc.irq_pending());
        fc.clear_irq();
        assert!(!fc.irq_pending());
    }
}
