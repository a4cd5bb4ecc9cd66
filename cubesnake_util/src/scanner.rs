use fugit::MillisDurationU32;

use crate::field::{LayerMask, VoxelField};
use crate::SIZE;

pub const NUM_PORTS: usize = 4;
const PORT_WIDTH: usize = u8::BITS as usize;

/// One word per output port, in port order A, B, C, D.
pub type PortWords = [u8; NUM_PORTS];

pub const BLANK: PortWords = [0; NUM_PORTS];

pub const LAYER_DWELL: MillisDurationU32 = MillisDurationU32::from_ticks(3);
pub const FRAMES_PER_TICK: u8 = 10;
pub const LAYER_ORDER: [u8; SIZE] = [0, 2, 4, 1, 3];

/// What drives a single port bit.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Line {
    /// Cathode of column `(x, y)` in the strobed layer.
    Cell(u8, u8),
    /// Anode strobe of layer `z`.
    Layer(u8),
    Unused,
}

use Line::{Cell, Layer, Unused};

/// Board wiring, least significant bit first.
#[rustfmt::skip]
pub const WIRING: [[Line; PORT_WIDTH]; NUM_PORTS] = [
    [Cell(0, 3), Cell(0, 1), Cell(0, 4), Cell(1, 3), Cell(1, 2), Cell(1, 1), Cell(1, 0), Cell(2, 0)],
    [Cell(1, 4), Cell(0, 2), Cell(0, 0), Layer(1), Layer(4), Layer(0), Unused, Unused],
    [Cell(4, 4), Cell(3, 4), Cell(3, 2), Cell(3, 0), Cell(2, 4), Cell(2, 3), Cell(2, 2), Cell(2, 1)],
    [Layer(3), Layer(2), Cell(3, 1), Cell(3, 3), Cell(4, 2), Cell(4, 1), Cell(4, 0), Cell(4, 3)],
];

/// Packs the lit cells of layer `z` and its strobe into port words.
pub fn encode_layer(mask: LayerMask, z: u8) -> PortWords {
    let mut words = BLANK;

    for (word, lines) in words.iter_mut().zip(WIRING.iter()) {
        for (bit, line) in lines.iter().enumerate() {
            let on = match *line {
                Cell(x, y) => mask.contains(x, y),
                Layer(k) => k == z,
                Unused => false,
            };
            if on {
                *word |= 1 << bit;
            }
        }
    }

    words
}

/// Where port words end up: output registers on the board, a recorder in tests.
pub trait PortSink {
    fn write(&mut self, words: PortWords);

    /// Keeps the last written words on the ports for `dwell`.
    fn hold(&mut self, dwell: MillisDurationU32);
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ScanConfig {
    pub dwell: MillisDurationU32,
    pub frames_per_tick: u8,
    pub layer_order: [u8; SIZE],
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            dwell: LAYER_DWELL,
            frames_per_tick: FRAMES_PER_TICK,
            layer_order: LAYER_ORDER,
        }
    }
}

/// Multiplexes a [`VoxelField`] onto the ports one layer at a time.
#[derive(Clone, Debug, Default)]
pub struct DisplayScanner {
    config: ScanConfig,
}

impl DisplayScanner {
    pub fn new(config: ScanConfig) -> Self {
        DisplayScanner { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Drives layer `z` for one dwell period, then blanks the ports so that
    /// only one layer is ever lit.
    pub fn render_layer<S: PortSink + ?Sized>(&self, sink: &mut S, field: &VoxelField, z: u8) {
        debug_assert!((z as usize) < SIZE);

        sink.write(encode_layer(field.layer(z), z));
        sink.hold(self.config.dwell);
        sink.write(BLANK);
    }

    /// Scans every layer once, interlaced.
    pub fn render_frame<S: PortSink + ?Sized>(&self, sink: &mut S, field: &VoxelField) {
        for &z in self.config.layer_order.iter() {
            self.render_layer(sink, field, z);
        }
    }

    /// Shows `field` for one simulation tick's worth of frames.
    pub fn refresh<S: PortSink + ?Sized>(&self, sink: &mut S, field: &VoxelField) {
        for _ in 0..self.config.frames_per_tick {
            self.render_frame(sink, field);
        }
    }

    /// How long one call to [`DisplayScanner::refresh`] keeps the ports busy.
    pub fn tick_duration(&self) -> MillisDurationU32 {
        let layers = self.config.frames_per_tick as u32 * self.config.layer_order.len() as u32;
        MillisDurationU32::from_ticks(self.config.dwell.ticks() * layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Line::{Cell, Layer, Unused};
    use crate::position::Position;

    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    enum Event {
        Write(PortWords),
        Hold(u32),
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl PortSink for Recorder {
        fn write(&mut self, words: PortWords) {
            self.0.push(Event::Write(words));
        }

        fn hold(&mut self, dwell: MillisDurationU32) {
            self.0.push(Event::Hold(dwell.ticks()));
        }
    }

    fn full_layer() -> LayerMask {
        let mut mask = LayerMask::default();
        for x in 0..5 {
            for y in 0..5 {
                mask.insert(x, y);
            }
        }
        mask
    }

    #[test]
    fn wiring_uses_every_line_once() {
        let mut cells = [[0; SIZE]; SIZE];
        let mut layers = [0; SIZE];
        let mut unused = 0;

        for line in WIRING.iter().flatten() {
            match *line {
                Cell(x, y) => cells[x as usize][y as usize] += 1,
                Layer(z) => layers[z as usize] += 1,
                Unused => unused += 1,
            }
        }

        assert!(cells.iter().flatten().all(|&n| n == 1));
        assert!(layers.iter().all(|&n| n == 1));
        assert_eq!(unused, 2);
    }

    #[test]
    fn dark_layers_only_strobe() {
        let dark = LayerMask::default();
        assert_eq!(encode_layer(dark, 0), [0x00, 0x20, 0x00, 0x00]);
        assert_eq!(encode_layer(dark, 1), [0x00, 0x08, 0x00, 0x00]);
        assert_eq!(encode_layer(dark, 2), [0x00, 0x00, 0x00, 0x02]);
        assert_eq!(encode_layer(dark, 3), [0x00, 0x00, 0x00, 0x01]);
        assert_eq!(encode_layer(dark, 4), [0x00, 0x10, 0x00, 0x00]);
    }

    #[test]
    fn full_layer_sets_every_cathode() {
        assert_eq!(encode_layer(full_layer(), 2), [0xFF, 0x07, 0xFF, 0xFE]);
        assert_eq!(encode_layer(full_layer(), 4), [0xFF, 0x17, 0xFF, 0xFC]);
    }

    #[test]
    fn single_cells_land_on_their_bits() {
        let mut mask = LayerMask::default();
        mask.insert(0, 0);
        assert_eq!(encode_layer(mask, 0), [0x00, 0x24, 0x00, 0x00]);

        let mut mask = LayerMask::default();
        mask.insert(2, 0);
        mask.insert(4, 3);
        assert_eq!(encode_layer(mask, 3), [0x80, 0x00, 0x00, 0x81]);

        let mut mask = LayerMask::default();
        mask.insert(4, 4);
        assert_eq!(encode_layer(mask, 1), [0x00, 0x08, 0x01, 0x00]);
    }

    #[test]
    fn render_layer_writes_holds_and_blanks() {
        let mut field = VoxelField::new();
        field.set_age(Position::new(0, 3, 1), 4);
        let scanner = DisplayScanner::default();

        let mut first = Recorder::default();
        scanner.render_layer(&mut first, &field, 1);
        let mut second = Recorder::default();
        scanner.render_layer(&mut second, &field, 1);

        assert_eq!(
            first.0,
            [
                Event::Write([0x01, 0x08, 0x00, 0x00]),
                Event::Hold(3),
                Event::Write(BLANK),
            ]
        );
        assert_eq!(first.0, second.0);
    }

    #[test]
    fn frame_is_interlaced() {
        let field = VoxelField::new();
        let scanner = DisplayScanner::default();
        let mut recorder = Recorder::default();

        scanner.render_frame(&mut recorder, &field);

        let strobed: Vec<PortWords> = recorder
            .0
            .iter()
            .filter_map(|event| match event {
                Event::Write(words) if *words != BLANK => Some(*words),
                _ => None,
            })
            .collect();
        let expected: Vec<PortWords> = [0, 2, 4, 1, 3]
            .iter()
            .map(|&z| encode_layer(LayerMask::default(), z))
            .collect();
        assert_eq!(strobed, expected);
    }

    #[test]
    fn refresh_repeats_frames() {
        let field = VoxelField::new();
        let scanner = DisplayScanner::default();
        let mut recorder = Recorder::default();

        scanner.refresh(&mut recorder, &field);

        let holds: u32 = recorder
            .0
            .iter()
            .map(|event| match event {
                Event::Hold(ms) => *ms,
                Event::Write(_) => 0,
            })
            .sum();
        assert_eq!(recorder.0.len(), 10 * 5 * 3);
        assert_eq!(holds, 150);
        assert_eq!(scanner.tick_duration().ticks(), 150);
        assert_eq!(recorder.0.last(), Some(&Event::Write(BLANK)));
    }

    #[test]
    fn config_changes_timing() {
        let scanner = DisplayScanner::new(ScanConfig {
            dwell: MillisDurationU32::from_ticks(1),
            frames_per_tick: 2,
            ..ScanConfig::default()
        });
        let mut recorder = Recorder::default();

        scanner.refresh(&mut recorder, &VoxelField::new());

        assert_eq!(recorder.0.len(), 2 * 5 * 3);
        assert_eq!(recorder.0[1], Event::Hold(1));
        assert_eq!(scanner.tick_duration().ticks(), 10);
    }
}
