use cubesnake_util::{PortSink, PortWords, RandomSource};
use esp_hal::{
    clock::ClockControl,
    delay::Delay,
    gpio::{self, GpioPin, Io, Level, Output},
    peripherals::{Peripherals, SPI2},
    prelude::*,
    rng::Rng,
    spi::{master::Spi, FullDuplexMode, SpiMode},
    system::SystemControl,
};
use fugit::MillisDurationU32;

const TX_RATE: u32 = 40; // MHz

/// Four chained 74HC595s standing in for ports A-D. Port D sits at the far
/// end of the chain, so it is shifted out first.
pub struct Device<'a> {
    spi: Spi<'a, SPI2, FullDuplexMode>,
    latch: Output<'a, GpioPin<4>>,
    _enable: Output<'a, GpioPin<1>>,
    delay: Delay,
}

/// The on-chip RNG; needs no seed.
pub struct HardwareRng(Rng);

impl RandomSource for HardwareRng {
    fn next_u32(&mut self) -> u32 {
        self.0.random()
    }
}

pub fn init() -> (Device<'static>, HardwareRng) {
    let peripherals = Peripherals::take();
    let system = SystemControl::new(peripherals.SYSTEM);
    let clocks = ClockControl::max(system.clock_control).freeze();

    let io = Io::new(peripherals.GPIO, peripherals.IO_MUX);
    let mut lak = Output::new(io.pins.gpio4, Level::Low);
    let mut en = Output::new(io.pins.gpio1, Level::Low);
    lak.set_high();
    en.set_low();

    let clk = io.pins.gpio3;
    let da = io.pins.gpio2;

    let spi = Spi::new(peripherals.SPI2, TX_RATE.MHz(), SpiMode::Mode0, &clocks).with_pins(Some(clk), Some(da), gpio::NO_PIN, gpio::NO_PIN);

    let delay = Delay::new(&clocks);
    let rng = Rng::new(peripherals.RNG);

    let mut device = Device {
        spi,
        latch: lak,
        _enable: en,
        delay,
    };

    // Registers power up with random contents.
    transmit([0; 4], &mut device);
    log::info!("Ports ready, SPI at {} MHz", TX_RATE);

    (device, HardwareRng(rng))
}

fn transmit(words: PortWords, device: &mut Device) {
    let [a, b, c, d] = words;
    let packet = [d, c, b, a];

    device.latch.set_low();
    let _ = Spi::write_bytes(&mut device.spi, &packet);
    device.latch.set_high();
}

impl PortSink for Device<'_> {
    fn write(&mut self, words: PortWords) {
        transmit(words, self);
    }

    fn hold(&mut self, dwell: MillisDurationU32) {
        self.delay.delay_millis(dwell.ticks());
    }
}
