#![no_std]
#![no_main]

use cubesnake_util::{DisplayScanner, ScanConfig, VoxelField};
use esp_backtrace as _;
use esp_hal::entry;

mod driver;

#[entry]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    log::info!("Starting");

    let (mut device, mut rng) = driver::init();

    let mut field = VoxelField::new();
    let scanner = DisplayScanner::new(ScanConfig::default());
    log::info!("{} ms per tick", scanner.tick_duration().ticks());

    loop {
        field.tick(&mut rng);
        scanner.refresh(&mut device, &field);
    }
}
