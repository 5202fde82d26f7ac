//! Laser tunnel sound firmware
//!
//! Drives a YX5200/YX5300 serial audio module from an RP2040. The module
//! sits on UART0 (GPIO0 TX, GPIO1 RX) and reports playback on its BUSY
//! line (GPIO2, active low).

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tunnel_core::config::AudioConfig;

mod clock;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Laser tunnel sound firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let audio_config = AudioConfig::default();

    // Setup UART for the audio module (8N1)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = audio_config.baudrate;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    info!("UART initialized at {} baud", audio_config.baudrate);

    // BUSY is open drain on some boards
    let busy = Input::new(p.PIN_2, Pull::Up);

    spawner
        .spawn(tasks::sound_task(uart, busy, audio_config))
        .unwrap();

    info!("All tasks spawned, firmware running");
}
