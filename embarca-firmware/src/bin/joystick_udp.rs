//! Joystick position and compass direction sent over UDP
//!
//! Every 500 ms: `X:2048,Y:4095,Direcao:Norte` to the configured server.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::Pull;
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use embarca_core::joystick::Direction;
use embarca_core::payload;
use embarca_firmware::config::udp;
use embarca_firmware::udp::{UdpBuffers, UdpSender};
use embarca_firmware::wifi::{self, WifiPeripherals};
use embarca_firmware::{halt, Irqs};
use embarca_hal_rp2040::adc::AdcInput;
use embarca_hal_rp2040::AdcReader;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("joystick-udp starting");
    let p = embassy_rp::init(Default::default());

    let mut adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let mut x_axis = Channel::new_pin(p.PIN_26, Pull::None);
    let mut y_axis = Channel::new_pin(p.PIN_27, Pull::None);

    let radio = WifiPeripherals {
        pwr: p.PIN_23,
        cs: p.PIN_25,
        dio: p.PIN_24,
        clk: p.PIN_29,
        pio: p.PIO0,
        dma: p.DMA_CH0,
    };
    let stack = match wifi::bring_up(spawner, radio, udp::JOIN_TIMEOUT).await {
        Ok(stack) => stack,
        Err(e) => {
            error!("Wi-Fi bring-up failed: {}", e);
            halt().await
        }
    };

    let mut buffers = UdpBuffers::new();
    let mut sender = match UdpSender::new(stack, &mut buffers, (udp::SERVER_IP, udp::SERVER_PORT)) {
        Ok(sender) => sender,
        Err(e) => {
            error!("UDP socket setup failed: {}", e);
            halt().await
        }
    };

    loop {
        let x = AdcInput::new(&mut adc, &mut x_axis).read().await;
        let y = AdcInput::new(&mut adc, &mut y_axis).read().await;

        match (x, y) {
            (Ok(x), Ok(y)) => {
                let direction = Direction::from_axes(x, y);
                match payload::joystick_text(x, y, direction) {
                    Ok(text) => {
                        info!("{}", text.as_str());
                        if let Err(e) = sender.send(text.as_bytes()).await {
                            warn!("Send failed, sample dropped: {}", e);
                        }
                    }
                    Err(e) => warn!("Payload error: {}", e),
                }
            }
            _ => warn!("Joystick read failed, sample dropped"),
        }

        Timer::after(udp::JOYSTICK_INTERVAL).await;
    }
}
