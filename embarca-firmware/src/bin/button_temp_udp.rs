//! Button state and onboard temperature sent as text over UDP
//!
//! Every second: `Botao: LIBERADO,Temperatura: 25.07 Celsius` to the
//! configured server.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Input, Pull};
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use embarca_core::button::ButtonState;
use embarca_core::payload;
use embarca_core::temperature::TemperatureSampler;
use embarca_firmware::config::udp;
use embarca_firmware::udp::{UdpBuffers, UdpSender};
use embarca_firmware::wifi::{self, WifiPeripherals};
use embarca_firmware::{halt, Irqs};
use embarca_hal_rp2040::adc::AdcInput;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("button-temp-udp starting");
    let p = embassy_rp::init(Default::default());

    let button = Input::new(p.PIN_5, Pull::Up);
    let mut adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let mut temp_sensor = Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    let sampler = TemperatureSampler::single();

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
        let state = ButtonState::from_level(button.is_high());
        let mut input = AdcInput::new(&mut adc, &mut temp_sensor);

        match sampler.read_celsius(&mut input, &mut Delay).await {
            Ok(celsius) => match payload::button_temp_text(state, celsius) {
                Ok(text) => {
                    info!("{}", text.as_str());
                    if let Err(e) = sender.send(text.as_bytes()).await {
                        warn!("Send failed, sample dropped: {}", e);
                    }
                }
                Err(e) => warn!("Payload error: {}", e),
            },
            Err(e) => warn!("Temperature read failed: {}", e),
        }

        Timer::after(udp::BUTTON_TEMP_INTERVAL).await;
    }
}
