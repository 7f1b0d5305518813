//! Button state and onboard temperature published as JSON over MQTT
//!
//! Every second: read the button on GPIO5 and the averaged onboard
//! temperature, then publish `{"botao":"ON","temperatura":27.34}`.

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
use embarca_firmware::config::{self, mqtt};
use embarca_firmware::mqtt::{MqttBuffers, MqttConfig, MqttSession};
use embarca_firmware::wifi::{self, WifiPeripherals};
use embarca_firmware::{halt, Irqs};
use embarca_hal_rp2040::adc::AdcInput;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("button-temp-mqtt starting");
    let p = embassy_rp::init(Default::default());

    let button = Input::new(p.PIN_5, Pull::Up);
    let mut adc = Adc::new(p.ADC, Irqs, adc::Config::default());
    let mut temp_sensor = Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    let sampler = TemperatureSampler::averaged(config::TEMP_SAMPLES, config::TEMP_SAMPLE_GAP_MS);

    let radio = WifiPeripherals {
        pwr: p.PIN_23,
        cs: p.PIN_25,
        dio: p.PIN_24,
        clk: p.PIN_29,
        pio: p.PIO0,
        dma: p.DMA_CH0,
    };
    let stack = match wifi::bring_up(spawner, radio, mqtt::JOIN_TIMEOUT).await {
        Ok(stack) => stack,
        Err(e) => {
            error!("Wi-Fi bring-up failed: {}", e);
            halt().await
        }
    };

    let mut buffers = MqttBuffers::new();
    let mut session = MqttSession::new(stack, &mut buffers, MqttConfig::default());
    if session.connect().await.is_err() {
        halt().await;
    }

    loop {
        let state = ButtonState::from_level(button.is_high());
        let mut input = AdcInput::new(&mut adc, &mut temp_sensor);

        match sampler.read_celsius(&mut input, &mut Delay).await {
            Ok(celsius) => {
                debug!("button={} temp={}", state, celsius);
                match payload::status_json(state, celsius) {
                    Ok(json) => {
                        if let Err(e) = session.publish(json.as_bytes()).await {
                            warn!("Publish failed, sample dropped: {}", e);
                        }
                    }
                    Err(e) => warn!("Payload error: {}", e),
                }
            }
            Err(e) => warn!("Temperature read failed: {}", e),
        }

        Timer::after(mqtt::PUBLISH_INTERVAL).await;
    }
}
