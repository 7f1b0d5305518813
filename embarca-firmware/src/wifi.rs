//! CYW43 Wi-Fi bring-up
//!
//! Powers the radio over PIO SPI, spawns the radio and network runners,
//! joins the configured network and waits for a DHCP lease.

use cyw43::JoinOptions;
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::Pio;
use embassy_rp::Peri;
use embassy_time::{with_timeout, Duration};
use static_cell::StaticCell;

use crate::config::{DHCP_TIMEOUT, LINK_UP_TIMEOUT, WIFI_PASSWORD, WIFI_SSID};
use crate::{Irqs, NetError};

type RadioSpi = PioSpi<'static, PIO0, 0, DMA_CH0>;

/// Peripherals wired to the CYW43 on the Pico W
pub struct WifiPeripherals {
    pub pwr: Peri<'static, PIN_23>,
    pub cs: Peri<'static, PIN_25>,
    pub dio: Peri<'static, PIN_24>,
    pub clk: Peri<'static, PIN_29>,
    pub pio: Peri<'static, PIO0>,
    pub dma: Peri<'static, DMA_CH0>,
}

#[embassy_executor::task]
async fn cyw43_task(runner: cyw43::Runner<'static, Output<'static>, RadioSpi>) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Bring the radio up and return a configured network stack
///
/// The join attempt is bounded by `join_timeout`; link up and DHCP have
/// their own fixed bounds.
pub async fn bring_up(
    spawner: Spawner,
    p: WifiPeripherals,
    join_timeout: Duration,
) -> Result<Stack<'static>, NetError> {
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

    let pwr = Output::new(p.pwr, Level::Low);
    let cs = Output::new(p.cs, Level::High);
    let mut pio = Pio::new(p.pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.dio,
        p.clk,
        p.dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let seed = RoscRng.next_u64();
    static RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        Config::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(net_task(runner)).unwrap();

    info!("Joining Wi-Fi network {}", WIFI_SSID);
    match with_timeout(
        join_timeout,
        control.join(WIFI_SSID, JoinOptions::new(WIFI_PASSWORD.as_bytes())),
    )
    .await
    {
        Ok(Ok(())) => info!("Wi-Fi joined"),
        Ok(Err(e)) => return Err(NetError::JoinFailed(e.status)),
        Err(_) => return Err(NetError::JoinTimeout),
    }

    with_timeout(LINK_UP_TIMEOUT, stack.wait_link_up())
        .await
        .map_err(|_| NetError::LinkTimeout)?;
    with_timeout(DHCP_TIMEOUT, stack.wait_config_up())
        .await
        .map_err(|_| NetError::DhcpTimeout)?;

    if let Some(config) = stack.config_v4() {
        info!("IP address: {}", config.address);
    }

    Ok(stack)
}
