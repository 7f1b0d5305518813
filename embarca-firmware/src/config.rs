//! Compile-time configuration
//!
//! Pin assignments (Pico W / BitDogLab):
//!
//! | Function              | Pin            |
//! |-----------------------|----------------|
//! | Button / calibration  | GPIO5 (pull-up)|
//! | Joystick X / Y        | GPIO26 / GPIO27|
//! | Servo PWM             | GPIO2          |
//! | Buzzer 1 / 2          | GPIO10 / GPIO27|
//! | MPU6050 (I2C0)        | SDA 0, SCL 1   |
//! | OLED (I2C1)           | SDA 14, SCL 15 |
//! | CYW43 PWR/CS/DIO/CLK  | 23 / 25 / 24 / 29 |

use embassy_net::Ipv4Address;
use embassy_time::Duration;

/// Network name, from the `WIFI_SSID` build environment variable
pub const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(ssid) => ssid,
    None => "SSID",
};

/// Network password, from the `WIFI_PASSWORD` build environment variable
pub const WIFI_PASSWORD: &str = match option_env!("WIFI_PASSWORD") {
    Some(password) => password,
    None => "PASSWORD",
};

/// Link up after a successful join
pub const LINK_UP_TIMEOUT: Duration = Duration::from_secs(10);

/// DHCP lease after link up
pub const DHCP_TIMEOUT: Duration = Duration::from_secs(15);

/// Onboard temperature averaging
pub const TEMP_SAMPLES: u8 = 5;
pub const TEMP_SAMPLE_GAP_MS: u32 = 2;

pub mod mqtt {
    use super::Duration;

    pub const JOIN_TIMEOUT: Duration = Duration::from_secs(10);
    pub const BROKER_HOST: &str = "broker.hivemq.com";
    pub const BROKER_PORT: u16 = 1883;
    pub const CLIENT_ID: &str = "pico-client";
    pub const KEEP_ALIVE_SECS: u16 = 60;
    pub const TOPIC: &str = "embarca/status";
    pub const PUBLISH_INTERVAL: Duration = Duration::from_millis(1000);
}

pub mod udp {
    use super::{Duration, Ipv4Address};

    pub const JOIN_TIMEOUT: Duration = Duration::from_secs(30);
    pub const SERVER_IP: Ipv4Address = Ipv4Address::new(192, 168, 1, 204);
    pub const SERVER_PORT: u16 = 34567;
    pub const BUTTON_TEMP_INTERVAL: Duration = Duration::from_millis(1000);
    pub const JOYSTICK_INTERVAL: Duration = Duration::from_millis(500);
}

pub mod tilt {
    use super::Duration;

    pub const LOOP_PERIOD: Duration = Duration::from_millis(200);
    pub const BEEP_MS: u32 = 100;
    pub const I2C_FREQUENCY: u32 = 400_000;
    pub const SPLASH_TIME: Duration = Duration::from_millis(1000);
    pub const CALIBRATION_SAVED_TIME: Duration = Duration::from_millis(1200);
    pub const CALIBRATION_SHOWN_TIME: Duration = Duration::from_millis(800);
    pub const ALERT_TEXT: &str = "!!! ALERTA >90 !!!";
}
