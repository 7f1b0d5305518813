//! MPU6050 tilt drives a continuous servo with an OLED readout
//!
//! The X-axis tilt picks a target angle (0/90/180 degrees) that the servo
//! approaches 2 degrees per 200 ms tick. Past 90 degrees an alert blinks
//! on the display while two buzzers beep in turn. Holding the button on
//! GPIO5 at boot measures and stores the servo's half-turn time.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{with_timeout, Delay, Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use embarca_core::calibration::{CalibrationStore, MAX_ROTATION_MS};
use embarca_core::payload;
use embarca_core::servo::{ServoSim, Spin};
use embarca_core::tilt::{BuzzerSelect, TiltController};
use embarca_drivers::buzzer::Buzzer;
use embarca_drivers::display::Ssd1306;
use embarca_drivers::imu::mpu6050::ACCEL_SENS_2G;
use embarca_drivers::imu::Mpu6050;
use embarca_firmware::config::tilt;
use embarca_firmware::servo::PwmServo;
use embarca_firmware::{halt, Irqs};
use embarca_hal_rp2040::flash::Rp2040Sector;

/// Draw the given lines and push them, logging a failed flush
async fn show<I2C: embedded_hal_async::i2c::I2c>(display: &mut Ssd1306<I2C>, lines: &[(i32, i32, &str)]) {
    display.clear();
    for &(x, y, text) in lines {
        display.draw_text(x, y, text);
    }
    if display.flush().await.is_err() {
        warn!("Display flush failed");
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("tilt-servo starting");
    let p = embassy_rp::init(Default::default());

    let calib_button = Input::new(p.PIN_5, Pull::Up);
    let Ok(mut buzzer1) = Buzzer::new(Output::new(p.PIN_10, Level::Low));
    let Ok(mut buzzer2) = Buzzer::new(Output::new(p.PIN_27, Level::Low));

    // MPU6050 on I2C0
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = tilt::I2C_FREQUENCY;
    let imu_bus = I2c::new_async(p.I2C0, p.PIN_1, p.PIN_0, Irqs, i2c_config);
    let mut imu = Mpu6050::new(imu_bus);

    if let Err(e) = imu.reset(&mut Delay).await {
        error!("MPU6050 reset failed: {}", e);
        halt().await;
    }
    Timer::after_millis(200).await;
    match imu.probe().await {
        Ok(id) => info!("MPU6050 found, WHO_AM_I={=u8:#x}", id),
        Err(e) => {
            error!("MPU6050 not found: {}", e);
            halt().await;
        }
    }

    // OLED on I2C1
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = tilt::I2C_FREQUENCY;
    let oled_bus = I2c::new_async(p.I2C1, p.PIN_15, p.PIN_14, Irqs, i2c_config);
    let mut display = Ssd1306::new(oled_bus);
    if display.init().await.is_err() {
        warn!("OLED init failed");
    }

    show(&mut display, &[(20, 0, "Servo MPU6050"), (8, 12, "Inicializando...")]).await;
    Timer::after(tilt::SPLASH_TIME).await;

    // Servo and stored calibration
    let mut servo_out = PwmServo::new(Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, PwmConfig::default()));
    let mut store = CalibrationStore::new(Rp2040Sector::new(p.FLASH, p.DMA_CH1));
    let stored = store.read().await;
    let mut servo = ServoSim::new(stored.unwrap_or(embarca_core::calibration::DEFAULT_ROTATION_MS));

    if calib_button.is_low() {
        show(&mut display, &[(20, 24, "Calibrando...")]).await;
        let rotation_ms = calibrate(&mut servo_out, &mut servo, calib_button).await;
        let saved = store.write(rotation_ms).await;
        match saved {
            Ok(()) => info!("Calibration saved: {} ms", rotation_ms),
            Err(e) => warn!("Calibration not saved: {}", e),
        }
        show(&mut display, &[(8, 24, payload::calibration_saved_text(&saved))]).await;
        Timer::after(tilt::CALIBRATION_SAVED_TIME).await;
    } else if let Some(rotation_ms) = stored {
        info!("Using stored calibration: {} ms", rotation_ms);
        if let Ok(line) = payload::calibration_line(rotation_ms) {
            show(&mut display, &[(10, 24, line.as_str())]).await;
        }
        Timer::after(tilt::CALIBRATION_SHOWN_TIME).await;
    }

    let mut controller = TiltController::new();
    let mut delay = Delay;

    loop {
        let raw = match imu.read_raw().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("MPU6050 read failed: {}", e);
                Timer::after(tilt::LOOP_PERIOD).await;
                continue;
            }
        };

        let ax = raw.accel[0] as f32 / ACCEL_SENS_2G;
        let update = controller.step(ax);
        debug!(
            "AX={}g AY={}g AZ={}g | GX={} GY={} GZ={} | target={} current={}",
            ax,
            raw.accel[1] as f32 / ACCEL_SENS_2G,
            raw.accel[2] as f32 / ACCEL_SENS_2G,
            raw.gyro[0],
            raw.gyro[1],
            raw.gyro[2],
            update.target,
            update.current
        );

        servo_out.execute(servo.plan_move(update.current)).await;

        display.clear();
        display.draw_text(20, 0, "Servo MPU6050");
        if let Ok(line) = payload::accel_line(ax) {
            display.draw_text(6, 20, &line);
        }
        if let Ok(line) = payload::angle_line(update.current, update.target) {
            display.draw_text(6, 36, &line);
        }

        if let Some(buzzer) = update.blink {
            display.draw_text(6, 52, tilt::ALERT_TEXT);
            let Ok(()) = match buzzer {
                BuzzerSelect::First => buzzer1.beep(&mut delay, tilt::BEEP_MS).await,
                BuzzerSelect::Second => buzzer2.beep(&mut delay, tilt::BEEP_MS).await,
            };
        }

        if display.flush().await.is_err() {
            warn!("Display flush failed");
        }

        Timer::after(tilt::LOOP_PERIOD).await;
    }
}

/// Measure a half turn at full speed
///
/// The servo spins from release of the held button until the next press,
/// which the user gives once the horn has swept 180 degrees. Without a
/// press the longest storable time is taken.
async fn calibrate(out: &mut PwmServo<'_>, servo: &mut ServoSim, mut button: Input<'_>) -> u32 {
    button.wait_for_high().await;
    Timer::after_millis(50).await;

    out.spin(Spin::CounterClockwise);
    let start = Instant::now();
    let pressed = with_timeout(
        Duration::from_millis(MAX_ROTATION_MS as u64),
        button.wait_for_low(),
    )
    .await;
    let elapsed = start.elapsed().as_millis() as u32;
    out.spin(Spin::Stop);

    if pressed.is_err() {
        warn!("No press during calibration, using {} ms", MAX_ROTATION_MS);
    }
    servo.calibrate_from(elapsed)
}
