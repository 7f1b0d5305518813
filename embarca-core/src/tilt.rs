//! Tilt-driven servo target and alert logic
//!
//! The X-axis acceleration picks one of three target angles. The reported
//! angle then walks toward the target a fixed step per tick; while it is
//! past the alert threshold an alert blinks every other frame, alternating
//! between two buzzers.

/// Acceleration (in g) separating the three target positions
pub const TILT_THRESHOLD_G: f32 = 0.5;

/// Angle change per control tick
pub const STEP_DEG: f32 = 2.0;

/// Angle above which the alert is raised
pub const ALERT_THRESHOLD_DEG: f32 = 90.0;

/// Starting angle
pub const HOME_DEG: f32 = 90.0;

/// Which buzzer should sound this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerSelect {
    First,
    Second,
}

/// Result of one control tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltUpdate {
    pub target: f32,
    pub current: f32,
    /// Angle is past the threshold
    pub alert: bool,
    /// Alert visible this frame, and the buzzer to pulse
    pub blink: Option<BuzzerSelect>,
}

/// Target angle for an X-axis acceleration in g
pub fn target_angle(ax_g: f32) -> f32 {
    if ax_g < -TILT_THRESHOLD_G {
        0.0
    } else if ax_g < TILT_THRESHOLD_G {
        90.0
    } else {
        180.0
    }
}

/// Stateful controller run once per tick
#[derive(Debug, Clone)]
pub struct TiltController {
    current: f32,
    frame: u32,
    next_buzzer: BuzzerSelect,
}

impl Default for TiltController {
    fn default() -> Self {
        Self::new()
    }
}

impl TiltController {
    pub const fn new() -> Self {
        Self {
            current: HOME_DEG,
            frame: 0,
            next_buzzer: BuzzerSelect::First,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Advance one tick with the latest X acceleration
    pub fn step(&mut self, ax_g: f32) -> TiltUpdate {
        let target = target_angle(ax_g);

        if self.current < target {
            self.current = (self.current + STEP_DEG).min(target);
        } else if self.current > target {
            self.current = (self.current - STEP_DEG).max(target);
        }

        let alert = self.current > ALERT_THRESHOLD_DEG;
        let blink = if alert && self.frame % 2 == 0 {
            let buzzer = self.next_buzzer;
            self.next_buzzer = match buzzer {
                BuzzerSelect::First => BuzzerSelect::Second,
                BuzzerSelect::Second => BuzzerSelect::First,
            };
            Some(buzzer)
        } else {
            None
        };

        self.frame = self.frame.wrapping_add(1);

        TiltUpdate {
            target,
            current: self.current,
            alert,
            blink,
        }
    }
}
