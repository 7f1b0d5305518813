//! Joystick to compass direction mapping
//!
//! Both axes are 12-bit ADC readings centred on 2048. A deflection has to
//! exceed the neutral zone strictly to count; readings exactly on the
//! threshold are treated as neutral on that axis.

/// ADC count of a centred stick
pub const CENTER: i32 = 2048;

/// Deflection that must be exceeded before an axis counts
pub const NEUTRAL_ZONE: i32 = 500;

/// Maximum 12-bit ADC reading
pub const AXIS_MAX: u16 = 4095;

/// One of the nine compass positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions, in compass order after the centre
    pub const ALL: [Direction; 9] = [
        Direction::Center,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Map raw axis readings to a direction
    ///
    /// `y` grows toward north, `x` grows toward east.
    pub fn from_axes(x: u16, y: u16) -> Self {
        let dx = x as i32 - CENTER;
        let dy = y as i32 - CENTER;

        if dx.abs() < NEUTRAL_ZONE && dy.abs() < NEUTRAL_ZONE {
            return Direction::Center;
        }

        let east = dx > NEUTRAL_ZONE;
        let west = dx < -NEUTRAL_ZONE;

        if dy > NEUTRAL_ZONE {
            match (east, west) {
                (true, _) => Direction::NorthEast,
                (_, true) => Direction::NorthWest,
                _ => Direction::North,
            }
        } else if dy < -NEUTRAL_ZONE {
            match (east, west) {
                (true, _) => Direction::SouthEast,
                (_, true) => Direction::SouthWest,
                _ => Direction::South,
            }
        } else if east {
            Direction::East
        } else if west {
            Direction::West
        } else {
            Direction::Center
        }
    }

    /// Wire label sent in the UDP payload
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Center => "Centro",
            Direction::North => "Norte",
            Direction::NorthEast => "Nordeste",
            Direction::East => "Leste",
            Direction::SouthEast => "Sudeste",
            Direction::South => "Sul",
            Direction::SouthWest => "Sudoeste",
            Direction::West => "Oeste",
            Direction::NorthWest => "Noroeste",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_center() {
        assert_eq!(Direction::from_axes(2048, 2048), Direction::Center);
        assert_eq!(Direction::from_axes(2547, 1549), Direction::Center);
    }

    #[test]
    fn test_cardinal_and_diagonal() {
        assert_eq!(Direction::from_axes(2048, 4095), Direction::North);
        assert_eq!(Direction::from_axes(2048, 0), Direction::South);
        assert_eq!(Direction::from_axes(4095, 2048), Direction::East);
        assert_eq!(Direction::from_axes(0, 2048), Direction::West);
        assert_eq!(Direction::from_axes(4095, 4095), Direction::NorthEast);
        assert_eq!(Direction::from_axes(0, 4095), Direction::NorthWest);
        assert_eq!(Direction::from_axes(4095, 0), Direction::SouthEast);
        assert_eq!(Direction::from_axes(0, 0), Direction::SouthWest);
    }

    #[test]
    fn test_threshold_is_neutral() {
        // |d| == 500 does not count as a deflection
        assert_eq!(Direction::from_axes(2548, 2048), Direction::Center);
        assert_eq!(Direction::from_axes(1548, 2048), Direction::Center);
        assert_eq!(Direction::from_axes(2548, 2548), Direction::Center);
        assert_eq!(Direction::from_axes(2548, 4095), Direction::North);
        assert_eq!(Direction::from_axes(4095, 1548), Direction::East);
        // One past the threshold counts
        assert_eq!(Direction::from_axes(2549, 2048), Direction::East);
        assert_eq!(Direction::from_axes(2048, 1547), Direction::South);
    }

    #[test]
    fn test_labels_are_distinct() {
        for (i, a) in Direction::ALL.iter().enumerate() {
            for b in &Direction::ALL[i + 1..] {
                assert_ne!(a.label(), b.label());
            }
        }
    }

    proptest! {
        #[test]
        fn prop_mapping_is_total_and_deterministic(x in 0u16..=AXIS_MAX, y in 0u16..=AXIS_MAX) {
            let d = Direction::from_axes(x, y);
            prop_assert!(Direction::ALL.contains(&d));
            prop_assert_eq!(d, Direction::from_axes(x, y));
        }

        #[test]
        fn prop_inside_neutral_zone_is_center(dx in -499i32..=499, dy in -499i32..=499) {
            let x = (CENTER + dx) as u16;
            let y = (CENTER + dy) as u16;
            prop_assert_eq!(Direction::from_axes(x, y), Direction::Center);
        }
    }
}
