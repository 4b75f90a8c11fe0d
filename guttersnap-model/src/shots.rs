use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Number of photographs a complete request carries.
pub const SHOT_COUNT: usize = 9;

/// Identifier of one required exterior photograph.
///
/// The wire name (see [`ShotId::as_str`]) doubles as the multipart field
/// name, so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ShotId {
    Front,
    FrontRightCorner,
    RightSide,
    RearRightCorner,
    Rear,
    RearLeftCorner,
    LeftSide,
    LeftFrontCorner,
    GutterSwatch,
}

impl ShotId {
    /// Every shot in capture walk order.
    pub const ALL: [ShotId; SHOT_COUNT] = [
        ShotId::Front,
        ShotId::FrontRightCorner,
        ShotId::RightSide,
        ShotId::RearRightCorner,
        ShotId::Rear,
        ShotId::RearLeftCorner,
        ShotId::LeftSide,
        ShotId::LeftFrontCorner,
        ShotId::GutterSwatch,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ShotId::Front => "front",
            ShotId::FrontRightCorner => "frontRightCorner",
            ShotId::RightSide => "rightSide",
            ShotId::RearRightCorner => "rearRightCorner",
            ShotId::Rear => "rear",
            ShotId::RearLeftCorner => "rearLeftCorner",
            ShotId::LeftSide => "leftSide",
            ShotId::LeftFrontCorner => "leftFrontCorner",
            ShotId::GutterSwatch => "gutterSwatch",
        }
    }

    /// Position of this shot in the capture walk.
    pub fn index(self) -> usize {
        // ALL mirrors declaration order.
        self as usize
    }

    pub fn spec(self) -> &'static ShotSpec {
        &SHOT_SEQUENCE[self.index()]
    }

    /// Lower-case words for the camelCase id, e.g. `"front right corner"`.
    pub fn human_label(self) -> String {
        let mut label = String::with_capacity(self.as_str().len() + 4);
        for ch in self.as_str().chars() {
            if ch.is_ascii_uppercase() {
                label.push(' ');
                label.push(ch.to_ascii_lowercase());
            } else {
                label.push(ch);
            }
        }
        label
    }
}

impl fmt::Display for ShotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShotId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShotId::ALL
            .into_iter()
            .find(|shot| shot.as_str() == s)
            .ok_or_else(|| ModelError::UnknownShot(s.to_string()))
    }
}

/// Static description of a shot: what to call it and how to take it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotSpec {
    pub id: ShotId,
    pub title: &'static str,
    pub instruction: &'static str,
}

/// The fixed capture walk. Order is significant.
pub const SHOT_SEQUENCE: [ShotSpec; SHOT_COUNT] = [
    ShotSpec {
        id: ShotId::Front,
        title: "Front of Home",
        instruction: "Stand back to capture the entire front of your home",
    },
    ShotSpec {
        id: ShotId::FrontRightCorner,
        title: "Front Right Corner",
        instruction: "Position yourself at an angle to capture the front right corner",
    },
    ShotSpec {
        id: ShotId::RightSide,
        title: "Right Side",
        instruction: "Move to capture the right side of your home",
    },
    ShotSpec {
        id: ShotId::RearRightCorner,
        title: "Rear Right Corner",
        instruction: "Position yourself at an angle to capture the rear right corner",
    },
    ShotSpec {
        id: ShotId::Rear,
        title: "Rear of Home",
        instruction: "Stand back to capture the entire rear of your home",
    },
    ShotSpec {
        id: ShotId::RearLeftCorner,
        title: "Rear Left Corner",
        instruction: "Position yourself at an angle to capture the rear left corner",
    },
    ShotSpec {
        id: ShotId::LeftSide,
        title: "Left Side",
        instruction: "Move to capture the left side of your home",
    },
    ShotSpec {
        id: ShotId::LeftFrontCorner,
        title: "Left Front Corner",
        instruction: "Position yourself at an angle to capture the left front corner",
    },
    ShotSpec {
        id: ShotId::GutterSwatch,
        title: "Gutter Color Swatch",
        instruction: "Hold the color swatch up to your existing gutters or show your preferred color",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_order_matches_shot_index() {
        for (position, spec) in SHOT_SEQUENCE.iter().enumerate() {
            assert_eq!(spec.id.index(), position);
            assert_eq!(ShotId::ALL[position], spec.id);
        }
        assert_eq!(SHOT_SEQUENCE[0].id, ShotId::Front);
        assert_eq!(SHOT_SEQUENCE[SHOT_COUNT - 1].id, ShotId::GutterSwatch);
    }

    #[test]
    fn wire_names_parse_back() {
        for shot in ShotId::ALL {
            assert_eq!(shot.as_str().parse::<ShotId>(), Ok(shot));
        }
        assert_eq!(
            "roof".parse::<ShotId>(),
            Err(ModelError::UnknownShot("roof".into()))
        );
    }

    #[test]
    fn human_label_splits_camel_case() {
        assert_eq!(ShotId::Front.human_label(), "front");
        assert_eq!(
            ShotId::FrontRightCorner.human_label(),
            "front right corner"
        );
        assert_eq!(ShotId::GutterSwatch.human_label(), "gutter swatch");
    }
}
