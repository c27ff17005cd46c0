use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Muscle group an exercise is filed under.
///
/// The set is closed: the canonical labels returned by [`BodyPart::label`]
/// are exactly the strings stored in the mapping document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyPart {
    Traps,
    #[serde(rename = "Front Delts")]
    FrontDelts,
    #[serde(rename = "Side Delts")]
    SideDelts,
    #[serde(rename = "Rear Delts")]
    RearDelts,
    #[serde(rename = "Back-Upper")]
    BackUpper,
    #[serde(rename = "Back-Lats")]
    BackLats,
    Abs,
    Biceps,
    Triceps,
    Pecs,
    Forearms,
    Glutes,
    Hamstrings,
    Quads,
    Calves,
    Tibialis,
    Cardio,
    Other,
}

/// Label used wherever an exercise has no body part yet.
pub const UNCLASSIFIED_LABEL: &str = "Unclassified";

impl BodyPart {
    /// Every category, in menu order.
    pub const ALL: [BodyPart; 18] = [
        BodyPart::Traps,
        BodyPart::FrontDelts,
        BodyPart::SideDelts,
        BodyPart::RearDelts,
        BodyPart::BackUpper,
        BodyPart::BackLats,
        BodyPart::Abs,
        BodyPart::Biceps,
        BodyPart::Triceps,
        BodyPart::Pecs,
        BodyPart::Forearms,
        BodyPart::Glutes,
        BodyPart::Hamstrings,
        BodyPart::Quads,
        BodyPart::Calves,
        BodyPart::Tibialis,
        BodyPart::Cardio,
        BodyPart::Other,
    ];

    /// Canonical label as persisted in the mapping document.
    pub fn label(self) -> &'static str {
        match self {
            BodyPart::Traps => "Traps",
            BodyPart::FrontDelts => "Front Delts",
            BodyPart::SideDelts => "Side Delts",
            BodyPart::RearDelts => "Rear Delts",
            BodyPart::BackUpper => "Back-Upper",
            BodyPart::BackLats => "Back-Lats",
            BodyPart::Abs => "Abs",
            BodyPart::Biceps => "Biceps",
            BodyPart::Triceps => "Triceps",
            BodyPart::Pecs => "Pecs",
            BodyPart::Forearms => "Forearms",
            BodyPart::Glutes => "Glutes",
            BodyPart::Hamstrings => "Hamstrings",
            BodyPart::Quads => "Quads",
            BodyPart::Calves => "Calves",
            BodyPart::Tibialis => "Tibialis",
            BodyPart::Cardio => "Cardio",
            BodyPart::Other => "Other",
        }
    }

    /// Exact, case-sensitive lookup of a canonical label.
    pub fn from_label(label: &str) -> Option<BodyPart> {
        BodyPart::ALL.into_iter().find(|p| p.label() == label)
    }
}

/// Render an optional body part, using [`UNCLASSIFIED_LABEL`] for `None`.
pub fn label_or_unclassified(part: Option<BodyPart>) -> &'static str {
    part.map(BodyPart::label).unwrap_or(UNCLASSIFIED_LABEL)
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BodyPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BodyPart::from_label(s).ok_or_else(|| format!("unknown body part: {s}"))
    }
}
