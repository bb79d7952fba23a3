use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ScoringError;

/// Gender segment of an event key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Men => "M",
            Gender::Women => "W",
        }
    }
}

impl FromStr for Gender {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" | "m" => Ok(Gender::Men),
            "W" | "w" => Ok(Gender::Women),
            _ => Err(ScoringError::UnknownEvent(s.to_string())),
        }
    }
}

/// Event variant tokens.
///
/// Declaration order is the canonical order used when rendering a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    ShortTrack,
    Racewalk,
    Steeplechase,
    Mixed,
    RoadRace,
}

impl Modifier {
    pub const ALL: [Modifier; 5] = [
        Modifier::ShortTrack,
        Modifier::Racewalk,
        Modifier::Steeplechase,
        Modifier::Mixed,
        Modifier::RoadRace,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Modifier::ShortTrack => "SH",
            Modifier::Racewalk => "RW",
            Modifier::Steeplechase => "SC",
            Modifier::Mixed => "MX",
            Modifier::RoadRace => "RD",
        }
    }
}

impl FromStr for Modifier {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifier::ALL
            .into_iter()
            .find(|m| m.token() == s)
            .ok_or_else(|| ScoringError::UnknownEvent(s.to_string()))
    }
}

// Jumps, throws and combined events; compared lowercase
const FIELD_DISCIPLINES: &[&str] = &[
    "hj", "pv", "lj", "tj", "sp", "dt", "ht", "jt", "wt", "dec", "hept", "pent",
    "decathlon", "heptathlon", "pentathlon",
];

/// Structured identifier of one table column, e.g. `W-20000m-RW-RD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    gender: Gender,
    discipline: String,
    modifiers: BTreeSet<Modifier>,
}

impl EventKey {
    pub fn new(
        gender: Gender,
        discipline: impl Into<String>,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) -> Self {
        Self {
            gender,
            discipline: discipline.into(),
            modifiers: modifiers.into_iter().collect(),
        }
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn discipline(&self) -> &str {
        &self.discipline
    }

    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.modifiers.iter().copied()
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Whether marks for this event are distances, heights or combined
    /// event scores rather than times.
    pub fn is_field(&self) -> bool {
        // Document titles may keep an abbreviation dot ("Dec.")
        let discipline = self.discipline.trim_end_matches('.').to_lowercase();
        FIELD_DISCIPLINES.contains(&discipline.as_str())
    }
}

impl FromStr for EventKey {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ScoringError::UnknownEvent(s.to_string());

        let mut segments = s.trim().split('-');
        let gender: Gender = segments
            .next()
            .ok_or_else(unknown)?
            .parse()
            .map_err(|_| unknown())?;

        let discipline = segments.next().filter(|d| !d.is_empty()).ok_or_else(unknown)?;

        let modifiers = segments
            .map(|token| token.parse::<Modifier>().map_err(|_| unknown()))
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            gender,
            discipline: discipline.to_string(),
            modifiers,
        })
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.gender.code(), self.discipline)?;
        for modifier in &self.modifiers {
            write!(f, "-{}", modifier.token())?;
        }
        Ok(())
    }
}

/// Normalize a discipline for matching: lowercase, `km` expanded to
/// `000m`, whitespace removed.
pub fn normalize_discipline(discipline: &str) -> String {
    discipline
        .to_lowercase()
        .replace("km", "000m")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let key: EventKey = "M-100m".parse().unwrap();
        assert_eq!(key.gender(), Gender::Men);
        assert_eq!(key.discipline(), "100m");
        assert_eq!(key.modifiers().count(), 0);
    }

    #[test]
    fn test_parse_key_with_modifiers() {
        let key: EventKey = "W-20000m-RW-RD".parse().unwrap();
        assert_eq!(key.gender(), Gender::Women);
        assert!(key.has_modifier(Modifier::Racewalk));
        assert!(key.has_modifier(Modifier::RoadRace));
        assert!(!key.has_modifier(Modifier::ShortTrack));
    }

    #[test]
    fn test_modifier_order_is_irrelevant_for_equality() {
        let a: EventKey = "W-20000m-RD-RW".parse().unwrap();
        let b: EventKey = "W-20000m-RW-RD".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_uses_canonical_modifier_order() {
        let key: EventKey = "M-4x400m-RD-MX-SH".parse().unwrap();
        assert_eq!(key.to_string(), "M-4x400m-SH-MX-RD");
    }

    #[test]
    fn test_rejects_missing_discipline() {
        assert!("M".parse::<EventKey>().is_err());
        assert!("M-".parse::<EventKey>().is_err());
    }

    #[test]
    fn test_rejects_unknown_gender_and_modifier() {
        assert!("X-100m".parse::<EventKey>().is_err());
        assert!(matches!(
            "M-100m-ZZ".parse::<EventKey>(),
            Err(ScoringError::UnknownEvent(key)) if key == "M-100m-ZZ"
        ));
    }

    #[test]
    fn test_field_events() {
        assert!("M-LJ".parse::<EventKey>().unwrap().is_field());
        assert!("W-Hept".parse::<EventKey>().unwrap().is_field());
        assert!(!"M-1500m".parse::<EventKey>().unwrap().is_field());
        assert!(!"W-Mar-RD".parse::<EventKey>().unwrap().is_field());
    }

    #[test]
    fn test_dotted_combined_events_are_field() {
        assert!("M-Dec.".parse::<EventKey>().unwrap().is_field());
        assert!("W-Pent.-SH".parse::<EventKey>().unwrap().is_field());
        assert!(!"M-100m.".parse::<EventKey>().unwrap().is_field());
    }

    #[test]
    fn test_new_matches_parsed_key() {
        let key = EventKey::new(
            Gender::Women,
            "20000m",
            [Modifier::RoadRace, Modifier::Racewalk],
        );
        assert_eq!(key, "W-20000m-RW-RD".parse::<EventKey>().unwrap());
        assert_eq!(key.to_string(), "W-20000m-RW-RD");
    }

    #[test]
    fn test_normalize_discipline() {
        assert_eq!(normalize_discipline("5 km"), "5000m");
        assert_eq!(normalize_discipline("5km"), "5000m");
        assert_eq!(normalize_discipline("Half Marathon"), "halfmarathon");
    }
}
