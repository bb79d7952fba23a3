use super::key::{normalize_discipline, EventKey, Modifier};

/// Filter over event keys.
///
/// Each modifier filter is tri-state: `Some(true)` requires the token,
/// `Some(false)` excludes keys carrying it, `None` leaves it unconstrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub gender: Option<String>,
    pub discipline: Option<String>,
    pub road_race: Option<bool>,
    pub racewalk: Option<bool>,
    pub steeple: Option<bool>,
    pub mixed: Option<bool>,
    pub short_track: Option<bool>,
    /// When false the discipline filter is a containment probe: a key
    /// matches if its discipline is contained in the filter string.
    pub exact_match: bool,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            gender: None,
            discipline: None,
            road_race: None,
            racewalk: None,
            steeple: None,
            mixed: None,
            short_track: None,
            exact_match: true,
        }
    }
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn discipline(mut self, discipline: impl Into<String>) -> Self {
        self.discipline = Some(discipline.into());
        self
    }

    pub fn road_race(mut self, required: bool) -> Self {
        self.road_race = Some(required);
        self
    }

    pub fn racewalk(mut self, required: bool) -> Self {
        self.racewalk = Some(required);
        self
    }

    pub fn steeple(mut self, required: bool) -> Self {
        self.steeple = Some(required);
        self
    }

    pub fn mixed(mut self, required: bool) -> Self {
        self.mixed = Some(required);
        self
    }

    pub fn short_track(mut self, required: bool) -> Self {
        self.short_track = Some(required);
        self
    }

    pub fn exact_match(mut self, exact: bool) -> Self {
        self.exact_match = exact;
        self
    }

    fn modifier_filters(&self) -> [(Modifier, Option<bool>); 5] {
        [
            (Modifier::ShortTrack, self.short_track),
            (Modifier::Racewalk, self.racewalk),
            (Modifier::Steeplechase, self.steeple),
            (Modifier::Mixed, self.mixed),
            (Modifier::RoadRace, self.road_race),
        ]
    }

    /// Test a single key against every filter of the query.
    pub fn matches(&self, key: &EventKey) -> bool {
        if let Some(gender) = self.gender.as_deref().filter(|g| !g.is_empty()) {
            if !gender.eq_ignore_ascii_case(key.gender().code()) {
                return false;
            }
        }

        if let Some(discipline) = self.discipline.as_deref().filter(|d| !d.is_empty()) {
            let wanted = normalize_discipline(discipline);
            let segment = key.discipline().to_lowercase();
            let hit = if self.exact_match {
                segment == wanted
            } else {
                wanted.contains(&segment)
            };
            if !hit {
                return false;
            }
        }

        let filters = self.modifier_filters();

        // Any present excluded token rejects the key
        let excluded = filters
            .iter()
            .any(|(m, want)| *want == Some(false) && key.has_modifier(*m));
        if excluded {
            return false;
        }

        filters
            .iter()
            .all(|(m, want)| *want != Some(true) || key.has_modifier(*m))
    }
}

/// Return the keys matching `query`, in the order they were given.
pub fn search<'a, I>(keys: I, query: &EventQuery) -> Vec<&'a EventKey>
where
    I: IntoIterator<Item = &'a EventKey>,
{
    keys.into_iter().filter(|key| query.matches(key)).collect()
}
