use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use super::model::{Direction, ScoringModel, DEFAULT_DEGREE};
use crate::error::{Result, ScoringError};
use crate::event::{search, EventKey, EventQuery};
use crate::mark::{parse_time, Mark};
use crate::source::{RawCell, RawTable, POINTS_COLUMN};

struct EventColumn {
    key: EventKey,
    marks: Vec<Option<f64>>,
}

/// A points table plus the models fitted against it.
///
/// Read-only after [`ScoringTable::build`], except for the model cache:
/// each (event, direction) model is fitted on first use and kept for the
/// life of the table. Fits are serialized by a per-table lock; cached
/// models are read without locking.
pub struct ScoringTable {
    points: Vec<i64>,
    events: Vec<EventColumn>,
    index: HashMap<EventKey, usize>,
    degree: usize,
    models: Vec<[OnceLock<ScoringModel>; 2]>,
    fit_lock: Mutex<()>,
}

impl ScoringTable {
    /// Build a table fitting models of [`DEFAULT_DEGREE`].
    pub fn build(raw: &RawTable) -> Result<Self> {
        Self::build_with_degree(raw, DEFAULT_DEGREE)
    }

    /// Validate a raw table and wrap it.
    ///
    /// Requires a `Points` column of strictly decreasing integers; every
    /// other column must be named by a valid event key and have one cell
    /// per point value. All problems are reported in one
    /// [`ScoringError::MalformedTable`].
    pub fn build_with_degree(raw: &RawTable, degree: usize) -> Result<Self> {
        let points_column = raw.column(POINTS_COLUMN).ok_or_else(|| {
            ScoringError::MalformedTable(format!("missing '{}' column", POINTS_COLUMN))
        })?;

        let mut problems = Vec::new();
        let points = parse_points(&points_column.cells, &mut problems);

        let mut events: Vec<EventColumn> = Vec::new();
        let mut index = HashMap::new();

        for column in raw.columns().iter().filter(|c| c.name != POINTS_COLUMN) {
            if column.cells.len() != points_column.cells.len() {
                problems.push(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.cells.len(),
                    points_column.cells.len()
                ));
            }

            let key: EventKey = match column.name.parse() {
                Ok(key) => key,
                Err(_) => {
                    problems.push(format!("column '{}' is not a valid event key", column.name));
                    continue;
                }
            };

            let marks = column
                .cells
                .iter()
                .enumerate()
                .map(|(row, cell)| match cell {
                    None => None,
                    Some(RawCell::Number(n)) if n.is_nan() => None,
                    Some(RawCell::Number(n)) => Some(*n),
                    Some(RawCell::Text(text)) => match parse_time(text) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            problems.push(format!("column '{}' row {}: {}", column.name, row, e));
                            None
                        }
                    },
                })
                .collect();

            if index.insert(key.clone(), events.len()).is_some() {
                problems.push(format!("column '{}' duplicates event {}", column.name, key));
                continue;
            }
            events.push(EventColumn { key, marks });
        }

        if !problems.is_empty() {
            return Err(ScoringError::MalformedTable(problems.join("; ")));
        }

        let models = events.iter().map(|_| Default::default()).collect();

        Ok(Self {
            points,
            events,
            index,
            degree,
            models,
            fit_lock: Mutex::new(()),
        })
    }

    pub fn points(&self) -> &[i64] {
        &self.points
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Event keys in the table's column order
    pub fn events(&self) -> impl Iterator<Item = &EventKey> {
        self.events.iter().map(|c| &c.key)
    }

    /// Resolve an event string to the table's key.
    pub fn event(&self, event: &str) -> Result<&EventKey> {
        self.resolve(event).map(|i| &self.events[i].key)
    }

    /// Tabulated marks for `event`, aligned with [`ScoringTable::points`].
    pub fn marks(&self, event: &str) -> Result<&[Option<f64>]> {
        self.resolve(event).map(|i| self.events[i].marks.as_slice())
    }

    pub fn search(&self, query: &EventQuery) -> Vec<&EventKey> {
        search(self.events(), query)
    }

    /// Fitted model for `event` in `direction`, fitting it on first use.
    pub fn model(&self, event: &str, direction: Direction) -> Result<&ScoringModel> {
        let index = self.resolve(event)?;
        let slot = &self.models[index][direction.slot()];
        if let Some(model) = slot.get() {
            return Ok(model);
        }

        let _guard = self.fit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = slot.get() {
            return Ok(model);
        }

        let column = &self.events[index];
        let samples: Vec<(f64, f64)> = self
            .points
            .iter()
            .zip(&column.marks)
            .filter_map(|(&points, mark)| mark.map(|m| (points as f64, m)))
            .collect();

        let model = ScoringModel::fit(&column.key.to_string(), &samples, direction, self.degree)?;
        Ok(slot.get_or_init(|| model))
    }

    /// Score `mark`, store the result on it and return it.
    ///
    /// The fitted value is rounded half-to-even and not clamped to the
    /// table's point range.
    pub fn points_for(&self, mark: &mut Mark) -> Result<i64> {
        let model = self.model(mark.event(), Direction::MarkToPoints)?;
        let points = model.evaluate(mark.value()).round_ties_even() as i64;
        mark.set_points(points);
        Ok(points)
    }

    /// Mark for `event` worth `points`.
    pub fn mark_for(&self, event: &str, points: i64) -> Result<Mark> {
        let key = self.event(event)?;
        let model = self.model(event, Direction::PointsToMark)?;
        let mut mark = Mark::from_numeric(key.to_string(), model.evaluate(points as f64));
        mark.set_points(points);
        Ok(mark)
    }

    /// Mark in `target` worth the same points as `mark`. Scores `mark` as a
    /// side effect.
    pub fn equivalent_mark(&self, mark: &mut Mark, target: &str) -> Result<Mark> {
        let points = self.points_for(mark)?;
        self.mark_for(target, points)
    }

    /// Raw form of the table, with every mark as a number.
    pub fn to_raw(&self) -> RawTable {
        let mut raw = RawTable::with_points(self.points.iter().copied());
        for column in &self.events {
            raw.insert(
                column.key.to_string(),
                column.marks.iter().map(|m| m.map(RawCell::Number)).collect(),
            );
        }
        raw
    }

    fn resolve(&self, event: &str) -> Result<usize> {
        event
            .parse::<EventKey>()
            .ok()
            .and_then(|key| self.index.get(&key).copied())
            .ok_or_else(|| ScoringError::UnknownEvent(event.to_string()))
    }
}

fn parse_points(cells: &[Option<RawCell>], problems: &mut Vec<String>) -> Vec<i64> {
    let mut points = Vec::with_capacity(cells.len());
    for (row, cell) in cells.iter().enumerate() {
        match cell {
            Some(RawCell::Number(n)) if n.fract() == 0.0 => points.push(*n as i64),
            other => problems.push(format!(
                "'{}' row {}: expected an integer, found {:?}",
                POINTS_COLUMN, row, other
            )),
        }
    }

    if let Some(row) = points.windows(2).position(|w| w[0] <= w[1]) {
        problems.push(format!(
            "'{}' must be strictly decreasing ({} followed by {} at row {})",
            POINTS_COLUMN,
            points[row],
            points[row + 1],
            row + 1
        ));
    }
    points
}
