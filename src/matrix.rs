//! Distance/duration matrix and the place index used to address it.

use std::collections::HashMap;

use crate::error::{MatrixUnavailable, PlanError, PlanResult};
use crate::model::{Place, TravelLeg};

/// Leg substituted for cells the upstream service could not route.
pub const FALLBACK_LEG_METERS: u32 = 1000;
pub const FALLBACK_LEG_SECONDS: u32 = 900;

/// Where the matrix numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixSource {
    /// A routing service.
    Provider,
    /// Straight-line estimate.
    Estimated,
}

/// One origin/destination pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixCell {
    pub duration_seconds: u32,
    pub distance_meters: u32,
    pub duration_text: String,
    pub distance_text: String,
}

impl MatrixCell {
    pub fn new(duration_seconds: u32, distance_meters: u32) -> Self {
        Self {
            duration_seconds,
            distance_meters,
            duration_text: duration_text(duration_seconds),
            distance_text: distance_text(distance_meters),
        }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    pub fn fallback_leg() -> Self {
        Self::new(FALLBACK_LEG_SECONDS, FALLBACK_LEG_METERS)
    }

    /// Travel time in whole minutes, rounded up.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_seconds.div_ceil(60)
    }

    pub fn to_leg(&self) -> TravelLeg {
        TravelLeg {
            duration_seconds: self.duration_seconds,
            distance_meters: self.distance_meters,
            duration_minutes: self.duration_minutes(),
            duration_text: self.duration_text.clone(),
            distance_text: self.distance_text.clone(),
        }
    }
}

/// Square matrix indexed by the location order it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationMatrix {
    cells: Vec<Vec<MatrixCell>>,
    source: MatrixSource,
}

impl DurationMatrix {
    /// Build from possibly-missing cells. Missing off-diagonal cells become
    /// the fallback leg; the diagonal is always zero. Rows must form a
    /// square matrix.
    pub fn from_rows(
        rows: Vec<Vec<Option<MatrixCell>>>,
        source: MatrixSource,
    ) -> Result<Self, MatrixUnavailable> {
        let n = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != n) {
            return Err(MatrixUnavailable::Shape {
                rows: n,
                cols: row.len(),
                expected: n,
            });
        }

        let cells = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, cell)| match cell {
                        _ if i == j => MatrixCell::zero(),
                        Some(cell) => cell,
                        None => MatrixCell::fallback_leg(),
                    })
                    .collect()
            })
            .collect();

        Ok(Self { cells, source })
    }

    /// Build an `n x n` matrix from a cell function; the diagonal is zero.
    pub fn from_fn<F>(n: usize, source: MatrixSource, cell: F) -> Self
    where
        F: Fn(usize, usize) -> MatrixCell,
    {
        let cells = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { MatrixCell::zero() } else { cell(i, j) })
                    .collect()
            })
            .collect();
        Self { cells, source }
    }

    pub(crate) fn from_cell_rows(cells: Vec<Vec<MatrixCell>>, source: MatrixSource) -> Self {
        Self { cells, source }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn source(&self) -> MatrixSource {
        self.source
    }

    pub fn cell(&self, from: usize, to: usize) -> Option<&MatrixCell> {
        self.cells.get(from).and_then(|row| row.get(to))
    }

    pub fn duration(&self, from: usize, to: usize) -> Option<u32> {
        self.cell(from, to).map(|cell| cell.duration_seconds)
    }
}

/// Stable place-id to matrix-index map, built once per optimization.
#[derive(Debug, Clone, Default)]
pub struct PlaceIndex {
    positions: HashMap<String, usize>,
}

impl PlaceIndex {
    pub fn build(places: &[Place]) -> PlanResult<Self> {
        let mut positions = HashMap::with_capacity(places.len());
        for (i, place) in places.iter().enumerate() {
            if positions.insert(place.id.clone(), i).is_some() {
                return Err(PlanError::DuplicatePlaceId(place.id.clone()));
            }
        }
        Ok(Self { positions })
    }

    pub fn get(&self, place: &Place) -> PlanResult<usize> {
        self.positions
            .get(&place.id)
            .copied()
            .ok_or_else(|| PlanError::UnknownPlace(place.id.clone()))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Matrix cell for travelling between two indexed places.
    pub fn cell<'m>(
        &self,
        matrix: &'m DurationMatrix,
        from: &Place,
        to: &Place,
    ) -> PlanResult<&'m MatrixCell> {
        let (i, j) = (self.get(from)?, self.get(to)?);
        matrix.cell(i, j).ok_or(PlanError::MatrixSizeMismatch {
            matrix: matrix.len(),
            places: self.len(),
        })
    }
}

/// "850 m" below a kilometre, "1.2 km" above.
pub fn distance_text(meters: u32) -> String {
    if meters < 1000 {
        format!("{} m", meters)
    } else {
        format!("{:.1} km", f64::from(meters) / 1000.0)
    }
}

/// "1 min", "15 mins", "1 hour 5 mins", "2 hours".
pub fn duration_text(seconds: u32) -> String {
    let minutes = seconds.div_ceil(60);
    let (hours, rest) = (minutes / 60, minutes % 60);

    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("{} {}", n, unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (hours, rest) {
        (0, m) => plural(m, "min"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{} {}", plural(h, "hour"), plural(m, "min")),
    }
}
