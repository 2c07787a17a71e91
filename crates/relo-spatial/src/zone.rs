//! Zones and the ordered zone collection.
//!
//! A [`ZoneSet`] is immutable after [`load`](ZoneSet::load).  Its ordering —
//! ascending by `ZoneId` — is significant: position `i` in the set is row and
//! column `i` of the transition matrix, so the order must be total and
//! reproducible across runs.

use relo_core::{Envelope, Polygon, ZoneId};

use crate::{SpatialError, SpatialResult};

// ── Zone ──────────────────────────────────────────────────────────────────────

/// One spatial zone: a polygon plus the nominal population it held in the
/// transition data's base year.  Immutable after load.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub id: ZoneId,
    polygon: Polygon,

    /// Denominator of the move-share computation.  Non-negative; a zero
    /// baseline makes every resident of the zone a mover for any positive
    /// transition value.
    pub baseline_population: f64,
}

impl Zone {
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// The zone's precomputed axis-aligned bounding envelope.
    #[inline]
    pub fn envelope(&self) -> Envelope {
        self.polygon.envelope()
    }
}

// ── ZoneSet ───────────────────────────────────────────────────────────────────

/// The ordered, immutable collection of zones for one run.
#[derive(Debug)]
pub struct ZoneSet {
    zones: Vec<Zone>,
    bounds: Envelope,
}

impl ZoneSet {
    /// Build a zone set from geometries and their baseline populations.
    ///
    /// The two sequences correspond positionally.  Zones are sorted ascending
    /// by `ZoneId` after pairing, giving the stable order the transition
    /// matrix indexes into.
    ///
    /// Fails with a data fault if the sequence lengths differ, any baseline
    /// is negative, or no zones are given.
    pub fn load(
        geometries: Vec<(ZoneId, Polygon)>,
        baseline_populations: Vec<f64>,
    ) -> SpatialResult<ZoneSet> {
        if geometries.len() != baseline_populations.len() {
            return Err(SpatialError::ZoneCountMismatch {
                geometries: geometries.len(),
                baselines: baseline_populations.len(),
            });
        }
        if geometries.is_empty() {
            return Err(SpatialError::Empty);
        }

        let mut zones: Vec<Zone> = geometries
            .into_iter()
            .zip(baseline_populations)
            .map(|((id, polygon), baseline_population)| {
                if baseline_population < 0.0 {
                    return Err(SpatialError::NegativeBaseline {
                        zone: id,
                        baseline: baseline_population,
                    });
                }
                Ok(Zone { id, polygon, baseline_population })
            })
            .collect::<SpatialResult<_>>()?;

        zones.sort_by_key(|z| z.id);

        let mut bounds = zones[0].envelope();
        for zone in &zones[1..] {
            bounds.expand(zone.envelope());
        }

        Ok(ZoneSet { zones, bounds })
    }

    /// Union envelope of all zones — the area of interest the spatial index
    /// is sized to.
    #[inline]
    pub fn bounds(&self) -> Envelope {
        self.bounds
    }

    /// Zone at matrix position `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()` — a programmer error, since the engine only
    /// ever derives indices from the matrix dimension it was validated
    /// against.
    #[inline]
    pub fn zone_at(&self, index: usize) -> &Zone {
        &self.zones[index]
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }
}
