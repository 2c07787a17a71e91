//! Planar geometry: points, axis-aligned envelopes, and polygons.
//!
//! Coordinates are `f64` x/y pairs in a projected (planar) CRS — the
//! transition grids this toolkit consumes are metric grids, so no spherical
//! arithmetic is needed anywhere.
//!
//! `Polygon` precomputes its bounding [`Envelope`] at construction.  The
//! relocation engine's default policy works entirely on envelopes; exact
//! containment ([`Polygon::contains`]) exists only for the strict policy
//! variant.

use crate::{CoreError, CoreResult};

// ── Point ─────────────────────────────────────────────────────────────────────

/// A planar coordinate in a projected CRS.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// An axis-aligned bounding rectangle.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`.  Zero-extent envelopes
/// (a point or a line) are valid; construction from a point set always
/// produces a tight envelope.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Tight envelope of a point set.  Returns `None` for an empty set.
    pub fn of_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Envelope> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut env = Envelope::new(first.x, first.y, first.x, first.y);
        for p in iter {
            env.expand_point(p);
        }
        Some(env)
    }

    /// Grow `self` to also cover `p`.
    pub fn expand_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Grow `self` to also cover `other` (envelope union).
    pub fn expand(&mut self, other: Envelope) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Closed containment test: boundary points count as inside.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_y <= p.y && p.y <= self.max_y
    }

    /// Strict containment test: boundary points count as outside.
    ///
    /// Used for index admission — agents sitting exactly on the study-area
    /// boundary are excluded, matching the closed/open split of the query
    /// side.
    #[inline]
    pub fn contains_interior(&self, p: Point) -> bool {
        self.min_x < p.x && p.x < self.max_x && self.min_y < p.y && p.y < self.max_y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() * 0.5,
            self.min_y + self.height() * 0.5,
        )
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}] x [{:.2}, {:.2}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

// ── Polygon ───────────────────────────────────────────────────────────────────

/// A simple planar polygon given as its exterior vertex ring.
///
/// The ring may be given open or closed (first vertex repeated at the end);
/// containment treats it as implicitly closed either way.  Holes and
/// multi-part geometries are not modelled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    exterior: Vec<Point>,
    envelope: Envelope,
}

impl Polygon {
    /// Build a polygon from its exterior ring, precomputing the envelope.
    pub fn new(exterior: Vec<Point>) -> CoreResult<Self> {
        if exterior.len() < 3 {
            return Err(CoreError::DegeneratePolygon(exterior.len()));
        }
        let mut envelope = Envelope::new(exterior[0].x, exterior[0].y, exterior[0].x, exterior[0].y);
        for p in &exterior[1..] {
            envelope.expand_point(*p);
        }
        Ok(Self { exterior, envelope })
    }

    /// Convenience constructor for an axis-aligned rectangular cell — the
    /// shape of every zone in a regular transition grid.
    pub fn rectangle(env: Envelope) -> Self {
        Self {
            exterior: vec![
                Point::new(env.min_x, env.min_y),
                Point::new(env.max_x, env.min_y),
                Point::new(env.max_x, env.max_y),
                Point::new(env.min_x, env.max_y),
            ],
            envelope: env,
        }
    }

    #[inline]
    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    pub fn exterior(&self) -> &[Point] {
        &self.exterior
    }

    /// Even-odd ray-cast containment test.
    ///
    /// Points exactly on an edge may resolve either way (floating-point
    /// boundary behaviour); callers needing boundary guarantees should test
    /// against the envelope instead.
    pub fn contains(&self, p: Point) -> bool {
        // Cheap rejection before the O(n) ray cast.
        if !self.envelope.contains(p) {
            return false;
        }
        let ring = &self.exterior;
        let mut inside = false;
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}
