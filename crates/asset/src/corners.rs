//! Texture-space corner scan used to line up projected meshes.
//!
//! Each corner is an independent single pass over the vertices: a vertex only
//! replaces the current pick when it is strictly further out on BOTH u and v.
//! This is not a bounding box; on skewed layouts a pick may not be the true
//! extreme, and a corner may stay unfound.

use crate::mesh::Vertex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    MinUMinV,
    MinUMaxV,
    MaxUMinV,
    MaxUMaxV,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::MinUMinV,
        Corner::MinUMaxV,
        Corner::MaxUMinV,
        Corner::MaxUMaxV,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Corner::MinUMinV => "min-u/min-v",
            Corner::MinUMaxV => "min-u/max-v",
            Corner::MaxUMinV => "max-u/min-v",
            Corner::MaxUMaxV => "max-u/max-v",
        }
    }

    /// (u is minimised, v is minimised)
    fn direction(self) -> (bool, bool) {
        match self {
            Corner::MinUMinV => (true, true),
            Corner::MinUMaxV => (true, false),
            Corner::MaxUMinV => (false, true),
            Corner::MaxUMaxV => (false, false),
        }
    }

    /// Starting "unfound" value of the search.
    fn sentinel(self) -> [f32; 2] {
        let (min_u, min_v) = self.direction();
        let start = |min: bool| if min { f32::INFINITY } else { f32::NEG_INFINITY };
        [start(min_u), start(min_v)]
    }

    fn improves(self, candidate: [f32; 2], best: [f32; 2]) -> bool {
        let (min_u, min_v) = self.direction();
        let better = |min: bool, c: f32, b: f32| if min { c < b } else { c > b };
        better(min_u, candidate[0], best[0]) && better(min_v, candidate[1], best[1])
    }

    fn find(self, vertices: &[Vertex]) -> Option<Vertex> {
        let mut best = self.sentinel();
        let mut pick = None;
        for v in vertices {
            if self.improves(v.uv, best) {
                best = v.uv;
                pick = Some(*v);
            }
        }
        pick
    }
}

/// Outcome of the four corner searches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CornerReport {
    found: [Option<Vertex>; 4],
}

impl CornerReport {
    pub fn scan(vertices: &[Vertex]) -> Self {
        Self {
            found: Corner::ALL.map(|corner| corner.find(vertices)),
        }
    }

    pub fn get(&self, corner: Corner) -> Option<&Vertex> {
        self.found[corner as usize].as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.found.iter().all(Option::is_some)
    }

    pub fn missing(&self) -> impl Iterator<Item = Corner> + '_ {
        Corner::ALL
            .into_iter()
            .filter(|corner| self.get(*corner).is_none())
    }

    /// Log every corner of `name`'s mesh: found ones at info, misses at warn.
    pub fn log(&self, name: &str) {
        for corner in Corner::ALL {
            match self.get(corner) {
                Some(v) => log::info!(
                    "{}: {} corner at position ({}, {}, {}) uv ({}, {})",
                    name,
                    corner.label(),
                    v.position[0],
                    v.position[1],
                    v.position[2],
                    v.uv[0],
                    v.uv[1]
                ),
                None => log::warn!("{}: no vertex found for {} corner", name, corner.label()),
            }
        }
    }
}
