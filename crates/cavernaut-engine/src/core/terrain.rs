use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::grid::{Column, GRID_HEIGHT};

/// Highest row the cavern ceiling may reach.
pub const MIN_TOP: usize = 2;
/// Lowest row the cavern floor may reach.
pub const MAX_BOTTOM: usize = 18;
/// Minimum open rows between ceiling and floor.
pub const MIN_GAP: usize = 4;

/// Seed for deterministic cavern generation.
///
/// A 128-bit seed for the terrain random walk, serialized as a 32-character
/// hex string. Reusing a seed reproduces the exact cavern shape, which enables
/// deterministic testing and repeatable flights.
#[derive(Debug, Clone, Copy)]
pub struct TerrainSeed(pub [u8; 16]);

impl Serialize for TerrainSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for TerrainSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid terrain seed: {reason}")]
pub struct ParseTerrainSeedError {
    reason: String,
}

impl std::str::FromStr for TerrainSeed {
    type Err = ParseTerrainSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(ParseTerrainSeedError {
                reason: format!("expected 32 hex characters, got {}", hex_str.len()),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| ParseTerrainSeedError {
            reason: format!("{hex_str}: {e}"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<TerrainSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TerrainSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        TerrainSeed(seed)
    }
}

/// Carves the cavern one column at a time.
///
/// Each boundary takes a unit random walk per advance. The ceiling is clamped
/// first and its result feeds the floor clamp, so the gap invariant
/// `bottom - top >= MIN_GAP` holds even when both walks step inward on the
/// same tick.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    rng: Pcg32,
    top: i32,
    bottom: i32,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainGenerator {
    /// Creates a generator with a random seed and a fully open cavern.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic caverns.
    #[must_use]
    pub fn with_seed(seed: TerrainSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            top: MIN_TOP as i32,
            bottom: MAX_BOTTOM as i32,
        }
    }

    /// Current ceiling row of the freshest column.
    #[must_use]
    pub fn top(&self) -> usize {
        self.top as usize
    }

    /// Current floor row (exclusive) of the freshest column.
    #[must_use]
    pub fn bottom(&self) -> usize {
        self.bottom as usize
    }

    /// Walks both boundaries one step and returns the carved column.
    pub fn advance(&mut self) -> Column {
        let stepped_top = self.top + self.step();
        let stepped_bottom = self.bottom + self.step();

        // The ceiling may not get closer than MIN_GAP to wherever the floor
        // can end up, which is capped at MAX_BOTTOM.
        let floor_limit = stepped_bottom.min(MAX_BOTTOM as i32);
        self.top = stepped_top
            .min(floor_limit - MIN_GAP as i32)
            .max(MIN_TOP as i32);
        self.bottom = stepped_bottom
            .max(self.top + MIN_GAP as i32)
            .min(MAX_BOTTOM as i32);

        debug_assert!(self.bottom - self.top >= MIN_GAP as i32);
        debug_assert!(self.top >= MIN_TOP as i32 && self.bottom <= MAX_BOTTOM as i32);
        debug_assert!(self.bottom as usize <= GRID_HEIGHT);

        Column::carved(self.top(), self.bottom())
    }

    fn step(&mut self) -> i32 {
        if self.rng.random() { 1 } else { -1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: TerrainSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: TerrainSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed.0, deserialized.0);
        }

        #[test]
        fn test_format_is_32_char_hex_string() {
            let seed: TerrainSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let hex_str = serialized.trim_matches('"');

            assert_eq!(hex_str.len(), 32);
            assert!(hex_str.chars().all(|c| c.is_ascii_hexdigit()));
        }

        #[test]
        fn test_rejects_wrong_length() {
            let result: Result<TerrainSeed, _> = serde_json::from_str("\"abc\"");
            assert!(result.is_err());
        }
    }

    mod generation {
        use super::*;

        #[test]
        fn test_boundaries_stay_inside_limits() {
            let mut terrain = TerrainGenerator::with_seed(TerrainSeed([7; 16]));
            for _ in 0..10_000 {
                terrain.advance();
                assert!(terrain.top() >= MIN_TOP);
                assert!(terrain.bottom() <= MAX_BOTTOM);
                assert!(terrain.bottom() - terrain.top() >= MIN_GAP);
            }
        }

        #[test]
        fn test_gap_survives_first_advances_from_open_cavern() {
            // Starting at top=2, bottom=18, five advances with any seed must
            // keep the gap at MIN_GAP or wider.
            for seed_byte in 0..=255 {
                let mut terrain = TerrainGenerator::with_seed(TerrainSeed([seed_byte; 16]));
                assert_eq!((terrain.top(), terrain.bottom()), (MIN_TOP, MAX_BOTTOM));
                for _ in 0..5 {
                    terrain.advance();
                    assert!(terrain.bottom() - terrain.top() >= MIN_GAP);
                }
            }
        }

        #[test]
        fn test_advance_carves_current_gap() {
            let mut terrain = TerrainGenerator::with_seed(TerrainSeed([42; 16]));
            let column = terrain.advance();
            for row in 0..GRID_HEIGHT {
                let inside_gap = (terrain.top()..terrain.bottom()).contains(&row);
                assert_eq!(column.is_occupied(row), !inside_gap, "row {row}");
            }
        }

        #[test]
        fn test_same_seed_generates_same_cavern() {
            let mut a = TerrainGenerator::with_seed(TerrainSeed([9; 16]));
            let mut b = TerrainGenerator::with_seed(TerrainSeed([9; 16]));
            for _ in 0..100 {
                assert_eq!(a.advance(), b.advance());
            }
        }
    }
}
