//! Random site placement over the image plane
//!
//! Sites are drawn uniformly from the bounding rectangle with a seeded
//! ChaCha8 generator, so a given seed always shatters the glass the same way.

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generate `count` uniformly random sites inside `[min, max)`
///
/// # Arguments
///
/// * `count` - Number of sites to generate
/// * `min` - Lower corner of the bounding rectangle
/// * `max` - Upper corner of the bounding rectangle (must exceed `min` on both axes)
/// * `seed` - Random seed for deterministic placement
///
/// # Example
///
/// ```rust
/// use shattered_glass::generation::generate_sites;
/// use glam::DVec2;
///
/// let sites = generate_sites(100, DVec2::ZERO, DVec2::new(640.0, 480.0), 42);
/// assert_eq!(sites.len(), 100);
/// ```
pub fn generate_sites(count: usize, min: DVec2, max: DVec2, seed: u32) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    generate_sites_with_rng(count, min, max, &mut rng)
}

/// Generate sites from a caller-provided generator
pub fn generate_sites_with_rng<R: Rng + ?Sized>(
    count: usize,
    min: DVec2,
    max: DVec2,
    rng: &mut R,
) -> Vec<DVec2> {
    if count == 0 {
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            DVec2::new(
                rng.gen_range(min.x..max.x),
                rng.gen_range(min.y..max.y),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_count() {
        for count in [1, 10, 500] {
            let sites = generate_sites(count, DVec2::ZERO, DVec2::splat(100.0), 42);
            assert_eq!(sites.len(), count);
        }
    }

    #[test]
    fn test_sites_empty() {
        let sites = generate_sites(0, DVec2::ZERO, DVec2::splat(100.0), 42);
        assert!(sites.is_empty());
    }

    #[test]
    fn test_sites_within_bounds() {
        let min = DVec2::new(-20.0, 5.0);
        let max = DVec2::new(30.0, 7.5);
        for site in generate_sites(1000, min, max, 9) {
            assert!(site.x >= min.x && site.x < max.x, "x={} out of range", site.x);
            assert!(site.y >= min.y && site.y < max.y, "y={} out of range", site.y);
        }
    }

    #[test]
    fn test_sites_determinism() {
        let sites1 = generate_sites(100, DVec2::ZERO, DVec2::splat(50.0), 42);
        let sites2 = generate_sites(100, DVec2::ZERO, DVec2::splat(50.0), 42);
        assert_eq!(sites1, sites2);
    }

    #[test]
    fn test_sites_different_seeds() {
        let sites1 = generate_sites(100, DVec2::ZERO, DVec2::splat(50.0), 12345);
        let sites2 = generate_sites(100, DVec2::ZERO, DVec2::splat(50.0), 67890);
        assert_ne!(sites1, sites2, "Different seeds should produce different sites");
    }
}
