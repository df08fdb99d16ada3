//! Snell refraction, forward projection and mirrored sampling

use glam::{DVec2, DVec3};
use image::{Rgba, RgbaImage};

/// Outcome of refracting one ray at one surface point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Refraction {
    /// The ray passes through in this (unit) direction
    Transmitted(DVec3),
    /// `sin(theta) * index` exceeded 1; no transmitted ray exists
    TotalInternalReflection {
        /// The offending `sin(theta) * index` value
        incidence: f64,
    },
}

/// Refract `incident` through a surface with the given unit `normal`
///
/// Uses the vector form of Snell's law: the angle of incidence `theta` is
/// taken from `|incident · normal|`, the outgoing angle is
/// `asin(sin(theta) * index)`, and the result is
/// `normal * cos(theta') + tangent * sin(theta')` where `tangent` is the
/// incident direction with its normal component removed and renormalized.
/// At normal incidence the tangent is zero and the ray leaves along `normal`.
///
/// The incident direction is first flipped onto the side of `normal`, so
/// the transmitted ray always leaves on that side and an index of 1 never
/// bends it.
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use shattered_glass::render::{refract, Refraction};
///
/// let through = refract(DVec3::NEG_Z, DVec3::Z, 1.0);
/// assert_eq!(through, Refraction::Transmitted(DVec3::Z));
/// ```
pub fn refract(incident: DVec3, normal: DVec3, index: f64) -> Refraction {
    let (incident, along) = match incident.dot(normal) {
        along if along < 0.0 => (-incident, -along),
        along => (incident, along),
    };
    let theta = along.min(1.0).acos();

    let incidence = theta.sin() * index;
    if incidence > 1.0 {
        return Refraction::TotalInternalReflection { incidence };
    }
    let theta_out = incidence.asin();

    let tangent = (incident - normal * along).normalize_or_zero();
    Refraction::Transmitted(normal * theta_out.cos() + tangent * theta_out.sin())
}

/// XY displacement after travelling `distance` along the ray's Z component
///
/// Returns `None` when the ray has no positive Z component to travel along.
#[inline]
pub fn project_offset(refracted: DVec3, distance: f64) -> Option<DVec2> {
    if refracted.z <= 0.0 {
        return None;
    }
    Some(refracted.truncate() * (distance / refracted.z))
}

/// Fold `value` into `[min, max]` by mirroring across the edges
///
/// The mirror includes the edge pixel, so `max + 1` maps to `max` and
/// `min - 1` to `min`; the pattern repeats with period `2 * (max - min + 1)`.
/// Runs in constant time for any offset.
///
/// # Panics
///
/// Panics if `max < min`.
///
/// # Example
///
/// ```
/// use shattered_glass::render::reflect_pad;
///
/// assert_eq!(reflect_pad(0, 9, 10), 9);
/// assert_eq!(reflect_pad(0, 9, -1), 0);
/// assert_eq!(reflect_pad(0, 9, 4), 4);
/// ```
pub fn reflect_pad(min: i64, max: i64, value: i64) -> i64 {
    assert!(max >= min, "reflect_pad: empty range [{min}, {max}]");

    let span = i128::from(max) - i128::from(min) + 1;
    let phase = (i128::from(value) - i128::from(min)).rem_euclid(2 * span);
    let folded = if phase < span { phase } else { 2 * span - 1 - phase };

    // folded < span, so the sum lies in [min, max]
    (i128::from(min) + folded) as i64
}

/// Sample `image` at an arbitrary integer coordinate with mirrored borders
///
/// The image must be non-empty.
#[inline]
pub fn sample_reflected(image: &RgbaImage, x: i64, y: i64) -> Rgba<u8> {
    let x = reflect_pad(0, i64::from(image.width()) - 1, x);
    let y = reflect_pad(0, i64::from(image.height()) - 1, y);
    *image.get_pixel(x as u32, y as u32)
}
