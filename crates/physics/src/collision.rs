//! Hit testing of round bodies against segments, and the bounce response.

use engine_core::DVec2;

use crate::Segment;

/// Squared length below which a line segment is treated as a single point
/// (endpoints less than ~0.7 px apart).
pub const DEGENERATE_LENGTH_SQUARED: f64 = 0.5;

/// Relative speeds below this impart no impulse.
pub const MIN_RELATIVE_SPEED: f64 = 1e-6;

/// Where a body touched a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Point on the segment's centre line closest to the body.
    pub point: DVec2,
    /// Position of `point` along the segment, 0 at `p1` and 1 at `p2`.
    /// Always 0 for circles.
    pub t: f64,
}

/// Test a circle of `radius` at `center` against `segment`.
///
/// Circles use an inclusive distance test. For capsules the centre is
/// projected on the segment's line: inside the segment only the projected
/// point is tested, outside it only the nearer endpoint. The end caps are
/// not unioned with the shaft in the interior case.
pub fn hit_test(center: DVec2, radius: f64, segment: &Segment) -> Option<Contact> {
    let reach = radius + segment.radius();
    let reach_squared = reach * reach;

    if segment.is_circle() {
        return (center.distance_squared(segment.p1) <= reach_squared).then_some(Contact {
            point: segment.p1,
            t: 0.0,
        });
    }

    let line = segment.p2 - segment.p1;
    let line_squared = line.length_squared();
    if line_squared < DEGENERATE_LENGTH_SQUARED {
        return (center.distance_squared(segment.p1) < reach_squared).then_some(Contact {
            point: segment.p1,
            t: 0.0,
        });
    }

    let u = (center - segment.p1).dot(line) / line_squared;
    let (point, t) = if (0.0..=1.0).contains(&u) {
        (segment.p1 + line * u, u)
    } else if u < 0.0 {
        (segment.p1, 0.0)
    } else {
        (segment.p2, 1.0)
    };

    (center.distance_squared(point) < reach_squared).then_some(Contact { point, t })
}

/// Outcome of a bounce: where the body was pushed to and its new velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub center: DVec2,
    pub velocity: DVec2,
}

/// Push a round body of `radius` out of contact with a body of
/// `other_radius` touching at `contact`, and reflect its velocity relative
/// to the other body's `other_velocity` about the contact normal.
///
/// The other body is treated as infinitely heavy. Velocities are in
/// pixels per tick.
pub fn bounce_off(
    center: DVec2,
    velocity: DVec2,
    radius: f64,
    contact: DVec2,
    other_radius: f64,
    other_velocity: DVec2,
) -> Bounce {
    let relative = velocity - other_velocity;
    let dist = other_radius + radius;

    let offset = contact - center;
    let offset_len = offset.length();
    // Dead centre on the contact point: push straight up.
    let direction = if offset_len > f64::EPSILON {
        offset / offset_len
    } else {
        DVec2::Y
    };

    let new_center = contact - direction * dist;
    let to_contact = contact - new_center;

    let mut new_velocity = velocity;
    let speed_squared = relative.length_squared();
    let speed = speed_squared.sqrt();
    if speed > MIN_RELATIVE_SPEED && dist > 0.0 {
        // Triangle: centre -> contact (b), centre -> centre + relative (a),
        // and the closing side (c). The law of cosines gives the share of
        // the relative velocity along the contact normal.
        let b = dist;
        let c_squared = contact.distance_squared(new_center + relative);
        let cos_angle = (speed_squared + b * b - c_squared) / (2.0 * speed * b);
        let normal_speed = speed * cos_angle;
        new_velocity -= to_contact / dist * (2.0 * normal_speed);
    }

    Bounce {
        center: new_center,
        velocity: new_velocity,
    }
}
