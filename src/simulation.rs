use iced::{Size, Vector};

use crate::options::Options;
use crate::particles::ParticleSet;

/// Advances every particle by one tick.
///
/// Parallax offsets ease towards `tilt * depth * scale` by a tenth of the gap
/// each tick. Boundaries are checked against the drawn point, per axis: a
/// bouncing axis only flips its velocity, a wrapping axis moves the raw
/// position so the drawn point lands on the opposite side.
pub fn step(set: &mut ParticleSet, options: &Options, tilt: Vector, bounds: Size) {
    let parallax = options.parallax != 0.0;
    let scale = set.parallax_scale;

    for p in set.particles.iter_mut() {
        p.position = p.position + p.velocity;

        if parallax {
            let fac = p.z * scale;
            p.offset.x += (tilt.x * fac - p.offset.x) / 10.0;
            p.offset.y += (tilt.y * fac - p.offset.y) / 10.0;
        }

        let drawn = p.drawn();

        if drawn.x < 0.0 || drawn.x > bounds.width {
            if options.bounce_x {
                p.velocity.x = -p.velocity.x;
            } else {
                p.position.x = wrap(drawn.x, bounds.width) - p.offset.x;
            }
        }

        if drawn.y < 0.0 || drawn.y > bounds.height {
            if options.bounce_y {
                p.velocity.y = -p.velocity.y;
            } else {
                p.position.y = wrap(drawn.y, bounds.height) - p.offset.y;
            }
        }
    }
}

fn wrap(v: f32, max: f32) -> f32 {
    (v + max) % max
}
