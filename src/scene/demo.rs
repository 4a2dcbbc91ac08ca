//! The hard-coded demo scene: a small sunflower-seed sculpture lit by a
//! black-body sun and two sky lights, viewed by an orbiting camera.

use std::f64::consts::PI;

use crate::geometry::{Quaternion, Vec3};
use crate::scene::camera::Camera;
use crate::scene::materials::{
    BlackBody, Dielectric, DiffuseColoured, DiffuseGrey, GlossyMirror, SoapBubble,
};
use crate::scene::shapes::{make_prism, Circle, Paraboloid, Plane, Sphere};
use crate::scene::{Object, Scene};

const GOLDEN_RATIO: f64 = 1.618_033_988_749_8948;

/// Builds the scene rendered by every run: there is no scene-selection
/// option on the command line.
pub fn build() -> Scene {
    let mut objects = Vec::new();

    let sun_radius: f64 = 5.0;
    let sun_position = Vec3::zero();
    objects.push(Object::emissive(
        Box::new(Sphere::new(sun_position, sun_radius)),
        Box::new(BlackBody::new(6504.0, 1.0)),
    ));

    let floor_normal = Vec3::new(0.0, 0.0, -1.0);
    let floor_position = Vec3::new(0.0, 0.0, -sun_radius);
    let floor_paraboloid = Paraboloid::new(floor_normal, floor_position, sun_radius * sun_radius);
    objects.push(Object::reflective(Box::new(floor_paraboloid), Box::new(DiffuseGrey::new(0.8))));

    let wall_left_normal = Vec3::new(0.0, 0.0, 1.0);
    let wall_left_position = Vec3::new(1.0, 0.0, -sun_radius * sun_radius);
    objects.push(Object::reflective(
        Box::new(Paraboloid::new(wall_left_normal, wall_left_position, sun_radius * sun_radius)),
        Box::new(DiffuseColoured::new(0.9, 550.0, 40.0)),
    ));

    let wall_right_normal = Vec3::new(0.0, 0.0, 1.0);
    let wall_right_position = Vec3::new(-1.0, 0.0, -sun_radius * sun_radius);
    objects.push(Object::reflective(
        Box::new(Paraboloid::new(wall_right_normal, wall_right_position, sun_radius * sun_radius)),
        Box::new(DiffuseColoured::new(0.9, 660.0, 60.0)),
    ));

    let sky_height = 30.0;

    let sky1_radius = 5.0;
    let sky1_position = Vec3::new(-sun_radius, 0.0, sky_height);
    objects.push(Object::emissive(
        Box::new(Circle::new(-floor_normal, sky1_position, sky1_radius)),
        Box::new(BlackBody::new(7600.0, 0.6)),
    ));

    let sky2_radius = 15.0;
    let sky2_position = Vec3::new(-sun_radius * 0.5, sun_radius * 2.0 + sky2_radius, sky_height);
    objects.push(Object::emissive(
        Box::new(Circle::new(-floor_normal, sky2_position, sky2_radius)),
        Box::new(BlackBody::new(5000.0, 0.6)),
    ));

    let ceiling_position = Vec3::new(0.0, 0.0, sky_height * 2.0);
    objects.push(Object::reflective(
        Box::new(Plane::new(floor_normal, ceiling_position)),
        Box::new(DiffuseColoured::new(0.5, 470.0, 25.0)),
    ));

    // The spiral arrangement of seeds follows the golden angle, so that
    // seeds never line up radially no matter how many are added.
    let gamma = 2.0 * PI * (1.0 - 1.0 / GOLDEN_RATIO);
    let seed_size = 0.8;
    let seed_scale = 1.5;
    let first_seed =
        (((sun_radius / seed_scale + 1.0) * (sun_radius / seed_scale + 1.0)) + 0.5) as i64;
    let seeds = 100_i64;

    for i in first_seed..(first_seed + seeds) {
        let phi = i as f64 * gamma;
        let r = (i as f64).sqrt() * seed_scale;
        let position = sun_position
            + Vec3::new(phi.cos() * r, phi.sin() * r, (r - sun_radius) * -0.5);
        let wavelength = (i - first_seed) as f64 / seeds as f64 * 130.0 + 600.0;
        objects.push(Object::reflective(
            Box::new(Sphere::new(position, seed_size)),
            Box::new(DiffuseColoured::new(0.9, wavelength, 60.0)),
        ));
    }

    for i in first_seed..(first_seed + seeds) {
        let phi = (i as f64 + 0.5) * gamma;
        let r = (i as f64 + 0.5).sqrt() * seed_scale;
        let position = sun_position
            + Vec3::new(phi.cos() * r, phi.sin() * r, (r - sun_radius) * -0.25);
        objects.push(Object::reflective(
            Box::new(Sphere::new(position, seed_size * 0.5)),
            Box::new(GlossyMirror::new(0.1)),
        ));
    }

    for i in (first_seed / 2)..(first_seed + seeds) {
        let phi = -(i as f64) * gamma;
        let r = (i as f64).sqrt() * seed_scale * 1.5;
        let position = sun_position
            + Vec3::new(phi.cos() * r, phi.sin() * r, (r - sun_radius) * 1.5 + sun_radius * 2.0);
        objects.push(Object::reflective(
            Box::new(Sphere::new(position, seed_size * (0.5 + (i as f64).sqrt() * 0.2))),
            Box::new(SoapBubble),
        ));
    }

    // A single hexagonal-prism stand-in: a glass prism carved from the
    // CSG combinator, set just outside the seed sculpture, along the
    // floor paraboloid's focus direction.
    let prism_radius = 17.0;
    let phi = 0.0_f64;
    let mut position = Vec3::new(phi.cos() * prism_radius, phi.sin() * prism_radius, 0.0);
    let probe = crate::geometry::Ray::new(position, Vec3::new(0.0, 0.0, -1.0), 550.0, 1.0);
    if let Some(hit) = floor_paraboloid.intersect(&probe) {
        let normal = -hit.normal;
        position = hit.position + normal * 2.0;
        objects.push(Object::reflective(
            Box::new(make_prism(normal, position, 3.0, phi, 8.0)),
            Box::new(Dielectric::sf10_glass()),
        ));
    }

    Scene::new(objects, camera_at_time)
}

fn camera_at_time(t: f64) -> Camera {
    let phi = PI + PI * 0.01 * t;
    let alpha = PI * 0.3 - PI * 0.01 * t;
    let distance = 50.0 - 0.5 * t;

    let position = Vec3::new(
        alpha.cos() * phi.sin() * distance,
        alpha.cos() * phi.cos() * distance,
        alpha.sin() * distance,
    );

    let orientation = Quaternion::rotation(Vec3::new(0.0, 0.0, -1.0), PI + phi)
        * Quaternion::rotation(Vec3::new(1.0, 0.0, 0.0), -alpha);

    Camera {
        position,
        field_of_view: PI * 0.35,
        orientation,
        focal_distance: position.length() * 0.9,
        depth_of_field: 2.0,
        chromatic_aberration: 0.012,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_builds_without_panicking() {
        let scene = build();
        assert!(!scene.objects.is_empty());
        assert!(scene.objects.iter().any(|o| o.emissive_material.is_some()));
        assert!(scene.objects.iter().any(|o| o.material.is_some()));
    }

    #[test]
    fn camera_orbits_at_a_roughly_constant_distance() {
        let camera0 = camera_at_time(0.0);
        let camera1 = camera_at_time(1.0);
        assert!((camera0.position.length() - 50.0).abs() < 1e-6);
        assert!((camera1.position.length() - 49.5).abs() < 1e-6);
    }
}
