//! Surface primitives and the CSG intersection combinator.

use crate::geometry::{Intersection, Ray, Vec3};

/// A hittable surface. `contains` only needs a correct answer for shapes
/// used as a CSG operand (a "volume" in the source's terms); primitives
/// that are never combined can leave it at the default.
pub trait Shape: Send + Sync {
    fn intersect(&self, ray: &Ray) -> Option<Intersection>;

    fn contains(&self, _point: Vec3) -> bool {
        false
    }
}

#[derive(Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: Vec3,
}

impl Plane {
    pub fn new(normal: Vec3, offset: Vec3) -> Plane {
        Plane { normal, offset }
    }
}

impl Shape for Plane {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let local_origin = ray.origin - self.offset;
        let t = -Vec3::dot(self.normal, local_origin) / Vec3::dot(self.normal, ray.direction);
        if t <= 0.0 {
            return None;
        }

        let sign = Vec3::dot(self.normal, ray.direction);
        let normal = if sign < 0.0 { self.normal } else { -self.normal };
        Some(Intersection {
            position: ray.point_at(t),
            normal,
            tangent: Vec3::zero(),
            distance: t,
        })
    }
}

/// A one-sided plane: half of space, used as a CSG operand to carve out
/// prisms and thick slabs.
#[derive(Clone, Copy)]
pub struct SpacePartitioning {
    pub normal: Vec3,
    pub offset: Vec3,
}

impl SpacePartitioning {
    pub fn new(normal: Vec3, offset: Vec3) -> SpacePartitioning {
        SpacePartitioning { normal, offset }
    }
}

impl Shape for SpacePartitioning {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let local_origin = ray.origin - self.offset;
        let t = -Vec3::dot(self.normal, local_origin) / Vec3::dot(self.normal, ray.direction);
        if t <= 0.0 {
            return None;
        }
        Some(Intersection {
            position: ray.point_at(t),
            normal: self.normal,
            tangent: Vec3::zero(),
            distance: t,
        })
    }

    fn contains(&self, point: Vec3) -> bool {
        Vec3::dot(point - self.offset, self.normal) < 0.0
    }
}

/// A disc: a [`Plane`] clipped to a radius. Used for the demo scene's
/// sky lights.
#[derive(Clone, Copy)]
pub struct Circle {
    pub plane: Plane,
    pub radius_squared: f64,
}

impl Circle {
    pub fn new(normal: Vec3, offset: Vec3, radius: f64) -> Circle {
        Circle { plane: Plane::new(normal, offset), radius_squared: radius * radius }
    }
}

impl Shape for Circle {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let hit = self.plane.intersect(ray)?;
        if (hit.position - self.plane.offset).squared_length() <= self.radius_squared {
            Some(hit)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy)]
pub struct Sphere {
    pub position: Vec3,
    pub radius_squared: f64,
}

impl Sphere {
    pub fn new(position: Vec3, radius: f64) -> Sphere {
        Sphere { position, radius_squared: radius * radius }
    }

    fn roots(&self, ray: &Ray) -> Option<(f64, f64)> {
        let centre_difference = self.position - ray.origin;
        let b = 2.0 * Vec3::dot(ray.direction, centre_difference);
        let c = centre_difference.squared_length() - self.radius_squared;
        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        Some((-0.5 * (-b + sqrt_d), -0.5 * (-b - sqrt_d)))
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let (t1, t2) = self.roots(ray)?;

        let t = if t1 > 0.0 && t1 < t2 {
            t1
        } else if t2 > 0.0 && t2 < t1 {
            t2
        } else {
            return None;
        };

        let position = ray.point_at(t);
        let normal = (position - self.position).normalized();
        let up = Vec3::new(0.0, 1.0, 0.0);
        let tangent = Vec3::cross(up, normal).normalized();

        Some(Intersection { position, normal, tangent, distance: t })
    }

    fn contains(&self, point: Vec3) -> bool {
        (point - self.position).squared_length() < self.radius_squared
    }
}

/// A dish: the set of points equidistant from a focal point and a plane.
/// Used for the scene's parabolic mirror.
#[derive(Clone, Copy)]
pub struct Paraboloid {
    pub offset: Vec3,
    pub normal: Vec3,
    pub focal_point: Vec3,
}

impl Paraboloid {
    /// `offset` is the top of the dish, `focal_distance` the distance
    /// from the top (not the plane) to the focal point.
    pub fn new(normal: Vec3, offset: Vec3, focal_distance: f64) -> Paraboloid {
        Paraboloid {
            offset: offset - normal * focal_distance,
            normal,
            focal_point: normal * (focal_distance * 2.0),
        }
    }
}

impl Shape for Paraboloid {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let local_origin = ray.origin - self.offset;
        let n_dot_d = Vec3::dot(self.normal, ray.direction);
        let n_dot_o = Vec3::dot(self.normal, local_origin);
        let focal_offset = local_origin - self.focal_point;

        let a = n_dot_d * n_dot_d - 1.0;
        let b = 2.0 * n_dot_d * n_dot_o - 2.0 * Vec3::dot(ray.direction, focal_offset);
        let c = n_dot_o * n_dot_o - focal_offset.squared_length();

        let t = if a == 0.0 {
            let t = -c / b;
            if t < 0.0 {
                return None;
            }
            t
        } else {
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return None;
            }
            let sqrt_d = discriminant.sqrt();
            let t1 = 0.5 * (-b + sqrt_d) / a;
            let t2 = 0.5 * (-b - sqrt_d) / a;
            if t1 > 0.0 && (t1 < t2 || t2 <= 0.0) {
                t1
            } else if t2 > 0.0 {
                t2
            } else {
                return None;
            }
        };

        let position = ray.point_at(t);
        let local_intersection = position - self.offset;
        let plane_projection =
            local_intersection - self.normal * Vec3::dot(local_intersection, self.normal);
        let normal = (self.focal_point - plane_projection).normalized();

        Some(Intersection { position, normal, tangent: Vec3::zero(), distance: t })
    }
}

/// The intersection of two shapes: the nearer hit that also lies inside
/// the other operand. Both operands must answer `contains` correctly.
pub struct CsgIntersection<A, B> {
    pub a: A,
    pub b: B,
}

impl<A, B> CsgIntersection<A, B> {
    pub fn new(a: A, b: B) -> CsgIntersection<A, B> {
        CsgIntersection { a, b }
    }
}

impl<A: Shape, B: Shape> Shape for CsgIntersection<A, B> {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let mut hit_a = self.a.intersect(ray);
        let mut hit_b = self.b.intersect(ray);

        if let Some(i1) = &hit_a {
            if !self.b.contains(i1.position) {
                hit_a = None;
            }
        }
        if let Some(i2) = &hit_b {
            if !self.a.contains(i2.position) {
                hit_b = None;
            }
        }

        match (hit_a, hit_b) {
            (None, None) => None,
            (Some(i1), None) => Some(i1),
            (None, Some(i2)) => Some(i2),
            (Some(i1), Some(i2)) => {
                if (i1.position - ray.origin).squared_length()
                    < (i2.position - ray.origin).squared_length()
                {
                    Some(i1)
                } else {
                    Some(i2)
                }
            }
        }
    }

    fn contains(&self, point: Vec3) -> bool {
        self.a.contains(point) && self.b.contains(point)
    }
}

pub type ConvexLens = CsgIntersection<Sphere, Sphere>;
pub type InfinitePrism =
    CsgIntersection<CsgIntersection<SpacePartitioning, SpacePartitioning>, SpacePartitioning>;
pub type ThickPlane = CsgIntersection<SpacePartitioning, SpacePartitioning>;
pub type Prism = CsgIntersection<InfinitePrism, ThickPlane>;

/// Solves the lensmaker's equation for the two sphere radii that produce
/// a convex lens with the given thickness and focal length.
pub fn make_convex_lens(
    position: Vec3,
    axis: Vec3,
    thickness: f64,
    focal_length: f64,
    index_of_refraction: f64,
) -> ConvexLens {
    let n = index_of_refraction;
    let d = focal_length * (n - 1.0) * (n - 1.0) * n * (focal_length * n - thickness);
    let r1 = (d.sqrt() + focal_length * n * n - focal_length * n) / n;
    let r2 = -(d.sqrt() + focal_length * n * n - focal_length * n) / n;

    let s1 = Sphere::new(position + axis * (r1 - thickness * 0.5), r1);
    let s2 = Sphere::new(position - axis * (r1 - thickness * 0.5), r2);
    CsgIntersection::new(s1, s2)
}

/// An equilateral triangle, infinitely extruded along `axis`, rotated by
/// `angle`.
pub fn make_infinite_prism(axis: Vec3, offset: Vec3, edge_length: f64, angle: f64) -> InfinitePrism {
    use std::f64::consts::PI;

    let radius = 3.0_f64.sqrt() / 6.0 * edge_length;
    let a1 = angle;
    let a2 = angle + PI * 2.0 / 3.0;
    let a3 = angle + PI * 4.0 / 3.0;

    let p1 = Vec3::new(a1.cos(), a1.sin(), 0.0).rotate_towards(axis);
    let p2 = Vec3::new(a2.cos(), a2.sin(), 0.0).rotate_towards(axis);
    let p3 = Vec3::new(a3.cos(), a3.sin(), 0.0).rotate_towards(axis);

    let sp1 = SpacePartitioning::new(p1, p1 * radius + offset);
    let sp2 = SpacePartitioning::new(p2, p2 * radius + offset);
    let sp3 = SpacePartitioning::new(p3, p3 * radius + offset);

    CsgIntersection::new(CsgIntersection::new(sp1, sp2), sp3)
}

/// A thick, infinite wall: one face through `offset`, the other
/// translated `thickness` along `normal`.
pub fn make_thick_plane(normal: Vec3, offset: Vec3, thickness: f64) -> ThickPlane {
    CsgIntersection::new(
        SpacePartitioning::new(-normal, offset),
        SpacePartitioning::new(normal, offset + normal * thickness),
    )
}

/// A prism along `axis`, with an equilateral base of the given edge
/// length at `offset`, rotated by `angle`, extruded for `height`.
pub fn make_prism(axis: Vec3, offset: Vec3, edge_length: f64, angle: f64, height: f64) -> Prism {
    CsgIntersection::new(
        make_infinite_prism(axis, offset, edge_length, angle),
        make_thick_plane(axis, offset, height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(origin: Vec3, direction: Vec3) -> Ray {
        Ray::new(origin, direction.normalized(), 550.0, 1.0)
    }

    #[test]
    fn sphere_intersects_through_its_centre() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let hit = sphere.intersect(&ray(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0))).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-9);
    }

    #[test]
    fn sphere_misses_a_ray_that_passes_it_by() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        assert!(sphere.intersect(&ray(Vec3::zero(), Vec3::new(1.0, 0.0, 0.0))).is_none());
    }

    #[test]
    fn csg_intersection_of_two_spheres_hits_only_inside_both() {
        let a = Sphere::new(Vec3::new(-0.5, 0.0, 5.0), 1.0);
        let b = Sphere::new(Vec3::new(0.5, 0.0, 5.0), 1.0);
        let lens = CsgIntersection::new(a, b);

        // Straight through the overlap: must hit.
        assert!(lens.intersect(&ray(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0))).is_some());

        // Far off to one side of both spheres: must miss.
        assert!(lens
            .intersect(&ray(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)))
            .is_none());
    }

    #[test]
    fn space_partitioning_contains_the_negative_half_space() {
        let sp = SpacePartitioning::new(Vec3::new(0.0, 1.0, 0.0), Vec3::zero());
        assert!(sp.contains(Vec3::new(0.0, -1.0, 0.0)));
        assert!(!sp.contains(Vec3::new(0.0, 1.0, 0.0)));
    }
}
