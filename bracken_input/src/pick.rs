// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-to-canvas picking.
//!
//! Pointer positions arrive in screen pixels. The viewport turns them into a
//! pick ray, and the router intersects that ray with the canvas plane all
//! widgets live on.

use cgmath::{InnerSpace, Point3, Vector3};
use kurbo::Point;

/// A ray cast from the viewport into the canvas scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PickRay {
    /// Ray origin, in canvas units.
    pub origin: Point3<f64>,
    /// Ray direction; normalized by [`PickRay::new`].
    pub direction: Vector3<f64>,
}

impl PickRay {
    /// Creates a ray, normalizing the direction.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Intersects the ray with the canvas plane at depth `z` (normal toward
    /// the viewer). Returns the canvas point, or `None` for a ray parallel to
    /// the plane or pointing away from it.
    pub fn intersect_plane(&self, z: f64) -> Option<Point> {
        if self.direction.z == 0.0 {
            return None;
        }
        let t = (z - self.origin.z) / self.direction.z;
        if t < 0.0 {
            return None;
        }
        let hit = self.origin + self.direction * t;
        Some(Point::new(hit.x, hit.y))
    }
}

/// Maps screen pixels to canvas units and physical size.
pub trait Viewport {
    /// The pick ray for a screen-pixel position.
    fn picking_ray(&self, screen_x: f64, screen_y: f64) -> PickRay;

    /// Screen pixels per canvas unit.
    fn pixels_per_unit(&self) -> f64;

    /// Screen pixels per physical centimeter of the display.
    fn pixels_per_centimeter(&self) -> f64;

    /// Canvas units per physical centimeter; used for tap-slop thresholds.
    fn units_per_centimeter(&self) -> f64 {
        self.pixels_per_centimeter() / self.pixels_per_unit()
    }
}

/// An orthographic viewport: a uniform pixel scale, no perspective.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrthoViewport {
    pixels_per_unit: f64,
    pixels_per_centimeter: f64,
}

impl OrthoViewport {
    /// Creates a viewport with the given pixel scale and display density.
    ///
    /// # Panics
    ///
    /// Panics if either scale is not strictly positive.
    pub fn new(pixels_per_unit: f64, pixels_per_centimeter: f64) -> Self {
        assert!(pixels_per_unit > 0.0, "pixels per unit must be positive");
        assert!(
            pixels_per_centimeter > 0.0,
            "pixels per centimeter must be positive"
        );
        Self {
            pixels_per_unit,
            pixels_per_centimeter,
        }
    }
}

impl Viewport for OrthoViewport {
    fn picking_ray(&self, screen_x: f64, screen_y: f64) -> PickRay {
        let origin = Point3::new(
            screen_x / self.pixels_per_unit,
            screen_y / self.pixels_per_unit,
            -1.0,
        );
        PickRay::new(origin, Vector3::unit_z())
    }

    fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    fn pixels_per_centimeter(&self) -> f64 {
        self.pixels_per_centimeter
    }
}
