use glam::{Mat4, Vec3, Vec4};

use crate::coords::{clamp_dim, Vec2, Viewport};

/// Smallest zoom used when building the matrix; keeps the projection invertible.
const MIN_ZOOM: f32 = 1.0e-4;

/// Orthographic 2D camera with a cached view-projection.
///
/// Conventions:
/// - `position` is the world point shown at the center of the view.
/// - World space is +Y down; the top of the view maps to clip `+1`.
/// - `zoom > 1` shows less of the world (`virtual_size / zoom` is visible).
/// - `rotation` is in radians; the world appears rotated by `-rotation`.
///
/// The matrix returned by [`view_projection`](Self::view_projection) is
/// column-major, the layout a WGSL `mat4x4<f32>` uniform expects. Upload it
/// with `to_cols_array()`; no further transposition is needed.
#[derive(Debug, Clone)]
pub struct Camera {
    virtual_size: Vec2,
    viewport: Viewport,
    position: Vec2,
    zoom: f32,
    rotation: f32,

    dirty: bool,
    view_proj: Mat4,
}

impl Camera {
    /// Creates a camera showing `virtual_size` logical pixels centered on the origin.
    ///
    /// The viewport starts equal to the virtual size.
    pub fn new(virtual_size: Vec2) -> Self {
        let virtual_size = clamp_size(virtual_size);
        Self {
            virtual_size,
            viewport: Viewport::new(virtual_size.x, virtual_size.y),
            position: Vec2::zero(),
            zoom: 1.0,
            rotation: 0.0,
            dirty: true,
            view_proj: Mat4::IDENTITY,
        }
    }

    /// Camera whose world space equals screen pixels (origin top-left).
    ///
    /// Used for overlays such as the UI layer.
    pub fn screen_space(size: Vec2) -> Self {
        let mut cam = Self::new(size);
        let size = cam.virtual_size;
        cam.set_position(size * 0.5);
        cam
    }

    // ── setters ───────────────────────────────────────────────────────────

    pub fn set_virtual_size(&mut self, size: Vec2) {
        let size = clamp_size(size);
        if self.virtual_size != size {
            self.virtual_size = size;
            self.dirty = true;
        }
    }

    /// Output size in pixels; used for pointer <-> world conversion.
    pub fn set_viewport_size(&mut self, size: Vec2) {
        let viewport = Viewport::new(size.x, size.y);
        if self.viewport != viewport {
            self.viewport = viewport;
            self.dirty = true;
        }
    }

    pub fn set_position(&mut self, position: Vec2) {
        if self.position != position {
            self.position = position;
            self.dirty = true;
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if self.zoom != zoom {
            self.zoom = zoom;
            self.dirty = true;
        }
    }

    pub fn set_rotation(&mut self, radians: f32) {
        if self.rotation != radians {
            self.rotation = radians;
            self.dirty = true;
        }
    }

    // ── getters ───────────────────────────────────────────────────────────

    #[inline]
    pub fn virtual_size(&self) -> Vec2 {
        self.virtual_size
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// True when the next [`view_projection`](Self::view_projection) call rebuilds.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the combined view-projection, rebuilding it first if any
    /// parameter changed since the last call.
    pub fn view_projection(&mut self) -> Mat4 {
        if self.dirty {
            self.view_proj = self.build();
            self.dirty = false;
            log::trace!("camera: rebuilt view-projection");
        }
        self.view_proj
    }

    // ── conversions ───────────────────────────────────────────────────────

    /// Converts a pointer position in viewport pixels to world coordinates.
    pub fn screen_to_world(&mut self, screen: Vec2) -> Vec2 {
        let ndc_x = screen.x / self.viewport.width * 2.0 - 1.0;
        let ndc_y = 1.0 - screen.y / self.viewport.height * 2.0;
        let inv = self.view_projection().inverse();
        let p = inv * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        Vec2::new(p.x, p.y)
    }

    /// Converts a world position to viewport pixels.
    pub fn world_to_screen(&mut self, world: Vec2) -> Vec2 {
        let clip = self.view_projection().project_point3(Vec3::new(world.x, world.y, 0.0));
        Vec2::new(
            (clip.x + 1.0) * 0.5 * self.viewport.width,
            (1.0 - clip.y) * 0.5 * self.viewport.height,
        )
    }

    // ── internal ──────────────────────────────────────────────────────────

    fn build(&self) -> Mat4 {
        let zoom = if self.zoom.is_finite() { self.zoom.max(MIN_ZOOM) } else { MIN_ZOOM };
        let half_w = self.virtual_size.x / zoom * 0.5;
        let half_h = self.virtual_size.y / zoom * 0.5;

        // bottom = +half_h, top = -half_h: +Y down in world maps to -Y in clip.
        let projection = Mat4::orthographic_rh(-half_w, half_w, half_h, -half_h, -1.0, 1.0);

        // World point is first made camera-relative, then un-rotated.
        let view = Mat4::from_rotation_z(-self.rotation)
            * Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0));

        projection * view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::new(1280.0, 720.0))
    }
}

fn clamp_size(size: Vec2) -> Vec2 {
    Vec2::new(clamp_dim(size.x), clamp_dim(size.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    fn configured() -> Camera {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.set_viewport_size(Vec2::new(1600.0, 1200.0));
        cam.set_position(Vec2::new(120.0, -40.0));
        cam.set_zoom(2.0);
        cam.set_rotation(0.3);
        cam
    }

    // ── dirty tracking ────────────────────────────────────────────────────

    #[test]
    fn same_value_setters_do_not_dirty() {
        let mut cam = configured();
        let before = cam.view_projection();
        assert!(!cam.is_dirty());

        cam.set_virtual_size(Vec2::new(800.0, 600.0));
        cam.set_viewport_size(Vec2::new(1600.0, 1200.0));
        cam.set_position(Vec2::new(120.0, -40.0));
        cam.set_zoom(2.0);
        cam.set_rotation(0.3);

        assert!(!cam.is_dirty());
        let after = cam.view_projection();
        assert_eq!(before.to_cols_array(), after.to_cols_array());
    }

    #[test]
    fn changed_value_dirties_and_matches_fresh_derivation() {
        let mut cam = configured();
        let _ = cam.view_projection();

        cam.set_zoom(3.5);
        assert!(cam.is_dirty());
        let got = cam.view_projection();

        let mut fresh = configured();
        fresh.set_zoom(3.5);
        assert_eq!(got.to_cols_array(), fresh.view_projection().to_cols_array());
    }

    #[test]
    fn degenerate_sizes_are_clamped() {
        let mut cam = Camera::new(Vec2::new(0.0, -5.0));
        cam.set_viewport_size(Vec2::new(0.0, 0.0));
        assert_eq!(cam.virtual_size(), Vec2::new(1.0, 1.0));
        let m = cam.view_projection();
        assert!(m.to_cols_array().iter().all(|v| v.is_finite()));
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn screen_space_maps_corners_to_clip() {
        let mut cam = Camera::screen_space(Vec2::new(800.0, 600.0));
        let vp = cam.view_projection();
        let tl = vp.project_point3(Vec3::new(0.0, 0.0, 0.0));
        let br = vp.project_point3(Vec3::new(800.0, 600.0, 0.0));
        assert!((tl.x + 1.0).abs() < 1e-5 && (tl.y - 1.0).abs() < 1e-5, "{tl:?}");
        assert!((br.x - 1.0).abs() < 1e-5 && (br.y + 1.0).abs() < 1e-5, "{br:?}");
    }

    #[test]
    fn zoom_shrinks_visible_extents() {
        let mut cam = Camera::new(Vec2::new(800.0, 600.0));
        cam.set_zoom(2.0);
        // At zoom 2 the right clip edge is 200 world units from center.
        let p = cam.view_projection().project_point3(Vec3::new(200.0, 0.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-5, "{p:?}");
    }

    #[test]
    fn translation_happens_before_rotation() {
        let mut cam = Camera::new(Vec2::new(200.0, 200.0));
        cam.set_position(Vec2::new(50.0, 0.0));
        cam.set_rotation(std::f32::consts::FRAC_PI_2);
        // The camera position itself must land at the clip origin regardless of rotation.
        let p = cam.view_projection().project_point3(Vec3::new(50.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5, "{p:?}");
    }

    // ── conversions ───────────────────────────────────────────────────────

    #[test]
    fn screen_world_round_trip() {
        let mut cam = configured();
        let world = Vec2::new(77.0, 13.0);
        let screen = cam.world_to_screen(world);
        assert!(approx(cam.screen_to_world(screen), world));
    }

    #[test]
    fn viewport_center_is_camera_position() {
        let mut cam = configured();
        let center = cam.screen_to_world(Vec2::new(800.0, 600.0));
        assert!(approx(center, Vec2::new(120.0, -40.0)), "{center:?}");
    }
}
