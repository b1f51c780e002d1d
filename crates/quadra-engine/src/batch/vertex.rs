use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

use super::DrawCommand;

pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// Two triangles over the corners `TL, TR, BR, BL`.
pub const QUAD_INDICES: [u32; INDICES_PER_QUAD] = [0, 1, 2, 0, 2, 3];

/// Vertex layout shared by every batched quad (32 bytes).
///
///  offset  0  position [f32; 2]  world pixels
///  offset  8  uv       [f32; 2]
///  offset 16  color    [f32; 4]
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// Builds the four corners of `cmd` in `TL, TR, BR, BL` order.
///
/// Corners are rotated about the destination center with
/// `x' = dx·cos − dy·sin`, `y' = dx·sin + dy·cos`, which turns clockwise on a
/// +Y-down screen. UVs follow the same corner order.
pub(crate) fn quad_vertices(cmd: &DrawCommand, pixel_snap: bool) -> [SpriteVertex; VERTICES_PER_QUAD] {
    let mut dst = cmd.dst;
    if pixel_snap {
        dst.origin = Vec2::new(dst.origin.x.round(), dst.origin.y.round());
    }

    let center = dst.center();
    let half = dst.size * 0.5;
    let offsets = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ];

    let (u0, v0) = (cmd.src.x(), cmd.src.y());
    let (u1, v1) = (cmd.src.right(), cmd.src.bottom());
    let uvs = [[u0, v0], [u1, v0], [u1, v1], [u0, v1]];

    let color = cmd.color.to_array();
    let rotated = cmd.rotation != 0.0;

    let mut out = [SpriteVertex::zeroed(); VERTICES_PER_QUAD];
    for (i, v) in out.iter_mut().enumerate() {
        // Unrotated quads use the rect edges directly so coordinates stay exact.
        let p = if rotated {
            center + offsets[i].rotated(cmd.rotation)
        } else {
            match i {
                0 => dst.origin,
                1 => Vec2::new(dst.right(), dst.y()),
                2 => Vec2::new(dst.right(), dst.bottom()),
                _ => Vec2::new(dst.x(), dst.bottom()),
            }
        };
        *v = SpriteVertex { position: [p.x, p.y], uv: uvs[i], color };
    }
    out
}

/// Appends the static index pattern for quads `from..to`.
pub(crate) fn extend_quad_indices(indices: &mut Vec<u32>, from: usize, to: usize) {
    indices.reserve((to.saturating_sub(from)) * INDICES_PER_QUAD);
    for quad in from..to {
        let base = (quad * VERTICES_PER_QUAD) as u32;
        indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;
    use crate::render::TextureId;

    fn cmd(dst: Rect) -> DrawCommand {
        DrawCommand::new(TextureId::from_raw(1), dst)
    }

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn unrotated_corners_follow_rect() {
        let v = quad_vertices(&cmd(Rect::new(10.0, 20.0, 30.0, 40.0)), false);
        assert_eq!(v[0].position, [10.0, 20.0]);
        assert_eq!(v[1].position, [40.0, 20.0]);
        assert_eq!(v[2].position, [40.0, 60.0]);
        assert_eq!(v[3].position, [10.0, 60.0]);
    }

    #[test]
    fn uvs_match_corner_order() {
        let c = cmd(Rect::new(0.0, 0.0, 1.0, 1.0)).src(Rect::new(0.25, 0.5, 0.25, 0.5));
        let v = quad_vertices(&c, false);
        assert_eq!(v[0].uv, [0.25, 0.5]);
        assert_eq!(v[1].uv, [0.5, 0.5]);
        assert_eq!(v[2].uv, [0.5, 1.0]);
        assert_eq!(v[3].uv, [0.25, 1.0]);
    }

    #[test]
    fn color_applies_to_all_corners() {
        let tint = Color::new(0.1, 0.2, 0.3, 0.4);
        let v = quad_vertices(&cmd(Rect::new(0.0, 0.0, 2.0, 2.0)).color(tint), false);
        assert!(v.iter().all(|v| v.color == [0.1, 0.2, 0.3, 0.4]));
    }

    #[test]
    fn rotation_pivots_about_center() {
        let c = cmd(Rect::new(0.0, 0.0, 20.0, 10.0)).rotation(std::f32::consts::FRAC_PI_2);
        let v = quad_vertices(&c, false);
        // Center (10, 5); TL offset (-10, -5) turns to (5, -10).
        assert!(close(v[0].position, [15.0, -5.0]), "{:?}", v[0].position);
        assert!(close(v[2].position, [5.0, 15.0]), "{:?}", v[2].position);
    }

    #[test]
    fn pixel_snap_rounds_origin() {
        let v = quad_vertices(&cmd(Rect::new(10.4, 20.6, 8.0, 8.0)), true);
        assert_eq!(v[0].position, [10.0, 21.0]);
        assert_eq!(v[2].position, [18.0, 29.0]);
    }

    #[test]
    fn index_pattern_offsets_per_quad() {
        let mut idx = Vec::new();
        extend_quad_indices(&mut idx, 0, 2);
        assert_eq!(idx, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }
}
