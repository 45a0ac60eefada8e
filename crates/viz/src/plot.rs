//! Decision-boundary rendering.
//!
//! One pixel per grid cell: a diverging two-class ramp over the class-1
//! probability (the filled-contour analogue), with train and test points
//! overlaid as filled discs in their label's colour. The y axis is
//! flipped so larger y is up, as on a conventional plot.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

use crate::mesh::{MeshScores, Meshgrid};

const CLASS0_FILL: Rgb<u8> = Rgb([59, 76, 192]);
const CLASS1_FILL: Rgb<u8> = Rgb([180, 4, 38]);
const CLASS0_POINT: Rgb<u8> = Rgb([24, 36, 110]);
const CLASS1_POINT: Rgb<u8> = Rgb([110, 8, 30]);
const MID: Rgb<u8> = Rgb([245, 245, 245]);

/// Render scores + scatter to a PNG at `path`.
pub fn render_boundary(
    mesh: &Meshgrid,
    scores: &MeshScores,
    train: (&[[f32; 2]], &[u32]),
    test: (&[[f32; 2]], &[u32]),
    path: &Path,
) -> Result<()> {
    if scores.num_x != mesh.num_x() || scores.num_y != mesh.num_y() {
        anyhow::bail!(
            "score grid {}x{} does not match mesh {}x{}",
            scores.num_x,
            scores.num_y,
            mesh.num_x(),
            mesh.num_y(),
        );
    }

    let (w, h) = (scores.num_x as u32, scores.num_y as u32);
    let mut img = RgbImage::new(w, h);
    for py in 0..h {
        // Pixel row 0 is the top of the image = the last mesh row.
        let my = (h - 1 - py) as usize;
        for px in 0..w {
            let s = scores.values[my * scores.num_x + px as usize];
            img.put_pixel(px, py, ramp(s));
        }
    }

    draw_points(&mut img, mesh, train.0, train.1, 1);
    draw_points(&mut img, mesh, test.0, test.1, 2);

    img.save(path)
        .with_context(|| format!("save {}", path.display()))?;
    Ok(())
}

/// Diverging ramp: class-0 colour → near-white → class-1 colour.
fn ramp(score: f32) -> Rgb<u8> {
    let s = score.clamp(0.0, 1.0);
    if s < 0.5 {
        lerp(CLASS0_FILL, MID, s * 2.0)
    } else {
        lerp(MID, CLASS1_FILL, (s - 0.5) * 2.0)
    }
}

fn lerp(a: Rgb<u8>, b: Rgb<u8>, t: f32) -> Rgb<u8> {
    let mix = |ca: u8, cb: u8| (ca as f32 + (cb as f32 - ca as f32) * t).round() as u8;
    Rgb([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])])
}

fn draw_points(
    img: &mut RgbImage,
    mesh: &Meshgrid,
    points: &[[f32; 2]],
    labels: &[u32],
    radius: i32,
) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let (x0, x1) = mesh.x_bounds();
    let (y0, y1) = mesh.y_bounds();
    let span_x = (x1 - x0).max(f32::EPSILON);
    let span_y = (y1 - y0).max(f32::EPSILON);

    for (p, &label) in points.iter().zip(labels) {
        let cx = ((p[0] - x0) / span_x * (w - 1) as f32).round() as i32;
        let cy = (h - 1) - ((p[1] - y0) / span_y * (h - 1) as f32).round() as i32;
        let colour = if label == 0 { CLASS0_POINT } else { CLASS1_POINT };
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let (px, py) = (cx + dx, cy + dy);
                if (0..w).contains(&px) && (0..h).contains(&py) {
                    img.put_pixel(px as u32, py as u32, colour);
                }
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
