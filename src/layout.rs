use std::f32::consts::PI;

use egui::{Pos2, Rect, Vec2};

use crate::rotation::{card_angle, normalize};

/// Ring geometry for a set of equally spaced cards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RingLayout {
    pub width: f32,
    pub height: f32,
    pub quantity: usize,
}

impl RingLayout {
    const TILT: f32 = -3.0;

    pub fn new(width: f32, height: f32, quantity: usize) -> Self {
        Self {
            width,
            height,
            quantity: quantity.max(1),
        }
    }

    /// Large rings get pushed out so the cards don't overlap.
    pub fn radius_multiplier(&self) -> f32 {
        if self.quantity <= 10 {
            1.0
        } else {
            1.0 + (self.quantity - 10) as f32 * 0.05
        }
    }

    pub fn radius(&self) -> f32 {
        (self.width + self.height) * self.radius_multiplier()
    }

    pub fn perspective(&self) -> f32 {
        1000.0 + self.radius() * 2.5
    }

    /// Projects card `index` onto the screen around `center`.
    ///
    /// `flip` turns the card about its own vertical axis, `0.0` shows the
    /// front and `1.0` shows the back.
    pub fn project(&self, index: usize, rotation: f64, flip: f32, center: Pos2) -> CardQuad {
        // reduced in f64 first, the ring angle may be many turns in
        let ring = normalize(card_angle(index, self.quantity) + rotation).to_radians() as f32;
        let flip = flip.clamp(0.0, 1.0) * PI;

        let (sin_r, cos_r) = ring.sin_cos();
        let (sin_f, cos_f) = flip.sin_cos();
        let (sin_t, cos_t) = Self::TILT.to_radians().sin_cos();

        let radius = self.radius();
        let perspective = self.perspective();

        let project = |x: f32, y: f32| {
            let (x, z) = (x * cos_f, radius - x * sin_f);
            let (x, z) = (x * cos_r + z * sin_r, -x * sin_r + z * cos_r);
            let (y, z) = (y * cos_t - z * sin_t, y * sin_t + z * cos_t);
            let scale = perspective / (perspective - z).max(1.0);
            (center + Vec2::new(x, y) * scale, z, scale)
        };

        let (w, h) = (self.width / 2.0, self.height / 2.0);
        let (tl, z0, _) = project(-w, -h);
        let (tr, z1, _) = project(w, -h);
        let (br, z2, _) = project(w, h);
        let (bl, z3, _) = project(-w, h);
        let (_, _, scale) = project(0.0, 0.0);

        CardQuad {
            corners: [tl, tr, br, bl],
            depth: (z0 + z1 + z2 + z3) / 4.0,
            facing: (ring + flip).cos() > 0.0,
            scale,
        }
    }
}

/// A projected card: corners clockwise from the top left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CardQuad {
    pub corners: [Pos2; 4],
    /// Distance toward the viewer, larger is closer.
    pub depth: f32,
    /// Whether the side painted first (the front, before any flip) faces the viewer.
    pub facing: bool,
    /// Perspective scale at the card's center.
    pub scale: f32,
}

impl CardQuad {
    pub fn bounds(&self) -> Rect {
        Rect::from_points(&self.corners)
    }

    /// Bilinear point on the card, `u` across and `v` down, both in `0..=1`.
    pub fn point(&self, u: f32, v: f32) -> Pos2 {
        let [tl, tr, br, bl] = self.corners;
        let top = tl + (tr - tl) * u;
        let bottom = bl + (br - bl) * u;
        top + (bottom - top) * v
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        let mut sign = 0.0_f32;
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let cross = (b - a).x * (pos - a).y - (b - a).y * (pos - a).x;
            if cross == 0.0 {
                continue;
            }
            if sign != 0.0 && cross.signum() != sign {
                return false;
            }
            sign = cross.signum();
        }
        true
    }
}
