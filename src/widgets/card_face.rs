use egui::{
    epaint::{Mesh, Vertex},
    pos2, Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Shape, Stroke, TextureId, Vec2,
};

use crate::{
    card::{CarouselItem, Face, Palette},
    layout::CardQuad,
};

/// Draws one side of a projected card.
pub struct CardFace<'a> {
    painter: &'a Painter,
    quad: &'a CardQuad,
    item: &'a CarouselItem,
    palette: Palette,
    /// Unprojected card size, the width tells how far the card is turned.
    size: Vec2,
    /// Texture and pixel size of the item's image.
    image: Option<(TextureId, Vec2)>,
    mirrored: bool,
}

impl<'a> CardFace<'a> {
    /// Below this the card is too edge-on for text to be readable.
    const MIN_SQUASH: f32 = 0.4;

    /// Where the darkening behind the front text starts.
    const SHADE_FROM: f32 = 0.45;

    pub fn new(painter: &'a Painter, quad: &'a CardQuad, item: &'a CarouselItem, size: Vec2) -> Self {
        Self {
            painter,
            quad,
            item,
            palette: item.role.palette(),
            size,
            image: None,
            mirrored: false,
        }
    }

    pub fn with_image(mut self, image: Option<(TextureId, Vec2)>) -> Self {
        self.image = image;
        self
    }

    /// Paints `face`, returning the call to action's rect when one was drawn.
    pub fn paint(mut self, face: Face, time: f64, seed: usize) -> Option<Rect> {
        self.mirrored = !matches!(face, Face::Front);
        match face {
            Face::Front => {
                self.paint_front();
                None
            }
            Face::SimpleBack => {
                self.paint_simple_back(time, seed);
                None
            }
            Face::DetailedBack => self.paint_detailed_back(),
        }
    }

    fn at(&self, u: f32, v: f32) -> Pos2 {
        let u = if self.mirrored { 1.0 - u } else { u };
        self.quad.point(u, v)
    }

    fn squash(&self) -> f32 {
        let full = self.size.x * self.quad.scale;
        if full <= 0.0 {
            return 0.0;
        }
        (self.quad.bounds().width() / full).min(1.0)
    }

    fn readable(&self) -> bool {
        self.squash() >= Self::MIN_SQUASH
    }

    fn font(&self, size: f32) -> FontId {
        FontId::proportional(size * self.quad.scale)
    }

    fn fill(&self, top: Color32, bottom: Color32) {
        self.gradient(0.0, 1.0, top, bottom);
        self.border();
    }

    /// Vertical gradient over the band `from..=to` of the card.
    fn gradient(&self, from: f32, to: f32, top: Color32, bottom: Color32) {
        let mut mesh = Mesh::default();
        for (u, v, color) in [
            (0.0, from, top),
            (1.0, from, top),
            (1.0, to, bottom),
            (0.0, to, bottom),
        ] {
            mesh.colored_vertex(self.at(u, v), color);
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        self.painter.add(Shape::mesh(mesh));
    }

    fn border(&self) {
        self.painter.add(Shape::closed_line(
            self.quad.corners.to_vec(),
            Stroke::new(2.0 * self.quad.scale, self.palette.accent),
        ));
    }

    /// The texture stretched over the whole quad, cropped to the card's aspect.
    fn image_mesh(quad: &CardQuad, texture: TextureId, uv: Rect) -> Mesh {
        let mut mesh = Mesh::with_texture(texture);
        for (u, v, uv) in [
            (0.0, 0.0, uv.left_top()),
            (1.0, 0.0, uv.right_top()),
            (1.0, 1.0, uv.right_bottom()),
            (0.0, 1.0, uv.left_bottom()),
        ] {
            mesh.vertices.push(Vertex {
                pos: quad.point(u, v),
                uv,
                color: Color32::WHITE,
            });
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        mesh
    }

    /// The centered part of an `image` sized texture that covers `region`.
    fn cover_uv(image: Vec2, region: Vec2) -> Rect {
        let full = Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));
        if image.min_elem() <= 0.0 || region.min_elem() <= 0.0 {
            return full;
        }

        let image_aspect = image.x / image.y;
        let region_aspect = region.x / region.y;
        if image_aspect > region_aspect {
            let w = region_aspect / image_aspect;
            Rect::from_min_max(pos2((1.0 - w) / 2.0, 0.0), pos2((1.0 + w) / 2.0, 1.0))
        } else {
            let h = image_aspect / region_aspect;
            Rect::from_min_max(pos2(0.0, (1.0 - h) / 2.0), pos2(1.0, (1.0 + h) / 2.0))
        }
    }

    fn text(&self, u: f32, v: f32, text: &str, size: f32, color: Color32) -> Rect {
        self.painter
            .text(self.at(u, v), Align2::CENTER_CENTER, text, self.font(size), color)
    }

    fn wrapped(&self, u: f32, v: f32, text: &str, size: f32, color: Color32) -> Rect {
        let wrap = self.squash() * self.size.x * self.quad.scale * 0.85;
        let galley = self
            .painter
            .layout(text.to_string(), self.font(size), color, wrap);
        let pos = self.at(u, v) - Vec2::new(galley.size().x / 2.0, 0.0);
        let rect = Rect::from_min_size(pos, galley.size());
        self.painter.galley(pos, galley);
        rect
    }

    fn paint_front(&self) {
        let Palette {
            primary, secondary, ..
        } = self.palette;

        match self.image {
            Some((texture, pixels)) => {
                let uv = Self::cover_uv(pixels, self.size);
                self.painter
                    .add(Shape::mesh(Self::image_mesh(self.quad, texture, uv)));
                self.gradient(
                    Self::SHADE_FROM,
                    1.0,
                    Color32::TRANSPARENT,
                    Color32::from_black_alpha(200),
                );
                self.border();
            }
            None => self.fill(primary, secondary),
        }

        if !self.readable() {
            return;
        }

        if let Some(badge) = &self.item.badge {
            let rect = self.text(0.5, 0.1, badge, 11.0, Color32::WHITE);
            self.painter.rect_stroke(
                rect.expand(3.0 * self.quad.scale),
                Rounding::same(6.0 * self.quad.scale),
                Stroke::new(1.0, Color32::WHITE),
            );
        }

        self.text(0.5, 0.66, self.item.title(), 18.0, Color32::WHITE);
        self.text(0.5, 0.76, self.item.subtitle(), 13.0, Color32::from_white_alpha(200));

        if let Some(footer) = &self.item.footer {
            self.text(0.5, 0.92, footer, 10.0, Color32::from_white_alpha(160));
        }
    }

    fn paint_simple_back(&self, time: f64, seed: usize) {
        let Palette {
            primary,
            secondary,
            accent,
        } = self.palette;
        self.fill(secondary.linear_multiply(0.7), primary.linear_multiply(0.5));

        // a few circles drifting around, each card gets its own pattern
        for k in 0..5 {
            let phase = (seed * 7 + k * 13) as f32;
            let drift = (time as f32 * 0.8 + phase).sin() * 0.06;
            let u = 0.2 + 0.6 * ((k as f32 * 0.37 + seed as f32 * 0.11).fract());
            let v = 0.15 + 0.7 * ((k as f32 * 0.23 + phase * 0.05).fract()) + drift;
            let radius = (10.0 + (k % 3) as f32 * 6.0) * self.quad.scale * self.squash();
            let color = if k % 2 == 0 { accent } else { secondary };
            self.painter
                .circle_filled(self.at(u, v), radius, color.linear_multiply(0.45));
        }
    }

    fn paint_detailed_back(&self) -> Option<Rect> {
        let Palette {
            primary,
            secondary,
            accent,
        } = self.palette;
        self.fill(primary.linear_multiply(0.35), secondary.linear_multiply(0.25));

        if !self.readable() {
            return None;
        }

        self.text(0.5, 0.08, self.item.heading(), 14.0, accent);
        self.wrapped(0.5, 0.15, self.item.description(), 10.0, Color32::LIGHT_GRAY);

        let back = self.item.back.as_ref();
        let stats = back.map(|back| &*back.stats).unwrap_or_default();
        for (row, stat) in stats.iter().take(4).enumerate() {
            let v = 0.45 + row as f32 * 0.08;
            self.painter.text(
                self.at(0.12, v),
                Align2::LEFT_CENTER,
                &stat.label,
                self.font(10.0),
                Color32::GRAY,
            );
            self.painter.text(
                self.at(0.88, v),
                Align2::RIGHT_CENTER,
                &stat.value,
                self.font(10.0),
                Color32::WHITE,
            );
        }

        let tags = back.map(|back| back.tags.join("  ")).unwrap_or_default();
        if !tags.is_empty() {
            self.wrapped(0.5, 0.74, &tags, 9.0, accent);
        }

        let center = self.at(0.5, 0.9);
        let size = Vec2::new(
            self.size.x * 0.7 * self.squash(),
            22.0,
        ) * self.quad.scale;
        let cta = Rect::from_center_size(center, size);
        self.painter
            .rect_filled(cta, Rounding::same(4.0 * self.quad.scale), accent);
        self.text(0.5, 0.9, self.item.cta_text(), 11.0, Color32::BLACK);

        Some(cta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RingLayout;

    fn approx(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn image_covers_the_front() {
        let layout = RingLayout::new(190.0, 254.0, 8);
        let quad = layout.project(0, 0.0, 0.0, pos2(400.0, 300.0));
        let uv = Rect::from_min_max(pos2(0.1, 0.0), pos2(0.9, 1.0));

        let mesh = CardFace::image_mesh(&quad, TextureId::Managed(7), uv);
        assert_eq!(mesh.texture_id, TextureId::Managed(7));
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);

        let positions = mesh.vertices.iter().map(|v| v.pos).collect::<Vec<_>>();
        for (pos, corner) in positions.iter().zip(quad.corners) {
            assert!(approx(*pos, corner), "{pos:?} {corner:?}");
        }

        assert_eq!(mesh.vertices[0].uv, pos2(0.1, 0.0));
        assert_eq!(mesh.vertices[2].uv, pos2(0.9, 1.0));
        assert!(mesh.vertices.iter().all(|v| v.color == Color32::WHITE));
    }

    #[test]
    fn cover_crops_the_long_side() {
        // a square avatar on a portrait card loses its sides
        let uv = CardFace::cover_uv(Vec2::splat(460.0), Vec2::new(190.0, 254.0));
        assert!((uv.width() - 190.0 / 254.0).abs() < 1e-4);
        assert_eq!(uv.height(), 1.0);
        assert!((uv.center().x - 0.5).abs() < 1e-4);

        // a wide photo on a portrait card too
        let uv = CardFace::cover_uv(Vec2::new(400.0, 200.0), Vec2::new(200.0, 300.0));
        assert!((uv.width() - (2.0 / 3.0) / 2.0).abs() < 1e-4);

        // a tall strip loses its top and bottom
        let uv = CardFace::cover_uv(Vec2::new(100.0, 1000.0), Vec2::new(200.0, 300.0));
        assert_eq!(uv.width(), 1.0);
        assert!((uv.height() - 0.1 / (2.0 / 3.0)).abs() < 1e-4);
        assert!((uv.center().y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn cover_keeps_matching_aspect() {
        let full = Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));
        assert_eq!(CardFace::cover_uv(Vec2::new(200.0, 300.0), Vec2::new(100.0, 150.0)), full);
        assert_eq!(CardFace::cover_uv(Vec2::ZERO, Vec2::new(190.0, 254.0)), full);
    }
}
