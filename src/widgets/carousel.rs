use egui::{Align2, Color32, FontId, Rect, Response, Sense, Ui, Vec2};

use crate::{
    card::{CardFlip, CarouselItem, Face},
    config::CarouselConfig,
    image_cache::{ImageCache, ImageResult},
    layout::{CardQuad, RingLayout},
    rotation::{MotionPhase, RotationEngine},
    widgets::CardFace,
};

pub struct CarouselState {
    engine: RotationEngine,
    card_size: Vec2,
    items: Vec<CarouselItem>,
    flips: Vec<CardFlip>,
    images: ImageCache,
}

impl CarouselState {
    pub fn new(config: &CarouselConfig) -> Self {
        let mut this = Self {
            engine: RotationEngine::new(config.engine_settings(), config.items.len()),
            card_size: Vec2::new(config.width, config.height),
            items: vec![],
            flips: vec![],
            images: ImageCache::default(),
        };
        this.set_items(config.items.clone());
        this
    }

    /// Replaces the cards, in a new random order.
    pub fn set_items(&mut self, mut items: Vec<CarouselItem>) {
        fastrand::shuffle(&mut items);
        log::debug!("showing {} cards", items.len());

        self.flips = vec![CardFlip::default(); items.len()];
        self.engine.set_quantity(items.len());
        self.items = items;
    }

    pub fn items(&self) -> &[CarouselItem] {
        &self.items
    }

    pub const fn engine(&self) -> &RotationEngine {
        &self.engine
    }

    /// Image urls of the current cards that haven't been asked for yet.
    pub fn wanted_images(&mut self) -> Vec<String> {
        self.images
            .request(self.items.iter().filter_map(|item| item.image.as_deref()))
    }

    pub fn add_image(&mut self, url: String, data: ImageResult) {
        self.images.add(url, data)
    }

    fn layout(&self) -> RingLayout {
        RingLayout::new(self.card_size.x, self.card_size.y, self.items.len())
    }
}

pub struct Carousel<'a> {
    state: &'a mut CarouselState,
}

impl<'a> Carousel<'a> {
    pub fn new(state: &'a mut CarouselState) -> Self {
        Self { state }
    }

    fn handle_input(&mut self, ui: &Ui, response: &Response, now: f64) {
        let engine = &mut self.state.engine;

        if response.hovered() {
            let scroll = ui.input().scroll_delta;
            if scroll != Vec2::ZERO {
                engine.wheel(wheel_delta(scroll), now);
            }
        }

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                engine.touch_start(pos);
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                engine.touch_move(pos, now);
            }
        }

        if response.drag_released() {
            engine.touch_end(now);
        }
    }

    /// The closest card under `pos`, if any.
    fn hit(quads: &[(usize, CardQuad)], pos: egui::Pos2) -> Option<usize> {
        quads
            .iter()
            .filter(|(_, quad)| quad.contains(pos))
            .max_by(|(_, a), (_, b)| a.depth.total_cmp(&b.depth))
            .map(|&(index, _)| index)
    }
}

/// egui reports scrolling down as a negative `y`, the wheel deltas are positive then.
fn wheel_delta(scroll: Vec2) -> Vec2 {
    -scroll
}

impl<'a> egui::Widget for Carousel<'a> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let now = ui.input().time;

        if self.state.items.is_empty() {
            painter.text(
                response.rect.center(),
                Align2::CENTER_CENTER,
                "no cards to show",
                FontId::proportional(16.0),
                Color32::GRAY,
            );
            return response;
        }

        self.handle_input(ui, &response, now);

        let tick = self.state.engine.tick(now);
        if let Some(slot) = tick.snapped {
            log::trace!("snapped to slot {slot}");
        }
        if tick.phase != MotionPhase::Stopped {
            ui.ctx().request_repaint();
        }

        let state = &mut *self.state;
        let layout = state.layout();
        let center = response.rect.center();

        for (index, flip) in state.flips.iter_mut().enumerate() {
            flip.sync(state.engine.can_flip(index));
        }

        let resting = (0..state.items.len())
            .map(|index| (index, layout.project(index, tick.angle, 0.0, center)))
            .collect::<Vec<_>>();
        let hovered = response.hover_pos().and_then(|pos| Self::hit(&resting, pos));

        let mut cards = (0..state.items.len())
            .map(|index| {
                let can_flip = state.engine.can_flip(index);
                let revealed = state.flips[index].revealed(can_flip, hovered == Some(index));
                let flip = ui
                    .ctx()
                    .animate_bool(response.id.with(index), revealed);
                let quad = layout.project(index, tick.angle, flip, center);
                (index, quad, Face::resolve(quad.facing, revealed))
            })
            .collect::<Vec<_>>();

        cards.sort_by(|(_, a, _), (_, b, _)| a.depth.total_cmp(&b.depth));

        let size = Vec2::new(layout.width, layout.height);
        let mut ctas = Vec::<(usize, Rect)>::new();
        for (index, quad, face) in &cards {
            let item = &state.items[*index];
            let image = item
                .image
                .as_deref()
                .and_then(|url| state.images.get(url))
                .map(|image| (image.texture_id(ui.ctx()), image.size_vec2()));

            let cta = CardFace::new(&painter, quad, item, size)
                .with_image(image)
                .paint(*face, now, *index);
            if let Some(rect) = cta {
                ctas.push((*index, rect));
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let painted = cards
                    .iter()
                    .map(|&(index, quad, _)| (index, quad))
                    .collect::<Vec<_>>();

                if let Some(index) = Self::hit(&painted, pos) {
                    let link = ctas
                        .iter()
                        .find(|(i, rect)| *i == index && rect.contains(pos))
                        .and_then(|_| state.items[index].link.as_deref());

                    match link {
                        Some(link) => {
                            log::info!("opening {link}");
                            ui.output().open_url(link);
                        }
                        None => state.flips[index].tap(state.engine.can_flip(index)),
                    }
                }
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineSettings;

    #[test]
    fn scrolling_down_turns_the_ring_forward() {
        assert_eq!(wheel_delta(Vec2::new(0.0, -120.0)), Vec2::new(0.0, 120.0));
        assert_eq!(wheel_delta(Vec2::new(40.0, 0.0)), Vec2::new(-40.0, 0.0));

        let mut engine = RotationEngine::new(EngineSettings::default(), 8);
        engine.wheel(wheel_delta(Vec2::new(0.0, -120.0)), 0.0);
        assert!(engine.target() > 0.0);
        assert_eq!(engine.phase(), MotionPhase::Spinning);
    }

    #[test]
    fn asks_for_each_card_image_once() {
        let items = vec![
            CarouselItem {
                image: Some("https://github.com/a.png".into()),
                ..Default::default()
            },
            CarouselItem::default(),
            CarouselItem {
                image: Some("https://github.com/b.png".into()),
                ..Default::default()
            },
        ];
        let mut state = CarouselState::new(&CarouselConfig {
            items,
            ..Default::default()
        });

        let mut wanted = state.wanted_images();
        wanted.sort();
        assert_eq!(wanted, vec!["https://github.com/a.png", "https://github.com/b.png"]);
        assert!(state.wanted_images().is_empty());

        state.add_image("https://github.com/a.png".into(), Err("offline".into()));
        assert!(state.wanted_images().is_empty());
    }
}
