//! Renderer collaborator
//!
//! The core never rasterizes. Each frame it walks the active scene and hands
//! the platform one [`Sprite`] handle per visible thing, with an affine
//! transform that places the sprite's center at the entity position and
//! rotates about that center, plus an optional colour/alpha [`Tint`].

use glam::{Affine2, Vec2};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::screen_center;
use crate::sim::{Backdrop, GameState, MeteorSize, Starfield};

/// Sprite handles the platform maps to images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    /// Explosion animation frame while the ship is dying
    PlayerDying(u8),
    Meteor { size: MeteorSize, variant: u8 },
    Alien(u8),
    Laser,
    AlienLaser,
    Shield,
    Exhaust,
    /// Shown for one cleanup interval where something was destroyed
    Explosion,
    Star,
    LifeIndicator,
    ShieldIndicator,
    HyperspaceIndicator,
}

impl Sprite {
    /// Pixel dimensions of the image
    pub fn size(self) -> Vec2 {
        match self {
            Sprite::Player | Sprite::PlayerDying(_) => Vec2::new(64.0, 64.0),
            Sprite::Meteor {
                size: MeteorSize::Large,
                ..
            } => Vec2::new(96.0, 96.0),
            Sprite::Meteor {
                size: MeteorSize::Small,
                ..
            } => Vec2::new(28.0, 28.0),
            Sprite::Alien(_) => Vec2::new(80.0, 80.0),
            Sprite::Laser | Sprite::AlienLaser => Vec2::new(9.0, 37.0),
            Sprite::Shield => Vec2::new(120.0, 120.0),
            Sprite::Exhaust => Vec2::new(16.0, 32.0),
            Sprite::Explosion => Vec2::new(64.0, 64.0),
            Sprite::Star => Vec2::new(8.0, 8.0),
            Sprite::LifeIndicator | Sprite::ShieldIndicator | Sprite::HyperspaceIndicator => {
                Vec2::new(32.0, 32.0)
            }
        }
    }
}

/// Colour and alpha multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub rgb: [f32; 3],
    pub alpha: f32,
}

impl Tint {
    pub const NONE: Tint = Tint {
        rgb: [1.0, 1.0, 1.0],
        alpha: 1.0,
    };

    pub fn alpha(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..Self::NONE
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Platform drawing backend
pub trait Renderer {
    fn draw_sprite(&mut self, sprite: Sprite, transform: Affine2, tint: Tint);
    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, align: TextAlign);
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_sprite(&mut self, _sprite: Sprite, _transform: Affine2, _tint: Tint) {}
    fn draw_text(&mut self, _text: &str, _position: Vec2, _size: f32, _align: TextAlign) {}
}

/// Transform placing a `sprite`'s center at `position`, rotated about that center
pub fn sprite_transform(sprite: Sprite, position: Vec2, rotation: f32, scale: f32) -> Affine2 {
    let half = sprite.size() * 0.5;
    Affine2::from_translation(position)
        * Affine2::from_angle(rotation)
        * Affine2::from_scale(Vec2::splat(scale))
        * Affine2::from_translation(-half)
}

fn draw(r: &mut impl Renderer, sprite: Sprite, position: Vec2, rotation: f32) {
    r.draw_sprite(sprite, sprite_transform(sprite, position, rotation, 1.0), Tint::NONE);
}

pub fn draw_stars(r: &mut impl Renderer, stars: &Starfield) {
    for star in &stars.stars {
        r.draw_sprite(
            Sprite::Star,
            sprite_transform(Sprite::Star, star.position, 0.0, star.size),
            Tint::alpha(star.alpha()),
        );
    }
}

pub fn draw_backdrop(r: &mut impl Renderer, backdrop: &Backdrop) {
    draw_stars(r, &backdrop.starfield);
    for meteor in &backdrop.meteors {
        let sprite = Sprite::Meteor {
            size: meteor.size,
            variant: meteor.variant,
        };
        draw(r, sprite, meteor.position, meteor.rotation);
    }
}

/// Every entity of a play session, then the HUD
pub fn draw_game(r: &mut impl Renderer, state: &GameState) {
    draw_stars(r, &state.stars);

    for slot in state.meteors.slots() {
        let m = &slot.entity;
        let sprite = if slot.alive {
            Sprite::Meteor {
                size: m.size,
                variant: m.variant,
            }
        } else {
            Sprite::Explosion
        };
        draw(r, sprite, m.position, m.rotation);
    }

    for slot in state.aliens.slots() {
        let sprite = if slot.alive {
            Sprite::Alien(slot.entity.variant)
        } else {
            Sprite::Explosion
        };
        draw(r, sprite, slot.entity.position, 0.0);
    }

    for (_, laser) in state.lasers.iter_alive() {
        draw(r, Sprite::Laser, laser.position, laser.rotation);
    }
    for (_, laser) in state.alien_lasers.iter_alive() {
        draw(r, Sprite::AlienLaser, laser.position, laser.rotation);
    }

    let player = &state.player;
    if player.is_dying() {
        let frame = player.dying_counter.min(u8::MAX as u32) as u8;
        draw(r, Sprite::PlayerDying(frame), player.position, player.rotation);
    } else if player.is_alive() {
        draw(r, Sprite::Player, player.position, player.rotation);
    }

    if let Some(exhaust) = &state.exhaust {
        draw(r, Sprite::Exhaust, exhaust.position, exhaust.rotation);
    }
    if let Some(shield) = &state.shield {
        draw(r, Sprite::Shield, shield.position, shield.rotation);
    }

    draw_hud(r, state);
}

/// Score, reserves and hyperspace readiness
pub fn draw_hud(r: &mut impl Renderer, state: &GameState) {
    r.draw_text(
        &state.score.to_string(),
        Vec2::new(SCREEN_WIDTH / 2.0, 40.0),
        48.0,
        TextAlign::Center,
    );

    let spacing = 40.0;
    let indicator = Sprite::LifeIndicator.size();
    for i in 0..state.player.lives_remaining {
        let at = Vec2::new(20.0 + i as f32 * spacing, 20.0) + indicator * 0.5;
        draw(r, Sprite::LifeIndicator, at, 0.0);
    }

    for i in 0..state.player.shields_remaining {
        let at = Vec2::new(SCREEN_WIDTH - 52.0 - i as f32 * spacing, 20.0) + indicator * 0.5;
        r.draw_sprite(
            Sprite::ShieldIndicator,
            sprite_transform(Sprite::ShieldIndicator, at, 0.0, 1.0),
            Tint::alpha(0.5),
        );
    }

    if state.player.hyperspace_ready() {
        let at = Vec2::new(20.0, SCREEN_HEIGHT - 52.0) + indicator * 0.5;
        draw(r, Sprite::HyperspaceIndicator, at, 0.0);
    }
}

pub fn draw_title(r: &mut impl Renderer, backdrop: &Backdrop, high_score: u64) {
    draw_backdrop(r, backdrop);
    r.draw_text("METEOR STORM", screen_center(), 64.0, TextAlign::Center);
    r.draw_text(
        "Press SPACE to start",
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 200.0),
        32.0,
        TextAlign::Center,
    );
    if high_score > 0 {
        r.draw_text(
            &format!("High Score: {high_score}"),
            Vec2::new(SCREEN_WIDTH / 2.0, 60.0),
            32.0,
            TextAlign::Center,
        );
    }
}

pub fn draw_level_banner(r: &mut impl Renderer, stars: &Starfield, level: u32) {
    draw_stars(r, stars);
    r.draw_text(&format!("LEVEL {level}"), screen_center(), 48.0, TextAlign::Center);
}

pub fn draw_game_over(
    r: &mut impl Renderer,
    backdrop: &Backdrop,
    score: u64,
    new_high_score: bool,
) {
    draw_backdrop(r, backdrop);
    r.draw_text("GAME OVER", screen_center(), 64.0, TextAlign::Center);
    r.draw_text(
        &format!("Score: {score}"),
        screen_center() + Vec2::new(0.0, 70.0),
        32.0,
        TextAlign::Center,
    );
    if new_high_score {
        r.draw_text(
            "New High Score!",
            Vec2::new(SCREEN_WIDTH / 2.0, 100.0),
            48.0,
            TextAlign::Center,
        );
    }
    r.draw_text(
        "SPACE to play again, Q to quit",
        Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 100.0),
        24.0,
        TextAlign::Center,
    );
}
