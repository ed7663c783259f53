//! Draw command generation
//!
//! `render` turns a [`GameState`] into a flat list of 2D drawing commands.
//! It holds no logic beyond layout: whatever backend executes the list only
//! needs rectangles, triangles, circles and sprite blits.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{Entity, EntityKind, GameState, Player, Rect};
use crate::tuning::Tuning;

/// RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Opaque color from a `0xRRGGBB` literal
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

pub mod palette {
    use super::{Color, rgb};

    pub const SKY_TOP: Color = rgb(0x87ceeb);
    pub const SKY_BOTTOM: Color = rgb(0xe0f6ff);
    pub const NIGHT_TOP: Color = rgb(0x0b1026);
    pub const NIGHT_BOTTOM: Color = rgb(0x2c3e70);
    /// Darkening layer over the day background image at night
    pub const NIGHT_TINT: Color = [0.04, 0.06, 0.18, 0.55];
    pub const GROUND: Color = rgb(0x95a5a6);
    pub const FIRE_OUTER: Color = rgb(0xe74c3c);
    pub const FIRE_INNER: Color = rgb(0xf39c12);
    pub const COIN_FILL: Color = rgb(0xf39c12);
    pub const COIN_RIM: Color = rgb(0xf1c40f);
    pub const PLAYER_BODY: Color = rgb(0x2ecc71);
    pub const PLAYER_HEAD: Color = rgb(0xf39c12);
}

/// Bitmap assets the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    Player,
    Fire,
    Coin,
}

impl Sprite {
    pub const ALL: [Sprite; 4] = [Sprite::Background, Sprite::Player, Sprite::Fire, Sprite::Coin];

    /// File name relative to the page
    pub fn file_name(&self) -> &'static str {
        match self {
            Sprite::Background => "background.png",
            Sprite::Player => "player.png",
            Sprite::Fire => "fire.png",
            Sprite::Coin => "coin.png",
        }
    }
}

/// Which sprites are decoded and drawable right now
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssetStatus {
    /// Natural size of the background image, once loaded
    pub background: Option<Vec2>,
    pub player: bool,
    pub fire: bool,
    pub coin: bool,
}

impl AssetStatus {
    /// Every sprite decoded, with the background at its natural size
    pub fn all_loaded(background_size: Vec2) -> Self {
        Self {
            background: Some(background_size),
            player: true,
            fire: true,
            coin: true,
        }
    }

    pub fn is_ready(&self, sprite: Sprite) -> bool {
        match sprite {
            Sprite::Background => self.background.is_some_and(|s| s.x > 0.0 && s.y > 0.0),
            Sprite::Player => self.player,
            Sprite::Fire => self.fire,
            Sprite::Coin => self.coin,
        }
    }
}

/// One 2D drawing operation, in viewport pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { rect: Rect, color: Color },
    /// Vertical gradient from `top` to `bottom`
    FillGradient { rect: Rect, top: Color, bottom: Color },
    FillTriangle { points: [Vec2; 3], color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color, line_width: f32 },
    DrawImage { sprite: Sprite, rect: Rect },
}

/// Build the full frame: background, ground, obstacles, coins, player.
pub fn render(
    state: &GameState,
    assets: &AssetStatus,
    tuning: &Tuning,
    settings: &Settings,
) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear];

    let night = settings.day_night_cycle
        && tuning
            .night_score_threshold
            .is_some_and(|threshold| state.score >= threshold);
    background(&mut out, state, assets, settings, night);

    let ground_top = state.player.ground_y + state.player.size.y;
    out.push(DrawCommand::FillRect {
        rect: Rect::new(
            0.0,
            ground_top,
            state.viewport.x,
            (state.viewport.y - ground_top).max(0.0),
        ),
        color: palette::GROUND,
    });

    for obstacle in state.obstacles() {
        entity(&mut out, obstacle, assets);
    }
    for coin in state.coins() {
        entity(&mut out, coin, assets);
    }
    player(&mut out, &state.player, assets);

    out
}

fn background(
    out: &mut Vec<DrawCommand>,
    state: &GameState,
    assets: &AssetStatus,
    settings: &Settings,
    night: bool,
) {
    let view = Rect::new(0.0, 0.0, state.viewport.x, state.viewport.y);

    let Some(size) = assets.background.filter(|_| assets.is_ready(Sprite::Background)) else {
        let (top, bottom) = if night {
            (palette::NIGHT_TOP, palette::NIGHT_BOTTOM)
        } else {
            (palette::SKY_TOP, palette::SKY_BOTTOM)
        };
        out.push(DrawCommand::FillGradient { rect: view, top, bottom });
        return;
    };

    // Tile the image horizontally, scaled to the viewport height
    let scaled_width = size.x * (state.viewport.y / size.y);
    let scroll = if settings.parallax_background {
        state.background_scroll
    } else {
        0.0
    };
    let offset = -(scroll.rem_euclid(f64::from(scaled_width)) as f32);
    let tiles = (state.viewport.x / scaled_width).ceil() as i32 + 1;
    for i in -1..=tiles {
        out.push(DrawCommand::DrawImage {
            sprite: Sprite::Background,
            rect: Rect::new(offset + i as f32 * scaled_width, 0.0, scaled_width, state.viewport.y),
        });
    }

    if night {
        out.push(DrawCommand::FillRect {
            rect: view,
            color: palette::NIGHT_TINT,
        });
    }
}

/// Draw one obstacle or coin, sprite first, shapes when the sprite is missing
pub fn entity(out: &mut Vec<DrawCommand>, entity: &Entity, assets: &AssetStatus) {
    let rect = entity.rect();
    match entity.kind {
        EntityKind::Obstacle { .. } => {
            if assets.is_ready(Sprite::Fire) {
                out.push(DrawCommand::DrawImage { sprite: Sprite::Fire, rect });
                return;
            }
            let (x, y, w, h) = (rect.left(), rect.top(), rect.size.x, rect.size.y);
            out.push(DrawCommand::FillTriangle {
                points: [
                    Vec2::new(x + w / 2.0, y),
                    Vec2::new(x + w, y + h),
                    Vec2::new(x, y + h),
                ],
                color: palette::FIRE_OUTER,
            });
            out.push(DrawCommand::FillTriangle {
                points: [
                    Vec2::new(x + w / 2.0, y + 15.0),
                    Vec2::new(x + w - 15.0, y + h - 15.0),
                    Vec2::new(x + 15.0, y + h - 15.0),
                ],
                color: palette::FIRE_INNER,
            });
        }
        EntityKind::Coin { collected: true } => {}
        EntityKind::Coin { collected: false } => {
            if assets.is_ready(Sprite::Coin) {
                out.push(DrawCommand::DrawImage { sprite: Sprite::Coin, rect });
                return;
            }
            let radius = rect.size.x / 2.0;
            out.push(DrawCommand::FillCircle {
                center: rect.center(),
                radius,
                color: palette::COIN_FILL,
            });
            out.push(DrawCommand::StrokeCircle {
                center: rect.center(),
                radius,
                color: palette::COIN_RIM,
                line_width: 4.0,
            });
        }
    }
}

fn player(out: &mut Vec<DrawCommand>, player: &Player, assets: &AssetStatus) {
    let rect = player.rect();
    if assets.is_ready(Sprite::Player) {
        out.push(DrawCommand::DrawImage { sprite: Sprite::Player, rect });
        return;
    }
    // Body below a round head
    out.push(DrawCommand::FillRect {
        rect: Rect::new(rect.left(), rect.top() + 35.0, rect.size.x, rect.size.y - 35.0),
        color: palette::PLAYER_BODY,
    });
    out.push(DrawCommand::FillCircle {
        center: Vec2::new(rect.left() + rect.size.x / 2.0, rect.top() + 18.0),
        radius: 18.0,
        color: palette::PLAYER_HEAD,
    });
}
