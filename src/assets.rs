use ::image::RgbaImage;
use log::debug;
use macroquad::prelude::*;

use crate::texture_gen::{self, Palette};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Bat,
    Coin,
    Spike,
    PathTile,
    CalmBackground,
    Heart,
}

/// GPU textures for every sprite the scenes draw.
pub struct Assets {
    pub bat_frames: [Texture2D; 3],
    pub coin: Texture2D,
    pub spike: Texture2D,
    pub path_tile: Texture2D,
    pub calm_background: Texture2D,
    pub heart: Texture2D,
}

impl Assets {
    /// Rasterises the procedural textures and uploads them. Needs a live
    /// macroquad context.
    pub fn generate(palette: &Palette) -> Self {
        let textures = texture_gen::generate_all(palette);
        Self {
            bat_frames: [
                upload(&textures.bat[0]),
                upload(&textures.bat[1]),
                upload(&textures.bat[2]),
            ],
            coin: upload(&textures.coin),
            spike: upload(&textures.spike),
            path_tile: upload(&textures.path_tile),
            calm_background: upload(&textures.calm_background),
            heart: upload(&textures.heart),
        }
    }

    pub fn texture(&self, kind: SpriteKind) -> &Texture2D {
        match kind {
            SpriteKind::Bat => &self.bat_frames[1],
            SpriteKind::Coin => &self.coin,
            SpriteKind::Spike => &self.spike,
            SpriteKind::PathTile => &self.path_tile,
            SpriteKind::CalmBackground => &self.calm_background,
            SpriteKind::Heart => &self.heart,
        }
    }

    pub fn bat_frame(&self, frame: usize) -> &Texture2D {
        &self.bat_frames[frame % self.bat_frames.len()]
    }
}

fn upload(img: &RgbaImage) -> Texture2D {
    let (w, h) = img.dimensions();
    let texture = Texture2D::from_rgba8(w as u16, h as u16, img.as_raw());
    texture.set_filter(FilterMode::Linear);
    debug!("Uploaded {w}x{h} texture");
    texture
}
