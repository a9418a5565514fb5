//! Procedurally drawn textures. Everything is rasterised into RGBA buffers
//! in memory; nothing has to be read from disk before the game can start.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::GameError;

pub const BAT_WIDTH: u32 = 64;
pub const BAT_HEIGHT: u32 = 48;
pub const COIN_SIZE: u32 = 32;
pub const SPIKE_SIZE: u32 = 32;
pub const TILE_SIZE: u32 = 128;
pub const CALM_WIDTH: u32 = 720;
pub const CALM_HEIGHT: u32 = 480;
pub const HEART_SIZE: u32 = 48;

type Color = [u8; 4];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WingPose {
    Up,
    Mid,
    Down,
}

impl WingPose {
    pub const ALL: [WingPose; 3] = [WingPose::Up, WingPose::Mid, WingPose::Down];

    pub fn name(self) -> &'static str {
        match self {
            WingPose::Up => "bat_up",
            WingPose::Mid => "bat_mid",
            WingPose::Down => "bat_down",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Palette {
    pub bat_body: Color,
    pub bat_wing: Color,
    pub bat_eye: Color,
    pub coin_fill: Color,
    pub coin_rim: Color,
    pub coin_shine: Color,
    pub spike_fill: Color,
    pub spike_edge: Color,
    pub tile_base: Color,
    pub tile_band: Color,
    pub tile_dots: [Color; 2],
    pub calm_top: Color,
    pub calm_bottom: Color,
    pub hill_far: Color,
    pub hill_near: Color,
    pub sun: Color,
    pub heart: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bat_body: [0x22, 0x22, 0x22, 255],
            bat_wing: [0x33, 0x33, 0x33, 255],
            bat_eye: [255, 255, 255, 255],
            coin_fill: [0xf6, 0xc8, 0x4c, 255],
            coin_rim: [0xc6, 0x8b, 0x1a, 255],
            coin_shine: [255, 255, 255, 179],
            spike_fill: [0x11, 0x11, 0x11, 255],
            spike_edge: [0x44, 0x44, 0x44, 255],
            tile_base: [0x0b, 0x15, 0x30, 255],
            tile_band: [0x07, 0x10, 0x25, 230],
            tile_dots: [[0x2b, 0x3a, 0x57, 255], [0x27, 0x36, 0x4f, 255]],
            calm_top: [0xdf, 0xf7, 0xee, 255],
            calm_bottom: [0xa9, 0xe0, 0xd8, 255],
            hill_far: [0xe2, 0xf0, 0xea, 255],
            hill_near: [0xd6, 0xef, 0xe7, 255],
            sun: [0xff, 0xf6, 0xa8, 230],
            heart: [0xff, 0x5c, 0x8a, 255],
        }
    }
}

pub struct GeneratedTextures {
    pub bat: [RgbaImage; 3],
    pub coin: RgbaImage,
    pub spike: RgbaImage,
    pub path_tile: RgbaImage,
    pub calm_background: RgbaImage,
    pub heart: RgbaImage,
}

pub fn generate_all(palette: &Palette) -> GeneratedTextures {
    GeneratedTextures {
        bat: WingPose::ALL.map(|pose| bat_frame(pose, palette)),
        coin: coin(palette),
        spike: spike(palette),
        path_tile: path_tile(palette),
        calm_background: calm_background(palette),
        heart: heart(palette),
    }
}

pub fn bat_frame(pose: WingPose, palette: &Palette) -> RgbaImage {
    let mut img = RgbaImage::new(BAT_WIDTH, BAT_HEIGHT);
    let (cx, cy) = (32.0, 24.0);

    // Wing triangles as (shoulder, tip, trailing edge) offsets from the body
    let left: [(f32, f32); 3] = match pose {
        WingPose::Up => [(-4.0, 0.0), (-22.0, -16.0), (-14.0, 6.0)],
        WingPose::Mid => [(-4.0, 0.0), (-24.0, 0.0), (-14.0, 8.0)],
        WingPose::Down => [(-4.0, -2.0), (-20.0, 16.0), (-8.0, 8.0)],
    };
    for side in [-1.0f32, 1.0] {
        let pts = left.map(|(dx, dy)| (cx - side * dx, cy + dy));
        fill_triangle(&mut img, pts[0], pts[1], pts[2], palette.bat_wing);
    }

    fill_ellipse(&mut img, cx, cy, 8.0, 7.0, palette.bat_body);
    // ears
    for side in [-1.0, 1.0] {
        fill_triangle(
            &mut img,
            (cx + 6.0 * side, cy - 4.0),
            (cx + 4.0 * side, cy - 11.0),
            (cx + side, cy - 5.0),
            palette.bat_body,
        );
    }
    fill_ellipse(&mut img, cx, cy - 2.0, 2.0, 2.0, palette.bat_eye);

    img
}

pub fn coin(palette: &Palette) -> RgbaImage {
    let mut img = RgbaImage::new(COIN_SIZE, COIN_SIZE);
    fill_ellipse(&mut img, 16.0, 16.0, 15.0, 15.0, palette.coin_rim);
    fill_ellipse(&mut img, 16.0, 16.0, 13.0, 13.0, palette.coin_fill);
    fill_ellipse(&mut img, 12.0, 12.0, 3.0, 3.0, palette.coin_shine);
    img
}

pub fn spike(palette: &Palette) -> RgbaImage {
    let mut img = RgbaImage::new(SPIKE_SIZE, SPIKE_SIZE);
    for (left, tip, right) in [(0.0, 8.0, 16.0), (16.0, 24.0, 32.0)] {
        fill_triangle(&mut img, (left, 29.0), (tip, 6.5), (right, 29.0), palette.spike_edge);
        fill_triangle(
            &mut img,
            (left + 1.5, 28.0),
            (tip, 9.0),
            (right - 1.5, 28.0),
            palette.spike_fill,
        );
    }
    img
}

pub fn path_tile(palette: &Palette) -> RgbaImage {
    let mut img: RgbaImage =
        ImageBuffer::from_fn(TILE_SIZE, TILE_SIZE, |_x, _y| Rgba(palette.tile_base));
    for band_top in [0u32, 64] {
        for y in band_top..band_top + 32 {
            for x in 0..TILE_SIZE {
                blend(&mut img, x, y, palette.tile_band);
            }
        }
    }
    fill_ellipse(&mut img, 20.0, 30.0, 1.5, 1.5, palette.tile_dots[0]);
    fill_ellipse(&mut img, 100.0, 90.0, 1.2, 1.2, palette.tile_dots[1]);
    img
}

pub fn calm_background(palette: &Palette) -> RgbaImage {
    let mut img = vertical_gradient(CALM_WIDTH, CALM_HEIGHT, palette.calm_top, palette.calm_bottom);
    fill_ellipse(&mut img, 360.0, 420.0, 420.0, 120.0, palette.hill_far);
    fill_ellipse(&mut img, 220.0, 430.0, 300.0, 90.0, palette.hill_near);
    fill_ellipse(&mut img, 550.0, 100.0, 42.0, 42.0, palette.sun);
    img
}

/// Classic implicit heart curve, point down.
pub fn heart(palette: &Palette) -> RgbaImage {
    let size = HEART_SIZE as f32;
    ImageBuffer::from_fn(HEART_SIZE, HEART_SIZE, |x, y| {
        let nx = ((x as f32 + 0.5) / size - 0.5) * 2.6;
        let ny = -((y as f32 + 0.5) / size - 0.45) * 2.6;
        let a = nx * nx + ny * ny - 1.0;
        if a * a * a - nx * nx * ny * ny * ny <= 0.0 {
            Rgba(palette.heart)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

pub fn export_textures(
    dir: impl AsRef<Path>,
    palette: &Palette,
) -> Result<Vec<PathBuf>, GameError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| GameError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let textures = generate_all(palette);
    let mut named: Vec<(&str, &RgbaImage)> = WingPose::ALL
        .iter()
        .zip(textures.bat.iter())
        .map(|(pose, img)| (pose.name(), img))
        .collect();
    named.extend([
        ("coin", &textures.coin),
        ("spike", &textures.spike),
        ("path_tile", &textures.path_tile),
        ("calm_bg", &textures.calm_background),
        ("heart", &textures.heart),
    ]);

    let mut written = Vec::with_capacity(named.len());
    for (name, img) in named {
        let path = dir.join(format!("{name}.png"));
        img.save(&path).map_err(|source| GameError::TextureSave {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}

fn vertical_gradient(width: u32, height: u32, top_color: Color, bottom_color: Color) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |_x, y| {
        let t = y as f32 / (height.saturating_sub(1).max(1) as f32);
        let lerp = |a: u8, b: u8| -> u8 {
            ((a as f32 * (1.0 - t)) + (b as f32 * t)).round().clamp(0.0, 255.0) as u8
        };
        Rgba([
            lerp(top_color[0], bottom_color[0]),
            lerp(top_color[1], bottom_color[1]),
            lerp(top_color[2], bottom_color[2]),
            lerp(top_color[3], bottom_color[3]),
        ])
    })
}

/// Source-over blend of `color` onto one pixel.
fn blend(img: &mut RgbaImage, x: u32, y: u32, color: Color) {
    let src_a = color[3] as f32 / 255.0;
    if src_a <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }
    for i in 0..3 {
        let c = (color[i] as f32 * src_a + dst[i] as f32 * dst_a * (1.0 - src_a)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

fn fill_ellipse(img: &mut RgbaImage, cx: f32, cy: f32, rx: f32, ry: f32, color: Color) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let (w, h) = img.dimensions();
    let x0 = (cx - rx).floor().max(0.0) as u32;
    let y0 = (cy - ry).floor().max(0.0) as u32;
    let x1 = ((cx + rx).ceil() as u32).min(w);
    let y1 = ((cy + ry).ceil() as u32).min(h);

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = (x as f32 + 0.5 - cx) / rx;
            let dy = (y as f32 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                blend(img, x, y, color);
            }
        }
    }
}

fn fill_triangle(img: &mut RgbaImage, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color) {
    let edge = |p: (f32, f32), q: (f32, f32), x: f32, y: f32| {
        (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
    };
    let area = edge(a, b, c.0, c.1);
    if area == 0.0 {
        return;
    }

    let (w, h) = img.dimensions();
    let x0 = a.0.min(b.0).min(c.0).floor().max(0.0) as u32;
    let y0 = a.1.min(b.1).min(c.1).floor().max(0.0) as u32;
    let x1 = (a.0.max(b.0).max(c.0).ceil().max(0.0) as u32).min(w);
    let y1 = (a.1.max(b.1).max(c.1).ceil().max(0.0) as u32).min(h);

    for y in y0..y1 {
        for x in x0..x1 {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, px, py) * area.signum();
            let w1 = edge(c, a, px, py) * area.signum();
            let w2 = edge(a, b, px, py) * area.signum();
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                blend(img, x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_has_rim_fill_and_clear_corners() {
        let palette = Palette::default();
        let img = coin(&palette);
        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(20, 20).0, palette.coin_fill);
        assert_eq!(img.get_pixel(16, 1).0, palette.coin_rim);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_spike_points_up() {
        let palette = Palette::default();
        let img = spike(&palette);
        assert_eq!(img.get_pixel(8, 20).0, palette.spike_fill);
        assert_eq!(img.get_pixel(24, 20).0, palette.spike_fill);
        // gap between the two teeth near the top
        assert_eq!(img.get_pixel(16, 8)[3], 0);
        assert_eq!(img.get_pixel(16, 31)[3], 0);
    }

    #[test]
    fn test_path_tile_is_opaque_with_bands() {
        let palette = Palette::default();
        let img = path_tile(&palette);
        assert_eq!(img.dimensions(), (TILE_SIZE, TILE_SIZE));
        assert!(img.pixels().all(|p| p[3] == 255));
        assert_eq!(img.get_pixel(60, 40).0, palette.tile_base);
        assert_ne!(img.get_pixel(60, 10).0, palette.tile_base);
    }

    #[test]
    fn test_bat_frames_differ_by_pose() {
        let palette = Palette::default();
        let frames = WingPose::ALL.map(|pose| bat_frame(pose, &palette));
        assert_ne!(frames[0], frames[1]);
        assert_ne!(frames[1], frames[2]);
        // eye sits on the body in every pose
        for frame in &frames {
            assert_eq!(frame.get_pixel(32, 22).0, palette.bat_eye);
        }
    }

    #[test]
    fn test_heart_center_filled_corners_clear() {
        let palette = Palette::default();
        let img = heart(&palette);
        assert_eq!(img.get_pixel(24, 24).0, palette.heart);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(47, 47)[3], 0);
    }

    #[test]
    fn test_calm_background_sky_and_hills() {
        let palette = Palette::default();
        let img = calm_background(&palette);
        assert_eq!(img.get_pixel(10, 0).0, palette.calm_top);
        let mid = img.get_pixel(10, 240);
        assert!(mid[1] < palette.calm_top[1] && mid[1] > palette.calm_bottom[1]);
        assert_eq!(img.get_pixel(0, 479).0, palette.hill_near);
    }

    #[test]
    fn test_export_writes_every_texture() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_textures(dir.path(), &Palette::default()).unwrap();
        assert_eq!(written.len(), 8);
        for path in &written {
            assert!(path.exists(), "missing {:?}", path);
        }
        let coin = image::open(dir.path().join("coin.png")).unwrap();
        assert_eq!(coin.width(), COIN_SIZE);
    }
}
