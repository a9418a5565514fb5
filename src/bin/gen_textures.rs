use std::env;

use bat_path::texture_gen::{export_textures, Palette};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/textures".to_string());

    let written = export_textures(&out_dir, &Palette::default())?;
    for path in &written {
        info!("Wrote {}", path.display());
    }
    info!("{} textures generated into {out_dir}", written.len());
    Ok(())
}
