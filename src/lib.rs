pub mod assets;
pub mod collision;
pub mod dialogue;
pub mod error;
pub mod flow;
pub mod input;
pub mod player;
pub mod render;
pub mod rules;
pub mod run;
pub mod spawner;
pub mod texture_gen;
pub mod timer;
pub mod tween;
pub mod world;
