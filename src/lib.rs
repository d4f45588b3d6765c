pub mod config;
pub mod game;
pub mod generator;
pub mod grid;
pub mod render;
pub mod solver;
pub mod timer;
