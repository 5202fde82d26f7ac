//! Embassy async tasks

pub mod sound;

pub use sound::sound_task;
