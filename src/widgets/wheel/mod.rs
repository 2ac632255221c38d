//! Wheel widget - the spinning roulette face and its pointer

mod wheel;

pub use wheel::render_wheel;
