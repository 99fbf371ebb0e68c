//! Steam plume above the vessel. Visual state only; nothing in the
//! simulation reads it back.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::particles;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteamParticle {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteamField {
    pub particles: Vec<SteamParticle>,
}

impl SteamField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maybe emit one particle, then rise and fade the rest.
    pub fn update(
        &mut self,
        temperature: f64,
        power_ratio: f64,
        delta_ms: f64,
        rng: &mut impl Rng,
    ) {
        if temperature > particles::SPAWN_TEMP
            && rng.gen::<f64>() < power_ratio * particles::SPAWN_CHANCE_AT_FULL_POWER
        {
            self.particles.push(SteamParticle {
                x: rng.gen::<f64>() * particles::FIELD_WIDTH,
                y: particles::SPAWN_Y,
                velocity: rng.gen::<f64>() * particles::VELOCITY_SPREAD + particles::MIN_VELOCITY,
                opacity: 1.0,
            });
        }

        let frames = delta_ms / particles::FRAME_MS;
        self.particles.retain_mut(|p| {
            p.y -= p.velocity * frames;
            p.opacity -= particles::FADE_PER_FRAME * frames;
            p.opacity > 0.0
        });
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
