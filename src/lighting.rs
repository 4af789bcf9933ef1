//! Lighting channels and the default light rig.
//!
//! The viewer drives a fixed four-light rig: one ambient plus three
//! directional lights (main, fill, rim). The channels form a closed enum with
//! an explicit mapping table; setter calls with an unrecognized channel name
//! are no-ops rather than errors so the engine stays decoupled from whatever
//! the UI layer believes exists.

use cgmath::Vector3;

use crate::render::RenderBackend;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightChannel {
    Ambient,
    Main,
    Fill,
    Rim,
}

impl LightChannel {
    pub const ALL: [LightChannel; 4] = [Self::Ambient, Self::Main, Self::Fill, Self::Rim];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ambient" => Some(Self::Ambient),
            "main" => Some(Self::Main),
            "fill" => Some(Self::Fill),
            "rim" => Some(Self::Rim),
            _ => None,
        }
    }

    /// World position of the directional lights; ambient has none.
    pub fn position(self) -> Option<Vector3<f64>> {
        match self {
            Self::Ambient => None,
            Self::Main => Some(Vector3::new(5.0, 10.0, 7.5)),
            Self::Fill => Some(Vector3::new(-5.0, 5.0, -5.0)),
            Self::Rim => Some(Vector3::new(0.0, 5.0, -10.0)),
        }
    }

    pub fn default_intensity(self) -> f64 {
        match self {
            Self::Ambient => 0.5,
            Self::Main => 0.8,
            Self::Fill => 0.3,
            Self::Rim => 0.2,
        }
    }
}

/// Current intensity per channel, mirrored to the backend on every change.
#[derive(Clone, Debug)]
pub struct LightRig {
    intensities: [f64; 4],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            intensities: LightChannel::ALL.map(LightChannel::default_intensity),
        }
    }
}

impl LightRig {
    /// Push the whole rig to the backend. Called once at viewer construction.
    pub fn install(&self, backend: &mut dyn RenderBackend) {
        for (idx, channel) in LightChannel::ALL.into_iter().enumerate() {
            backend.configure_light(channel, channel.position(), self.intensities[idx]);
        }
    }

    pub fn intensity(&self, channel: LightChannel) -> f64 {
        self.intensities[Self::slot(channel)]
    }

    pub fn set_intensity(
        &mut self,
        channel: LightChannel,
        intensity: f64,
        backend: &mut dyn RenderBackend,
    ) {
        self.intensities[Self::slot(channel)] = intensity;
        backend.set_light_intensity(channel, intensity);
    }

    fn slot(channel: LightChannel) -> usize {
        LightChannel::ALL
            .iter()
            .position(|c| *c == channel)
            .unwrap_or(0)
    }
}
