//! Position keyframe tracks built from paths

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Playback rate used when none is given
pub const DEFAULT_FRAMES_PER_SECOND: f32 = 60.0;

/// Animated property name of path tracks
pub const POSITION_PROPERTY: &str = "position";

/// How playback continues past the last key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoopMode {
    /// Each completed loop adds `last - first` to the values
    #[default]
    Relative,
    /// Wraps back to the first key
    Cycle,
    /// Holds the first or last value
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: f32,
    pub value: Vec3,
}

/// Ordered keys driving one `Vec3` property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeTrack {
    pub name: String,
    pub property: String,
    pub frames_per_second: f32,
    pub loop_mode: LoopMode,
    pub keys: Vec<Keyframe>,
}

/// Builds a position track with one key per path point at frame `i`.
///
/// Playback speed depends only on point count and `frames_per_second`.
pub fn create_animation(name: impl Into<String>, path: &[Vec3], frames_per_second: f32) -> KeyframeTrack {
    KeyframeTrack {
        name: name.into(),
        property: POSITION_PROPERTY.to_string(),
        frames_per_second,
        loop_mode: LoopMode::Relative,
        keys: path
            .iter()
            .enumerate()
            .map(|(i, &value)| Keyframe {
                frame: i as f32,
                value,
            })
            .collect(),
    }
}

impl KeyframeTrack {
    pub fn last_frame(&self) -> Option<f32> {
        self.keys.last().map(|k| k.frame)
    }

    /// Playback length in seconds, from frame 0 to the last key
    pub fn duration_seconds(&self) -> f32 {
        match self.last_frame() {
            Some(last) if self.frames_per_second > 0.0 => last / self.frames_per_second,
            _ => 0.0,
        }
    }

    /// Value at `frame`, linearly interpolated and extended by the loop mode
    pub fn evaluate(&self, frame: f32) -> Option<Vec3> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        let range = last.frame - first.frame;
        if range <= 0.0 {
            return Some(first.value);
        }

        if (first.frame..=last.frame).contains(&frame) {
            return Some(self.interpolate(frame));
        }

        match self.loop_mode {
            LoopMode::Constant => Some(if frame < first.frame {
                first.value
            } else {
                last.value
            }),
            LoopMode::Cycle => {
                let local = (frame - first.frame).rem_euclid(range);
                Some(self.interpolate(first.frame + local))
            }
            LoopMode::Relative => {
                let elapsed = frame - first.frame;
                let loops = (elapsed / range).floor();
                let local = elapsed - loops * range;
                let offset = (last.value - first.value) * loops;
                Some(self.interpolate(first.frame + local) + offset)
            }
        }
    }

    /// Interpolates inside the key range
    fn interpolate(&self, frame: f32) -> Vec3 {
        let next = self.keys.partition_point(|k| k.frame <= frame);
        match (next.checked_sub(1).map(|i| &self.keys[i]), self.keys.get(next)) {
            (Some(a), Some(b)) => {
                let t = (frame - a.frame) / (b.frame - a.frame);
                a.value.lerp(b.value, t)
            }
            (Some(a), None) => a.value,
            (None, Some(b)) => b.value,
            (None, None) => Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 2.0),
        ]
    }

    #[test]
    fn test_keys_follow_point_order() {
        let track = create_animation("walk", &path(), DEFAULT_FRAMES_PER_SECOND);
        assert_eq!(track.name, "walk");
        assert_eq!(track.property, "position");
        assert_eq!(track.loop_mode, LoopMode::Relative);
        assert_eq!(track.keys.len(), 3);
        for (i, key) in track.keys.iter().enumerate() {
            assert_eq!(key.frame, i as f32);
            assert_eq!(key.value, path()[i]);
        }
    }

    #[test]
    fn test_duration() {
        let track = create_animation("walk", &path(), 2.0);
        assert_eq!(track.duration_seconds(), 1.0);
        assert_eq!(create_animation("none", &[], 60.0).duration_seconds(), 0.0);
    }

    #[test]
    fn test_evaluate_inside_range() {
        let track = create_animation("walk", &path(), 60.0);
        assert_eq!(track.evaluate(0.0), Some(Vec3::ZERO));
        assert_eq!(track.evaluate(0.5), Some(Vec3::new(0.5, 0.0, 0.0)));
        assert_eq!(track.evaluate(1.5), Some(Vec3::new(1.0, 0.0, 1.0)));
        assert_eq!(track.evaluate(2.0), Some(Vec3::new(1.0, 0.0, 2.0)));
    }

    #[test]
    fn test_relative_loop_accumulates() {
        let track = create_animation("walk", &path(), 60.0);
        // One full loop later values are shifted by last - first = (1, 0, 2)
        assert_eq!(track.evaluate(2.5), Some(Vec3::new(1.5, 0.0, 2.0)));
        assert_eq!(track.evaluate(4.0), Some(Vec3::new(2.0, 0.0, 4.0)));
        assert_eq!(track.evaluate(-1.5), Some(Vec3::new(-0.5, 0.0, -2.0)));
    }

    #[test]
    fn test_cycle_and_constant() {
        let mut track = create_animation("walk", &path(), 60.0);
        track.loop_mode = LoopMode::Cycle;
        assert_eq!(track.evaluate(2.5), Some(Vec3::new(0.5, 0.0, 0.0)));

        track.loop_mode = LoopMode::Constant;
        assert_eq!(track.evaluate(7.0), Some(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(track.evaluate(-7.0), Some(Vec3::ZERO));
    }

    #[test]
    fn test_degenerate_tracks() {
        assert_eq!(create_animation("none", &[], 60.0).evaluate(1.0), None);
        let single = create_animation("one", &[Vec3::ONE], 60.0);
        assert_eq!(single.evaluate(5.0), Some(Vec3::ONE));
    }

    #[test]
    fn test_serializes_camel_case() -> Result<(), serde_json::Error> {
        let track = create_animation("walk", &path()[..1], 30.0);
        let json = serde_json::to_value(&track)?;
        assert_eq!(json["framesPerSecond"], 30.0);
        assert_eq!(json["loopMode"], "relative");
        assert_eq!(json["keys"][0]["frame"], 0.0);

        let back: KeyframeTrack = serde_json::from_value(json)?;
        assert_eq!(back, track);
        Ok(())
    }
}
