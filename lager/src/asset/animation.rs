/// Decoded animation. Only what the cache needs to tell animations apart is kept here, sampling
/// is the animation system's business.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animation {
    pub name: String,
    pub fps: f32,
    pub frame_count: u32,
    /// Names of the animated skeleton nodes.
    pub nodes: Vec<String>,
}

impl Animation {
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn duration_ms(&self) -> u64 {
        if self.fps > 0.0 {
            (self.frame_count as f64 * 1000.0 / self.fps as f64) as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration() {
        let a = Animation {
            name: "S_RUN".to_string(),
            fps: 25.0,
            frame_count: 50,
            nodes: Vec::new(),
        };
        assert_eq!(a.duration_ms(), 2000);
        assert_eq!(Animation::empty("X").duration_ms(), 0);
    }
}
