use rand::Rng;

/// Screen shake with an exponentially decaying intensity.
#[derive(Debug, Clone, Default)]
pub struct Shake {
    intensity: f64,
    offset: (f64, f64),
}

impl Shake {
    /// Sets the intensity outright, replacing a weaker or stronger shake.
    pub fn kick(&mut self, intensity: f64) {
        self.intensity = intensity;
    }

    /// Raises the intensity to at least `intensity`.
    pub fn nudge(&mut self, intensity: f64) {
        self.intensity = self.intensity.max(intensity);
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Frame offset chosen by the last `update`.
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.intensity > 0.0 {
            let half = self.intensity / 2.0;
            self.offset = (rng.gen_range(-half..=half), rng.gen_range(-half..=half));
            self.intensity *= 0.9;
            if self.intensity < 0.1 {
                self.intensity = 0.0;
            }
        } else {
            self.offset = (0.0, 0.0);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn offset_is_bounded_and_decays_to_zero() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut s = Shake::default();
        s.kick(10.0);
        let mut last = f64::MAX;
        for _ in 0..60 {
            let before = s.intensity();
            s.update(&mut rng);
            let (dx, dy) = s.offset();
            assert!(dx.abs() <= before / 2.0 && dy.abs() <= before / 2.0);
            assert!(s.intensity() <= last);
            last = s.intensity();
        }
        assert_eq!(s.intensity(), 0.0);
        s.update(&mut rng);
        assert_eq!(s.offset(), (0.0, 0.0));
    }

    #[test]
    fn nudge_never_lowers() {
        let mut s = Shake::default();
        s.kick(10.0);
        s.nudge(1.5);
        assert_eq!(s.intensity(), 10.0);
        s.reset();
        s.nudge(1.5);
        assert_eq!(s.intensity(), 1.5);
    }
}
