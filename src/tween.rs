use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    SineInOut,
    BackOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Ease::BackOut => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u * u * u + c1 * u * u
            }
        }
    }
}

/// Interpolates a single value from `from` to `to`. A yoyo tween plays
/// forward then back over twice its duration; a looping tween never finishes.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    ease: Ease,
    yoyo: bool,
    looping: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
            yoyo: false,
            looping: false,
        }
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    fn total(&self) -> f32 {
        if self.yoyo {
            self.duration * 2.0
        } else {
            self.duration
        }
    }

    pub fn update(&mut self, dt: f32) {
        let total = self.total();
        if total <= 0.0 {
            return;
        }
        self.elapsed += dt.max(0.0);
        if self.looping {
            self.elapsed %= total;
        } else {
            self.elapsed = self.elapsed.min(total);
        }
    }

    pub fn is_finished(&self) -> bool {
        !self.looping && self.elapsed >= self.total()
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.yoyo { self.from } else { self.to };
        }

        let mut t = self.elapsed / self.duration;
        if self.yoyo && t > 1.0 {
            t = 2.0 - t;
        }
        self.from + (self.to - self.from) * self.ease.apply(t)
    }
}
