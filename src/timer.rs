/// Countdown timer advanced by the game loop. Repeating timers report how
/// many periods elapsed during a tick so a long frame never drops a firing.
#[derive(Debug, Clone)]
pub struct Timer {
    period: f32,
    elapsed: f32,
    repeating: bool,
    active: bool,
}

impl Timer {
    pub fn repeating(period: f32) -> Self {
        Self {
            period: period.max(f32::EPSILON),
            elapsed: 0.0,
            repeating: true,
            active: true,
        }
    }

    pub fn once(delay: f32) -> Self {
        Self {
            repeating: false,
            ..Self::repeating(delay)
        }
    }

    /// Advances the timer and returns the number of times it fired.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.active || dt <= 0.0 {
            return 0;
        }

        self.elapsed += dt;
        if self.elapsed < self.period {
            return 0;
        }

        if !self.repeating {
            self.active = false;
            self.elapsed = self.period;
            return 1;
        }

        let fires = (self.elapsed / self.period).floor();
        self.elapsed -= fires * self.period;
        fires as u32
    }

    /// Stops the timer for good; later ticks never fire.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_timer_fires_each_period() {
        let mut timer = Timer::repeating(0.5);
        assert_eq!(timer.tick(0.25), 0);
        assert_eq!(timer.tick(0.25), 1);
        assert_eq!(timer.tick(0.25), 0);
        assert_eq!(timer.tick(0.25), 1);
    }

    #[test]
    fn test_long_tick_reports_every_firing() {
        let mut timer = Timer::repeating(0.5);
        assert_eq!(timer.tick(1.75), 3);
        assert_eq!(timer.tick(0.25), 1);
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timer = Timer::once(0.25);
        assert_eq!(timer.tick(1.0), 1);
        assert!(!timer.is_active());
        assert_eq!(timer.tick(1.0), 0);
    }

    #[test]
    fn test_cancelled_timer_is_silent_until_restart() {
        let mut timer = Timer::repeating(0.5);
        timer.tick(0.25);
        timer.cancel();
        assert_eq!(timer.tick(10.0), 0);

        timer.restart();
        assert_eq!(timer.tick(0.25), 0);
        assert_eq!(timer.tick(0.25), 1);
    }
}
