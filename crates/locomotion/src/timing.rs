/// A buffered button press: `request` arms the window, and the flag decays
/// on its own once more than `expiry` seconds have accumulated, whether or
/// not anyone polled it in between.
#[derive(Debug, Clone, Copy)]
pub struct RequestWindow {
    requested: bool,
    elapsed: f32,
    expiry: f32,
}

impl RequestWindow {
    pub fn new(expiry: f32) -> Self {
        Self {
            requested: false,
            elapsed: 0.0,
            expiry,
        }
    }

    pub fn request(&mut self) {
        self.requested = true;
        self.elapsed = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.requested {
            self.elapsed += dt;
            if self.elapsed > self.expiry {
                self.requested = false;
            }
        }
    }

    pub fn active(&self) -> bool {
        self.requested && self.elapsed <= self.expiry
    }

    /// Clears the request once it has been acted on.
    pub fn consume(&mut self) {
        self.requested = false;
    }
}

/// Ability cooldown. `available` is true exactly when `elapsed >= duration`;
/// firing the ability resets `elapsed` to zero.
#[derive(Debug, Clone, Copy)]
pub struct CooldownTimer {
    elapsed: f32,
    duration: f32,
}

impl CooldownTimer {
    /// Starts ready: a fresh timer has its full duration already elapsed.
    pub fn ready(duration: f32) -> Self {
        Self {
            elapsed: duration,
            duration,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.elapsed < self.duration {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
    }

    pub fn available(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn fire(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_decays_in_place() {
        let mut window = RequestWindow::new(0.1);
        window.request();
        assert!(window.active());

        // A single oversized step past the expiry, no fresh request.
        window.tick(0.1 + 1e-3);
        assert!(!window.active());
    }

    #[test]
    fn window_survives_until_expiry() {
        let mut window = RequestWindow::new(0.5);
        window.request();
        for _ in 0..8 {
            window.tick(0.06);
        }
        assert!(window.active());
        window.tick(0.06);
        assert!(!window.active());
    }

    #[test]
    fn window_rearms_on_new_request() {
        let mut window = RequestWindow::new(0.1);
        window.request();
        window.tick(0.2);
        assert!(!window.active());

        window.request();
        assert!(window.active());
    }

    #[test]
    fn consume_clears_immediately() {
        let mut window = RequestWindow::new(1.0);
        window.request();
        window.consume();
        assert!(!window.active());
    }

    #[test]
    fn cooldown_unavailable_right_after_firing() {
        let mut cooldown = CooldownTimer::ready(0.5);
        assert!(cooldown.available());

        cooldown.fire();
        assert!(!cooldown.available());

        cooldown.tick(0.49);
        assert!(!cooldown.available());
        cooldown.tick(0.01);
        assert!(cooldown.available());
    }

    #[test]
    fn cooldown_zero_duration_is_always_ready() {
        let mut cooldown = CooldownTimer::ready(0.0);
        cooldown.fire();
        assert!(cooldown.available());
    }
}
