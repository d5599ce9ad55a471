use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::config::{GameConfig, SleighConfig};
use crate::core::input::InputState;

/// The player-controlled actor. `x`/`y` are the center of its hit-box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sleigh {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub friction: f64,
}

impl Sleigh {
    /// Places the sleigh centered horizontally, `bottom_offset` above the bottom edge.
    pub fn new(config: &SleighConfig, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            x: canvas_width / 2.0,
            y: canvas_height - config.bottom_offset,
            width: config.width,
            height: config.height,
            speed: 0.0,
            max_speed: config.max_speed,
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            friction: config.friction,
        }
    }

    pub fn reset(&mut self, canvas_width: f64) {
        self.x = canvas_width / 2.0;
        self.speed = 0.0;
    }

    /// One frame of control: accelerate toward the held direction, otherwise
    /// decay geometrically and snap to zero under the deceleration threshold.
    /// Left wins when both directions are held.
    pub fn steer(&mut self, input: &InputState, canvas_width: f64) {
        if input.left {
            self.speed = (self.speed - self.acceleration).max(-self.max_speed);
        } else if input.right {
            self.speed = (self.speed + self.acceleration).min(self.max_speed);
        } else if self.speed.abs() < self.deceleration {
            self.speed = 0.0;
        } else {
            self.speed *= self.friction;
        }

        self.x += self.speed;
        self.x = self.x.min(self.max_x(canvas_width)).max(self.min_x());
    }

    pub fn min_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn max_x(&self, canvas_width: f64) -> f64 {
        canvas_width - self.width / 2.0
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Point-in-box test on the snowflake center. Flake size is ignored and
    /// the box edges are exclusive.
    pub fn collides_with(&self, snowflake: &Snowflake) -> bool {
        snowflake.x > self.left()
            && snowflake.x < self.right()
            && snowflake.y > self.top()
            && snowflake.y < self.bottom()
    }
}

/// A falling obstacle. `x` never changes after spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snowflake {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
}

impl Snowflake {
    pub fn new(x: f64, y: f64, size: f64, speed: f64) -> Self {
        Self { x, y, size, speed }
    }

    pub fn fall(&mut self) {
        self.y += self.speed;
    }

    pub fn is_below(&self, canvas_height: f64) -> bool {
        self.y > canvas_height
    }

    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }
}

/// Draws a fresh snowflake above the visible area with uniformly random
/// horizontal position, size and speed.
pub fn spawn_snowflake<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig, canvas_width: f64) -> Snowflake {
    Snowflake {
        x: rng.gen::<f64>() * canvas_width,
        y: config.snowflake_spawn_y,
        size: uniform(rng, config.snowflake_size_min, config.snowflake_size_max),
        speed: uniform(rng, config.snowflake_speed_min, config.snowflake_speed_max),
    }
}

/// Rolls the per-frame spawn chance; `spawn_rate` is a percentage.
pub fn should_spawn<R: Rng + ?Sized>(rng: &mut R, spawn_rate: f64) -> bool {
    rng.gen::<f64>() * 100.0 < spawn_rate
}

// min == max is allowed, unlike gen_range on an empty half-open range
fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.gen::<f64>() * (max - min) + min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sleigh() -> Sleigh {
        Sleigh::new(&SleighConfig::default(), 600.0, 800.0)
    }

    #[test]
    fn test_sleigh_placement() {
        let sleigh = sleigh();
        assert_eq!(sleigh.x, 300.0);
        assert_eq!(sleigh.y, 740.0);
        assert_eq!(sleigh.speed, 0.0);
        assert_eq!((sleigh.left(), sleigh.right()), (275.0, 325.0));
        assert_eq!((sleigh.top(), sleigh.bottom()), (725.0, 755.0));
    }

    #[test]
    fn test_acceleration_is_capped() {
        let mut sleigh = sleigh();
        let mut input = InputState::default();
        input.press(Direction::Left);

        for _ in 0..30 {
            sleigh.steer(&input, 600.0);
            assert!(sleigh.speed >= -8.0);
        }
        assert_eq!(sleigh.speed, -8.0);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut sleigh = sleigh();
        let mut input = InputState::default();
        input.press(Direction::Right);
        input.press(Direction::Left);

        sleigh.steer(&input, 600.0);
        assert_eq!(sleigh.speed, -0.5);
    }

    #[test]
    fn test_idle_decay_snaps_to_zero() {
        let mut sleigh = sleigh();
        sleigh.speed = 8.0;
        let input = InputState::default();

        let mut frames = 0;
        while sleigh.speed != 0.0 {
            sleigh.steer(&input, 600.0);
            frames += 1;
            assert!(frames < 100, "speed never settled");
        }
        // 8 * 0.95^n drops under 0.2 after 72 frames, snapped on the next one
        assert_eq!(frames, 73);
    }

    #[test]
    fn test_position_clamped_to_canvas() {
        let mut sleigh = sleigh();
        let mut input = InputState::default();
        input.press(Direction::Left);

        for _ in 0..200 {
            sleigh.steer(&input, 600.0);
            assert!(sleigh.x >= 25.0 && sleigh.x <= 575.0);
        }
        assert_eq!(sleigh.x, 25.0);
    }

    #[test]
    fn test_collision_is_strict_point_test() {
        let sleigh = sleigh();

        assert!(sleigh.collides_with(&Snowflake::new(300.0, 740.0, 10.0, 3.0)));
        // on the edge does not count
        assert!(!sleigh.collides_with(&Snowflake::new(275.0, 740.0, 10.0, 3.0)));
        assert!(!sleigh.collides_with(&Snowflake::new(300.0, 725.0, 10.0, 3.0)));
        // a big flake whose disc overlaps the box but whose center does not
        assert!(!sleigh.collides_with(&Snowflake::new(300.0, 720.0, 30.0, 3.0)));
    }

    #[test]
    fn test_spawned_snowflake_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = GameConfig::default();

        for _ in 0..500 {
            let flake = spawn_snowflake(&mut rng, &config, 600.0);
            assert!(flake.x >= 0.0 && flake.x < 600.0);
            assert_eq!(flake.y, -20.0);
            assert!(flake.size >= 5.0 && flake.size < 15.0);
            assert!(flake.speed >= 2.0 && flake.speed < 4.0);
        }
    }

    #[test]
    fn test_spawn_chance_extremes() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!((0..1000).all(|_| !should_spawn(&mut rng, 0.0)));
        assert!((0..1000).all(|_| should_spawn(&mut rng, 100.0)));
    }

    #[test]
    fn test_snowflake_falls_past_bottom() {
        let mut flake = Snowflake::new(10.0, 799.0, 8.0, 5.0);
        assert!(!flake.is_below(800.0));
        flake.fall();
        assert_eq!(flake.y, 804.0);
        assert!(flake.is_below(800.0));
        assert_eq!(flake.radius(), 4.0);
    }
}
