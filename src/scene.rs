//! Simulation state for the demo: a player rectangle steered with the arrow
//! keys and a rectangle spinning in place.
//!
//! Each shape owns one authoritative [`Pose`]. Its vertices are materialized
//! from that pose once per tick, and the very same vertex lists are both
//! hit-tested and drawn, so the picture can never turn a different way from
//! the collision geometry.

use crate::config::{Color, Config};
use cgmath::vec2;
use log::debug;
use sat_core::{intersects, rotate_all, P2, V2};

/// Position and orientation of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position of the shape's origin.
    pub position: P2,
    /// Rotation about `position`, in degrees.
    pub rotation: f64,
}

/// Rectangle with a pose.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Width and height.
    size: V2,
    /// Offset of the origin from the top-left corner, in unrotated local
    /// coordinates.
    origin: V2,
    pub pose: Pose,
}
impl Shape {
    /// Rectangle whose origin is its top-left corner.
    pub fn anchored_top_left(width: f64, height: f64, position: P2) -> Shape {
        Shape {
            size: vec2(width, height),
            origin: vec2(0.0, 0.0),
            pose: Pose {
                position,
                rotation: 0.0,
            },
        }
    }

    /// Rectangle whose origin is its center.
    pub fn centered(width: f64, height: f64, position: P2) -> Shape {
        Shape {
            size: vec2(width, height),
            origin: vec2(width / 2.0, height / 2.0),
            pose: Pose {
                position,
                rotation: 0.0,
            },
        }
    }

    /// Width and height of the rectangle.
    pub fn size(&self) -> V2 {
        self.size
    }

    /// Materializes the corners for the current pose.
    ///
    /// Corners come in the order top-left, top-right, bottom-right,
    /// bottom-left (before rotation), each rotated about `pose.position`.
    pub fn vertices(&self) -> Vec<P2> {
        let top_left = self.pose.position - self.origin;
        let mut corners = vec![
            top_left,
            top_left + vec2(self.size.x, 0.0),
            top_left + self.size,
            top_left + vec2(0.0, self.size.y),
        ];
        rotate_all(&mut corners, self.pose.position, self.pose.rotation);
        corners
    }
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// The demo world.
#[derive(Debug)]
pub struct Scene {
    /// Width and height of the playing area.
    bounds: V2,
    movement_speed: f64,
    spin_per_tick: f64,
    clear_color: Color,
    hit_color: Color,
    player: Shape,
    spinner: Shape,
    /// Player displacement per tick.
    velocity: V2,
    /// Cursor position, when it is inside the window.
    cursor: Option<P2>,
    player_vertices: Vec<P2>,
    spinner_vertices: Vec<P2>,
    hit: bool,
    ticks: u64,
}
impl Scene {
    pub fn new(config: &Config) -> Scene {
        let (pw, ph) = config.player_size;
        let (sw, sh) = config.spinner_size;
        let player = Shape::anchored_top_left(pw, ph, config.player_start);
        let spinner = Shape::centered(sw, sh, config.window_center());
        let mut scene = Scene {
            bounds: V2::new(config.window_width as f64, config.window_height as f64),
            movement_speed: config.movement_speed,
            spin_per_tick: config.spin_per_tick,
            clear_color: config.clear_color,
            hit_color: config.hit_color,
            player_vertices: player.vertices(),
            spinner_vertices: spinner.vertices(),
            player,
            spinner,
            velocity: V2::new(0.0, 0.0),
            cursor: None,
            hit: false,
            ticks: 0,
        };
        scene.hit = scene.detect_hit();
        scene
    }

    /// An arrow key went down: move that way at full speed.
    pub fn press(&mut self, direction: Direction) {
        let speed = self.movement_speed;
        match direction {
            Direction::Left => self.velocity.x = -speed,
            Direction::Right => self.velocity.x = speed,
            Direction::Up => self.velocity.y = -speed,
            Direction::Down => self.velocity.y = speed,
        }
    }

    /// An arrow key came up: stop moving along its axis.
    pub fn release(&mut self, direction: Direction) {
        match direction {
            Direction::Left | Direction::Right => self.velocity.x = 0.0,
            Direction::Up | Direction::Down => self.velocity.y = 0.0,
        }
    }

    /// Updates the cursor position used for point hit-testing. `None` when
    /// the cursor is outside the window.
    pub fn set_cursor(&mut self, cursor: Option<P2>) {
        self.cursor = cursor;
    }

    /// Simulates `ticks` ticks.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Simulates one tick: spin, move, re-materialize, hit-test.
    pub fn step(&mut self) {
        let spinner = &mut self.spinner.pose;
        spinner.rotation = (spinner.rotation + self.spin_per_tick).rem_euclid(360.0);
        self.move_player();

        self.player_vertices = self.player.vertices();
        self.spinner_vertices = self.spinner.vertices();

        let hit = self.detect_hit();
        if hit != self.hit {
            debug!("Tick {}: spinner hit changed to {}", self.ticks, hit);
        }
        self.hit = hit;
        self.ticks += 1;
    }

    /// Moves the player by its velocity. Each axis is moved separately, and
    /// only if the rectangle stays inside the bounds on that axis.
    fn move_player(&mut self) {
        let size = self.player.size();
        let position = &mut self.player.pose.position;
        let new_x = position.x + self.velocity.x;
        if (0.0..=self.bounds.x - size.x).contains(&new_x) {
            position.x = new_x;
        }
        let new_y = position.y + self.velocity.y;
        if (0.0..=self.bounds.y - size.y).contains(&new_y) {
            position.y = new_y;
        }
    }

    /// Checks the spinner against the player rectangle and the cursor point.
    fn detect_hit(&self) -> bool {
        intersects(&self.player_vertices, &self.spinner_vertices)
            || self
                .cursor
                .is_some_and(|cursor| intersects(&[cursor], &self.spinner_vertices))
    }

    /// Player corners for the current tick.
    pub fn player_vertices(&self) -> &[P2] {
        &self.player_vertices
    }

    /// Spinner corners for the current tick.
    pub fn spinner_vertices(&self) -> &[P2] {
        &self.spinner_vertices
    }

    pub fn player(&self) -> &Shape {
        &self.player
    }

    pub fn spinner(&self) -> &Shape {
        &self.spinner
    }

    /// `true` if the player or the cursor touches the spinner.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Color of the spinner for the current hit state.
    pub fn spinner_color(&self) -> Color {
        if self.hit {
            self.hit_color
        } else {
            self.clear_color
        }
    }

    /// Number of ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::EuclideanSpace;
    use proptest::prelude::*;
    use sat_core::{assert_close, compare::Tol};

    fn scene() -> Scene {
        Scene::new(&Config::default())
    }

    #[test]
    fn test_initial_state_is_clear() {
        let scene = scene();
        assert!(!scene.is_hit());
        assert_eq!(scene.spinner_color(), Color::CYAN);
        assert_eq!(scene.player_vertices()[0], P2::new(0.0, 0.0));
        assert_eq!(scene.player_vertices()[2], P2::new(100.0, 150.0));
    }

    #[test]
    fn test_centered_shape_vertices() {
        let shape = Shape::centered(50.0, 50.0, P2::new(425.0, 240.0));
        assert_eq!(
            shape.vertices(),
            vec![
                P2::new(400.0, 215.0),
                P2::new(450.0, 215.0),
                P2::new(450.0, 265.0),
                P2::new(400.0, 265.0),
            ]
        );
    }

    /// In y-down coordinates a positive angle turns clockwise on screen: the
    /// top-left corner of a square moves towards the top-right.
    #[test]
    fn test_quarter_turn_moves_top_left_to_top_right() {
        let mut shape = Shape::centered(2.0, 2.0, P2::new(0.0, 0.0));
        shape.pose.rotation = 90.0;
        let vertices = shape.vertices();
        assert_close!(vertices[0], P2::new(1.0, -1.0));
        assert_close!(vertices[1], P2::new(1.0, 1.0));
    }

    #[test]
    fn test_moves_right_while_pressed() {
        let mut scene = scene();
        scene.press(Direction::Right);
        scene.run(100);
        assert_close!(Tol::abs(1e-9), scene.player().pose.position.x, 2.0);
        scene.release(Direction::Right);
        scene.run(100);
        assert_close!(Tol::abs(1e-9), scene.player().pose.position.x, 2.0);
    }

    #[test]
    fn test_release_stops_only_that_axis() {
        let mut scene = scene();
        scene.press(Direction::Right);
        scene.press(Direction::Down);
        scene.release(Direction::Right);
        scene.run(50);
        let position = scene.player().pose.position;
        assert_eq!(position.x, 0.0);
        assert_close!(Tol::abs(1e-9), position.y, 1.0);
    }

    #[test]
    fn test_player_cannot_leave_top_left() {
        let mut scene = scene();
        scene.press(Direction::Left);
        scene.press(Direction::Up);
        scene.run(10);
        assert_eq!(scene.player().pose.position, P2::new(0.0, 0.0));
    }

    #[test]
    fn test_player_cannot_leave_bottom_right() {
        let mut scene = scene();
        scene.player.pose.position = P2::new(749.99, 329.99);
        scene.press(Direction::Right);
        scene.press(Direction::Down);
        scene.run(10);
        assert_eq!(scene.player().pose.position, P2::new(749.99, 329.99));
    }

    #[test]
    fn test_spinner_rotation_accumulates() {
        let mut scene = scene();
        scene.run(2000);
        assert_close!(Tol::abs(1e-9), scene.spinner().pose.rotation, 10.0);
        assert_eq!(scene.ticks(), 2000);
        // Turning about its own center keeps the spinner in place.
        let center = P2::new(425.0, 240.0);
        let mean = P2::centroid(scene.spinner_vertices());
        assert_close!(Tol::abs(1e-9), mean, center);
    }

    #[test]
    fn test_player_overlapping_spinner_turns_it_red() {
        let mut scene = scene();
        scene.player.pose.position = P2::new(380.0, 150.0);
        scene.step();
        assert!(scene.is_hit());
        assert_eq!(scene.spinner_color(), Color::RED);
    }

    #[test]
    fn test_cursor_hit() {
        let mut scene = scene();
        scene.set_cursor(Some(P2::new(425.0, 240.0)));
        scene.step();
        assert!(scene.is_hit());

        scene.set_cursor(Some(P2::new(10.0, 400.0)));
        scene.step();
        assert!(!scene.is_hit());

        scene.set_cursor(None);
        scene.step();
        assert!(!scene.is_hit());
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Left),
            Just(Direction::Right),
            Just(Direction::Up),
            Just(Direction::Down),
        ]
    }

    proptest! {
        /// Whatever keys are pressed and released, the player rectangle stays
        /// inside the window.
        #[test]
        fn test_player_stays_in_bounds(
            moves in prop::collection::vec((direction(), any::<bool>(), 0u64..2_000), 1..12)
        ) {
            let config = Config {
                movement_speed: 5.0,
                ..Config::default()
            };
            let mut scene = Scene::new(&config);
            for (direction, pressed, ticks) in moves {
                if pressed {
                    scene.press(direction);
                } else {
                    scene.release(direction);
                }
                scene.run(ticks);
                let p = scene.player().pose.position;
                prop_assert!(p.x >= 0.0 && p.x <= 750.0);
                prop_assert!(p.y >= 0.0 && p.y <= 330.0);
            }
        }
    }
}
