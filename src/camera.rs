use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Vector3};

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 45.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vector3<f32>,
    front: Vector3<f32>,
    up: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    fov: f32,
}

impl CameraState {
    pub fn new(position: Vector3<f32>, yaw: f32, pitch: f32, fov: f32) -> Self {
        let mut state = Self {
            position,
            front: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fov: fov.clamp(MIN_FOV, MAX_FOV),
        };
        state.update_front();
        state
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    /// Degrees, unbounded.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Degrees, within `[-89, 89]`.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees, within `[1, 45]`.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// World up, always the positive y axis.
    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.front.cross(self.up).normalize()
    }

    fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_front();
    }

    fn update_front(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());

        self.front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);

        Matrix4::look_at_rh(eye, eye + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Matrix4<f32> {
        perspective(Deg(self.fov), aspect_ratio, NEAR_PLANE, FAR_PLANE)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 3.0), -90.0, 0.0, MAX_FOV)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First person camera driven by keyboard, pointer and scroll input.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub state: CameraState,
    /// Units per second.
    pub speed: f32,
    /// Degrees per pointer pixel.
    pub sensitivity: f32,
    last_pointer: Option<(f64, f64)>,
    virtual_pointer: (f64, f64),
}

impl CameraController {
    pub fn new(state: CameraState, speed: f32, sensitivity: f32) -> Self {
        Self {
            state,
            speed,
            sensitivity,
            last_pointer: None,
            virtual_pointer: (0.0, 0.0),
        }
    }

    pub fn process_keyboard(&mut self, movement: Movement, elapsed_secs: f32) {
        let distance = self.speed * elapsed_secs;
        let front = self.state.front;
        let right = self.state.right();
        let position = &mut self.state.position;

        match movement {
            Movement::Forward => *position += front * distance,
            Movement::Backward => *position -= front * distance,
            Movement::Left => *position -= right * distance,
            Movement::Right => *position += right * distance,
        }
    }

    /// Takes the absolute pointer position in window coordinates.
    ///
    /// The first event only latches the position.
    pub fn process_pointer(&mut self, x: f64, y: f64) {
        let Some((last_x, last_y)) = self.last_pointer.replace((x, y)) else {
            return;
        };

        // Window y grows downwards, pitch grows upwards.
        let x_offset = (x - last_x) as f32 * self.sensitivity;
        let y_offset = (last_y - y) as f32 * self.sensitivity;

        self.state.rotate(x_offset, y_offset);
    }

    /// Takes raw pointer motion, for when the cursor is confined or locked and
    /// its window position stops changing at the edges.
    ///
    /// Deltas accumulate into an unbounded position that feeds
    /// `process_pointer`, so latching behaves the same.
    pub fn process_pointer_motion(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.virtual_pointer;
        self.virtual_pointer = (x + dx, y + dy);

        let (x, y) = self.virtual_pointer;
        self.process_pointer(x, y);
    }

    /// Forgets the latched pointer position, e.g. when the cursor leaves the
    /// window, so re-entering does not jump.
    pub fn reset_pointer(&mut self) {
        self.last_pointer = None;
    }

    pub fn process_scroll(&mut self, delta: f32) {
        self.state.fov = (self.state.fov - delta).clamp(MIN_FOV, MAX_FOV);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.state.view_matrix()
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Matrix4<f32> {
        self.state.projection_matrix(aspect_ratio)
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraState::default(), 2.5, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Transform};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    const EPS: f32 = 1e-5;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < EPS
    }

    #[test]
    fn default_looks_down_negative_z() {
        let state = CameraState::default();

        assert!(close(state.front(), Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(state.right(), Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn first_pointer_event_latches() {
        let mut camera = CameraController::default();
        let before = camera.state;

        camera.process_pointer(812.0, 14.0);
        assert_eq!(camera.state, before);

        camera.process_pointer(822.0, 4.0);
        assert!((camera.state.yaw() - -89.0).abs() < EPS);
        assert!((camera.state.pitch() - 1.0).abs() < EPS);
    }

    #[test]
    fn reset_latches_again() {
        let mut camera = CameraController::default();
        camera.process_pointer(0.0, 0.0);
        camera.reset_pointer();

        let before = camera.state;
        camera.process_pointer(500.0, 500.0);
        assert_eq!(camera.state, before);
    }

    #[test]
    fn random_pointer_sequences_stay_bounded() {
        let mut rng = SmallRng::seed_from_u64(0);

        for _ in 0..50 {
            let mut camera = CameraController::default();

            for _ in 0..200 {
                let x = rng.gen_range(-5000.0..5000.0);
                let y = rng.gen_range(-5000.0..5000.0);
                camera.process_pointer(x, y);

                let pitch = camera.state.pitch();
                assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&pitch));
                assert!((camera.state.front().magnitude() - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn pitch_clamps_at_poles() {
        let mut camera = CameraController::default();
        camera.process_pointer(0.0, 0.0);
        camera.process_pointer(0.0, -10_000.0);

        assert_eq!(camera.state.pitch(), PITCH_LIMIT);

        camera.process_pointer(0.0, 10_000.0);
        assert_eq!(camera.state.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn scroll_clamps_fov() {
        let mut camera = CameraController::default();
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..500 {
            camera.process_scroll(rng.gen_range(-20.0..20.0));
            let fov = camera.state.fov();
            assert!((MIN_FOV..=MAX_FOV).contains(&fov));
        }

        camera.process_scroll(100.0);
        assert_eq!(camera.state.fov(), MIN_FOV);
        camera.process_scroll(-100.0);
        assert_eq!(camera.state.fov(), MAX_FOV);
    }

    #[test]
    fn zero_frame_time_does_not_move() {
        let mut camera = CameraController::default();
        let start = camera.state.position;

        for movement in [
            Movement::Forward,
            Movement::Backward,
            Movement::Left,
            Movement::Right,
        ] {
            camera.process_keyboard(movement, 0.0);
        }

        assert_eq!(camera.state.position, start);
    }

    #[test]
    fn movement_scales_with_frame_time() {
        let mut camera = CameraController::default();

        camera.process_keyboard(Movement::Forward, 0.5);
        assert!(close(camera.state.position, Vector3::new(0.0, 0.0, 1.75)));

        camera.process_keyboard(Movement::Right, 2.0);
        assert!(close(camera.state.position, Vector3::new(5.0, 0.0, 1.75)));
    }

    #[test]
    fn backward_and_left_mirror_forward_and_right() {
        let mut camera = CameraController::default();

        camera.process_keyboard(Movement::Backward, 0.4);
        assert!(close(camera.state.position, Vector3::new(0.0, 0.0, 4.0)));

        camera.process_keyboard(Movement::Left, 0.4);
        assert!(close(camera.state.position, Vector3::new(-1.0, 0.0, 4.0)));

        camera.process_keyboard(Movement::Forward, 0.4);
        camera.process_keyboard(Movement::Right, 0.4);
        assert!(close(camera.state.position, Vector3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn up_stays_world_y() {
        let mut camera = CameraController::default();
        camera.process_pointer(0.0, 0.0);
        camera.process_pointer(0.0, -10_000.0);

        assert_eq!(camera.state.up(), Vector3::unit_y());
        let right = camera.state.right();
        assert!(right.x.is_finite() && right.y.is_finite() && right.z.is_finite());
        assert!((right.magnitude() - 1.0).abs() < EPS);
    }

    #[test]
    fn relative_motion_keeps_turning() {
        let mut camera = CameraController::default();

        // A confined cursor at the right edge of a 640 px window would stop
        // producing new positions, raw motion does not.
        camera.process_pointer_motion(0.0, 0.0);
        for _ in 0..100 {
            camera.process_pointer_motion(639.0, 0.0);
        }

        assert!((camera.state.yaw() - 6300.0).abs() < 0.5);
        assert_eq!(camera.state.pitch(), 0.0);
    }

    #[test]
    fn relative_motion_latches_after_reset() {
        let mut camera = CameraController::default();
        camera.process_pointer_motion(5.0, 5.0);
        camera.process_pointer_motion(10.0, 0.0);
        let turned = camera.state;
        assert!((turned.yaw() - -89.0).abs() < EPS);

        camera.reset_pointer();
        camera.process_pointer_motion(300.0, 300.0);
        assert_eq!(camera.state, turned);

        camera.process_pointer_motion(0.0, -10.0);
        assert!((camera.state.pitch() - 1.0).abs() < EPS);
    }

    #[test]
    fn view_maps_target_onto_negative_z() {
        let camera = CameraController::default();
        let view = camera.view_matrix();

        let target = Point3::new(0.0, 0.0, 2.0);
        let in_view = view.transform_point(target);

        assert!((in_view.x).abs() < EPS);
        assert!((in_view.z - -1.0).abs() < EPS);
        assert!(view.invert().is_some());
    }

    #[test]
    fn projection_follows_fov() {
        let mut camera = CameraController::default();
        let wide = camera.projection_matrix(16.0 / 9.0);

        camera.process_scroll(20.0);
        let narrow = camera.projection_matrix(16.0 / 9.0);

        // Narrower field of view scales x and y up.
        assert!(narrow.x.x > wide.x.x);
        assert!(narrow.y.y > wide.y.y);
    }
}
