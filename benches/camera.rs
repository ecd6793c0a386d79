use criterion::{criterion_group, criterion_main, Criterion};

use cubefield::camera::{CameraController, Movement};

pub fn pointer_motion(c: &mut Criterion) {
    let mut camera = CameraController::default();
    let mut x = 0.0;

    c.bench_function("pointer", |b| {
        b.iter(|| {
            x += 1.0;
            camera.process_pointer(x, x * 0.5);
        })
    });
}

pub fn frame_matrices(c: &mut Criterion) {
    let mut camera = CameraController::default();

    c.bench_function("frame matrices", |b| {
        b.iter(|| {
            camera.process_keyboard(Movement::Forward, 0.016);
            camera.projection_matrix(16.0 / 9.0) * camera.view_matrix()
        })
    });
}

criterion_group!(benches, pointer_motion, frame_matrices);
criterion_main!(benches);
