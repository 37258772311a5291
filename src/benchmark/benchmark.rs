use std::time::Instant;
use crate::simulation::states::{Body, System, NVec3};
use crate::simulation::params::Parameters;
use crate::simulation::engine::{Engine, RootFinder};
use crate::simulation::integrator::advance_all;

/// Helper to build a manual System of a unit central mass and `n` orbiting bodies
fn make_system(n: usize) -> System {
    let mut bodies = Vec::with_capacity(n + 1);
    bodies.push(Body::new(NVec3::zeros(), NVec3::zeros(), 1.0));

    for i in 0..n {
        let i_f = i as f64;
        // deterministic bound orbits at radius 1..3, no rand needed
        let r = 1.0 + 2.0 * (i_f * 0.37).sin().abs();
        let phase = i_f * 0.13;
        let x = NVec3::new(r * phase.cos(), r * phase.sin(), 0.1 * (i_f * 0.07).sin());
        let speed = (1.0 / r).sqrt() * (0.8 + 0.3 * (i_f * 0.11).cos().abs());
        let v = NVec3::new(-speed * phase.sin(), speed * phase.cos(), 0.0);

        bodies.push(Body::new(x, v, 1e-6));
    }

    System::new(bodies)
}

fn make_params() -> Parameters {
    Parameters {
        t_end: 100.0,
        dt: 0.01,
        ..Parameters::with_step(0.01)
    }
}

/// Run `steps` steps, returning seconds per step and the number of steps that failed
fn timed_steps(sys: &mut System, params: &Parameters, engine: &Engine, steps: usize) -> (f64, usize) {
    let mut failed = 0;
    let t0 = Instant::now();
    for _ in 0..steps {
        if advance_all(sys, params, engine).is_err() {
            failed += 1;
        }
    }
    (t0.elapsed().as_secs_f64() / steps as f64, failed)
}

/// Time one Kepler step for a range of n, serial vs rayon
pub fn bench_kepler() {
    let ns = [1_000, 10_000, 100_000];
    let steps = 5;
    let params = make_params();

    for n in ns {
        let sys_template = make_system(n);

        let serial = Engine::default();
        let parallel = Engine { parallel: true, ..Engine::default() };

        let mut sys_serial = sys_template.clone();
        timed_steps(&mut sys_serial, &params, &serial, 1); // warm-up
        let (serial_per_step, serial_failed) = timed_steps(&mut sys_serial, &params, &serial, steps);

        let mut sys_parallel = sys_template.clone();
        timed_steps(&mut sys_parallel, &params, &parallel, 1); // warm-up
        let (parallel_per_step, parallel_failed) = timed_steps(&mut sys_parallel, &params, &parallel, steps);

        println!("N = {:6}, serial step = {:8.6} s,   rayon step = {:8.6} s", n, serial_per_step, parallel_per_step);
        if serial_failed + parallel_failed > 0 {
            println!("    failed steps: serial {}, rayon {} (timings include aborted steps)", serial_failed, parallel_failed);
        }
    }
}

/// Newton vs Householder per-step cost, CSV to stdout
pub fn bench_root_finders() {
    println!("N,newton_ms,householder_ms,failed_steps");

    let params = make_params();
    for n in (2_000..=20_000).step_by(2_000) {
        let sys_template = make_system(n);

        let mut row = Vec::with_capacity(2);
        let mut failed = 0;
        for root_finder in [RootFinder::Newton, RootFinder::Householder] {
            let engine = Engine { root_finder, ..Engine::default() };
            let mut sys = sys_template.clone();
            let (per_step, f) = timed_steps(&mut sys, &params, &engine, 1);
            row.push(per_step * 1000.0);
            failed += f;
        }

        println!("{},{:.6},{:.6},{}", n, row[0], row[1], failed);
    }
}
