use crate::plant::{self, Plant, State};

// ---------------------------------------------------------------------------
// RK4 integrator with constant actuator force over the step
// ---------------------------------------------------------------------------

/// Single RK4 step with the actuator force held constant over the step.
pub fn rk4_step(state: &State, plant: &Plant, force: f64, dt: f64) -> State {
    let k1 = plant::derivatives(state, plant, force);
    let k2 = plant::derivatives(&state.apply(&k1, dt * 0.5), plant, force);
    let k3 = plant::derivatives(&state.apply(&k2, dt * 0.5), plant, force);
    let k4 = plant::derivatives(&state.apply(&k3, dt), plant, force);

    State {
        time: state.time + dt,
        x: state.x + (k1.dx + 2.0 * k2.dx + 2.0 * k3.dx + k4.dx) * (dt / 6.0),
    }
}
