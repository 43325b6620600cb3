use std::thread;
use std::time::Duration;

use clegg_pid::PidController;

/// Drives a controller from the real clock: the time step is whatever
/// actually elapsed between updates.
fn main() {
    let mut pid = PidController::with_clegg(1.0, 0.5, 0.1, true);

    for error in [2.0, 1.0, -1.0, -0.5, 0.25] {
        thread::sleep(Duration::from_millis(200));
        pid.update(error);
        let t = pid.terms();
        println!(
            "error {:+.2}  ->  p {:+.3}  i {:+.3}  d {:+.3}  output {:+.3}",
            error,
            t.p,
            t.i,
            t.d,
            pid.sum()
        );
    }

    pid.reset();
    println!("after reset: output {:+.3}", pid.sum());
}
