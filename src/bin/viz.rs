use eframe::egui;
use egui_plot::{Line, Plot};

use clegg_pid::config::TuningFile;
use clegg_pid::sim::{self, Sample};

fn main() -> eframe::Result {
    let tuning = match std::env::args().nth(1) {
        Some(path) => match TuningFile::load(&path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
        None => TuningFile::default(),
    };

    let run = |clegg: bool| match sim::simulate(&tuning.plant, &tuning.pid.clegg(clegg), &tuning.sim) {
        Ok(traj) => traj,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let app = StepViz {
        plain: run(false),
        clegg: run(true),
        tuning,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("PID Step Response", options, Box::new(|_| Ok(Box::new(app))))
}

struct StepViz {
    plain: Vec<Sample>,
    clegg: Vec<Sample>,
    tuning: TuningFile,
}

fn points(traj: &[Sample], f: impl Fn(&Sample) -> f64) -> Vec<[f64; 2]> {
    let step = (traj.len() / 2000).max(1);
    traj.iter().step_by(step).map(|s| [s.time, f(s)]).collect()
}

impl eframe::App for StepViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let pid = &self.tuning.pid;
            ui.heading(format!("Kp {:.3}  Ki {:.3}  Kd {:.3}", pid.kp, pid.ki, pid.kd));
            ui.label(format!(
                "Plant: {:.2} kg, damping {:.2}, stiffness {:.2}, load {:.2} N  |  Step {:.2} -> {:.2} m",
                self.tuning.plant.mass,
                self.tuning.plant.damping,
                self.tuning.plant.stiffness,
                self.tuning.plant.load,
                self.tuning.sim.initial_position,
                self.tuning.sim.setpoint,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_h = available.y / 2.0 - 8.0;
            let setpoint = self.tuning.sim.setpoint;

            // Position vs Time
            ui.label("Position (m)");
            Plot::new("position")
                .height(half_h)
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Setpoint", points(&self.plain, |_| setpoint)));
                    plot_ui.line(Line::new("Plain", points(&self.plain, |s| s.position)));
                    plot_ui.line(Line::new("Clegg", points(&self.clegg, |s| s.position)));
                });

            // Controller output vs Time
            ui.label("Controller output");
            Plot::new("output")
                .height(half_h)
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Plain", points(&self.plain, |s| s.output)));
                    plot_ui.line(Line::new("Clegg", points(&self.clegg, |s| s.output)));
                });
        });
    }
}
