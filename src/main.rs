use serde::Deserialize;
use subway_sim::{Line, Ridership, Simulation, SimulationConfig};

/// The stations of Buenos Aires subway line A, west to east.
const LINE_A: [&str; 18] = [
    "San Pedrito",
    "Flores",
    "Carabobo",
    "Puan",
    "Primera Junta",
    "Acoyte",
    "Río de Janeiro",
    "Castro Barros",
    "Loria",
    "Plaza Miserere",
    "Alberti",
    "Pasco",
    "Congreso",
    "Sáenz Peña",
    "Lima",
    "Piedras",
    "Perú",
    "Plaza de Mayo",
];

/// A complete run description, as read from a JSON file.
#[derive(Deserialize)]
struct Scenario {
    line: Line,
    ridership: Ridership,
    #[serde(default)]
    config: SimulationConfig,
    #[serde(default = "default_steps")]
    steps: usize,
}

fn default_steps() -> usize {
    100
}

/// Builds a day of 15 minute ridership for line A, 05:00 to 23:00,
/// with a morning and an evening peak.
fn synthetic_scenario() -> Result<Scenario, subway_sim::Error> {
    let line = Line::new(LINE_A)?;
    let mut ridership = Ridership::new();
    for (idx, name) in LINE_A.iter().enumerate() {
        // Termini and interchanges are busier
        let base = match *name {
            "San Pedrito" | "Plaza Miserere" | "Plaza de Mayo" | "Lima" => 60.0,
            _ => 20.0 + idx as f64,
        };
        let counts = (0..72)
            .map(|bucket| {
                let hour = 5.0 + bucket as f64 / 4.0;
                let peak = f64::max(1.0 - (hour - 8.5).abs() / 2.0, 0.0)
                    + f64::max(1.0 - (hour - 18.0).abs() / 2.0, 0.0);
                (base * (1.0 + 3.0 * peak)) as u32
            })
            .collect();
        ridership.insert(*name, counts);
    }
    Ok(Scenario {
        line,
        ridership,
        config: SimulationConfig {
            // 08:00
            start_step: 36,
            ..Default::default()
        },
        steps: default_steps(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut path = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => path = Some(arg),
        }
    }

    let scenario = match path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => synthetic_scenario()?,
    };
    let mut sim = Simulation::from_ridership(scenario.line, &scenario.ridership, &scenario.config)?;

    for i in 0..scenario.steps {
        sim.step()?;
        if !json && i % 10 == 0 {
            let state = sim.current_state();
            println!(
                "Step {}: {} passengers ({} in transit)",
                state.step,
                state.population,
                sim.count_by_state().in_transit
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(sim.snapshot_history())?);
        return Ok(());
    }

    let states = sim.count_by_state();
    println!();
    println!("Live passengers: {}", sim.population());
    println!("  at origin:      {}", states.at_origin);
    println!("  in transit:     {}", states.in_transit);
    println!("  at destination: {}", states.at_destination);
    println!();
    for ((_, name), count) in sim.line().iter().zip(sim.occupancy()) {
        println!("  {:<20} {:>4}", name, count.total());
    }
    Ok(())
}
