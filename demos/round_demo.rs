//! Runs each allocation strategy over a few rounds of a small fleet.
//!
//! Set `RUST_LOG=fleetbid=debug` to see commits and charger reservations.

use fleetbid::algorithms::qlearning::QLearningConfig;
use fleetbid::{
    AllocationStrategy, AuctionAllocator, Charger, ChargerAwareAuction, ChargingConfig, Position,
    QPolicy, Round, Task, Vehicle, VehicleStatus,
};
use qtty::Quantity;
use tracing_subscriber::EnvFilter;

const ROUNDS: usize = 3;
const TICK: f64 = 5.0;

fn fleet() -> (Vec<Vehicle>, Vec<Charger>) {
    let vehicles = vec![
        Vehicle::new("V1", Position::new(0.0, 0.0), 100.0, 10.0),
        Vehicle::new("V2", Position::new(50.0, 50.0), 5.0, 10.0),
        Vehicle::new("V3", Position::new(80.0, 20.0), 60.0, 8.0),
        Vehicle::new("V4", Position::new(20.0, 70.0), 35.0, 12.0),
    ];
    let chargers = vec![
        Charger::new("C1", Position::new(50.0, 40.0)),
        Charger::new("C2", Position::new(10.0, 60.0)),
    ];
    (vehicles, chargers)
}

fn tasks_for(round: usize) -> Vec<Task> {
    let offset = round as f64 * 7.0;
    vec![
        Task::new(format!("T{round}-a"), Position::new(offset, 10.0), 3, 5.0),
        Task::new(format!("T{round}-b"), Position::new(70.0, 30.0 + offset), 2, 8.0),
        Task::new(format!("T{round}-c"), Position::new(25.0 + offset, 65.0), 1, 4.0),
    ]
}

/// Advances every vehicle by one tick, freeing those whose work is done.
fn advance(vehicles: &mut [Vehicle], chargers: &mut [Charger]) {
    for vehicle in vehicles.iter_mut().filter(|v| !v.is_idle()) {
        let left = (vehicle.remaining_duration.value() - TICK).max(0.0);
        vehicle.remaining_duration = Quantity::new(left);
        if left == 0.0 {
            vehicle.status = VehicleStatus::Idle;
        }
    }
    for charger in chargers.iter_mut().filter(|c| c.busy) {
        let left = (charger.available_after.value() - TICK).max(0.0);
        charger.available_after = Quantity::new(left);
        charger.busy = left > 0.0;
    }
}

fn simulate(strategy: &mut dyn AllocationStrategy) -> Result<(), Box<dyn std::error::Error>> {
    let (mut vehicles, mut chargers) = fleet();
    println!("Strategy: {}", strategy.name());
    println!("======================");

    for round_no in 0..ROUNDS {
        let tasks = tasks_for(round_no);
        let outcome = {
            let mut round = Round::with_chargers(&mut vehicles, &tasks, &mut chargers);
            strategy.allocate(&mut round)?
        };

        println!("Round {round_no}:");
        for (task_id, vehicle_id) in &outcome.allocations {
            println!("  {task_id} -> {vehicle_id}");
        }
        for r in &outcome.charger_reservations {
            println!(
                "  {} charging at {} (deficit {:.1})",
                r.vehicle_id,
                r.charger_id,
                r.charge_deficit.value()
            );
        }
        println!("{}", outcome.summary());

        advance(&mut vehicles, &mut chargers);
    }

    println!("Final fleet:");
    for v in &vehicles {
        println!(
            "  {} at {} battery {:.1} {}",
            v.id, v.position, v.battery, v.status
        );
    }
    println!();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    simulate(&mut AuctionAllocator::new())?;
    simulate(&mut ChargerAwareAuction::new(ChargingConfig::default())?)?;
    simulate(&mut QPolicy::new(QLearningConfig {
        episodes: 200,
        epsilon: 0.8,
        ..QLearningConfig::default()
    })?)?;
    Ok(())
}
