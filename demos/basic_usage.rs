//! Basic usage example for the cropyield crate.
//!
//! Run with: `cargo run --example basic_usage`

use std::sync::Arc;

use cropyield::{
    CropPlanting, EnvironmentFactors, FarmPortfolio, MissingLevelPolicy, Plant, YieldCalculator,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Cropyield Demo ===\n");

    let corn = Arc::new(
        Plant::new("corn", 30.0, 1.0, 3.0)
            .with_factor("sun", [("low", -50), ("medium", 0), ("high", 50)])
            .with_factor("wind", [("low", -10), ("medium", 10), ("high", 40)])
            .with_factor("temp", [("low", -20), ("medium", 10), ("high", 30)]),
    );
    let pumpkin = Arc::new(
        Plant::new("pumpkin", 20.0, 1.0, 4.0)
            .with_factor("sun", [("low", -50), ("medium", 30), ("high", 70)])
            .with_factor("wind", [("low", -20), ("medium", 30), ("high", 40)])
            .with_factor("temp", [("low", -20), ("medium", 0), ("high", 10)]),
    );

    let farm = FarmPortfolio::new()
        .with_planting(Arc::clone(&corn), 10.0)
        .with_planting(Arc::clone(&pumpkin), 20.0);

    let scenarios = [
        ("no adjustment", EnvironmentFactors::none()),
        ("sunny", EnvironmentFactors::new().with("sun", "high")),
        (
            "harsh",
            EnvironmentFactors::new()
                .with("sun", "low")
                .with("wind", "medium")
                .with("temp", "low"),
        ),
    ];

    let calc = YieldCalculator::default();

    // Per-plant yield under each scenario
    for (label, env) in &scenarios {
        println!("Scenario: {label}");
        for plant in [&corn, &pumpkin] {
            println!("  {:<8} yield per plant: {:.2}", plant.name, calc.plant_yield(plant, env)?);
        }
        println!();
    }

    // Full breakdown for the farm
    println!("=== Farm Breakdown ===\n");
    for (label, env) in &scenarios {
        let outcome = calc.portfolio_outcome(&farm, env)?;
        println!("Scenario: {label}");
        println!("  Yield:   {:.2}", outcome.crop_yield);
        println!("  Cost:    {:.2}", outcome.cost);
        println!("  Revenue: {:.2}", outcome.revenue);
        println!("  Profit:  {:.2}", outcome.profit);
        println!();
    }

    // Unknown level handling
    println!("=== Missing Levels ===\n");
    let eclipse = EnvironmentFactors::new().with("sun", "eclipse");
    let planting = CropPlanting::new(Arc::clone(&corn), 5.0);

    match calc.crop_yield(&planting, &eclipse) {
        Ok(value) => println!("strict:     {value}"),
        Err(err) => println!("strict:     {err}"),
    }

    let permissive = calc.with_policy("permissive".parse::<MissingLevelPolicy>()?);
    println!("permissive: {}", permissive.crop_yield(&planting, &eclipse)?);

    Ok(())
}
