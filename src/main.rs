use std::env;
use std::error::Error;
use std::process;

use chrono::{NaiveDate, NaiveTime};
use synastr_core::{score_compatibility, NatalChartEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 4 {
        eprintln!("Usage: {} <YYYY-MM-DD> <HH:MM> <birth place>", args[0]);
        eprintln!("Example: {} 1991-11-27 02:40 \"Bogotá, Colombia\"", args[0]);
        process::exit(2);
    }

    let birth_date = NaiveDate::parse_from_str(&args[1], "%Y-%m-%d")?;
    let birth_time = NaiveTime::parse_from_str(&args[2], "%H:%M")?;
    let birth_place = &args[3];

    let engine = NatalChartEngine::new();
    let computed = engine.compute(birth_date, birth_time, birth_place).await?;

    println!(
        "Natal chart for {} {} at {} ({:.4}, {:.4}, {})",
        args[1], args[2], birth_place, computed.latitude, computed.longitude, computed.timezone
    );

    println!("\nBodies:");
    for position in &computed.chart.positions {
        println!(
            "  {:<12} {:>6.2}° {} {} (house {})",
            position.name,
            position.degrees,
            position.sign.name(),
            position.sign_icon,
            position.house
        );
    }

    println!("\nHouses:");
    for house in &computed.chart.houses {
        println!(
            "  {:<12} {:>6.2}° {} {}",
            house.name, house.degrees, house.sign.name(), house.sign_icon
        );
    }

    // Self-compatibility as a quick scorer demo
    println!("\nCompatibility with an identical birth date:");
    for breakdown in score_compatibility(birth_date, birth_date, false) {
        println!(
            "  {:<22} {:>5.1}  {}",
            breakdown.category.label(),
            breakdown.score,
            breakdown.description
        );
    }

    Ok(())
}
