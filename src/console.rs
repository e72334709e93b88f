//! Colorful console output for the command-line client.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::landmarks::{LandmarkCategory, LandmarkRegistry};
use crate::planner::Trip;

/// ASCII art banner for startup.
pub fn print_banner() {
    let banner = r#"
  ____                        ____             _
 |  _ \ _   _ _ __   ___     |  _ \ ___  _   _| |_ ___  ___
 | |_) | | | | '_ \ / _ \    | |_) / _ \| | | | __/ _ \/ __|
 |  __/| |_| | | | | (_) |   |  _ < (_) | |_| | ||  __/\__ \
 |_|    \__,_|_| |_|\___/    |_| \_\___/ \__,_|\__\___||___/
"#;
    println!("{}", banner.cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black(),
        "Shortest drivable routes".bright_cyan()
    );
}

/// Prints the road graph size after loading.
pub fn print_graph_loaded(nodes: usize, edges: usize, elapsed: Duration) {
    println!(
        "{} {} road graph: nodes ({}), edges ({}), loaded in ({})",
        "INFO".bright_green(),
        "[Graph]".bright_cyan(),
        nodes.to_formatted_string(&Locale::en).bright_yellow(),
        edges.to_formatted_string(&Locale::en).bright_yellow(),
        format_duration(elapsed).yellow()
    );
}

/// Prints a trip summary: endpoints, distance and stops.
pub fn print_trip(trip: &Trip, landmarks: &LandmarkRegistry) {
    let emoji = |name: &str| {
        landmarks
            .get(name)
            .map(|l| l.category)
            .unwrap_or(LandmarkCategory::Other)
            .emoji()
    };

    println!();
    println!(
        "  {} {} {}",
        "Origin:".bold(),
        emoji(&trip.origin),
        trip.origin.bright_blue()
    );
    println!(
        "  {} {} {}",
        "Destination:".bold(),
        emoji(&trip.destination),
        trip.destination.bright_red()
    );

    if !trip.route.is_reachable() {
        println!("\n  {}", "No route found between the selected places.".bright_red().bold());
        return;
    }

    println!(
        "\n  🛣️  {} {}",
        "Total distance:".bold(),
        format_meters(trip.route.distance_m).bright_magenta().bold()
    );
    println!(
        "  {} {}",
        "Road nodes:".bright_black(),
        trip.route.path.len().to_formatted_string(&Locale::en).white()
    );

    if trip.stops.is_empty() {
        println!(
            "\n  {}",
            "The route does not pass any other listed place.".bright_black()
        );
        return;
    }

    println!("\n  🧭 {}", "The route passes:".bold());
    for (i, stop) in trip.stops.iter().enumerate() {
        println!(
            "    {} {} {}",
            format!("{:>2}.", i + 1).bright_black(),
            emoji(stop),
            stop
        );
    }
    println!();
}

/// Formats meters with one decimal and thousands separators.
fn format_meters(m: f64) -> String {
    let tenths = (m * 10.0).round() as u64;
    format!(
        "{}.{} m",
        (tenths / 10).to_formatted_string(&Locale::en),
        tenths % 10
    )
}

/// Formats a duration nicely.
fn format_duration(d: Duration) -> String {
    let total_ms = d.as_millis();
    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", total_ms / 60_000, (total_ms % 60_000) / 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_meters() {
        assert_eq!(format_meters(0.0), "0.0 m");
        assert_eq!(format_meters(2143.44), "2,143.4 m");
        assert_eq!(format_meters(2143.96), "2,144.0 m");
        assert_eq!(format_meters(999.96), "1,000.0 m");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
