//! `healthsync facilities` and the facility report printer shared with the
//! chat loop.

use anyhow::Context;
use console::style;
use secrecy::SecretString;

use healthsync_core::facility::{FacilityError, FacilityLocator, FacilityReport};
use healthsync_infra::location::FixedLocationProvider;
use healthsync_infra::places::GooglePlacesClient;
use healthsync_types::config::PlacesConfig;
use healthsync_types::facility::{FacilityCategory, FacilitySearchRequest};

use super::{FacilitiesArgs, PlacesArgs};

pub type TerminalLocator = FacilityLocator<FixedLocationProvider, GooglePlacesClient>;

/// Build a locator when a Places API key is available.
pub fn build_locator(args: &PlacesArgs, config: &PlacesConfig) -> anyhow::Result<Option<TerminalLocator>> {
    let Some(key) = args.places_api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        return Ok(None);
    };
    let places = GooglePlacesClient::new(&config.base_url, SecretString::from(key))
        .context("failed to create places client")?;
    let locator = FacilityLocator::new(FixedLocationProvider::new(args.location), places)
        .with_geolocation_timeout(config.geolocation_timeout())
        .with_fallback_location(config.default_location);
    Ok(Some(locator))
}

/// Run a single search and print the result.
pub async fn run(args: FacilitiesArgs, config: &PlacesConfig, default_radius_m: u32, json: bool) -> anyhow::Result<()> {
    let locator = build_locator(&args.places, config)?
        .context("a Places API key is required (--places-api-key or GOOGLE_PLACES_API_KEY)")?;

    let request = FacilitySearchRequest {
        filter: args.filter,
        radius_m: args.radius.unwrap_or(default_radius_m),
    };
    let result = locator.handle(request).await;

    if json {
        let report = result?;
        let facilities: Vec<serde_json::Value> = report
            .facilities
            .iter()
            .map(|f| {
                let mut value = serde_json::to_value(f).unwrap_or_default();
                value["directions_url"] = report.directions_url(f).into();
                value
            })
            .collect();
        let out = serde_json::json!({
            "origin": report.origin,
            "filter": report.request.filter,
            "radius_m": report.request.radius_m,
            "facilities": facilities,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_report(&result);
    Ok(())
}

fn category_label(category: FacilityCategory) -> String {
    match category {
        FacilityCategory::Hospital => style("hospital").red().to_string(),
        FacilityCategory::Clinic => style("clinic").blue().to_string(),
        FacilityCategory::Pharmacy => style("pharmacy").green().to_string(),
        FacilityCategory::Health => style("health").magenta().to_string(),
        FacilityCategory::Unknown => style("facility").dim().to_string(),
    }
}

/// Print a search outcome as a styled list, nearest first.
pub fn print_report(result: &Result<FacilityReport, FacilityError>) {
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\n  {} Facility search failed: {e}\n", style("!").red().bold());
            return;
        }
    };

    println!();
    println!(
        "  {} {} within {} km of {}",
        style("+").red().bold(),
        style("Nearby healthcare").bold(),
        report.request.radius_m as f64 / 1000.0,
        style(report.origin).dim()
    );

    if report.facilities.is_empty() {
        println!("  {}", style("No facilities found nearby.").dim());
        println!();
        return;
    }

    for facility in report.facilities.iter().take(10) {
        let distance = facility
            .distance_km
            .map(|d| format!("{d:.1} km"))
            .unwrap_or_default();
        let open = match facility.open_now {
            Some(true) => style("open").green().to_string(),
            Some(false) => style("closed").red().to_string(),
            None => String::new(),
        };
        let rating = facility
            .rating
            .map(|r| format!("{r:.1}*"))
            .unwrap_or_default();

        println!();
        println!(
            "  {} [{}] {} {} {}",
            style(&facility.name).cyan().bold(),
            category_label(facility.category),
            style(distance).bold(),
            rating,
            open
        );
        println!("    {}", style(&facility.address).dim());
        if let Some(phone) = &facility.phone {
            println!("    {}", style(phone).dim());
        }
        println!("    {}", style(report.directions_url(facility)).underlined());
    }
    println!();
}
