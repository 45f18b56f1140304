//! `tabi plan` command: generate and print an itinerary.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use tabi_core::itinerary::Itinerary;
use tabi_core::search::SearchSource;
use tabi_core::trip::{PlannerOptions, TripPlanner, TripRequest};

use crate::config::TabiConfig;
use crate::wikipedia::WikipediaSearch;

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct PlanArgs {
    pub destination: String,
    pub days: usize,
    pub style: String,
    pub seed: Option<u64>,
    pub themed: bool,
    pub random_tips: bool,
    pub json: bool,
}

/// Run the plan command against the configured search endpoint.
pub async fn run_plan(args: &PlanArgs, config: &TabiConfig) -> Result<()> {
    let source = WikipediaSearch::new(&config.search.endpoint, config.search.timeout)
        .context("failed to build search client")?;
    let mut stdout = std::io::stdout().lock();
    plan_with_source(args, config, Arc::new(source), &mut stdout).await
}

/// Generate an itinerary with `source` and write it to `out`.
pub async fn plan_with_source(
    args: &PlanArgs,
    config: &TabiConfig,
    source: Arc<dyn SearchSource>,
    out: &mut dyn Write,
) -> Result<()> {
    let request = TripRequest::new(&args.destination, args.days, args.style.as_str())?;

    // Flags switch the rich variant on; they never switch config off.
    let mut options: PlannerOptions = config.planner;
    options.assembler.themed_days |= args.themed;
    options.assembler.randomized_tips |= args.random_tips;

    let planner = TripPlanner::new(source, options).with_result_limit(config.search.limit);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let itinerary = planner.generate(&request, &mut rng).await;

    if args.json {
        let json = serde_json::to_string_pretty(&itinerary)?;
        writeln!(out, "{json}")?;
    } else {
        render_text(&itinerary, out)?;
    }
    Ok(())
}

/// Human-readable itinerary listing.
pub fn render_text(itinerary: &Itinerary, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{} ({} days)",
        itinerary.destination,
        itinerary.days.len()
    )?;
    for day in &itinerary.days {
        writeln!(out)?;
        match &day.theme {
            Some(theme) => writeln!(out, "Day {}: {theme}", day.day)?,
            None => writeln!(out, "Day {}", day.day)?,
        }
        for slot in &day.schedule {
            writeln!(out, "  {} [{}] {}", slot.time, slot.label, slot.title)?;
            writeln!(out, "        {}", slot.detail)?;
            writeln!(out, "        Tips: {}", slot.tips)?;
        }
    }
    Ok(())
}
