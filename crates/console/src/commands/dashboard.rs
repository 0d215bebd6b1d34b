use indicatif::{ProgressBar, ProgressStyle};
use services::services::dashboard::DashboardService;

use super::Context;
use crate::output::print_json;

pub async fn show(ctx: &Context) -> anyhow::Result<()> {
    let client = ctx.session()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Loading dashboard");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    let stats = DashboardService::fetch(&client).await;
    spinner.finish_and_clear();
    let stats = stats?;

    if ctx.json {
        return print_json(stats);
    }

    let t = &stats.totals;
    println!("Farms:          {}", t.farms);
    println!("Ponds:          {}", t.ponds);
    println!("Fish species:   {}", t.fish_species);
    println!("Culture cycles: {}", t.culture_cycles);

    if !stats.ponds_per_farm.is_empty() {
        println!("\nPonds per farm");
        for f in &stats.ponds_per_farm {
            println!("  {:<24} {}", f.farm, f.ponds);
        }
    }
    if !stats.fish_per_cycle.is_empty() {
        println!("\nFish species per culture cycle");
        for c in &stats.fish_per_cycle {
            println!("  {:<24} {}", c.culture_cycle, c.fish_species);
        }
    }
    Ok(())
}
