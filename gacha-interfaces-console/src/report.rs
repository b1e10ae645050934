use std::fmt::Write;

use anyhow::Result;
use owo_colors::OwoColorize;

use gacha_application::dtos::{PoolSummary, RecentPull, TierSummary};

use crate::options::DisplayOptions;

pub fn render_summaries(summaries: &[PoolSummary], options: &DisplayOptions) -> Result<String> {
    if options.json {
        return Ok(serde_json::to_string_pretty(summaries)?);
    }
    if summaries.is_empty() {
        return Ok("No pull records found.\n".to_string());
    }
    let mut out = String::new();
    for summary in summaries {
        render_pool(&mut out, summary, options)?;
        out.push('\n');
    }
    Ok(out)
}

fn render_pool(out: &mut String, summary: &PoolSummary, options: &DisplayOptions) -> Result<()> {
    let color = options.enable_color;
    let title = format!("── {} ──", summary.pool_name);
    writeln!(out, "{}", paint(&title, color, |text| text.bold().to_string()))?;
    writeln!(out, "Total pulls    {}", summary.total_attempts)?;
    writeln!(out, "Current pity   {}", summary.current_pity)?;
    if let Some(rate) = summary.banner_hit_rate {
        writeln!(out, "Banner hits    {}", percent(rate))?;
    }

    let five = format!("5★  {}", tier_line(&summary.five_star));
    writeln!(out, "{}", paint(&five, color, |text| text.yellow().to_string()))?;
    let four = format!("4★  {}", tier_line(&summary.four_star));
    writeln!(out, "{}", paint(&four, color, |text| text.magenta().to_string()))?;
    for (resource_type, count) in &summary.four_star_by_resource {
        let share = if summary.four_star.count == 0 {
            0.0
        } else {
            *count as f64 / summary.four_star.count as f64
        };
        let label = if resource_type.is_empty() { "other" } else { resource_type };
        writeln!(out, "    {:<12}{:>4}  {}", label, count, percent(share))?;
    }

    if !summary.recent_five_star.is_empty() {
        writeln!(out, "Recent 5★")?;
        for pull in &summary.recent_five_star {
            writeln!(out, "    {}", recent_line(pull, color))?;
        }
    }
    Ok(())
}

fn tier_line(tier: &TierSummary) -> String {
    format!(
        "ratio {}  avg {:.2}  total {}",
        percent(tier.ratio),
        tier.average,
        tier.count
    )
}

fn recent_line(pull: &RecentPull, color: bool) -> String {
    let line = format!("{:<16}{:>3}", pull.name, pull.pity);
    if pull.is_standard {
        paint(&line, color, |text| text.red().to_string())
    } else {
        paint(&line, color, |text| text.blue().to_string())
    }
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn paint(text: &str, enable: bool, style: impl Fn(&str) -> String) -> String {
    if enable {
        style(text)
    } else {
        text.to_string()
    }
}
