//! Narrative report sections and the dated report writer.
//!
//! Every formatter is a pure function over the cleaned portfolio. The text
//! they produce is byte-exact: consumers diff these reports between runs, so
//! the section strings are pinned by tests down to the whitespace.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Dependency, Portfolio};

/// Counts line over the three tables.
pub fn counts_line(portfolio: &Portfolio) -> String {
    format!(
        "This report contains data on: {} Epics, {} Features, and {} Dependencies\n",
        portfolio.epics.len(),
        portfolio.features.len(),
        portfolio.dependencies.len()
    )
}

/// Average progress for all epics, for MVP epics only, and for all features.
pub fn progress_section(portfolio: &Portfolio) -> String {
    let epic = mean(portfolio.epics.iter().map(|e| e.progress));
    let mvp = mean(
        portfolio
            .epics
            .iter()
            .filter(|e| e.mvp)
            .map(|e| e.progress),
    );
    let feature = mean(portfolio.features.iter().map(|f| f.progress));

    format!(
        "\nThe average overall Epic Progress is {}\
         \nThe average MVP Epic Progress is {}\
         \nThe average overall Feature Progress is {}\n",
        percent(epic),
        percent(mvp),
        percent(feature)
    )
}

/// True when anything in the portfolio is blocked: an epic or feature with a
/// blocked flag, or a dependency in "Blocked" status.
pub fn has_blockers(portfolio: &Portfolio) -> bool {
    portfolio.epics.iter().any(|e| e.blocked)
        || portfolio.features.iter().any(|f| f.blocked)
        || portfolio.dependencies.iter().any(|d| d.status == "Blocked")
}

/// Blocked listings for the three categories. Each category reports
/// independently: a category with no blocked items gets its own
/// "No blocked ..." line even when another category has blockers.
pub fn blocked_section(portfolio: &Portfolio) -> String {
    let epics: Vec<&str> = portfolio
        .epics
        .iter()
        .filter(|e| e.blocked)
        .map(|e| e.title.as_str())
        .collect();
    let features: Vec<&str> = portfolio
        .features
        .iter()
        .filter(|f| f.blocked)
        .map(|f| f.title.as_str())
        .collect();
    let dependencies: Vec<&str> = portfolio
        .dependencies
        .iter()
        .filter(|d| d.status == "Blocked")
        .map(|d| d.title.as_str())
        .collect();

    let mut out = String::new();
    push_blocked_category(
        &mut out,
        "\nCurrent blocked Epics: \n",
        "\nNo blocked Epics\n",
        &epics,
    );
    push_blocked_category(
        &mut out,
        "Current blocked Features: \n",
        "No blocked Features\n",
        &features,
    );
    push_blocked_category(
        &mut out,
        "Current blocked Dependencies: \n",
        "No blocked Dependencies\n",
        &dependencies,
    );
    out
}

fn push_blocked_category(out: &mut String, heading: &str, fallback: &str, titles: &[&str]) {
    if titles.is_empty() {
        out.push_str(fallback);
        return;
    }
    out.push_str(heading);
    for title in titles {
        out.push('-');
        out.push_str(title);
        out.push('\n');
    }
}

/// True when any dependency carries Critical or High priority. Status is not
/// consulted: a portfolio whose only critical/high dependencies are already
/// Done still selects the cross-reference section, with an empty body.
pub fn has_critical_or_high(portfolio: &Portfolio) -> bool {
    portfolio
        .dependencies
        .iter()
        .any(|d| d.priority.is_critical_or_high())
}

/// Critical/high not-Done dependencies cross-referenced by feature, emitted
/// in feature-table order. When several qualifying dependencies share one
/// feature key, the last one scanned wins; features with no qualifying
/// dependency are skipped.
pub fn dependency_section(portfolio: &Portfolio) -> String {
    let mut latest: HashMap<&str, &Dependency> = HashMap::new();
    for dependency in &portfolio.dependencies {
        if dependency.status != "Done" && dependency.priority.is_critical_or_high() {
            latest.insert(dependency.feature.as_str(), dependency);
        }
    }

    let mut out = String::from("\nCurrent Critical and High Dependencies by Feature: \n");
    for feature in &portfolio.features {
        if let Some(dependency) = latest.get(feature.title.as_str()) {
            out.push_str(&format!(
                "\nFeature: {}\n\tDependency: ID {}, {}, {}, {}, Needed By {}\n",
                feature.title,
                dependency.id,
                dependency.title,
                dependency.priority,
                dependency.status,
                dependency.needed_by.format("%m/%d/%Y"),
            ));
        }
    }
    out
}

/// One expected-delivery line per epic not yet Done, in table order. The
/// header is always present, even over an empty body.
pub fn delivery_section(portfolio: &Portfolio) -> String {
    let mut out = String::from("\nExpected Delivery PI for each Epic still to be delivered: \n");
    for epic in &portfolio.epics {
        if epic.state != "Done" {
            out.push_str(&format!(
                "Epic ID {}: {} expected to be delivered in {}\n",
                epic.id, epic.title, epic.delivery_pi
            ));
        }
    }
    out
}

/// Assemble the full report text for one generation instant, in fixed order:
/// counts, progress, blocked listings, dependencies (or fallback), delivery,
/// footer. The blocked listings always render per category; the three
/// "No blocked ..." lines are the all-clear form.
pub fn render(portfolio: &Portfolio, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str(&counts_line(portfolio));
    out.push_str(&progress_section(portfolio));
    out.push_str(&blocked_section(portfolio));
    if has_critical_or_high(portfolio) {
        out.push_str(&dependency_section(portfolio));
    } else {
        out.push_str("\nCurrently no Critical or High Dependencies\n");
    }
    out.push_str(&delivery_section(portfolio));
    out.push_str(&format!(
        "\n\n\nThis report was generated on {}",
        generated_at.format("%m/%d/%Y at %H:%M:%S")
    ));
    out
}

/// File name for a report generated at the given instant.
pub fn report_file_name(generated_at: DateTime<Local>) -> String {
    format!("Sample Report - {}.txt", generated_at.format("%m_%d_%Y"))
}

/// Render and write the report into `output_dir`, creating or overwriting
/// the dated file. The clock is captured once and used for both the file
/// name and the footer. Returns the written path.
pub fn write_report(portfolio: &Portfolio, output_dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let path = output_dir.join(report_file_name(now));
    let text = render(portfolio, now);
    fs::write(&path, &text).map_err(|source| Error::ReportWrite {
        path: path.clone(),
        source,
    })?;
    debug!("wrote {} bytes to {}", text.len(), path.display());
    Ok(path)
}

/// Fraction rendered as a percentage with two decimals.
fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Arithmetic mean of the values; NaN when there are none.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    sum / count as f64
}
