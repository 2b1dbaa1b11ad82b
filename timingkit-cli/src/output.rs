use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use colored::*;
use serde::Serialize;
use timingkit_core::serde_utils::to_pretty_json;
use timingkit_engine::{CorrectionPicker, WidgetTimeline};
use timingkit_protocol::prelude::{
    correction_description, Corrections, DailyTimingSet, Timing, TimingEntry, TimingType,
};

use crate::commands::CliError;

#[derive(Debug, Serialize)]
pub struct TimingRow {
    pub kind: TimingType,
    pub time: String,
    pub instant: DateTime<Utc>,
    pub correction: i32,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub ordered: bool,
    pub timings: Vec<TimingRow>,
}

impl DayView {
    pub fn new(day: &DailyTimingSet, corrections: Corrections, offset: FixedOffset) -> Self {
        let timings = day
            .iter()
            .map(|timing| TimingRow {
                kind: timing.kind,
                time: timing.time_description(offset),
                instant: timing.instant,
                correction: corrections.get(timing.kind),
            })
            .collect();
        Self {
            date: day.date(),
            ordered: day.is_ordered(),
            timings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub current: Timing,
    pub current_time: String,
    pub next: Timing,
    pub next_time: String,
    pub remaining_minutes: i64,
}

impl EntryView {
    pub fn new(entry: &TimingEntry, at: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            current: entry.current,
            current_time: entry.current.time_description(offset),
            next: entry.next,
            next_time: entry.next.time_description(offset),
            remaining_minutes: entry.remaining(at).num_minutes(),
        }
    }
}

fn emit_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", to_pretty_json(value)?);
    Ok(())
}

pub fn print_day(view: &DayView, json: bool) -> Result<(), CliError> {
    if json {
        return emit_json(view);
    }
    println!("{}", view.date.to_string().bold());
    for row in &view.timings {
        let label = correction_description(row.correction).unwrap_or_default();
        println!("  {:<8} {}  {}", row.kind.name(), row.time.bold(), label.dimmed());
    }
    if !view.ordered {
        println!("{}", "⚠ corrections leave these timings out of order".yellow());
    }
    Ok(())
}

pub fn print_now(view: &EntryView, json: bool) -> Result<(), CliError> {
    if json {
        return emit_json(view);
    }
    println!(
        "{} {} ({})",
        "Now:".green().bold(),
        view.current.kind.name().bold(),
        view.current_time
    );
    println!(
        "{} {} at {}, in {} min",
        "Next:".cyan().bold(),
        view.next.kind.name().bold(),
        view.next_time,
        view.remaining_minutes
    );
    Ok(())
}

pub fn print_timeline(
    timeline: &WidgetTimeline,
    offset: FixedOffset,
    json: bool,
) -> Result<(), CliError> {
    if json {
        return emit_json(timeline);
    }
    for entry in &timeline.entries {
        println!(
            "  {} {:<8} → {:<8} {}",
            entry.date().with_timezone(&offset).format("%Y-%m-%d %H:%M"),
            entry.current.kind.name(),
            entry.next.kind.name(),
            entry.next.time_description(offset).dimmed()
        );
    }
    if let Some(reload_at) = timeline.reload_at() {
        println!(
            "  {} {}",
            "reload after".dimmed(),
            reload_at.with_timezone(&offset).format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub fn print_corrections(corrections: Corrections, json: bool) -> Result<(), CliError> {
    if json {
        return emit_json(&corrections);
    }
    println!("{}", "Calculation Corrections".bold());
    for (kind, minutes) in corrections.iter() {
        let label = correction_description(minutes).unwrap_or_else(|| "-".to_string());
        println!("  {:<8} {}", kind.name(), label);
    }
    Ok(())
}

pub fn print_picker(picker: &CorrectionPicker, json: bool) -> Result<(), CliError> {
    if json {
        return emit_json(&picker.options());
    }
    println!("{}: {}", picker.title().bold(), picker.header_title());
    for (index, option) in picker.options().iter().enumerate() {
        if index == picker.selected_index() {
            println!("{} {}", "›".green(), option.title.green().bold());
        } else {
            println!("  {}", option.title);
        }
    }
    Ok(())
}
