//! Subcommand implementations.

use std::{fs, fs::File, io::BufReader, num::NonZeroUsize};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use vdif::{RawFields, StationId, serde::LayoutDef};
use vdif_spectra::{SpectraSummary, Unit, UnitLayout, UnitReader, get_spectra};

use crate::cli::{HeaderArgs, LayoutArgs, SpectraArgs};

/// Reads the optional config file, then applies command-line overrides.
pub fn load_layout(args: &LayoutArgs) -> Result<UnitLayout> {
    let base = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => UnitLayout::default(),
    };

    let layout = args.apply(base);
    layout.validate()?;
    tracing::debug!(?layout, "unit layout");
    Ok(layout)
}

/// Raw and derived header fields of one unit.
#[derive(Debug, Serialize)]
pub struct HeaderReport {
    pub unit: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub station_id: StationId,
    pub thread_id: u16,
    pub frame_index: u32,
    pub bits_per_sample: u32,
    pub num_channels: u64,
    pub num_samples: i64,
    pub frame_length_bytes: u64,
    pub payload_length_bytes: i64,
    pub legacy: bool,
    pub complex: bool,
    pub valid: bool,
    pub raw: RawFields,
}

impl From<&Unit> for HeaderReport {
    fn from(unit: &Unit) -> Self {
        let header = &unit.header;
        HeaderReport {
            unit: unit.index,
            timestamp: header.timestamp(),
            station_id: header.station_id(),
            thread_id: header.thread_id(),
            frame_index: header.frame_index(),
            bits_per_sample: header.bits_per_sample(),
            num_channels: header.num_channels(),
            num_samples: header.num_samples(),
            frame_length_bytes: header.frame_length_bytes(),
            payload_length_bytes: header.payload_length_bytes(),
            legacy: header.is_legacy(),
            complex: header.is_complex(),
            valid: header.is_valid(),
            raw: *header.raw(),
        }
    }
}

/// Decodes the headers of the first `args.count` units.
pub fn header_reports(args: &HeaderArgs) -> Result<Vec<HeaderReport>> {
    let layout = load_layout(&args.layout)?;
    let file = File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    let reports = UnitReader::new(BufReader::new(file), layout)?
        .take(args.count)
        .map(|unit| unit.map(|unit| HeaderReport::from(&unit)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(reports)
}

pub fn run_header(args: &HeaderArgs) -> Result<()> {
    let reports = header_reports(args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        let time = report
            .timestamp
            .map_or_else(|| "-".to_string(), |time| time.to_rfc3339());
        println!(
            "unit {}: station={} thread={} time={} frame={} bits={} channels={} samples={} \
             frame_bytes={} payload_bytes={} legacy={} complex={} valid={}",
            report.unit,
            report.station_id,
            report.thread_id,
            time,
            report.frame_index,
            report.bits_per_sample,
            report.num_channels,
            report.num_samples,
            report.frame_length_bytes,
            report.payload_length_bytes,
            report.legacy,
            report.complex,
            report.valid,
        );
    }

    Ok(())
}

pub fn run_spectra(args: &SpectraArgs) -> Result<()> {
    let layout = load_layout(&args.layout)?;
    let units_per_scan = NonZeroUsize::new(layout.units_per_scan)
        .context("units per scan must be positive")?;

    let spectra = get_spectra(&args.file, layout)?;
    let summary = spectra.summary(units_per_scan);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &SpectraSummary) {
    let time =
        |time: Option<DateTime<Utc>>| time.map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
    let index = |index: Option<u32>| index.map_or_else(|| "-".to_string(), |i| i.to_string());

    println!("units:         {}", summary.units);
    println!("channels:      {}", summary.channels);
    println!("scans:         {}", summary.scans);
    println!("invalid units: {}", summary.invalid_units);
    println!(
        "time:          {} .. {}",
        time(summary.first_time),
        time(summary.last_time)
    );
    println!(
        "frame index:   {} .. {}",
        index(summary.first_frame_index),
        index(summary.last_frame_index)
    );
}

pub fn run_layout() -> Result<()> {
    let def = LayoutDef::from(vdif::layout::vdif());
    println!("{}", serde_json::to_string_pretty(&def)?);
    Ok(())
}
