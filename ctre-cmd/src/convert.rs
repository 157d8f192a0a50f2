//! CSV to JSON conversion and header inspection.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use ctre_sales::convert::{
    convert_csv, csv_headers, write_json, ConvertFilter, COL_TOWN, COL_TYPE, COL_YEAR,
};
use ctre_utils::naming::default_output_name;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;

/// Filter `input` and write the projected rows as JSON.
pub fn run_convert(
    input: &str,
    output: Option<&str>,
    filter: &ConvertFilter,
) -> anyhow::Result<()> {
    filter.validate()?;

    let file = File::open(input).with_context(|| format!("failed to open {}", input))?;
    let conversion = convert_csv(BufReader::new(file), filter)?;

    let output = output_path(output, filter);
    let file = File::create(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let writer = BufWriter::new(file);
    if output.extension().is_some_and(|ext| ext == "gz") {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        write_json(&mut encoder, &conversion.rows)?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = writer;
        write_json(&mut writer, &conversion.rows)?;
        writer.flush()?;
    }

    info!("Wrote {}", output.display());
    println!(
        "Kept {} of {} rows -> {}",
        conversion.rows.len(),
        conversion.rows_read,
        output.display()
    );
    Ok(())
}

fn output_path(output: Option<&str>, filter: &ConvertFilter) -> PathBuf {
    match output {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(format!(
            "{}.json",
            default_output_name(filter.town.as_deref(), filter.start_year, filter.end_year)
        )),
    }
}

/// Print every header and whether the filter columns are present.
pub fn run_headers(input: &str) -> anyhow::Result<()> {
    let file = File::open(input).with_context(|| format!("failed to open {}", input))?;
    let headers = csv_headers(BufReader::new(file))?;

    println!("Headers in {}:", input);
    for header in &headers {
        println!("  {}", header);
    }
    for column in [COL_YEAR, COL_TOWN, COL_TYPE] {
        let status = if headers.iter().any(|h| h == column) {
            "found"
        } else {
            "MISSING"
        };
        println!("{:<14} {}", column, status);
    }
    Ok(())
}
