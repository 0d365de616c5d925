//! Pretty-print an SDI file and show how its versions would be reconciled.
//!
//! Run with: `cargo run --example prettify -- path/to/table.sdi`
//! (reads stdin when no path is given)

use sdi_codec::{FieldChange, SdiCodec, SdiDocument, SdiOptions};
use std::io::Read;

fn describe<T: std::fmt::Display + Copy>(field: &str, change: FieldChange<T>) {
    match change {
        FieldChange::Unchanged(v) => println!("  {field}: {v} (current)"),
        FieldChange::Rewritten { from, to } => println!("  {field}: {from} -> {to}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut sdi = Vec::new();
    match std::env::args().nth(1) {
        Some(path) => sdi = std::fs::read(path)?,
        None => {
            std::io::stdin().read_to_end(&mut sdi)?;
        }
    }

    let codec = SdiCodec::new(SdiOptions::new());
    println!("{}", codec.prettify(&sdi)?);

    let mut doc = SdiDocument::parse(&sdi)?;
    let report = codec.reconcile(&mut doc)?;
    println!("\nReconciliation:");
    describe("sdi_version", report.sdi_version);
    describe("dd_version", report.dd_version);

    match codec.deserialize(&sdi) {
        Ok(table) => println!(
            "\nTable `{}`.`{}`: {} columns, {} indexes",
            table.schema_ref,
            table.name,
            table.columns.len(),
            table.indexes.len()
        ),
        Err(e) => println!("\nNot deserializable: {e}"),
    }
    Ok(())
}
