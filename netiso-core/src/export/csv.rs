use std::io::Write;

use csv::WriterBuilder;

use crate::{Error, routing::OdRecord};

pub const OD_CSV_HEADER: [&str; 6] = [
    "origin_id",
    "destination_id",
    "entry_cost",
    "network_cost",
    "exit_cost",
    "total_cost",
];

/// Writes OD records as `;`-delimited CSV; unreachable pairs have empty costs.
pub fn write_od_csv<W: Write>(writer: W, records: &[OdRecord]) -> Result<(), Error> {
    let mut wtr = WriterBuilder::new().delimiter(b';').from_writer(writer);
    wtr.write_record(OD_CSV_HEADER)?;

    for record in records {
        let costs = record.costs.map_or_else(
            || vec![String::new(); 4],
            |c| {
                [c.entry_cost, c.network_cost, c.exit_cost, c.total_cost]
                    .iter()
                    .map(f64::to_string)
                    .collect()
            },
        );
        let mut row = vec![record.origin_id.as_text(), record.destination_id.as_text()];
        row.extend(costs);
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
