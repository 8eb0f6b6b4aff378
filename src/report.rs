//! Tabular hand-off of simulation traces.
//!
//! A [`TraceTable`] has one row per grid index with the columns
//! `Time`, `Membrane Potential`, `Current` and `Spikes`. Tables can be
//! previewed in the terminal or written as CSV for an external plotter;
//! whole trial sets are saved as versioned JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::config::SimulationParameters;
use crate::error::Result;
use crate::simulator::SimulationTrace;

/// Number of rows shown by [`TraceTable::head`] and [`TraceTable::tail`] previews.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TraceRow {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Membrane Potential")]
    pub membrane_potential: f64,
    #[serde(rename = "Current")]
    pub current: f64,
    #[serde(rename = "Spikes")]
    pub spikes: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraceTable {
    rows: Vec<TraceRow>,
}

impl TraceTable {
    pub fn from_trace(trace: &SimulationTrace) -> Self {
        let rows = trace
            .time
            .iter()
            .zip(&trace.potential)
            .zip(&trace.current)
            .zip(&trace.spikes)
            .map(|(((&time, &v), &i), &s)| TraceRow {
                time,
                membrane_potential: v,
                current: i,
                spikes: s,
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, with their grid indices.
    pub fn head(&self, n: usize) -> TablePreview<'_> {
        let n = n.min(self.rows.len());
        TablePreview {
            first_index: 0,
            rows: &self.rows[..n],
        }
    }

    /// Last `n` rows, with their grid indices.
    pub fn tail(&self, n: usize) -> TablePreview<'_> {
        let start = self.rows.len().saturating_sub(n);
        TablePreview {
            first_index: start,
            rows: &self.rows[start..],
        }
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut rdr = csv::Reader::from_path(path)?;
        let rows = rdr.deserialize().collect::<std::result::Result<Vec<TraceRow>, _>>()?;
        Ok(Self { rows })
    }
}

/// A borrowed slice of a table that prints as fixed-width text.
pub struct TablePreview<'a> {
    first_index: usize,
    rows: &'a [TraceRow],
}

impl fmt::Display for TablePreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>8} {:>10} {:>20} {:>14} {:>7}",
            "", "Time", "Membrane Potential", "Current", "Spikes"
        )?;
        for (offset, row) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{:>8} {:>10.4} {:>20.6} {:>14.3e} {:>7}",
                self.first_index + offset,
                row.time,
                row.membrane_potential,
                row.current,
                row.spikes
            )?;
        }
        Ok(())
    }
}

/// A saved trial set: parameters plus every trace they produced.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TraceArchive {
    /// Version of the archive format
    pub version: String,
    pub params: SimulationParameters,
    pub traces: Vec<SimulationTrace>,
}

impl TraceArchive {
    pub fn new(params: SimulationParameters, traces: Vec<SimulationTrace>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            params,
            traces,
        }
    }

    /// Saves the archive to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads an archive from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let archive = serde_json::from_reader(reader)?;
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::Simulator;
    use tempfile::NamedTempFile;

    fn sample_trace() -> SimulationTrace {
        SimulationTrace {
            applied_current: 1e-9,
            time: vec![0.0, 0.1, 0.2, 0.3],
            current: vec![0.0, 1e-9, 1e-9, 0.0],
            potential: vec![-0.07, -0.06, -0.065, -0.066],
            spikes: vec![0, 0, 1, 0],
        }
    }

    #[test]
    fn test_table_rows_follow_trace() {
        let table = TraceTable::from_trace(&sample_trace());
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.rows()[2],
            TraceRow {
                time: 0.2,
                membrane_potential: -0.065,
                current: 1e-9,
                spikes: 1,
            }
        );
    }

    #[test]
    fn test_head_and_tail() {
        let table = TraceTable::from_trace(&sample_trace());
        let head = table.head(2);
        assert_eq!(head.rows.len(), 2);
        assert_eq!(head.first_index, 0);

        let tail = table.tail(3);
        assert_eq!(tail.first_index, 1);
        assert_eq!(tail.rows[0].time, 0.1);

        // Asking for more rows than exist returns them all
        assert_eq!(table.head(10).rows.len(), 4);
        assert_eq!(table.tail(10).first_index, 0);
    }

    #[test]
    fn test_preview_rendering() {
        let table = TraceTable::from_trace(&sample_trace());
        let text = table.tail(1).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Membrane Potential"));
        assert!(lines[1].trim_start().starts_with('3'));
    }

    #[test]
    fn test_csv_export() {
        let trace = Simulator::new(SimulationParameters {
            t_max: 0.01,
            t_on: 0.002,
            t_off: 0.005,
            ..Default::default()
        })
        .unwrap()
        .run(5e-10);
        let table = TraceTable::from_trace(&trace);

        let temp_file = NamedTempFile::new().unwrap();
        table.write_csv(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Time,Membrane Potential,Current,Spikes"
        );
        assert_eq!(lines.count(), trace.len());

        let loaded = TraceTable::read_csv(temp_file.path()).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_save_load_archive() {
        let archive = TraceArchive::new(SimulationParameters::default(), vec![sample_trace()]);

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        archive.save(path).expect("Failed to save archive");
        let loaded = TraceArchive::load(path).expect("Failed to load archive");

        assert_eq!(loaded.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(loaded.params, archive.params);
        assert_eq!(loaded.traces[0].spikes, vec![0, 0, 1, 0]);
        assert_eq!(loaded.traces[0].applied_current, 1e-9);
    }
}
