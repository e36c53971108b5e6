use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use super::schema::{BlockField, ColumnLayout, SampleColumns};
use super::FeatureTableError;
use crate::sample::{PeakWindow, SampleRegistry};

/// Values of one sample's block in one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueBlock {
    /// Peak apex m/z
    pub mz: f64,
    /// Peak apex retention time (minutes)
    pub rt: f64,
    /// Peak start retention time
    pub rt_start: f64,
    /// Peak end retention time
    pub rt_end: f64,
    /// Peak height
    pub height: f64,
    /// Peak area, when the table carries it
    pub area: Option<f64>,
    /// Lower m/z bound
    pub mz_min: f64,
    /// Upper m/z bound
    pub mz_max: f64,
}

impl ValueBlock {
    /// The all-zero sentinel marking a sample in which the feature was not detected
    pub fn is_missing(&self) -> bool {
        [
            self.mz,
            self.rt,
            self.rt_start,
            self.rt_end,
            self.height,
            self.area.unwrap_or(0.0),
            self.mz_min,
            self.mz_max,
        ]
        .iter()
        .all(|&v| v == 0.0)
    }

    /// RT / m/z box of the peak
    pub fn window(&self) -> PeakWindow {
        PeakWindow {
            rt_start: self.rt_start,
            rt_end: self.rt_end,
            mz_min: self.mz_min,
            mz_max: self.mz_max,
        }
    }
}

/// One feature-table row
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Consensus m/z
    pub mz: f64,
    /// Consensus retention time (minutes)
    pub rt: f64,
    /// Per-sample blocks indexed by `SampleId::index()`; `None` when missing
    pub blocks: Vec<Option<ValueBlock>>,
}

impl RawRow {
    /// Number of samples with a present block
    pub fn present_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }
}

/// Parsed feature table, rows in file order
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    /// Data rows
    pub rows: Vec<RawRow>,
}

impl FeatureTable {
    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads aligned feature tables (mzMine CSV export layout)
#[derive(Debug, Clone)]
pub struct FeatureTableLoader<'a> {
    registry: &'a SampleRegistry,
    delimiter: u8,
}

impl<'a> FeatureTableLoader<'a> {
    /// Loader validating column groups against `registry`
    pub fn new(registry: &'a SampleRegistry) -> Self {
        Self {
            registry,
            delimiter: b',',
        }
    }

    /// Use a different field delimiter (e.g. `b'\t'`)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a table from a file
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<FeatureTable, FeatureTableError> {
        let file = File::open(path.as_ref())?;
        let table = self.load_reader(BufReader::new(file))?;
        info!(
            "Loaded {} feature rows from {}",
            table.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    /// Load a table from any reader
    ///
    /// The header is validated completely before any row is parsed.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<FeatureTable, FeatureTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let layout = ColumnLayout::resolve(&headers, self.registry)?;

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let cell = |column: usize| -> Result<f64, FeatureTableError> {
                parse_cell(record.get(column).unwrap_or(""), line, &headers[column])
            };

            let consensus = |column: usize| -> Result<f64, FeatureTableError> {
                parse_required(record.get(column).unwrap_or(""), line, &headers[column])
            };
            let mz = consensus(layout.mz_column)?;
            let rt = consensus(layout.rt_column)?;
            let blocks = layout
                .samples
                .iter()
                .map(|columns| read_block(columns, &cell))
                .collect::<Result<Vec<_>, _>>()?;

            rows.push(RawRow { mz, rt, blocks });
        }

        Ok(FeatureTable { rows })
    }
}

fn read_block<F>(columns: &SampleColumns, cell: &F) -> Result<Option<ValueBlock>, FeatureTableError>
where
    F: Fn(usize) -> Result<f64, FeatureTableError>,
{
    let field = |f: BlockField| -> Result<f64, FeatureTableError> {
        columns.column(f).map_or(Ok(0.0), cell)
    };

    let block = ValueBlock {
        mz: field(BlockField::Mz)?,
        rt: field(BlockField::Rt)?,
        rt_start: field(BlockField::RtStart)?,
        rt_end: field(BlockField::RtEnd)?,
        height: field(BlockField::Height)?,
        area: columns.column(BlockField::Area).map(cell).transpose()?,
        mz_min: field(BlockField::MzMin)?,
        mz_max: field(BlockField::MzMax)?,
    };

    Ok((!block.is_missing()).then_some(block))
}

/// Empty cells read as the 0 sentinel
fn parse_cell(value: &str, line: u64, column: &str) -> Result<f64, FeatureTableError> {
    if value.trim().is_empty() {
        return Ok(0.0);
    }
    parse_required(value, line, column)
}

/// Consensus columns have no sentinel; an empty cell is invalid
fn parse_required(value: &str, line: u64, column: &str) -> Result<f64, FeatureTableError> {
    let trimmed = value.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| FeatureTableError::InvalidValue {
            line,
            column: column.to_string(),
            value: trimmed.to_string(),
        })
}
