use std::collections::HashMap;

use log::debug;

use super::{FeatureTableError, SchemaIssue};
use crate::sample::{SampleId, SampleRegistry};

/// Header of the consensus m/z column
pub const ROW_MZ_COLUMN: &str = "row m/z";
/// Header of the consensus retention time column
pub const ROW_RT_COLUMN: &str = "row retention time";

/// Marker separating a sample name from a per-sample field
const PEAK_MARKER: &str = " Peak ";

/// Per-sample value fields, in block order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockField {
    /// `Peak m/z`
    Mz,
    /// `Peak RT`
    Rt,
    /// `Peak RT start`
    RtStart,
    /// `Peak RT end`
    RtEnd,
    /// `Peak height`
    Height,
    /// `Peak area` (extended variant only)
    Area,
    /// `Peak m/z min`
    MzMin,
    /// `Peak m/z max`
    MzMax,
}

impl BlockField {
    /// All fields, in column order
    pub const ALL: [BlockField; 8] = [
        BlockField::Mz,
        BlockField::Rt,
        BlockField::RtStart,
        BlockField::RtEnd,
        BlockField::Height,
        BlockField::Area,
        BlockField::MzMin,
        BlockField::MzMax,
    ];

    /// Header suffix following the sample name
    pub fn suffix(self) -> &'static str {
        match self {
            BlockField::Mz => "Peak m/z",
            BlockField::Rt => "Peak RT",
            BlockField::RtStart => "Peak RT start",
            BlockField::RtEnd => "Peak RT end",
            BlockField::Height => "Peak height",
            BlockField::Area => "Peak area",
            BlockField::MzMin => "Peak m/z min",
            BlockField::MzMax => "Peak m/z max",
        }
    }

    /// Whether every sample group must carry this field
    pub fn is_required(self) -> bool {
        !matches!(self, BlockField::Area)
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.suffix() == suffix)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Column positions of one sample's value block
#[derive(Debug, Clone)]
pub struct SampleColumns {
    /// Sample the block belongs to
    pub sample: SampleId,
    columns: [Option<usize>; 8],
}

impl SampleColumns {
    /// Column index of a field, if present
    pub fn column(&self, field: BlockField) -> Option<usize> {
        self.columns[field.slot()]
    }
}

/// Resolved header of a feature table
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    /// Index of `row m/z`
    pub mz_column: usize,
    /// Index of `row retention time`
    pub rt_column: usize,
    /// One entry per registered sample, in registry order
    pub samples: Vec<SampleColumns>,
}

impl ColumnLayout {
    /// Match a header row against the registry
    ///
    /// Every column group must name exactly one registered sample, every
    /// registered sample needs a group, and each group must carry all
    /// required fields. Columns without a `Peak` marker (e.g. `row ID`) are
    /// ignored.
    pub fn resolve<S: AsRef<str>>(
        headers: &[S],
        registry: &SampleRegistry,
    ) -> Result<Self, FeatureTableError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            let h = h.as_ref().trim();
            if !h.is_empty() && seen.insert(h, i).is_some() {
                return mismatch(SchemaIssue::DuplicateColumn(h.to_string()));
            }
        }

        let Some(&mz_column) = seen.get(ROW_MZ_COLUMN) else {
            return mismatch(SchemaIssue::MissingRowColumn(ROW_MZ_COLUMN));
        };
        let Some(&rt_column) = seen.get(ROW_RT_COLUMN) else {
            return mismatch(SchemaIssue::MissingRowColumn(ROW_RT_COLUMN));
        };

        let mut groups: Vec<Option<(String, [Option<usize>; 8])>> = vec![None; registry.len()];

        for (i, header) in headers.iter().enumerate() {
            let header = header.as_ref().trim();
            if i == mz_column || i == rt_column {
                continue;
            }
            let Some(pos) = header.rfind(PEAK_MARKER) else {
                debug!("Ignoring non-sample column '{}'", header);
                continue;
            };
            let prefix = &header[..pos];
            let suffix = &header[pos + 1..];

            let Some(sample) = registry.find(prefix) else {
                return mismatch(SchemaIssue::UnknownSample(prefix.to_string()));
            };
            let group = groups[sample.index()]
                .get_or_insert_with(|| (prefix.to_string(), [None; 8]));
            if group.0 != prefix {
                return mismatch(SchemaIssue::AmbiguousSample {
                    sample: registry.get(sample).name().to_string(),
                    prefixes: vec![group.0.clone(), prefix.to_string()],
                });
            }

            match BlockField::from_suffix(suffix) {
                Some(field) => group.1[field.slot()] = Some(i),
                None => debug!("Ignoring per-sample column '{}'", header),
            }
        }

        let mut samples = Vec::with_capacity(registry.len());
        for (id, sample) in registry.iter() {
            let Some((prefix, columns)) = groups[id.index()].take() else {
                return mismatch(SchemaIssue::MissingSample(sample.name().to_string()));
            };
            for field in BlockField::ALL.into_iter().filter(|f| f.is_required()) {
                if columns[field.slot()].is_none() {
                    return mismatch(SchemaIssue::MissingField {
                        sample: sample.name().to_string(),
                        column: format!("{} {}", prefix, field.suffix()),
                    });
                }
            }
            samples.push(SampleColumns {
                sample: id,
                columns,
            });
        }

        Ok(Self {
            mz_column,
            rt_column,
            samples,
        })
    }
}

fn mismatch<T>(issue: SchemaIssue) -> Result<T, FeatureTableError> {
    Err(FeatureTableError::SchemaMismatch(issue))
}
