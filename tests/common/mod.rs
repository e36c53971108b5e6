//! Fixture writers shared by the integration tests

#![allow(dead_code)]

use std::fmt::Write as _;
#[cfg(feature = "mzml")]
use {
    base64::prelude::*,
    byteorder::{ByteOrder, LittleEndian},
    flate2::write::ZlibEncoder,
    flate2::Compression,
    std::fs,
    std::io::Write,
    std::path::{Path, PathBuf},
};

/// Scans every 3 s over 0..10 min
pub const SCAN_COUNT: usize = 201;

/// Peak block resolving inside the trace
pub const VALID_BLOCK: &str = "100.0,5.0,4.8,5.2,1000,150,99.99,100.01";
/// Peak block past the end of the trace
pub const INVALID_BLOCK: &str = "100.0,20.0,19.8,20.2,1000,150,99.99,100.01";
/// All-zero block
pub const MISSING_BLOCK: &str = "0,0,0,0,0,0,0,0";

#[cfg(feature = "mzml")]
fn encode(values: &[f64], zlib: bool) -> String {
    let mut bytes = vec![0u8; values.len() * 8];
    LittleEndian::write_f64_into(values, &mut bytes);
    if zlib {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes).unwrap();
        bytes = encoder.finish().unwrap();
    }
    BASE64_STANDARD.encode(bytes)
}

/// Write an mzML file with a Gaussian peak at 5 min on m/z 100
///
/// Every tenth spectrum is an MS2 scan that must be skipped.
#[cfg(feature = "mzml")]
pub fn write_mzml(path: &Path, amplitude: f64, zlib: bool) {
    let (compression, name) = if zlib {
        ("MS:1000574", "zlib compression")
    } else {
        ("MS:1000576", "no compression")
    };

    let mut doc = String::from(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<mzML><run id=\"run\"><spectrumList>\n",
    );
    for i in 0..SCAN_COUNT {
        let rt_seconds = i as f64 * 3.0;
        let rt_minutes = rt_seconds / 60.0;
        let apex = amplitude * (-((rt_minutes - 5.0) / 0.1).powi(2) / 2.0).exp();
        let mz = [100.0, 200.0];
        let intensity = [apex, 1.0];
        let ms_level = if i % 10 == 9 { 2 } else { 1 };

        write!(
            doc,
            r#"<spectrum index="{i}" id="scan={i}" defaultArrayLength="2">
<cvParam cvRef="MS" accession="MS:1000511" name="ms level" value="{ms_level}"/>
<scanList count="1"><scan>
<cvParam cvRef="MS" accession="MS:1000016" name="scan start time" value="{rt_seconds}" unitCvRef="UO" unitAccession="UO:0000010" unitName="second"/>
</scan></scanList>
<binaryDataArrayList count="2">
<binaryDataArray>
<cvParam cvRef="MS" accession="MS:1000523" name="64-bit float"/>
<cvParam cvRef="MS" accession="{compression}" name="{name}"/>
<cvParam cvRef="MS" accession="MS:1000514" name="m/z array"/>
<binary>{mz}</binary>
</binaryDataArray>
<binaryDataArray>
<cvParam cvRef="MS" accession="MS:1000523" name="64-bit float"/>
<cvParam cvRef="MS" accession="{compression}" name="{name}"/>
<cvParam cvRef="MS" accession="MS:1000515" name="intensity array"/>
<binary>{intensity}</binary>
</binaryDataArray>
</binaryDataArrayList>
</spectrum>
"#,
            mz = encode(&mz, zlib),
            intensity = encode(&intensity, zlib),
        )
        .unwrap();
    }
    doc.push_str("</spectrumList></run></mzML>\n");
    fs::write(path, doc).unwrap();
}

/// Feature table in mzMine layout (with `row ID` and a trailing empty column)
pub fn feature_table(samples: &[&str], rows: &[Vec<&str>]) -> String {
    let suffixes = [
        "Peak m/z",
        "Peak RT",
        "Peak RT start",
        "Peak RT end",
        "Peak height",
        "Peak area",
        "Peak m/z min",
        "Peak m/z max",
    ];
    let mut header = vec!["row ID".to_string(), "row m/z".to_string(), "row retention time".to_string()];
    for sample in samples {
        for suffix in suffixes {
            header.push(format!("{}.mzML {}", sample, suffix));
        }
    }
    let mut csv = header.join(",");
    csv.push_str(",\n");
    for (i, blocks) in rows.iter().enumerate() {
        write!(csv, "{},{},5.0", i + 1, 100.0 + i as f64).unwrap();
        for block in blocks {
            csv.push(',');
            csv.push_str(block);
        }
        csv.push_str(",\n");
    }
    csv
}

/// Linear model scoring any peak shape as High_quality and flat signal as Noise
pub fn model_json(input_len: usize) -> String {
    let ones = vec!["1.0"; input_len].join(",");
    let zeros = vec!["0.0"; input_len].join(",");
    format!(
        r#"{{
  "labels": ["High_quality", "Low_quality", "Noise"],
  "input_len": {input_len},
  "weights": [[{ones}], [{zeros}], [{zeros}]],
  "bias": [0.0, 0.0, 1.0]
}}"#
    )
}

/// A complete project directory: raw files, feature table and model
#[cfg(feature = "mzml")]
pub struct Project {
    pub dir: tempfile::TempDir,
    pub raw_dir: PathBuf,
    pub table: PathBuf,
    pub model: PathBuf,
}

#[cfg(feature = "mzml")]
impl Project {
    /// Samples given as (name, amplitude); every other file is zlib compressed
    pub fn new(samples: &[(&str, f64)], rows: &[Vec<&str>]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let raw_dir = dir.path().join("raw");
        fs::create_dir(&raw_dir).unwrap();
        for (i, (name, amplitude)) in samples.iter().enumerate() {
            write_mzml(&raw_dir.join(format!("{}.mzML", name)), *amplitude, i % 2 == 1);
        }
        // Not a raw file; must be ignored
        fs::write(raw_dir.join("notes.txt"), "ignore me").unwrap();

        let names: Vec<&str> = samples.iter().map(|(n, _)| *n).collect();
        let table = dir.path().join("features.csv");
        fs::write(&table, feature_table(&names, rows)).unwrap();

        let model = dir.path().join("model.json");
        fs::write(&model, model_json(120)).unwrap();

        Self {
            dir,
            raw_dir,
            table,
            model,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
