use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::binary::{decode_array, BinaryEncoding, Compression};
use super::MzMLError;
use crate::sample::{Scan, Trace};

mod accession {
    pub const MS_LEVEL: &str = "MS:1000511";
    pub const SCAN_START_TIME: &str = "MS:1000016";
    pub const MZ_ARRAY: &str = "MS:1000514";
    pub const INTENSITY_ARRAY: &str = "MS:1000515";
    pub const FLOAT_32: &str = "MS:1000521";
    pub const FLOAT_64: &str = "MS:1000523";
    pub const ZLIB: &str = "MS:1000574";
    pub const NO_COMPRESSION: &str = "MS:1000576";
    pub const NUMPRESS: [&str; 6] = [
        "MS:1002312",
        "MS:1002313",
        "MS:1002314",
        "MS:1002746",
        "MS:1002747",
        "MS:1002748",
    ];
    pub const UNIT_MINUTE: &str = "UO:0000031";
    pub const UNIT_MILLISECOND: &str = "UO:0000028";
}

/// Read every MS1 scan of an mzML file into a [`Trace`]
///
/// Retention times are converted to minutes, the unit used by feature
/// tables exported from mzMine.
pub fn read_ms1_trace<P: AsRef<Path>>(path: P) -> Result<Trace, MzMLError> {
    let file = File::open(path)?;
    Ms1Reader::new(BufReader::new(file)).read_trace()
}

/// Streaming reader that keeps MS1 spectra and skips everything else
pub struct Ms1Reader<R: BufRead> {
    reader: Reader<R>,
}

impl<R: BufRead> Ms1Reader<R> {
    /// Create a reader over any buffered source
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);
        Self { reader: xml_reader }
    }

    /// Consume the document and collect MS1 scans
    pub fn read_trace(mut self) -> Result<Trace, MzMLError> {
        let mut scans = Vec::new();
        let mut skipped = 0usize;
        while let Some(spectrum) = self.next_spectrum()? {
            if spectrum.ms_level == Some(1) {
                scans.push(spectrum.into_scan()?);
            } else {
                skipped += 1;
            }
        }
        debug!("Read {} MS1 scans, skipped {} other spectra", scans.len(), skipped);
        Ok(Trace::new(scans))
    }

    fn next_spectrum(&mut self) -> Result<Option<SpectrumContext>, MzMLError> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.name().as_ref() == b"spectrum" => {
                    let spectrum = self.parse_spectrum(&e)?;
                    return Ok(Some(spectrum));
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
            buf.clear();
        }
    }

    fn parse_spectrum(&mut self, start: &BytesStart) -> Result<SpectrumContext, MzMLError> {
        let mut spectrum = SpectrumContext {
            id: get_attribute(start, "id")?.unwrap_or_default(),
            default_array_length: get_attribute(start, "defaultArrayLength")?
                .and_then(|s| s.parse().ok()),
            ..Default::default()
        };

        let mut array: Option<ArrayContext> = None;
        let mut in_binary = false;
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"binaryDataArray" => array = Some(ArrayContext::default()),
                    b"binary" => in_binary = true,
                    b"cvParam" => apply_cv_param(&mut spectrum, array.as_mut(), &e)?,
                    _ => {}
                },
                Event::Empty(e) => {
                    if e.name().as_ref() == b"cvParam" {
                        apply_cv_param(&mut spectrum, array.as_mut(), &e)?;
                    }
                }
                Event::Text(t) => {
                    if let (true, Some(ctx)) = (in_binary, array.as_mut()) {
                        ctx.base64_data.push_str(&t.unescape()?);
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"binary" => in_binary = false,
                    b"binaryDataArray" => {
                        if let Some(ctx) = array.take() {
                            spectrum.arrays.push(ctx);
                        }
                    }
                    b"spectrum" => break,
                    _ => {}
                },
                Event::Eof => {
                    return Err(MzMLError::InvalidStructure(
                        "Unexpected EOF in spectrum".to_string(),
                    ));
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(spectrum)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayKind {
    Mz,
    Intensity,
}

/// Binary array captured undecoded; only MS1 arrays are ever decoded
#[derive(Debug, Default)]
struct ArrayContext {
    kind: Option<ArrayKind>,
    encoding: BinaryEncoding,
    compression: Compression,
    base64_data: String,
}

#[derive(Debug, Default)]
struct SpectrumContext {
    id: String,
    default_array_length: Option<usize>,
    ms_level: Option<u8>,
    rt_minutes: Option<f64>,
    arrays: Vec<ArrayContext>,
}

impl SpectrumContext {
    fn into_scan(self) -> Result<Scan, MzMLError> {
        let rt = self.rt_minutes.ok_or_else(|| {
            MzMLError::InvalidStructure(format!("Spectrum '{}' has no scan start time", self.id))
        })?;

        let mut mz = Vec::new();
        let mut intensity = Vec::new();
        for array in self.arrays {
            let Some(kind) = array.kind else {
                continue;
            };
            let values = decode_array(
                &array.base64_data,
                array.encoding,
                &array.compression,
                self.default_array_length,
            )?;
            match kind {
                ArrayKind::Mz => mz = values,
                ArrayKind::Intensity => intensity = values,
            }
        }

        if mz.len() != intensity.len() {
            return Err(MzMLError::InvalidLength {
                expected: mz.len(),
                actual: intensity.len(),
            });
        }
        Ok(Scan::new(rt, mz, intensity))
    }
}

fn apply_cv_param(
    spectrum: &mut SpectrumContext,
    array: Option<&mut ArrayContext>,
    e: &BytesStart,
) -> Result<(), MzMLError> {
    let Some(acc) = get_attribute(e, "accession")? else {
        return Ok(());
    };

    if let Some(ctx) = array {
        match acc.as_str() {
            accession::FLOAT_32 => ctx.encoding = BinaryEncoding::Float32,
            accession::FLOAT_64 => ctx.encoding = BinaryEncoding::Float64,
            accession::ZLIB => ctx.compression = Compression::Zlib,
            accession::NO_COMPRESSION => ctx.compression = Compression::None,
            accession::MZ_ARRAY => ctx.kind = Some(ArrayKind::Mz),
            accession::INTENSITY_ARRAY => ctx.kind = Some(ArrayKind::Intensity),
            a if accession::NUMPRESS.contains(&a) => {
                ctx.compression = Compression::Unsupported(acc.clone())
            }
            _ => {}
        }
        return Ok(());
    }

    match acc.as_str() {
        accession::MS_LEVEL => {
            spectrum.ms_level = get_attribute(e, "value")?.and_then(|v| v.parse().ok());
        }
        accession::SCAN_START_TIME => {
            let value: Option<f64> = get_attribute(e, "value")?.and_then(|v| v.parse().ok());
            let unit = get_attribute(e, "unitAccession")?;
            spectrum.rt_minutes = value.map(|v| to_minutes(v, unit.as_deref()));
        }
        _ => {}
    }
    Ok(())
}

fn to_minutes(value: f64, unit_accession: Option<&str>) -> f64 {
    match unit_accession {
        Some(accession::UNIT_MINUTE) => value,
        Some(accession::UNIT_MILLISECOND) => value / 60_000.0,
        // mzML defaults to seconds
        _ => value / 60.0,
    }
}

fn get_attribute(e: &BytesStart, name: &str) -> Result<Option<String>, MzMLError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MzMLError::XmlError(quick_xml::Error::from(e)))?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}
