//! CSV-backed parameter tables keyed by HRU.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use gf_core::{Hru, LandCover, SlopeClass, SoilGroup};

use crate::{ParamsError, ParamsResult};

const PERLND_CSV: &str = include_str!("../data/perlnd.csv");
const IMPLND_CSV: &str = include_str!("../data/implnd.csv");

const PERLND_COLUMNS: [&str; 11] = [
    "INFILT", "LZSN", "UZSN", "AGWRC", "IRC", "INTFW", "KVARY", "DEEPFR", "CEPSC", "LZETP", "NSUR",
];
const IMPLND_COLUMNS: [&str; 2] = ["NSUR", "RETSC"];

/// Calibrated constants for one pervious HRU, in English units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerviousParams {
    pub infilt: f64,
    pub lzsn: f64,
    pub uzsn: f64,
    pub agwrc: f64,
    pub irc: f64,
    pub intfw: f64,
    pub kvary: f64,
    pub deepfr: f64,
    pub cepsc: f64,
    pub lzetp: f64,
    pub nsur: f64,
}

/// Calibrated constants for one impervious HRU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImperviousParams {
    pub nsur: f64,
    pub retsc: f64,
}

/// One table row, tagged by family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRow {
    Pervious(PerviousParams),
    Impervious(ImperviousParams),
}

/// Both family tables. Lookups hand out copies; the table itself is never
/// mutated after parse.
#[derive(Debug, Clone)]
pub struct ParamTables {
    pervious: BTreeMap<Hru, PerviousParams>,
    impervious: BTreeMap<Hru, ImperviousParams>,
}

impl ParamTables {
    pub fn parse(perlnd_csv: &str, implnd_csv: &str) -> ParamsResult<Self> {
        let mut pervious = BTreeMap::new();
        for (line_no, label, values) in rows(perlnd_csv, &PERLND_COLUMNS)? {
            let hru = pervious_key(line_no, &label)?;
            let row = PerviousParams {
                infilt: values[0],
                lzsn: values[1],
                uzsn: values[2],
                agwrc: values[3],
                irc: values[4],
                intfw: values[5],
                kvary: values[6],
                deepfr: values[7],
                cepsc: values[8],
                lzetp: values[9],
                nsur: values[10],
            };
            if pervious.insert(hru, row).is_some() {
                return Err(ParamsError::DuplicateHru {
                    hru: hru.to_string(),
                });
            }
        }
        let mut impervious = BTreeMap::new();
        for (line_no, label, values) in rows(implnd_csv, &IMPLND_COLUMNS)? {
            let hru = impervious_key(line_no, &label)?;
            let row = ImperviousParams {
                nsur: values[0],
                retsc: values[1],
            };
            if impervious.insert(hru, row).is_some() {
                return Err(ParamsError::DuplicateHru {
                    hru: hru.to_string(),
                });
            }
        }
        Ok(Self {
            pervious,
            impervious,
        })
    }

    pub fn pervious(&self) -> &BTreeMap<Hru, PerviousParams> {
        &self.pervious
    }

    pub fn impervious(&self) -> &BTreeMap<Hru, ImperviousParams> {
        &self.impervious
    }

    /// Copy of the row for `hru`, if the tables know it.
    pub fn row(&self, hru: Hru) -> Option<ParamRow> {
        match hru {
            Hru::Pervious { .. } => self.pervious.get(&hru).copied().map(ParamRow::Pervious),
            Hru::Impervious { .. } => self.impervious.get(&hru).copied().map(ParamRow::Impervious),
        }
    }

    /// Every keyed HRU, in code order.
    pub fn all_hrus(&self) -> Vec<Hru> {
        self.pervious
            .keys()
            .chain(self.impervious.keys())
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pervious.len() + self.impervious.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pervious.is_empty() && self.impervious.is_empty()
    }
}

/// The tables every production run uses, parsed once.
pub fn builtin() -> &'static ParamTables {
    static TABLES: OnceLock<ParamTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        // The assets are compiled in; a parse failure is a build defect.
        ParamTables::parse(PERLND_CSV, IMPLND_CSV).expect("embedded reference tables parse")
    })
}

type Row = (usize, String, Vec<f64>);

/// Parse header + data rows, returning each row's 1-based line number,
/// normalized label, and the requested columns in order.
fn rows(csv: &str, columns: &[&'static str]) -> ParamsResult<Vec<Row>> {
    let mut lines = csv.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let (_, header) = lines.next().ok_or(ParamsError::MissingColumn {
        column: "label",
    })?;
    let header = split_fields(header);
    let mut indices = Vec::with_capacity(columns.len());
    for column in columns {
        let idx = header
            .iter()
            .position(|h| h.trim() == *column)
            .ok_or(ParamsError::MissingColumn { column })?;
        indices.push(idx);
    }
    let mut out = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields = split_fields(line);
        if fields.len() != header.len() {
            return Err(ParamsError::FieldCount {
                row: line_no,
                expected: header.len(),
                found: fields.len(),
            });
        }
        let label = fields[0].trim().to_ascii_lowercase();
        let mut values = Vec::with_capacity(indices.len());
        for (&col_idx, &column) in indices.iter().zip(columns) {
            let raw = fields[col_idx].trim();
            let value: f64 = raw.parse().map_err(|_| ParamsError::BadNumber {
                row: line_no,
                column,
                value: raw.to_string(),
            })?;
            values.push(value);
        }
        out.push((line_no, label, values));
    }
    Ok(out)
}

/// Split one CSV line, honoring double-quoted fields (labels contain commas).
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Axis parts of a normalized label, stripped of padding.
fn label_axes(label: &str) -> Vec<&str> {
    label.split(',').map(str::trim).collect()
}

fn pervious_key(row: usize, label: &str) -> ParamsResult<Hru> {
    let axes = label_axes(label);
    let [soil, cover, slope] = axes[..] else {
        return Err(ParamsError::LabelShape {
            row,
            label: label.to_string(),
            expected: 3,
            found: axes.len(),
        });
    };
    Ok(Hru::Pervious {
        soil: unknown_if_none(SoilGroup::from_label(soil), row, "soil", soil)?,
        cover: unknown_if_none(LandCover::from_label(cover), row, "cover", cover)?,
        slope: unknown_if_none(SlopeClass::from_label(slope), row, "slope", slope)?,
    })
}

fn impervious_key(row: usize, label: &str) -> ParamsResult<Hru> {
    let axes = label_axes(label);
    let [cover, slope] = axes[..] else {
        return Err(ParamsError::LabelShape {
            row,
            label: label.to_string(),
            expected: 2,
            found: axes.len(),
        });
    };
    if cover != "impervious" {
        return Err(ParamsError::UnknownLabel {
            row,
            axis: "cover",
            label: cover.to_string(),
        });
    }
    Ok(Hru::Impervious {
        slope: unknown_if_none(SlopeClass::from_label(slope), row, "slope", slope)?,
    })
}

fn unknown_if_none<T>(
    parsed: Option<T>,
    row: usize,
    axis: &'static str,
    label: &str,
) -> ParamsResult<T> {
    parsed.ok_or_else(|| ParamsError::UnknownLabel {
        row,
        axis,
        label: label.to_string(),
    })
}
