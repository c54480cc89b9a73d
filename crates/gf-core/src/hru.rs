//! Typed HRU identifiers.
//!
//! A hydrologic response unit (HRU) names one land-parcel class: soil
//! group and land cover and slope class for pervious parcels, slope class
//! alone for impervious ones. Identifiers collapse to compact codes like
//! `hru010` (A/B soil, pasture, flat) or `hru250` (impervious, flat); the
//! cover digit `5` always marks the impervious family.

use core::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Hydrologic soil group, coarsened to the three classes the parameter
/// tables distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoilGroup {
    /// Outwash soils (groups A and B share one parameter row).
    Ab,
    /// Till soils.
    C,
    /// Saturated / wetland soils.
    D,
}

impl SoilGroup {
    pub const ALL: [SoilGroup; 3] = [SoilGroup::Ab, SoilGroup::C, SoilGroup::D];

    pub fn digit(self) -> char {
        match self {
            SoilGroup::Ab => '0',
            SoilGroup::C => '1',
            SoilGroup::D => '2',
        }
    }

    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(SoilGroup::Ab),
            '1' => Some(SoilGroup::C),
            '2' => Some(SoilGroup::D),
            _ => None,
        }
    }

    /// Parse a reference-table label such as `a/b` or `d`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "a/b" => Some(SoilGroup::Ab),
            "c" => Some(SoilGroup::C),
            "d" => Some(SoilGroup::D),
            _ => None,
        }
    }
}

/// Pervious land cover. Impervious cover is not a variant here; it is its
/// own HRU family with a fixed cover digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LandCover {
    Forest,
    Pasture,
    Lawn,
}

impl LandCover {
    pub const ALL: [LandCover; 3] = [LandCover::Forest, LandCover::Pasture, LandCover::Lawn];

    pub fn digit(self) -> char {
        match self {
            LandCover::Forest => '0',
            LandCover::Pasture => '1',
            LandCover::Lawn => '2',
        }
    }

    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(LandCover::Forest),
            '1' => Some(LandCover::Pasture),
            '2' => Some(LandCover::Lawn),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "forest" => Some(LandCover::Forest),
            "pasture" => Some(LandCover::Pasture),
            "lawn" => Some(LandCover::Lawn),
            _ => None,
        }
    }
}

/// Surface slope class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlopeClass {
    Flat,
    Moderate,
    Steep,
}

impl SlopeClass {
    pub const ALL: [SlopeClass; 3] = [SlopeClass::Flat, SlopeClass::Moderate, SlopeClass::Steep];

    pub fn digit(self) -> char {
        match self {
            SlopeClass::Flat => '0',
            SlopeClass::Moderate => '1',
            SlopeClass::Steep => '2',
        }
    }

    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(SlopeClass::Flat),
            '1' => Some(SlopeClass::Moderate),
            '2' => Some(SlopeClass::Steep),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "flat" => Some(SlopeClass::Flat),
            "mod" => Some(SlopeClass::Moderate),
            "steep" => Some(SlopeClass::Steep),
            _ => None,
        }
    }
}

/// Cover digit reserved for the impervious family.
const IMPERVIOUS_COVER_DIGIT: char = '5';
/// Impervious parcels always carry the saturated soil digit.
const IMPERVIOUS_SOIL_DIGIT: char = '2';

/// One land-parcel class. The derived ordering matches lexicographic code
/// order, so sorted collections of HRUs line up with sorted result paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hru {
    Pervious {
        soil: SoilGroup,
        cover: LandCover,
        slope: SlopeClass,
    },
    Impervious { slope: SlopeClass },
}

impl Hru {
    /// Compact code, e.g. `hru122` or `hru251`.
    pub fn code(&self) -> String {
        match *self {
            Hru::Pervious { soil, cover, slope } => {
                format!("hru{}{}{}", soil.digit(), cover.digit(), slope.digit())
            }
            Hru::Impervious { slope } => format!(
                "hru{}{}{}",
                IMPERVIOUS_SOIL_DIGIT,
                IMPERVIOUS_COVER_DIGIT,
                slope.digit()
            ),
        }
    }

    pub fn is_impervious(&self) -> bool {
        matches!(self, Hru::Impervious { .. })
    }

    pub fn slope(&self) -> SlopeClass {
        match *self {
            Hru::Pervious { slope, .. } | Hru::Impervious { slope } => slope,
        }
    }

    /// Every HRU the engine knows: 27 pervious combinations followed by the
    /// 3 impervious slope classes, in code order.
    pub fn all() -> Vec<Hru> {
        let mut out = Vec::with_capacity(30);
        for soil in SoilGroup::ALL {
            for cover in LandCover::ALL {
                for slope in SlopeClass::ALL {
                    out.push(Hru::Pervious { soil, cover, slope });
                }
            }
        }
        for slope in SlopeClass::ALL {
            out.push(Hru::Impervious { slope });
        }
        out
    }
}

impl fmt::Display for Hru {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for Hru {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let unknown = || CoreError::UnknownHru { code: s.to_string() };
        let digits = s.strip_prefix("hru").ok_or_else(unknown)?;
        let mut chars = digits.chars();
        let (a, b, c) = match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), Some(c), None) => (a, b, c),
            _ => return Err(unknown()),
        };
        let slope = SlopeClass::from_digit(c).ok_or_else(unknown)?;
        if b == IMPERVIOUS_COVER_DIGIT {
            if a != IMPERVIOUS_SOIL_DIGIT {
                return Err(unknown());
            }
            return Ok(Hru::Impervious { slope });
        }
        let soil = SoilGroup::from_digit(a).ok_or_else(unknown)?;
        let cover = LandCover::from_digit(b).ok_or_else(unknown)?;
        Ok(Hru::Pervious { soil, cover, slope })
    }
}
