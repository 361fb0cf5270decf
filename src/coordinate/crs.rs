//! Coordinate Reference System handling

use lazy_static::lazy_static;
use regex::Regex;

use super::ellipsoid::{GRS80, WGS84};
use super::swiss::{LV03, LV95};
use super::transform::{web_mercator_to_wgs84, wgs84_to_web_mercator};
use super::utm;
use crate::errors::{VectorError, VectorResult};

lazy_static! {
    // Spellings that carry an EPSG code in their single capture group
    static ref EPSG_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^(?i)(?:\+init=)?epsg[:=]{1,2}(\d+)$").unwrap(),
        Regex::new(r"^(?i)urn:ogc:def:crs:epsg:[\d.]*:(\d+)$").unwrap(),
        Regex::new(r"^(?i)https?://www\.opengis\.net/def/crs/epsg/[\d.]+/(\d+)$").unwrap(),
        Regex::new(r"^(\d+)$").unwrap(),
    ];
    static ref CRS84_PATTERN: Regex = Regex::new(
        r"^(?i)(?:urn:ogc:def:crs:ogc:[\d.]*:|https?://www\.opengis\.net/def/crs/ogc/[\d.]+/)?crs84$"
    ).unwrap();
}

/// Parse a CRS identifier into an EPSG code
///
/// Accepts `EPSG:2056`, `epsg=2056`, `+init=epsg:2056`, `2056`,
/// `urn:ogc:def:crs:EPSG::2056`, the opengis.net URL form, and `CRS84`
/// (mapped to 4326).
pub fn parse_epsg(identifier: &str) -> VectorResult<u32> {
    let trimmed = identifier.trim();

    if CRS84_PATTERN.is_match(trimmed) {
        return Ok(4326);
    }

    EPSG_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .and_then(|code| code.as_str().parse::<u32>().ok())
        .ok_or_else(|| VectorError::UnresolvableCrs(identifier.to_string()))
}

/// OGC URN for an EPSG code, as written into output files
pub fn epsg_urn(code: u32) -> String {
    format!("urn:ogc:def:crs:EPSG::{}", code)
}

/// Coordinate systems known to the built-in projection engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// WGS 84 (EPSG:4326)
    WGS84,
    /// ETRS89 geographic (EPSG:4258), treated as coincident with WGS 84
    ETRS89,
    /// Web Mercator (EPSG:3857)
    WebMercator,
    /// WGS 84 / UTM zone (EPSG:326xx for northern hemisphere, 327xx for southern)
    UTM(u8, bool),
    /// ETRS89 / UTM zone N (EPSG:258xx)
    EtrsUTM(u8),
    /// CH1903+ / LV95 (EPSG:2056)
    SwissLV95,
    /// CH1903 / LV03 (EPSG:21781)
    SwissLV03,
}

impl CoordinateSystem {
    /// Resolve an EPSG code
    pub fn from_epsg(epsg: u32) -> VectorResult<Self> {
        match epsg {
            4326 => Ok(CoordinateSystem::WGS84),
            4258 => Ok(CoordinateSystem::ETRS89),
            3857 | 3785 | 900913 => Ok(CoordinateSystem::WebMercator),
            32601..=32660 => Ok(CoordinateSystem::UTM((epsg - 32600) as u8, true)),
            32701..=32760 => Ok(CoordinateSystem::UTM((epsg - 32700) as u8, false)),
            25828..=25838 => Ok(CoordinateSystem::EtrsUTM((epsg - 25800) as u8)),
            2056 => Ok(CoordinateSystem::SwissLV95),
            21781 => Ok(CoordinateSystem::SwissLV03),
            _ => Err(VectorError::UnresolvableCrs(format!("EPSG:{}", epsg))),
        }
    }

    /// Parse and resolve a CRS identifier (e.g. "EPSG:4326")
    pub fn from_string(crs_str: &str) -> VectorResult<Self> {
        Self::from_epsg(parse_epsg(crs_str)?)
    }

    /// Get the EPSG code for this coordinate system
    pub fn epsg_code(&self) -> u32 {
        match self {
            CoordinateSystem::WGS84 => 4326,
            CoordinateSystem::ETRS89 => 4258,
            CoordinateSystem::WebMercator => 3857,
            CoordinateSystem::UTM(zone, is_northern) => {
                if *is_northern {
                    32600 + *zone as u32
                } else {
                    32700 + *zone as u32
                }
            }
            CoordinateSystem::EtrsUTM(zone) => 25800 + *zone as u32,
            CoordinateSystem::SwissLV95 => 2056,
            CoordinateSystem::SwissLV03 => 21781,
        }
    }

    /// Get a description of this coordinate system
    pub fn description(&self) -> String {
        match self {
            CoordinateSystem::WGS84 => "WGS 84 (EPSG:4326)".to_string(),
            CoordinateSystem::ETRS89 => "ETRS89 (EPSG:4258)".to_string(),
            CoordinateSystem::WebMercator => "Web Mercator (EPSG:3857)".to_string(),
            CoordinateSystem::UTM(zone, is_northern) => {
                let hemisphere = if *is_northern { 'N' } else { 'S' };
                format!("WGS 84 / UTM Zone {}{} (EPSG:{})", zone, hemisphere, self.epsg_code())
            }
            CoordinateSystem::EtrsUTM(zone) => {
                format!("ETRS89 / UTM Zone {}N (EPSG:{})", zone, self.epsg_code())
            }
            CoordinateSystem::SwissLV95 => "CH1903+ / LV95 (EPSG:2056)".to_string(),
            CoordinateSystem::SwissLV03 => "CH1903 / LV03 (EPSG:21781)".to_string(),
        }
    }

    /// Whether coordinates are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        matches!(self, CoordinateSystem::WGS84 | CoordinateSystem::ETRS89)
    }

    /// Convert a coordinate in this system to WGS 84 longitude/latitude
    pub fn to_wgs84(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            CoordinateSystem::WGS84 | CoordinateSystem::ETRS89 => (x, y),
            CoordinateSystem::WebMercator => {
                let p = web_mercator_to_wgs84(x, y);
                (p.x, p.y)
            }
            CoordinateSystem::UTM(zone, north) => utm::inverse(&WGS84, x, y, *zone, *north),
            CoordinateSystem::EtrsUTM(zone) => utm::inverse(&GRS80, x, y, *zone, true),
            CoordinateSystem::SwissLV95 => LV95.to_wgs84(x, y),
            CoordinateSystem::SwissLV03 => LV03.to_wgs84(x, y),
        }
    }

    /// Convert WGS 84 longitude/latitude to a coordinate in this system
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            CoordinateSystem::WGS84 | CoordinateSystem::ETRS89 => (lon, lat),
            CoordinateSystem::WebMercator => {
                let p = wgs84_to_web_mercator(lon, lat);
                (p.x, p.y)
            }
            CoordinateSystem::UTM(zone, north) => utm::forward(&WGS84, lon, lat, *zone, *north),
            CoordinateSystem::EtrsUTM(zone) => utm::forward(&GRS80, lon, lat, *zone, true),
            CoordinateSystem::SwissLV95 => LV95.from_wgs84(lon, lat),
            CoordinateSystem::SwissLV03 => LV03.from_wgs84(lon, lat),
        }
    }
}
