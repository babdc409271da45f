//! Top-level region normalisation and base coordinates.
//!
//! South Korea has 17 first-level administrative divisions. Users write
//! them in several ways: the short form used on the map (`서울`), the
//! official long form (`서울특별시`), or a romanised name (`Seoul`). The
//! [`RegionLocator`] folds all of these onto the short form, which is the
//! canonical key clusters are grouped and placed by.
//!
//! # Resolution order
//!
//! 1. Exact match against a canonical key.
//! 2. Long-form official name.
//! 3. Alternate (romanised) name, ASCII case-insensitive.
//! 4. Otherwise the input is returned unchanged. It has no coordinate, so
//!    clusters keyed by it are never emitted.

use std::collections::BTreeMap;

use moodmap_types::GeoPoint;

/// One row of the fixed region table.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    /// Canonical short key, e.g. `서울`.
    pub key: &'static str,
    /// Official long-form names, including pre-reform names still in use.
    pub long_forms: &'static [&'static str],
    /// Romanised names.
    pub alternates: &'static [&'static str],
    /// Pin position for region-level clusters.
    pub coordinates: GeoPoint,
}

/// The 17 first-level divisions with their base pin positions.
///
/// Coordinates are part of the rendering contract; the frontend checks
/// pins against these exact values.
pub static REGIONS: [Region; 17] = [
    Region {
        key: "서울",
        long_forms: &["서울특별시"],
        alternates: &["Seoul"],
        coordinates: GeoPoint::new(126.9780, 37.5665),
    },
    Region {
        key: "부산",
        long_forms: &["부산광역시"],
        alternates: &["Busan"],
        coordinates: GeoPoint::new(129.0756, 35.1796),
    },
    Region {
        key: "대구",
        long_forms: &["대구광역시"],
        alternates: &["Daegu"],
        coordinates: GeoPoint::new(128.6014, 35.8714),
    },
    Region {
        key: "인천",
        long_forms: &["인천광역시"],
        alternates: &["Incheon"],
        coordinates: GeoPoint::new(126.7052, 37.4563),
    },
    Region {
        key: "광주",
        long_forms: &["광주광역시"],
        alternates: &["Gwangju"],
        coordinates: GeoPoint::new(126.8526, 35.1595),
    },
    Region {
        key: "대전",
        long_forms: &["대전광역시"],
        alternates: &["Daejeon"],
        coordinates: GeoPoint::new(127.3845, 36.3504),
    },
    Region {
        key: "울산",
        long_forms: &["울산광역시"],
        alternates: &["Ulsan"],
        coordinates: GeoPoint::new(129.3114, 35.5384),
    },
    Region {
        key: "세종",
        long_forms: &["세종특별자치시"],
        alternates: &["Sejong"],
        coordinates: GeoPoint::new(127.2890, 36.4800),
    },
    Region {
        key: "경기",
        long_forms: &["경기도"],
        alternates: &["Gyeonggi", "Gyeonggi-do"],
        coordinates: GeoPoint::new(127.5183, 37.4138),
    },
    Region {
        key: "강원",
        long_forms: &["강원도", "강원특별자치도"],
        alternates: &["Gangwon", "Gangwon-do"],
        coordinates: GeoPoint::new(128.1555, 37.8228),
    },
    Region {
        key: "충북",
        long_forms: &["충청북도"],
        alternates: &["Chungbuk", "Chungcheongbuk-do"],
        coordinates: GeoPoint::new(127.7298, 36.6285),
    },
    Region {
        key: "충남",
        long_forms: &["충청남도"],
        alternates: &["Chungnam", "Chungcheongnam-do"],
        coordinates: GeoPoint::new(126.8000, 36.5184),
    },
    Region {
        key: "전북",
        long_forms: &["전라북도", "전북특별자치도"],
        alternates: &["Jeonbuk", "Jeollabuk-do"],
        coordinates: GeoPoint::new(127.1530, 35.7175),
    },
    Region {
        key: "전남",
        long_forms: &["전라남도"],
        alternates: &["Jeonnam", "Jeollanam-do"],
        coordinates: GeoPoint::new(126.9910, 34.8679),
    },
    Region {
        key: "경북",
        long_forms: &["경상북도"],
        alternates: &["Gyeongbuk", "Gyeongsangbuk-do"],
        coordinates: GeoPoint::new(128.8889, 36.4919),
    },
    Region {
        key: "경남",
        long_forms: &["경상남도"],
        alternates: &["Gyeongnam", "Gyeongsangnam-do"],
        coordinates: GeoPoint::new(128.2132, 35.4606),
    },
    Region {
        key: "제주",
        long_forms: &["제주특별자치도", "제주도"],
        alternates: &["Jeju", "Jeju-do"],
        coordinates: GeoPoint::new(126.5312, 33.4996),
    },
];

/// Resolves region spellings to canonical keys and keys to coordinates.
#[derive(Debug, Clone)]
pub struct RegionLocator {
    by_key: BTreeMap<&'static str, &'static Region>,
    by_long_form: BTreeMap<&'static str, &'static str>,
    /// Keyed by ASCII-lowercased alternate name.
    by_alternate: BTreeMap<String, &'static str>,
}

impl RegionLocator {
    /// Build the lookup indexes over [`REGIONS`].
    pub fn new() -> Self {
        let mut by_key = BTreeMap::new();
        let mut by_long_form = BTreeMap::new();
        let mut by_alternate = BTreeMap::new();
        for region in &REGIONS {
            by_key.insert(region.key, region);
            for long in region.long_forms {
                by_long_form.insert(*long, region.key);
            }
            for alt in region.alternates {
                by_alternate.insert(alt.to_ascii_lowercase(), region.key);
            }
        }
        Self {
            by_key,
            by_long_form,
            by_alternate,
        }
    }

    /// Fold a region spelling onto its canonical key.
    ///
    /// Unrecognised names come back unchanged.
    pub fn normalize<'a>(&self, name: &'a str) -> &'a str {
        if let Some(region) = self.by_key.get(name) {
            return region.key;
        }
        if let Some(key) = self.by_long_form.get(name).copied() {
            return key;
        }
        if let Some(key) = self.by_alternate.get(&name.to_ascii_lowercase()).copied() {
            return key;
        }
        name
    }

    /// Base coordinates of a canonical key, if it names a known region.
    pub fn coordinates_of(&self, key: &str) -> Option<GeoPoint> {
        self.by_key.get(key).map(|region| region.coordinates)
    }

    /// Whether `key` is one of the 17 canonical keys.
    pub fn is_known(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Iterate the region table in declaration order.
    pub fn regions() -> impl Iterator<Item = &'static Region> {
        REGIONS.iter()
    }
}

impl Default for RegionLocator {
    fn default() -> Self {
        Self::new()
    }
}
