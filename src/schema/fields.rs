// src/schema/fields.rs

use serde::Serialize;
use std::fmt;

/// Semantic attribute of a country, one per feed column plus the derived
/// currency symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Iso,
    Iso3,
    IsoNumeric,
    Fips,
    Name,
    Capital,
    Area,
    Population,
    Continent,
    Tld,
    CurrencyCode,
    CurrencyName,
    Phone,
    PostalCodeFormat,
    PostalCodeRegex,
    Languages,
    Geonameid,
    Neighbours,
    EquivalentFipsCode,
    CurrencySymbol,
}

/// Feed header name → field, in the exact order the feed declares them.
pub static HEADER_FIELDS: [(&str, Field); 19] = [
    ("ISO", Field::Iso),
    ("ISO3", Field::Iso3),
    ("ISO-Numeric", Field::IsoNumeric),
    ("fips", Field::Fips),
    ("Country", Field::Name),
    ("Capital", Field::Capital),
    ("Area(in sq km)", Field::Area),
    ("Population", Field::Population),
    ("Continent", Field::Continent),
    ("tld", Field::Tld),
    ("CurrencyCode", Field::CurrencyCode),
    ("CurrencyName", Field::CurrencyName),
    ("Phone", Field::Phone),
    ("Postal Code Format", Field::PostalCodeFormat),
    ("Postal Code Regex", Field::PostalCodeRegex),
    ("Languages", Field::Languages),
    ("geonameid", Field::Geonameid),
    ("neighbours", Field::Neighbours),
    ("EquivalentFipsCode", Field::EquivalentFipsCode),
];

impl Field {
    /// Every field in storage order (`iso` first).
    pub const ALL: [Field; 20] = [
        Field::Iso,
        Field::Iso3,
        Field::IsoNumeric,
        Field::Fips,
        Field::Name,
        Field::Capital,
        Field::Area,
        Field::Population,
        Field::Continent,
        Field::Tld,
        Field::CurrencyCode,
        Field::CurrencyName,
        Field::Phone,
        Field::PostalCodeFormat,
        Field::PostalCodeRegex,
        Field::Languages,
        Field::Geonameid,
        Field::Neighbours,
        Field::EquivalentFipsCode,
        Field::CurrencySymbol,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Iso => "iso",
            Field::Iso3 => "iso3",
            Field::IsoNumeric => "iso_numeric",
            Field::Fips => "fips",
            Field::Name => "name",
            Field::Capital => "capital",
            Field::Area => "area",
            Field::Population => "population",
            Field::Continent => "continent",
            Field::Tld => "tld",
            Field::CurrencyCode => "currency_code",
            Field::CurrencyName => "currency_name",
            Field::Phone => "phone",
            Field::PostalCodeFormat => "postal_code_format",
            Field::PostalCodeRegex => "postal_code_regex",
            Field::Languages => "languages",
            Field::Geonameid => "geonameid",
            Field::Neighbours => "neighbours",
            Field::EquivalentFipsCode => "equivalent_fips_code",
            Field::CurrencySymbol => "currency_symbol",
        }
    }

    /// Field for a feed header name, if it is one of the expected columns.
    pub fn for_header(header: &str) -> Option<Self> {
        HEADER_FIELDS
            .iter()
            .find(|(name, _)| *name == header)
            .map(|(_, field)| *field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header names in declared order.
pub fn expected_headers() -> impl Iterator<Item = &'static str> {
    HEADER_FIELDS.iter().map(|(name, _)| *name)
}
