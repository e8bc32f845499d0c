pub mod currency;
pub mod fields;
pub mod parse;
pub mod record;

pub use currency::currency_symbol;
pub use fields::{expected_headers, Field, HEADER_FIELDS};
pub use parse::{parse_lines, CountryParser};
pub use record::CountryRecord;
