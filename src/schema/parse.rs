// src/schema/parse.rs

use futures::{stream, Stream, StreamExt};
use std::{io, pin::Pin};
use tracing::{debug, trace};

use super::currency::currency_symbol;
use super::fields::{expected_headers, Field};
use super::record::CountryRecord;
use crate::error::{CountriesError, Result};

const HEADER_MARKER: &str = "#ISO";

/// Line-at-a-time parser for the geonames `countryInfo.txt` layout.
///
/// Comment lines start with `#`; the one starting with `#ISO` declares the
/// columns and must match [`HEADER_FIELDS`](super::fields::HEADER_FIELDS)
/// exactly before any data row is accepted.
#[derive(Debug, Default)]
pub struct CountryParser {
    /// Confirmed header order, empty until the header line has been seen.
    headers: Vec<Field>,
}

impl CountryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers_confirmed(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Feed one line (without its terminator). Returns a record for data
    /// lines and `None` for comments, the header and blank lines.
    pub fn parse_line(&mut self, line_no: usize, line: &str) -> Result<Option<CountryRecord>> {
        if line.is_empty() {
            return Ok(None);
        }

        if line.starts_with('#') {
            if line.starts_with(HEADER_MARKER) {
                self.confirm_header(line_no, line)?;
            } else {
                trace!(line = line_no, "comment");
            }
            return Ok(None);
        }

        if !self.headers_confirmed() {
            return Err(CountriesError::schema(format!(
                "data at line {} before the #ISO header line",
                line_no
            )));
        }

        self.parse_row(line_no, line).map(Some)
    }

    /// Called once the input is exhausted. A feed that never declared its
    /// columns (empty body, comments only, cut-off download) is a mismatch.
    pub fn finish(&self) -> Result<()> {
        if self.headers_confirmed() {
            Ok(())
        } else {
            Err(CountriesError::schema("no #ISO header line before end of feed"))
        }
    }

    fn confirm_header(&mut self, line_no: usize, line: &str) -> Result<()> {
        let declared: Vec<&str> = line
            .trim_matches(|c: char| c == '#' || c == ' ')
            .split('\t')
            .collect();

        if !declared.iter().copied().eq(expected_headers()) {
            return Err(CountriesError::schema(format!(
                "header at line {} is [{}], expected [{}]",
                line_no,
                declared.join(", "),
                expected_headers().collect::<Vec<_>>().join(", ")
            )));
        }

        // columns resolve by the declared names, not by their expected slots
        self.headers = declared
            .iter()
            .map(|name| {
                Field::for_header(name)
                    .ok_or_else(|| CountriesError::schema(format!("unknown column `{}`", name)))
            })
            .collect::<Result<_>>()?;
        debug!(line = line_no, columns = self.headers.len(), "header confirmed");
        Ok(())
    }

    fn parse_row(&self, line_no: usize, line: &str) -> Result<CountryRecord> {
        let values: Vec<&str> = line.split('\t').collect();
        if values.len() > self.headers.len() {
            return Err(CountriesError::MalformedRow {
                line: line_no,
                reason: format!(
                    "{} columns but the header declares {}",
                    values.len(),
                    self.headers.len()
                ),
            });
        }

        // short rows leave their trailing columns absent
        let mut pairs: Vec<(Field, &str)> = self.headers.iter().copied().zip(values).collect();

        let symbol = pairs
            .iter()
            .find(|(f, v)| *f == Field::CurrencyCode && !v.is_empty())
            .and_then(|(_, code)| currency_symbol(code));
        if let Some(symbol) = symbol {
            pairs.push((Field::CurrencySymbol, symbol));
        }

        CountryRecord::from_pairs(pairs).ok_or_else(|| CountriesError::MalformedRow {
            line: line_no,
            reason: "empty ISO code".to_string(),
        })
    }
}

/// Turns a stream of raw lines into a stream of records. The stream ends
/// after its first error, and yields a `SchemaMismatch` if the input runs out
/// before the header was confirmed.
pub fn parse_lines<S>(lines: S) -> impl Stream<Item = Result<CountryRecord>>
where
    S: Stream<Item = io::Result<String>>,
{
    let state = ParseState {
        lines: Box::pin(lines),
        parser: CountryParser::new(),
        line_no: 0,
        done: false,
    };
    stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }
        let item = loop {
            let Some(line) = st.lines.next().await else {
                st.done = true;
                match st.parser.finish() {
                    Ok(()) => return None,
                    Err(e) => break Err(e),
                }
            };
            st.line_no += 1;
            let parsed = line
                .map_err(|source| CountriesError::Read {
                    line: st.line_no,
                    source,
                })
                .and_then(|line| st.parser.parse_line(st.line_no, &line));
            match parsed {
                Ok(None) => continue,
                Ok(Some(record)) => break Ok(record),
                Err(e) => {
                    st.done = true;
                    break Err(e);
                }
            }
        };
        Some((item, st))
    })
}

struct ParseState<S> {
    lines: Pin<Box<S>>,
    parser: CountryParser,
    line_no: usize,
    done: bool,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::TryStreamExt;

    pub(crate) fn header_line() -> String {
        format!("#{}", expected_headers().collect::<Vec<_>>().join("\t"))
    }

    pub(crate) const US_ROW: &str = "US\tUSA\t840\tUS\tUnited States\tWashington\t9629091\t327167434\tNA\t.us\tUSD\tDollar\t1\t#####\t^\\d{5}$\ten-US\t6252001\tCA,MX\t";

    fn confirmed() -> CountryParser {
        let mut p = CountryParser::new();
        assert!(p.parse_line(1, &header_line()).unwrap().is_none());
        p
    }

    #[test]
    fn us_fixture_row() {
        let mut p = confirmed();
        let rec = p.parse_line(2, US_ROW).unwrap().unwrap();
        assert_eq!(rec.iso(), "US");
        assert_eq!(rec.get(Field::CurrencyCode), Some("USD"));
        assert_eq!(rec.get(Field::CurrencySymbol), Some("$"));
        assert_eq!(rec.get(Field::PostalCodeRegex), Some("^\\d{5}$"));
        assert_eq!(rec.get(Field::Neighbours), Some("CA,MX"));
        assert!(!rec.contains(Field::EquivalentFipsCode));
        assert_eq!(rec.len(), 19);
    }

    #[test]
    fn header_with_trailing_space_is_accepted() {
        let mut p = CountryParser::new();
        let line = format!("{} ", header_line());
        p.parse_line(1, &line).unwrap();
        assert!(p.headers_confirmed());
    }

    #[test]
    fn plain_comments_are_ignored() {
        let mut p = CountryParser::new();
        assert!(p.parse_line(1, "# GeoNames.org Country Information").unwrap().is_none());
        assert!(p.parse_line(2, "#").unwrap().is_none());
        assert!(!p.headers_confirmed());
    }

    #[test]
    fn reordered_header_is_rejected() {
        let mut names: Vec<&str> = expected_headers().collect();
        names.swap(0, 1);
        let mut p = CountryParser::new();
        let err = p.parse_line(1, &format!("#{}", names.join("\t"))).unwrap_err();
        assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
        assert!(!p.headers_confirmed());
    }

    #[test]
    fn renamed_header_is_rejected() {
        let line = header_line().replace("Capital", "CapitalCity");
        let err = CountryParser::new().parse_line(1, &line).unwrap_err();
        assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
    }

    #[test]
    fn short_or_long_header_is_rejected() {
        let names: Vec<&str> = expected_headers().collect();
        let short = format!("#{}", names[..18].join("\t"));
        let long = format!("{}\tExtra", header_line());
        for line in [short, long] {
            let err = CountryParser::new().parse_line(1, &line).unwrap_err();
            assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
        }
    }

    #[test]
    fn data_before_header_is_rejected() {
        let err = CountryParser::new().parse_line(1, US_ROW).unwrap_err();
        assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
    }

    #[test]
    fn unknown_currency_gets_no_symbol() {
        let mut p = confirmed();
        let row = US_ROW.replace("USD", "XTS");
        let rec = p.parse_line(2, &row).unwrap().unwrap();
        assert_eq!(rec.get(Field::CurrencyCode), Some("XTS"));
        assert!(!rec.contains(Field::CurrencySymbol));
    }

    #[test]
    fn short_row_leaves_trailing_fields_absent() {
        let mut p = confirmed();
        let rec = p.parse_line(2, "AQ\tATA\t010\tAY\tAntarctica").unwrap().unwrap();
        assert_eq!(rec.iso(), "AQ");
        assert_eq!(rec.len(), 5);
        assert!(!rec.contains(Field::CurrencyCode));
        assert!(!rec.contains(Field::CurrencySymbol));
    }

    #[test]
    fn long_row_is_malformed() {
        let mut p = confirmed();
        let row = format!("{}\textra", US_ROW);
        let err = p.parse_line(2, &row).unwrap_err();
        assert!(matches!(err, CountriesError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn empty_iso_is_malformed() {
        let mut p = confirmed();
        let row = US_ROW.replacen("US", "", 1);
        let err = p.parse_line(2, &row).unwrap_err();
        assert!(matches!(err, CountriesError::MalformedRow { .. }));
    }

    #[test]
    fn second_header_is_checked_again() {
        let mut p = confirmed();
        p.parse_line(2, US_ROW).unwrap();
        assert!(p.parse_line(3, &header_line()).unwrap().is_none());

        let renamed = header_line().replace("Population", "People");
        let err = p.parse_line(4, &renamed).unwrap_err();
        assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
    }

    #[test]
    fn finish_requires_a_header() {
        let mut p = CountryParser::new();
        p.parse_line(1, "# GeoNames.org Country Information").unwrap();
        assert!(matches!(
            p.finish().unwrap_err(),
            CountriesError::SchemaMismatch { .. }
        ));
        assert!(confirmed().finish().is_ok());
    }

    #[tokio::test]
    async fn empty_or_comment_only_stream_is_schema_mismatch() {
        let feeds: [Vec<&str>; 2] = [vec![], vec!["# GeoNames.org Country Information", "#"]];
        for feed in feeds {
            let lines = feed.into_iter().map(|l| Ok::<_, io::Error>(l.to_string()));
            let err = parse_lines(stream::iter(lines))
                .try_collect::<Vec<_>>()
                .await
                .unwrap_err();
            assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
        }
    }

    #[tokio::test]
    async fn stream_ends_after_first_error() {
        let lines = vec![
            Ok(header_line()),
            Ok(format!("{}\textra", US_ROW)),
            Ok(US_ROW.to_string()),
        ];
        let items: Vec<Result<CountryRecord>> = parse_lines(stream::iter(lines)).collect().await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(CountriesError::MalformedRow { line: 2, .. })));
    }

    #[tokio::test]
    async fn stream_yields_records_only() {
        let lines = vec![
            Ok("# GeoNames.org Country Information".to_string()),
            Ok(header_line()),
            Ok(US_ROW.to_string()),
            Ok(String::new()),
            Ok("AQ\tATA\t010\tAY\tAntarctica".to_string()),
        ];
        let records: Vec<CountryRecord> = parse_lines(stream::iter(lines))
            .try_collect()
            .await
            .unwrap();
        let isos: Vec<&str> = records.iter().map(|r| r.iso()).collect();
        assert_eq!(isos, ["US", "AQ"]);
    }

    #[tokio::test]
    async fn stream_read_errors_carry_line_number() {
        let lines = vec![
            Ok(header_line()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8")),
        ];
        let err = parse_lines(stream::iter(lines))
            .try_collect::<Vec<_>>()
            .await
            .unwrap_err();
        assert!(matches!(err, CountriesError::Read { line: 2, .. }));
        assert!(err.is_transport());
    }
}
