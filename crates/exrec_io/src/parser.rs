//! Line grammars for the exRec text formats.
//!
//! Every format is line oriented. A `#` starts a comment that runs to the
//! end of the line, and blank lines are ignored. Each remaining line is
//! parsed by one of the `nom` parsers below and must be consumed entirely.

use anyhow::{Result, bail};
use exrec_common::layout::{EcConfig, LogicalError, NUM_EC};
use exrec_common::syndrome::Syndrome;
use exrec_core::Configuration;
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{digit1, space1};
use nom::combinator::{map, map_opt, map_res, value};
use nom::sequence::{preceded, tuple};
use num_bigint::BigUint;

/// One line of a counts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountsLine {
    /// Starts the block of entries for a fault weight.
    Weight(usize),
    /// `syndrome count`
    Entry(Syndrome, BigUint),
}

/// One line of an outcomes file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomesLine {
    Weight(usize),
    /// `syndrome count_for_0 count_for_1`
    Entry(Syndrome, [BigUint; 2]),
}

/// One line of a histogram or checkpoint file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistogramLine {
    KMax(usize),
    /// Number of configurations already folded into a checkpoint.
    Done(usize),
    /// `run <sha256 hex> <configurations>`, the run a checkpoint belongs to.
    Run { digest: String, configs: usize },
    Cell {
        ec: EcConfig,
        error: LogicalError,
        k: usize,
        count: BigUint,
    },
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

fn syndrome(input: &str) -> IResult<&str, Syndrome> {
    map_res(digit1, str::parse)(input)
}

/// Arbitrary-precision decimal count.
pub fn count(input: &str) -> IResult<&str, BigUint> {
    map_opt(digit1, |digits: &str| BigUint::parse_bytes(digits.as_bytes(), 10))(input)
}

fn weight_header(input: &str) -> IResult<&str, usize> {
    preceded(tuple((tag("weight"), space1)), number)(input)
}

pub fn counts_line(input: &str) -> IResult<&str, CountsLine> {
    alt((
        map(weight_header, CountsLine::Weight),
        map(tuple((syndrome, preceded(space1, count))), |(s, c)| {
            CountsLine::Entry(s, c)
        }),
    ))(input)
}

pub fn outcomes_line(input: &str) -> IResult<&str, OutcomesLine> {
    alt((
        map(weight_header, OutcomesLine::Weight),
        map(
            tuple((syndrome, preceded(space1, count), preceded(space1, count))),
            |(s, zero, one)| OutcomesLine::Entry(s, [zero, one]),
        ),
    ))(input)
}

/// `k_lec_a k_lec_b k_cnot k_tec_a k_tec_b`
pub fn config_line(input: &str) -> IResult<&str, Configuration> {
    map(
        tuple((
            number,
            preceded(space1, number),
            preceded(space1, number),
            preceded(space1, number),
            preceded(space1, number),
        )),
        |(lec_a, lec_b, cnot, tec_a, tec_b)| Configuration::new(lec_a, lec_b, cnot, tec_a, tec_b),
    )(input)
}

fn ec_config(input: &str) -> IResult<&str, EcConfig> {
    map_opt(number, |i| (i < NUM_EC).then(|| EcConfig::from_index(i)))(input)
}

fn logical_error(input: &str) -> IResult<&str, LogicalError> {
    alt((
        value(LogicalError::IX, tag("IX")),
        value(LogicalError::XI, tag("XI")),
        value(LogicalError::XX, tag("XX")),
    ))(input)
}

pub fn histogram_line(input: &str) -> IResult<&str, HistogramLine> {
    alt((
        map(preceded(tuple((tag("k_max"), space1)), number), HistogramLine::KMax),
        map(preceded(tuple((tag("done"), space1)), number), HistogramLine::Done),
        map(
            preceded(
                tuple((tag("run"), space1)),
                tuple((
                    take_while_m_n(64, 64, |c: char| c.is_ascii_hexdigit()),
                    preceded(space1, number),
                )),
            ),
            |(digest, configs): (&str, usize)| HistogramLine::Run {
                digest: digest.to_ascii_lowercase(),
                configs,
            },
        ),
        map(
            tuple((
                ec_config,
                preceded(space1, logical_error),
                preceded(space1, number),
                preceded(space1, count),
            )),
            |(ec, error, k, count)| HistogramLine::Cell {
                ec,
                error,
                k,
                count,
            },
        ),
    ))(input)
}

/// Parses every content line of `source` with `line_parser`.
///
/// Returns the parsed items paired with their 1-based line numbers.
///
/// # Errors
///
/// Fails on the first line that does not parse or has trailing input.
pub fn parse_document<T, F>(source: &str, mut line_parser: F) -> Result<Vec<(usize, T)>>
where
    F: FnMut(&str) -> IResult<&str, T>,
{
    let mut items = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        match line_parser(line) {
            Ok(("", item)) => items.push((line_no, item)),
            Ok((rest, _)) => bail!("line {}: unexpected trailing input `{}`", line_no, rest),
            Err(e) => bail!("line {}: cannot parse `{}`: {}", line_no, line, e),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines() {
        assert_eq!(counts_line("weight 3"), Ok(("", CountsLine::Weight(3))));
        assert_eq!(
            counts_line("4095 123456789012345678901234567890"),
            Ok((
                "",
                CountsLine::Entry(
                    4095,
                    BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap()
                )
            ))
        );
        assert!(counts_line("weight").is_err());
    }

    #[test]
    fn histogram_lines() {
        assert_eq!(histogram_line("k_max 9"), Ok(("", HistogramLine::KMax(9))));
        assert_eq!(histogram_line("done 120"), Ok(("", HistogramLine::Done(120))));
        assert_eq!(
            histogram_line("2 XI 5 17"),
            Ok((
                "",
                HistogramLine::Cell {
                    ec: EcConfig::from_index(2),
                    error: LogicalError::XI,
                    k: 5,
                    count: BigUint::from(17u32),
                }
            ))
        );
        let digest = "0f".repeat(32);
        assert_eq!(
            histogram_line(&format!("run {} 30", digest.to_uppercase())),
            Ok((
                "",
                HistogramLine::Run {
                    digest: digest.clone(),
                    configs: 30
                }
            ))
        );
        assert!(histogram_line(&format!("run {} 30", &digest[1..])).is_err());
        assert!(histogram_line("4 XI 5 17").is_err());
        assert!(histogram_line("1 II 5 17").is_err());
    }

    #[test]
    fn document_skips_comments_and_reports_line_numbers() {
        let source = "# header\n\n1 2 3 4 5  # trailing\n   \n0 0 0 0 0\n";
        let configs = parse_document(source, config_line).unwrap();
        assert_eq!(
            configs,
            vec![
                (3, Configuration::new(1, 2, 3, 4, 5)),
                (5, Configuration::default())
            ]
        );

        let err = parse_document("0 0 0 0 0\n1 2 3\n", config_line).unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{}", err);
        let err = parse_document("1 2 3 4 5 6\n", config_line).unwrap_err();
        assert!(err.to_string().contains("trailing input"), "{}", err);
    }
}
