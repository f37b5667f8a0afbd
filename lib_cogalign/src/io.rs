use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_while},
    character::complete::satisfy,
    error::ErrorKind,
    multi::many0,
};

use crate::error::{Error, Result};

/// Parses one segment symbol from the start of the input.
///
/// `known_symbols` must be sorted by decreasing length, so that the longest known symbol wins.
/// Combining marks following the symbol are attached to it.
/// Returns the matched known symbol and the full symbol text including combining marks.
pub fn parse_segment_symbol<'input>(
    input: &'input str,
    known_symbols: &[String],
) -> IResult<&'input str, (&'input str, &'input str)> {
    for symbol in known_symbols {
        if let Ok((remaining, base)) =
            tag::<_, _, nom::error::Error<&str>>(symbol.as_str())(input)
        {
            let (remaining, _) =
                take_while::<_, _, nom::error::Error<&str>>(is_combining_mark)(remaining)?;
            let full = &input[..input.len() - remaining.len()];
            return Ok((remaining, (base, full)));
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::Tag)))
}

/// Splits a word form into segment symbols, ignoring whitespace between them.
pub fn parse_segment_symbols<'input>(
    mut input: &'input str,
    known_symbols: &[String],
) -> Result<Vec<(&'input str, &'input str)>> {
    let mut result = Vec::new();

    loop {
        input = skip_any_whitespace(input).map_err(translate_nom_error)?;
        if input.is_empty() {
            return Ok(result);
        }

        let (remaining, symbol) =
            parse_segment_symbol(input, known_symbols).map_err(translate_nom_error)?;
        result.push(symbol);
        input = remaining;
    }
}

pub fn skip_any_whitespace(
    input: &str,
) -> std::result::Result<&str, nom::Err<nom::error::Error<&str>>> {
    many0(satisfy(char::is_whitespace))
        .parse(input)
        .map(|(input, _)| input)
}

/// True for characters of the Unicode combining diacritical mark blocks.
pub fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// The number of terminal columns a symbol occupies, not counting combining marks.
pub fn display_width(symbol: &str) -> usize {
    symbol.chars().filter(|c| !is_combining_mark(*c)).count()
}

pub fn translate_nom_error(error: nom::Err<nom::error::Error<&str>>) -> Error {
    match error {
        nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
        nom::Err::Error(error) | nom::Err::Failure(error) => Error::Parser {
            input: error.input.to_string(),
            kind: error.code,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{display_width, parse_segment_symbols};

    fn known(symbols: &[&str]) -> Vec<String> {
        let mut symbols: Vec<_> = symbols.iter().map(|symbol| symbol.to_string()).collect();
        symbols.sort_by_key(|symbol| std::cmp::Reverse(symbol.len()));
        symbols
    }

    #[test]
    fn longest_symbol_wins() {
        let known = known(&["t", "s", "ts", "a"]);
        let symbols = parse_segment_symbols("tsat", &known).unwrap();
        assert_eq!(symbols, vec![("ts", "ts"), ("a", "a"), ("t", "t")]);
    }

    #[test]
    fn combining_marks_stay_attached() {
        let known = known(&["a", "n"]);
        let symbols = parse_segment_symbols("a\u{0303}n", &known).unwrap();
        assert_eq!(symbols, vec![("a", "a\u{0303}"), ("n", "n")]);
        assert_eq!(display_width("a\u{0303}"), 1);
    }

    #[test]
    fn whitespace_is_skipped() {
        let known = known(&["a", "b"]);
        let symbols = parse_segment_symbols(" a b\n", &known).unwrap();
        assert_eq!(symbols, vec![("a", "a"), ("b", "b")]);
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let known = known(&["a"]);
        assert!(parse_segment_symbols("ax", &known).is_err());
    }
}
