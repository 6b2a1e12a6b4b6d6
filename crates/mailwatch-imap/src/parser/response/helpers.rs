//! Grammar pieces shared by the response and FETCH parsers.

use crate::parser::lexer::{Lexer, Token};
use crate::types::{Capability, ResponseCode};
use crate::{Error, Result};

/// Builds a parse error at the lexer's current position.
pub fn parse_error(lexer: &Lexer<'_>, message: impl Into<String>) -> Error {
    Error::Parse {
        position: lexer.position(),
        message: message.into(),
    }
}

/// Parses a bracketed response code such as `[UIDVALIDITY 42]`.
///
/// Codes without a variant become [`ResponseCode::Unknown`] and their
/// arguments are skipped up to the closing bracket.
pub fn parse_response_code(lexer: &mut Lexer<'_>) -> Result<ResponseCode> {
    lexer.expect(Token::LBracket)?;

    let name = lexer.read_atom_string()?;
    let code = match name.to_ascii_uppercase().as_str() {
        "ALERT" => ResponseCode::Alert,
        "READ-ONLY" => ResponseCode::ReadOnly,
        "READ-WRITE" => ResponseCode::ReadWrite,
        "TRYCREATE" => ResponseCode::TryCreate,
        "UIDNEXT" => ResponseCode::UidNext(number_argument(lexer)?),
        "UIDVALIDITY" => ResponseCode::UidValidity(number_argument(lexer)?),
        "CAPABILITY" => ResponseCode::Capability(parse_capability_data(lexer)?),
        _ => ResponseCode::Unknown(name.to_string()),
    };

    while lexer.peek().is_some_and(|byte| byte != b']') {
        lexer.skip(1);
    }
    lexer.expect(Token::RBracket)?;
    Ok(code)
}

fn number_argument(lexer: &mut Lexer<'_>) -> Result<u32> {
    lexer.expect_space()?;
    lexer.read_number()
}

/// Parses the space-separated capability names following `CAPABILITY`.
pub fn parse_capability_data(lexer: &mut Lexer<'_>) -> Result<Vec<Capability>> {
    let mut capabilities = Vec::new();
    while lexer.peek() == Some(b' ') {
        lexer.skip(1);
        if let Token::Atom(name) = lexer.next_token()? {
            capabilities.push(Capability::parse(name));
        }
    }
    Ok(capabilities)
}

/// Parses a parenthesized flag list, including the `\*` wildcard.
pub fn parse_flag_list(lexer: &mut Lexer<'_>) -> Result<Vec<String>> {
    lexer.expect(Token::LParen)?;

    let mut flags: Vec<String> = Vec::new();
    loop {
        match lexer.next_token()? {
            Token::RParen => return Ok(flags),
            Token::Space => {}
            Token::Atom(flag) => flags.push(flag.to_string()),
            // `\*` lexes as the atom `\` then an asterisk
            Token::Asterisk => match flags.last_mut() {
                Some(last) if last == "\\" => last.push('*'),
                _ => return Err(parse_error(lexer, "stray * in flag list")),
            },
            other => {
                return Err(parse_error(
                    lexer,
                    format!("unexpected {other:?} in flag list"),
                ));
            }
        }
    }
}

/// Consumes the rest of the line and returns it without the CRLF.
pub fn rest_of_line(lexer: &mut Lexer<'_>) -> String {
    let rest = lexer.remaining();
    let end = rest
        .windows(2)
        .position(|pair| pair == b"\r\n")
        .unwrap_or(rest.len());
    lexer.skip(end + 2);
    String::from_utf8_lossy(&rest[..end]).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_code_is_skipped_to_bracket() {
        let mut lexer = Lexer::new(b"[PERMANENTFLAGS (\\Seen \\*)] Limited\r\n");
        let code = parse_response_code(&mut lexer).unwrap();
        assert_eq!(code, ResponseCode::Unknown("PERMANENTFLAGS".to_string()));
        assert_eq!(rest_of_line(&mut lexer), " Limited");
        assert!(lexer.is_eof());
    }

    #[test]
    fn test_numeric_codes() {
        let mut lexer = Lexer::new(b"[UIDNEXT 4392]");
        assert_eq!(
            parse_response_code(&mut lexer).unwrap(),
            ResponseCode::UidNext(4392)
        );
        assert!(parse_response_code(&mut Lexer::new(b"[UIDNEXT]")).is_err());
    }

    #[test]
    fn test_unterminated_code_fails() {
        assert!(parse_response_code(&mut Lexer::new(b"[ALERT oops")).is_err());
    }

    #[test]
    fn test_flag_lists() {
        let mut lexer = Lexer::new(b"(\\Seen \\Answered $Junk)");
        assert_eq!(
            parse_flag_list(&mut lexer).unwrap(),
            vec!["\\Seen", "\\Answered", "$Junk"]
        );

        let mut lexer = Lexer::new(b"(\\Deleted \\*)");
        assert_eq!(parse_flag_list(&mut lexer).unwrap(), vec!["\\Deleted", "\\*"]);

        assert!(parse_flag_list(&mut Lexer::new(b"(* \\Seen)")).is_err());
    }

    #[test]
    fn test_rest_of_line_without_crlf() {
        let mut lexer = Lexer::new(b"trailing text");
        assert_eq!(rest_of_line(&mut lexer), "trailing text");
        assert!(lexer.is_eof());
    }
}
