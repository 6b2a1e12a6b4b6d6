//! The parenthesized data of `* n FETCH (...)`.

use crate::Result;
use crate::parser::lexer::{Lexer, Token};

use super::helpers::{parse_error, parse_flag_list};
use super::types::{Address, Envelope, FetchItem};

/// Parses the item list of a FETCH response. Items without a
/// [`FetchItem`] variant are skipped.
pub fn parse_fetch_items(lexer: &mut Lexer<'_>) -> Result<Vec<FetchItem>> {
    lexer.expect(Token::LParen)?;

    let mut items = Vec::new();
    loop {
        let name = match lexer.next_token()? {
            Token::RParen => return Ok(items),
            Token::Space => continue,
            Token::Atom(name) => name,
            other => {
                return Err(parse_error(
                    lexer,
                    format!("unexpected {other:?} in FETCH data"),
                ));
            }
        };
        if let Some(item) = parse_item(lexer, name)? {
            items.push(item);
        }
    }
}

fn parse_item(lexer: &mut Lexer<'_>, name: &str) -> Result<Option<FetchItem>> {
    let item = match name.to_ascii_uppercase().as_str() {
        "ENVELOPE" => {
            lexer.expect_space()?;
            FetchItem::Envelope(Box::new(parse_envelope(lexer)?))
        }
        "INTERNALDATE" => {
            lexer.expect_space()?;
            match lexer.next_token()? {
                Token::QuotedString(date) => FetchItem::InternalDate(date),
                other => {
                    return Err(parse_error(
                        lexer,
                        format!("INTERNALDATE must be a quoted string, found {other:?}"),
                    ));
                }
            }
        }
        "UID" => {
            lexer.expect_space()?;
            FetchItem::Uid(lexer.read_number()?)
        }
        "FLAGS" => {
            lexer.expect_space()?;
            FetchItem::Flags(parse_flag_list(lexer)?)
        }
        _ => {
            skip_value(lexer)?;
            return Ok(None);
        }
    };
    Ok(Some(item))
}

/// Runs `parse`, then consumes the space separating it from the next field.
fn spaced<'a, T>(
    lexer: &mut Lexer<'a>,
    parse: impl FnOnce(&mut Lexer<'a>) -> Result<T>,
) -> Result<T> {
    let value = parse(lexer)?;
    lexer.expect_space()?;
    Ok(value)
}

/// Parses the ten-field envelope structure.
pub fn parse_envelope(lexer: &mut Lexer<'_>) -> Result<Envelope> {
    lexer.expect(Token::LParen)?;
    // Fields are evaluated in the order written.
    let envelope = Envelope {
        date: spaced(lexer, Lexer::read_nstring)?,
        subject: spaced(lexer, Lexer::read_nstring)?,
        from: spaced(lexer, parse_address_list)?,
        sender: spaced(lexer, parse_address_list)?,
        reply_to: spaced(lexer, parse_address_list)?,
        to: spaced(lexer, parse_address_list)?,
        cc: spaced(lexer, parse_address_list)?,
        bcc: spaced(lexer, parse_address_list)?,
        in_reply_to: spaced(lexer, Lexer::read_nstring)?,
        message_id: lexer.read_nstring()?,
    };
    lexer.expect(Token::RParen)?;
    Ok(envelope)
}

/// Parses `NIL` or a parenthesized list of addresses.
pub fn parse_address_list(lexer: &mut Lexer<'_>) -> Result<Vec<Address>> {
    match lexer.next_token()? {
        Token::Nil => return Ok(Vec::new()),
        Token::LParen => {}
        other => {
            return Err(parse_error(
                lexer,
                format!("expected address list, found {other:?}"),
            ));
        }
    }

    let mut addresses = Vec::new();
    loop {
        match lexer.peek() {
            Some(b'(') => addresses.push(parse_address(lexer)?),
            Some(b' ') => lexer.skip(1),
            Some(b')') => {
                lexer.skip(1);
                return Ok(addresses);
            }
            _ => return Err(parse_error(lexer, "unterminated address list")),
        }
    }
}

fn parse_address(lexer: &mut Lexer<'_>) -> Result<Address> {
    lexer.expect(Token::LParen)?;
    let address = Address {
        name: spaced(lexer, Lexer::read_nstring)?,
        adl: spaced(lexer, Lexer::read_nstring)?,
        mailbox: spaced(lexer, Lexer::read_nstring)?,
        host: lexer.read_nstring()?,
    };
    lexer.expect(Token::RParen)?;
    Ok(address)
}

/// Skips the value of an uninterpreted item, along with any `[section]`
/// and `<partial>` suffix on its name.
///
/// Quoted strings and literals are taken as whole tokens so parentheses
/// inside them do not count towards nesting.
fn skip_value(lexer: &mut Lexer<'_>) -> Result<()> {
    for (open, close) in [(b'[', b']'), (b'<', b'>')] {
        if lexer.peek() == Some(open) {
            while lexer.advance().is_some_and(|byte| byte != close) {}
        }
    }
    if lexer.peek() == Some(b' ') {
        lexer.skip(1);
    }

    let mut depth = 0usize;
    while let Some(byte) = lexer.peek() {
        match byte {
            b'(' => {
                depth += 1;
                lexer.skip(1);
            }
            b')' if depth == 0 => break,
            b')' => {
                depth -= 1;
                lexer.skip(1);
                if depth == 0 {
                    break;
                }
            }
            b'"' | b'{' => {
                lexer.next_token()?;
                if depth == 0 {
                    break;
                }
            }
            b' ' if depth == 0 => break,
            _ => lexer.skip(1),
        }
    }
    Ok(())
}
