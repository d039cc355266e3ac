//! Sequencer port addresses.
//!
//! A port is written `CLIENT[:PORT]` (or `CLIENT.PORT`).  `CLIENT` is either
//! a numeric client id (`20`) or a client name (`Midi Through`, or any
//! prefix of it such as `Midi`).  `PORT` defaults to 0.
//!
//! A name that itself contains `.` or `:` can be quoted: `'USB2.0-MIDI':1`
//! or `"USB2.0-MIDI".1`.  Unquoted, the first `.` or `:` always ends the
//! client part, so `USB2.0-MIDI` means client prefix `USB2`, port `0`.
//!
//! The port number is read like C `atoi`: leading digits count, anything
//! after them is ignored and no digits at all means 0.  Only a negative
//! port is an error.
//!
//! Parsing is split in two so the grammar can be tested without a sequencer:
//!
//! 1. [`AddressSpec::parse`] turns the command-line text into a spec.
//! 2. [`AddressSpec::resolve`] looks a named client up in the list of
//!    `(id, name)` pairs the sequencer reports and yields a [`PortAddress`].

use std::fmt;

use thiserror::Error;

/// Errors produced while parsing or resolving a port address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty client in address '{0}'")]
    EmptyClient(String),

    #[error("expected ':' or '.' after quoted client in address '{0}'")]
    TextAfterQuote(String),

    #[error("invalid port number '{port}' in address '{address}'")]
    InvalidPort { address: String, port: String },

    #[error("negative client id {0}")]
    NegativeClient(i32),

    #[error("no sequencer client matches '{0}'")]
    UnknownClient(String),
}

/// How the client half of an address was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientSpec {
    Id(i32),
    Name(String),
}

/// A parsed, not yet resolved, port address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSpec {
    pub client: ClientSpec,
    pub port: i32,
}

/// A resolved numeric `client:port` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortAddress {
    pub client: i32,
    pub port: i32,
}

impl fmt::Display for PortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.client, self.port)
    }
}

impl AddressSpec {
    /// Parses `CLIENT[:PORT]`, `CLIENT[.PORT]` or the quoted forms
    /// `'CLIENT'[:PORT]` / `"CLIENT"[:PORT]`.
    ///
    /// A quote with no closing partner runs to the end of the text.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] if the client part is empty, something other
    /// than a separator follows a closing quote, the port is negative, or a
    /// numeric client id is negative.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let (client, port) = split_address(text)?;

        if client.is_empty() {
            return Err(AddressError::EmptyClient(text.to_owned()));
        }

        let port = match port {
            None => 0,
            Some(p) => i32::try_from(atoi(p))
                .ok()
                .filter(|p| *p >= 0)
                .ok_or_else(|| AddressError::InvalidPort {
                    address: text.to_owned(),
                    port: p.to_owned(),
                })?,
        };

        let client = match client.trim_start().parse::<i32>() {
            Ok(id) if id < 0 => return Err(AddressError::NegativeClient(id)),
            Ok(id) => ClientSpec::Id(id),
            Err(_) => ClientSpec::Name(client.to_owned()),
        };

        Ok(Self { client, port })
    }

    /// Resolves the parsed address against the sequencer's client list.
    ///
    /// A numeric id is taken as is, without checking that it exists (the
    /// subscription step reports a missing client).  A name matches a client
    /// whose name is equal to it; failing that, the first client whose name
    /// starts with it.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnknownClient`] if no client name matches.
    pub fn resolve<'a>(
        &self,
        clients: impl IntoIterator<Item = (i32, &'a str)>,
    ) -> Result<PortAddress, AddressError> {
        let client = match &self.client {
            ClientSpec::Id(id) => *id,
            ClientSpec::Name(name) => {
                let clients: Vec<(i32, &str)> = clients.into_iter().collect();
                clients
                    .iter()
                    .find(|(_, n)| *n == name.as_str())
                    .or_else(|| clients.iter().find(|(_, n)| n.starts_with(name.as_str())))
                    .map(|(id, _)| *id)
                    .ok_or_else(|| AddressError::UnknownClient(name.clone()))?
            }
        };
        Ok(PortAddress {
            client,
            port: self.port,
        })
    }
}

/// Splits `text` into the client part and the text after the separator.
fn split_address(text: &str) -> Result<(&str, Option<&str>), AddressError> {
    let Some(quote @ ('"' | '\'')) = text.chars().next() else {
        return Ok(match text.find(|c: char| c == ':' || c == '.') {
            Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
            None => (text, None),
        });
    };

    let body = &text[1..];
    let Some(close) = body.find(quote) else {
        return Ok((body, None));
    };
    let rest = &body[close + 1..];
    let port = match rest.chars().next() {
        None => None,
        Some(':' | '.') => Some(&rest[1..]),
        Some(_) => return Err(AddressError::TextAfterQuote(text.to_owned())),
    };
    Ok((&body[..close], port))
}

/// C `atoi`: optional leading whitespace and sign, then as many digits as
/// there are.  No digits reads as 0.
fn atoi(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENTS: &[(i32, &str)] = &[
        (0, "System"),
        (14, "Midi Through"),
        (20, "Launchkey Mini MK3"),
        (24, "Launchkey"),
        (28, "USB2.0-MIDI"),
    ];

    fn resolve(text: &str) -> Result<PortAddress, AddressError> {
        AddressSpec::parse(text)?.resolve(CLIENTS.iter().copied())
    }

    #[test]
    fn test_numeric_client_and_port() {
        assert_eq!(resolve("20:0"), Ok(PortAddress { client: 20, port: 0 }));
        assert_eq!(resolve("20:1"), Ok(PortAddress { client: 20, port: 1 }));
    }

    #[test]
    fn test_dot_separator() {
        assert_eq!(resolve("14.2"), Ok(PortAddress { client: 14, port: 2 }));
    }

    #[test]
    fn test_port_defaults_to_zero() {
        assert_eq!(resolve("14"), Ok(PortAddress { client: 14, port: 0 }));
        assert_eq!(resolve("Midi Through"), Ok(PortAddress { client: 14, port: 0 }));
    }

    #[test]
    fn test_numeric_client_is_not_checked_against_list() {
        assert_eq!(resolve("99:3"), Ok(PortAddress { client: 99, port: 3 }));
    }

    #[test]
    fn test_client_name_exact_match() {
        assert_eq!(resolve("Midi Through:0"), Ok(PortAddress { client: 14, port: 0 }));
    }

    #[test]
    fn test_exact_match_beats_earlier_prefix_match() {
        // "Launchkey" is a prefix of client 20's name, but client 24 matches exactly.
        assert_eq!(resolve("Launchkey:1"), Ok(PortAddress { client: 24, port: 1 }));
    }

    #[test]
    fn test_client_name_prefix_match() {
        assert_eq!(resolve("Midi:0"), Ok(PortAddress { client: 14, port: 0 }));
        assert_eq!(resolve("Launchkey Mini"), Ok(PortAddress { client: 20, port: 0 }));
    }

    #[test]
    fn test_unknown_client_name_is_rejected() {
        assert_eq!(
            resolve("Keystation:0"),
            Err(AddressError::UnknownClient("Keystation".into()))
        );
    }

    #[test]
    fn test_empty_client_is_rejected() {
        assert!(matches!(AddressSpec::parse(""), Err(AddressError::EmptyClient(_))));
        assert!(matches!(AddressSpec::parse(":0"), Err(AddressError::EmptyClient(_))));
    }

    #[test]
    fn test_negative_port_is_rejected() {
        assert!(matches!(
            AddressSpec::parse("20:-1"),
            Err(AddressError::InvalidPort { .. })
        ));
        assert!(matches!(
            AddressSpec::parse("'Midi Through':-2"),
            Err(AddressError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_port_is_read_leniently() {
        // Leading digits count; no digits at all reads as 0.
        for (text, port) in [("20:", 0), ("20:x", 0), ("20:3abc", 3), ("20: 7", 7)] {
            assert_eq!(AddressSpec::parse(text).map(|s| s.port), Ok(port), "{text}");
        }
    }

    #[test]
    fn test_negative_client_is_rejected() {
        assert_eq!(AddressSpec::parse("-3:0"), Err(AddressError::NegativeClient(-3)));
    }

    #[test]
    fn test_unquoted_name_with_dot_resolves_by_prefix() {
        // Arrange: the first '.' ends the client part, leaving the prefix "USB2"
        let spec = AddressSpec::parse("USB2.0-MIDI").expect("valid");

        // Act
        let resolved = spec.resolve(CLIENTS.iter().copied());

        // Assert
        assert_eq!(spec.client, ClientSpec::Name("USB2".into()));
        assert_eq!(spec.port, 0);
        assert_eq!(resolved, Ok(PortAddress { client: 28, port: 0 }));
    }

    #[test]
    fn test_single_quoted_name_keeps_dots() {
        assert_eq!(resolve("'USB2.0-MIDI':0"), Ok(PortAddress { client: 28, port: 0 }));
        assert_eq!(resolve("'USB2.0-MIDI'.1"), Ok(PortAddress { client: 28, port: 1 }));
    }

    #[test]
    fn test_double_quoted_name_resolves() {
        assert_eq!(resolve("\"Midi Through\":0"), Ok(PortAddress { client: 14, port: 0 }));
        assert_eq!(resolve("\"Midi Through\""), Ok(PortAddress { client: 14, port: 0 }));
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let spec = AddressSpec::parse("'Midi Through:1").expect("valid");
        assert_eq!(spec.client, ClientSpec::Name("Midi Through:1".into()));
        assert_eq!(spec.port, 0);
    }

    #[test]
    fn test_text_after_closing_quote_is_rejected() {
        assert_eq!(
            AddressSpec::parse("'Midi Through'x"),
            Err(AddressError::TextAfterQuote("'Midi Through'x".into()))
        );
    }

    #[test]
    fn test_empty_quoted_client_is_rejected() {
        assert!(matches!(AddressSpec::parse("'':0"), Err(AddressError::EmptyClient(_))));
    }

    #[test]
    fn test_quoted_number_is_a_client_id() {
        assert_eq!(resolve("\"20\":1"), Ok(PortAddress { client: 20, port: 1 }));
    }

    #[test]
    fn test_leading_whitespace_before_client_id_is_allowed() {
        assert_eq!(resolve(" 20:1"), Ok(PortAddress { client: 20, port: 1 }));
    }

    #[test]
    fn test_port_address_display() {
        assert_eq!(PortAddress { client: 20, port: 0 }.to_string(), "20:0");
    }
}
