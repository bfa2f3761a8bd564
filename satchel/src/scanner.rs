//! A streaming cursor over the input. The scanner reads byte by byte and never buffers the whole
//! source, so arbitrarily large instances can be parsed in constant memory. A single byte of
//! putback is supported; both grammars rely on it to stop numeric reads exactly at the first
//! non-digit.

use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;

use num_bigint::BigInt;

use crate::error::ParseError;

/// Reads data of various types from an input stream, with one byte of lookahead.
#[derive(Debug)]
pub struct Scanner<Source> {
    source: BufReader<Source>,
    lookahead: Option<u8>,
}

impl<Source: Read> Scanner<Source> {
    pub fn new(source: Source) -> Scanner<Source> {
        Scanner {
            source: BufReader::new(source),
            lookahead: None,
        }
    }

    /// Look at the next non-whitespace byte without consuming it, or `None` if the input ends
    /// first. The byte stays available for the next [`Scanner::peek`] or [`Scanner::consume`].
    pub fn peek(&mut self) -> Result<Option<u8>, ParseError> {
        loop {
            let Some(byte) = self.consume()? else {
                return Ok(None);
            };

            if !byte.is_ascii_whitespace() {
                self.put_back(byte);
                return Ok(Some(byte));
            }
        }
    }

    /// Read the next byte, starting with the putback slot.
    pub fn consume(&mut self) -> Result<Option<u8>, ParseError> {
        if let Some(byte) = self.lookahead.take() {
            return Ok(Some(byte));
        }

        let mut buffer = [0; 1];
        loop {
            match self.source.read(&mut buffer) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buffer[0])),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Restore a single byte so that the next read sees it again.
    pub fn put_back(&mut self, byte: u8) {
        debug_assert!(
            self.lookahead.is_none(),
            "the scanner holds at most one byte of lookahead"
        );
        self.lookahead = Some(byte);
    }

    /// Read the next integer from the input. Initial bytes that cannot start a number are
    /// skipped. Fails without truncating if the value does not fit in an `i64`.
    pub fn read_integer(&mut self) -> Result<i64, ParseError> {
        let value = self.read_big_integer()?;
        i64::try_from(&value).map_err(|_| ParseError::NumberTooLarge(value))
    }

    /// Read the next arbitrary-precision integer from the input. Initial bytes that cannot start
    /// a number are skipped; the first non-digit after the number is put back.
    pub fn read_big_integer(&mut self) -> Result<BigInt, ParseError> {
        // Move to the first byte that can start a number.
        let mut byte = loop {
            match self.consume()? {
                None => return Err(ParseError::MalformedNumber),
                Some(byte) if byte.is_ascii_digit() || byte == b'+' || byte == b'-' => break byte,
                Some(_) => {}
            }
        };

        let negative = byte == b'-';
        if byte == b'-' || byte == b'+' {
            byte = self.consume()?.ok_or(ParseError::MalformedNumber)?;
        }

        // At least one digit must be present after the optional sign.
        if !byte.is_ascii_digit() {
            return Err(ParseError::MalformedNumber);
        }

        let mut value = BigInt::from(0);
        loop {
            value = value * 10 + u32::from(byte - b'0');

            match self.consume()? {
                Some(next) if next.is_ascii_digit() => byte = next,
                Some(next) => {
                    self.put_back(next);
                    break;
                }
                None => break,
            }
        }

        Ok(if negative { -value } else { value })
    }

    /// Discard all bytes up to and including the next end-of-line.
    pub fn skip_line(&mut self) -> Result<(), ParseError> {
        while let Some(byte) = self.consume()? {
            if byte == b'\n' {
                break;
            }
        }

        Ok(())
    }

    /// Whether any significant byte remains in the input.
    pub fn at_end(&mut self) -> Result<bool, ParseError> {
        Ok(self.peek()?.is_none())
    }

    /// Surrender the remaining input, putback byte included, as a [`BufRead`]. Used to hand the
    /// stream over to the external tokenizer of the constraint-network format.
    pub fn into_stream(self) -> impl BufRead {
        let Scanner { source, lookahead } = self;
        let pending = lookahead.map(|byte| vec![byte]).unwrap_or_default();

        Cursor::new(pending).chain(source)
    }
}
