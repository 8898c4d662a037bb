//! Recursive-descent reader tolerating a truncated tail.

use serde_json::{Map, Number, Value};

/// Parse `input` as JSON, tolerating truncation at the end.
///
/// Returns the best currently-extractable value under the longest-valid-prefix
/// rule described in the [module docs](super), or `None` when nothing is
/// extractable yet (empty input, a bare scalar prefix such as `tru`, or input
/// that is malformed rather than truncated). Trailing text after a complete
/// top-level value is ignored.
pub fn parse_partial(input: &str) -> Option<Value> {
    let mut reader = Reader { input, pos: 0 };
    match reader.value() {
        Ok(Outcome::Complete(value)) => Some(value),
        Ok(Outcome::Truncated(value)) => value,
        Err(Malformed) => None,
    }
}

/// Result of reading one value.
enum Outcome {
    /// The value was fully terminated in the input
    Complete(Value),
    /// The input ended mid-value. `Some` carries the salvageable part;
    /// `None` means the partial value must be dropped (numbers, keyword
    /// literals, bare prefixes).
    Truncated(Option<Value>),
}

/// The input is invalid JSON for a reason other than truncation.
struct Malformed;

/// Result of reading one string literal.
enum StrOutcome {
    Complete(String),
    /// Closing quote never arrived; carries the content decoded so far
    Truncated(String),
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.bump();
        }
    }

    fn value(&mut self) -> Result<Outcome, Malformed> {
        self.skip_ws();
        match self.peek() {
            None => Ok(Outcome::Truncated(None)),
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'"') => match self.string()? {
                StrOutcome::Complete(s) => Ok(Outcome::Complete(Value::String(s))),
                StrOutcome::Truncated(s) => Ok(Outcome::Truncated(Some(Value::String(s)))),
            },
            Some(b't') => self.literal("true", Value::Bool(true)),
            Some(b'f') => self.literal("false", Value::Bool(false)),
            Some(b'n') => self.literal("null", Value::Null),
            Some(c) if c == b'-' || c.is_ascii_digit() => self.number(),
            Some(_) => Err(Malformed),
        }
    }

    fn object(&mut self) -> Result<Outcome, Malformed> {
        self.bump(); // '{'
        let mut map = Map::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Ok(Outcome::Truncated(Some(Value::Object(map)))),
                Some(b'}') => {
                    self.bump();
                    return Ok(Outcome::Complete(Value::Object(map)));
                }
                Some(b'"') => {}
                Some(_) => return Err(Malformed),
            }

            let key = match self.string()? {
                StrOutcome::Complete(key) => key,
                // A partial key identifies nothing yet; drop it.
                StrOutcome::Truncated(_) => {
                    return Ok(Outcome::Truncated(Some(Value::Object(map))))
                }
            };

            self.skip_ws();
            match self.peek() {
                None => return Ok(Outcome::Truncated(Some(Value::Object(map)))),
                Some(b':') => self.bump(),
                Some(_) => return Err(Malformed),
            }

            match self.value()? {
                Outcome::Complete(value) => {
                    map.insert(key, value);
                }
                Outcome::Truncated(Some(value)) => {
                    map.insert(key, value);
                    return Ok(Outcome::Truncated(Some(Value::Object(map))));
                }
                Outcome::Truncated(None) => {
                    return Ok(Outcome::Truncated(Some(Value::Object(map))))
                }
            }

            self.skip_ws();
            match self.peek() {
                None => return Ok(Outcome::Truncated(Some(Value::Object(map)))),
                Some(b',') => self.bump(),
                Some(b'}') => {
                    self.bump();
                    return Ok(Outcome::Complete(Value::Object(map)));
                }
                Some(_) => return Err(Malformed),
            }
        }
    }

    fn array(&mut self) -> Result<Outcome, Malformed> {
        self.bump(); // '['
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Ok(Outcome::Truncated(Some(Value::Array(items)))),
                Some(b']') => {
                    self.bump();
                    return Ok(Outcome::Complete(Value::Array(items)));
                }
                Some(_) => {}
            }

            match self.value()? {
                Outcome::Complete(value) => items.push(value),
                Outcome::Truncated(Some(value)) => {
                    items.push(value);
                    return Ok(Outcome::Truncated(Some(Value::Array(items))));
                }
                Outcome::Truncated(None) => {
                    return Ok(Outcome::Truncated(Some(Value::Array(items))))
                }
            }

            self.skip_ws();
            match self.peek() {
                None => return Ok(Outcome::Truncated(Some(Value::Array(items)))),
                Some(b',') => self.bump(),
                Some(b']') => {
                    self.bump();
                    return Ok(Outcome::Complete(Value::Array(items)));
                }
                Some(_) => return Err(Malformed),
            }
        }
    }

    fn string(&mut self) -> Result<StrOutcome, Malformed> {
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Ok(StrOutcome::Truncated(out)),
                Some(b'"') => {
                    self.bump();
                    return Ok(StrOutcome::Complete(out));
                }
                Some(b'\\') => match self.escape()? {
                    Some(ch) => out.push(ch),
                    // Incomplete escape at the truncation point; drop it.
                    None => return Ok(StrOutcome::Truncated(out)),
                },
                Some(_) => match self.input[self.pos..].chars().next() {
                    Some(ch) => {
                        out.push(ch);
                        self.pos += ch.len_utf8();
                    }
                    None => return Ok(StrOutcome::Truncated(out)),
                },
            }
        }
    }

    /// Decode one escape sequence starting at the backslash.
    ///
    /// `Ok(None)` means the sequence is cut off by the end of the input and
    /// may still complete on a later chunk.
    fn escape(&mut self) -> Result<Option<char>, Malformed> {
        let Some(&code) = self.input.as_bytes().get(self.pos + 1) else {
            return Ok(None);
        };
        let simple = match code {
            b'"' => Some('"'),
            b'\\' => Some('\\'),
            b'/' => Some('/'),
            b'b' => Some('\u{0008}'),
            b'f' => Some('\u{000C}'),
            b'n' => Some('\n'),
            b'r' => Some('\r'),
            b't' => Some('\t'),
            b'u' => None,
            _ => return Err(Malformed),
        };
        if let Some(ch) = simple {
            self.pos += 2;
            return Ok(Some(ch));
        }

        // \uXXXX
        let Some(hex) = self.input.get(self.pos + 2..self.pos + 6) else {
            return Ok(None);
        };
        let unit = u32::from_str_radix(hex, 16).map_err(|_| Malformed)?;

        if (0xD800..0xDC00).contains(&unit) {
            // High surrogate: a low surrogate must follow to form a scalar.
            if self.input.len() < self.pos + 12 {
                return Ok(None);
            }
            let pair = &self.input.as_bytes()[self.pos + 6..self.pos + 8];
            let Some(low_hex) = self.input.get(self.pos + 8..self.pos + 12) else {
                return Ok(None);
            };
            if pair != b"\\u" {
                // Lone high surrogate; decode to the replacement character.
                self.pos += 6;
                return Ok(Some('\u{FFFD}'));
            }
            let low = u32::from_str_radix(low_hex, 16).map_err(|_| Malformed)?;
            if !(0xDC00..0xE000).contains(&low) {
                self.pos += 6;
                return Ok(Some('\u{FFFD}'));
            }
            let scalar = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            self.pos += 12;
            return Ok(Some(char::from_u32(scalar).unwrap_or('\u{FFFD}')));
        }

        self.pos += 6;
        Ok(Some(char::from_u32(unit).unwrap_or('\u{FFFD}')))
    }

    fn number(&mut self) -> Result<Outcome, Malformed> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, b'-' | b'+' | b'.' | b'e' | b'E') {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == self.input.len() {
            // The number runs into the truncation point; the next chunk
            // could still append digits, so it cannot be trusted yet.
            return Ok(Outcome::Truncated(None));
        }
        let text = &self.input[start..self.pos];
        match text.parse::<Number>() {
            Ok(number) => Ok(Outcome::Complete(Value::Number(number))),
            Err(_) => Err(Malformed),
        }
    }

    fn literal(&mut self, pat: &str, value: Value) -> Result<Outcome, Malformed> {
        let rest = &self.input[self.pos..];
        if rest.len() >= pat.len() {
            if rest.starts_with(pat) {
                self.pos += pat.len();
                Ok(Outcome::Complete(value))
            } else {
                Err(Malformed)
            }
        } else if pat.starts_with(rest) {
            self.pos = self.input.len();
            Ok(Outcome::Truncated(None))
        } else {
            Err(Malformed)
        }
    }
}
