//! Free-text timestamp parsing.
//!
//! Accepts the loose phrasings people type into a form field
//! ("5:30 AM on April 30, 2008", "tomorrow noon", "2008-04-30 17:30") and
//! resolves them against the current instant. Unknown words are skipped, so
//! only input that carries no date or time element at all is rejected.
//!
//! Components missing from the input are filled the usual way: leading
//! components (year, month, day) come from the current date, trailing ones
//! start at their minimum, and a missing time of day means midnight.
//!
//! RFC 3339 and RFC 2822 strings are handed to chrono first. Offsets are not
//! converted: the wall-clock time as written is kept.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::clock::Clock;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Why a piece of text could not be read as a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no date or time information found")]
    NoTimeInformation,

    #[error("{0} is out of range")]
    OutOfRange(String),
}

/// Parse `input` relative to the instant reported by `clock`.
pub fn parse_timestamp(input: &str, clock: &dyn Clock) -> Result<NaiveDateTime, ParseError> {
    parse_relative_to(input, clock.now())
}

/// Parse `input`, filling missing components from `now`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chronoform::parse::parse_relative_to;
///
/// let now = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let parsed = parse_relative_to("5:30 AM on April 30, 2008", now).unwrap();
/// assert_eq!(parsed.to_string(), "2008-04-30 05:30:00");
/// ```
pub fn parse_relative_to(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime, ParseError> {
    if let Some(parsed) = parse_structured(input.trim()) {
        return Ok(parsed);
    }
    let tokens = tokenize(input);
    Parts::collect(&tokens)?.resolve(now)
}

fn parse_structured(input: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(input)
        .or_else(|_| DateTime::parse_from_rfc2822(input))
        .ok()
        .map(|parsed| parsed.naive_local())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Number(String),
    Punct(char),
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                digits.push(d);
                chars.next();
            }
            tokens.push(Token::Number(digits));
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&w) = chars.peek().filter(|w| w.is_alphabetic()) {
                word.extend(w.to_lowercase());
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else {
            if !c.is_whitespace() {
                tokens.push(Token::Punct(c));
            }
            chars.next();
        }
    }

    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridian {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy)]
struct ClockTime {
    hour: u32,
    minute: u32,
    second: u32,
    meridian: Option<Meridian>,
}

impl ClockTime {
    fn at(hour: u32, minute: u32) -> Self {
        Self {
            hour,
            minute,
            second: 0,
            meridian: None,
        }
    }

    fn to_naive(self) -> Result<NaiveTime, ParseError> {
        let hour = match self.meridian {
            None => self.hour,
            Some(_) if !(1..=12).contains(&self.hour) => return Err(self.out_of_range()),
            Some(Meridian::Am) => self.hour % 12,
            Some(Meridian::Pm) => self.hour % 12 + 12,
        };
        NaiveTime::from_hms_opt(hour, self.minute, self.second).ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(&self) -> ParseError {
        let suffix = match self.meridian {
            Some(Meridian::Am) => " am",
            Some(Meridian::Pm) => " pm",
            None => "",
        };
        ParseError::OutOfRange(format!(
            "time {}:{:02}:{:02}{}",
            self.hour, self.minute, self.second, suffix
        ))
    }
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Now,
    Days(i64),
}

/// Date and time elements found in the input, before defaults are applied.
#[derive(Debug, Default)]
struct Parts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    time: Option<ClockTime>,
    anchor: Option<Anchor>,
}

impl Parts {
    fn collect(tokens: &[Token]) -> Result<Self, ParseError> {
        let mut parts = Parts::default();
        let mut i = 0;

        while i < tokens.len() {
            i += match &tokens[i] {
                Token::Number(digits) => parts.number(tokens, i, digits)?,
                Token::Word(word) => parts.word(word),
                Token::Punct(_) => 1,
            };
        }

        if parts.is_empty() {
            Err(ParseError::NoTimeInformation)
        } else {
            Ok(parts)
        }
    }

    fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.time.is_none()
            && self.anchor.is_none()
    }

    /// Consume a number starting at `i`, returning how many tokens were used.
    fn number(&mut self, tokens: &[Token], i: usize, digits: &str) -> Result<usize, ParseError> {
        // h:mm:ss or h:mm, optionally followed by am/pm
        for count in [3, 2] {
            if let Some(fields) = separated(tokens, i, ':', count) {
                let consumed = count * 2 - 1;
                let (meridian, extra) = meridian_at(tokens, i + consumed);
                // A second clock time is a zone offset or noise.
                if self.time.is_none() {
                    self.time = Some(ClockTime {
                        hour: value(fields[0])?,
                        minute: value(fields[1])?,
                        second: fields.get(2).map(|s| value(s)).transpose()?.unwrap_or(0),
                        meridian,
                    });
                }
                return Ok(consumed + extra);
            }
        }

        // yyyy-mm-dd or dd-mm-yyyy
        if let Some(fields) = separated(tokens, i, '-', 3) {
            if fields[0].len() == 4 {
                self.set_date(year(fields[0])?, value(fields[1])?, value(fields[2])?);
                return Ok(5);
            }
            if fields[2].len() == 4 {
                self.set_date(year(fields[2])?, value(fields[1])?, value(fields[0])?);
                return Ok(5);
            }
        }

        // m/d/yyyy, m/d/yy or m/d
        if let Some(fields) = separated(tokens, i, '/', 3) {
            self.set_date(year(fields[2])?, value(fields[0])?, value(fields[1])?);
            return Ok(5);
        }
        if let Some(fields) = separated(tokens, i, '/', 2) {
            self.month = Some(value(fields[0])?);
            self.day = Some(value(fields[1])?);
            return Ok(3);
        }

        let (meridian, extra) = meridian_at(tokens, i + 1);
        if let Some(meridian) = meridian {
            if self.time.is_none() {
                self.time = Some(ClockTime {
                    meridian: Some(meridian),
                    ..ClockTime::at(value(digits)?, 0)
                });
            }
            return Ok(1 + extra);
        }

        match digits.len() {
            // +0000 / -0500 after a clock time is a zone offset
            4 if self.time.is_some() && is_sign(tokens, i.wrapping_sub(1)) => {}
            4 if self.year.is_none() => self.year = Some(year(digits)?),
            1 | 2 => {
                let ordinal = matches!(tokens.get(i + 1), Some(Token::Word(w)) if matches!(w.as_str(), "st" | "nd" | "rd" | "th"));
                if self.day.is_none() {
                    self.day = Some(value(digits)?);
                } else if self.year.is_none() && !ordinal {
                    self.year = Some(year(digits)?);
                }
                return Ok(if ordinal { 2 } else { 1 });
            }
            _ => {}
        }

        Ok(1)
    }

    fn word(&mut self, word: &str) -> usize {
        match word {
            "now" => self.anchor = Some(Anchor::Now),
            "today" => self.anchor = Some(Anchor::Days(0)),
            "tomorrow" => self.anchor = Some(Anchor::Days(1)),
            "yesterday" => self.anchor = Some(Anchor::Days(-1)),
            "noon" => {
                self.time.get_or_insert(ClockTime::at(12, 0));
            }
            "midnight" => {
                self.time.get_or_insert(ClockTime::at(0, 0));
            }
            _ => {
                if let Some(month) = month_number(word) {
                    self.month = Some(month);
                }
            }
        }
        1
    }

    fn set_date(&mut self, year: i32, month: u32, day: u32) {
        self.year = Some(year);
        self.month = Some(month);
        self.day = Some(day);
    }

    fn resolve(self, now: NaiveDateTime) -> Result<NaiveDateTime, ParseError> {
        let base = match self.anchor {
            Some(Anchor::Days(days)) => now.date() + Duration::days(days),
            _ => now.date(),
        };
        let has_date = self.year.is_some() || self.month.is_some() || self.day.is_some();

        let year = self.year.unwrap_or(base.year());
        let month = match self.month {
            Some(month) => month,
            None if self.year.is_some() => 1,
            None => base.month(),
        };
        let day = match self.day {
            Some(day) => day,
            None if self.month.is_some() || self.year.is_some() => 1,
            None => base.day(),
        };
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ParseError::OutOfRange(format!("date {year}-{month:02}-{day:02}")))?;

        let time = match (self.time, self.anchor) {
            (Some(time), _) => time.to_naive()?,
            (None, Some(Anchor::Now)) if !has_date => return Ok(now),
            (None, _) => NaiveTime::MIN,
        };

        Ok(date.and_time(time))
    }
}

fn is_sign(tokens: &[Token], at: usize) -> bool {
    matches!(tokens.get(at), Some(Token::Punct('+' | '-')))
}

/// Numbers at `start`, `start + 2`, ... separated by `sep`.
fn separated(tokens: &[Token], start: usize, sep: char, count: usize) -> Option<Vec<&str>> {
    let mut fields = Vec::with_capacity(count);
    for k in 0..count {
        if k > 0 && tokens.get(start + 2 * k - 1) != Some(&Token::Punct(sep)) {
            return None;
        }
        match tokens.get(start + 2 * k) {
            Some(Token::Number(digits)) => fields.push(digits.as_str()),
            _ => return None,
        }
    }
    Some(fields)
}

fn meridian_at(tokens: &[Token], i: usize) -> (Option<Meridian>, usize) {
    let meridian = |word: &str| match word {
        "a" | "am" => Some(Meridian::Am),
        "p" | "pm" => Some(Meridian::Pm),
        _ => None,
    };

    match tokens.get(i) {
        Some(Token::Word(w)) if w == "am" || w == "pm" => (meridian(w), 1),
        // a.m. / p.m.
        Some(Token::Word(w)) if w == "a" || w == "p" => {
            let dotted = tokens.get(i + 1) == Some(&Token::Punct('.'))
                && tokens.get(i + 2) == Some(&Token::Word("m".to_string()));
            if !dotted {
                return (None, 0);
            }
            let trailing_dot = tokens.get(i + 3) == Some(&Token::Punct('.'));
            (meridian(w), if trailing_dot { 4 } else { 3 })
        }
        _ => (None, 0),
    }
}

fn month_number(word: &str) -> Option<u32> {
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(word))
        .map(|index| index as u32 + 1)
}

fn value(digits: &str) -> Result<u32, ParseError> {
    digits
        .parse()
        .map_err(|_| ParseError::OutOfRange(format!("number {digits}")))
}

fn year(digits: &str) -> Result<i32, ParseError> {
    let year = value(digits)? as i32;
    Ok(match digits.len() {
        1 | 2 if year < 69 => 2000 + year,
        1 | 2 => 1900 + year,
        _ => year,
    })
}
