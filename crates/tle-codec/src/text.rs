//! Two- and three-line text blocks

use crate::encoder::EncodedElementSet;
use crate::{EncodeError, Result};
use serde::Serialize;
use std::str::FromStr;

/// A named element set as it appears in catalog text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TleText {
    pub name: String,
    pub element_set: EncodedElementSet,
}

impl TleText {
    pub fn new(name: impl Into<String>, element_set: EncodedElementSet) -> Self {
        Self {
            name: name.into(),
            element_set,
        }
    }

    /// Parse exactly one block: either `line1, line2` (the name falls back to
    /// the satellite-number columns) or `name, line1, line2`. Blank lines and
    /// surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = content_lines(text).collect();
        match lines.as_slice() {
            [line1, line2] => {
                let set = EncodedElementSet::from_lines(line1, line2)?;
                let name = set.satellite_field().trim().to_string();
                Ok(Self::new(name, set))
            }
            [name, line1, line2] => Ok(Self::new(
                *name,
                EncodedElementSet::from_lines(line1, line2)?,
            )),
            other => Err(EncodeError::MalformedText(format!(
                "expected 2 or 3 lines, got {}",
                other.len()
            ))),
        }
    }

    /// Parse a catalog of consecutive blocks, each with or without a name line
    pub fn parse_many(text: &str) -> Result<Vec<Self>> {
        let lines: Vec<&str> = content_lines(text).collect();
        let mut blocks = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let block = if lines[i].starts_with("1 ") {
                &lines[i..(i + 2).min(lines.len())]
            } else {
                &lines[i..(i + 3).min(lines.len())]
            };
            if block.len() < 2 {
                return Err(EncodeError::MalformedText(format!(
                    "incomplete element set starting at line {}",
                    i + 1
                )));
            }
            blocks.push(Self::parse(&block.join("\n"))?);
            i += block.len();
        }
        Ok(blocks)
    }

    /// `name\r\nline1\r\nline2`
    pub fn render(&self) -> String {
        self.element_set.to_three_line(&self.name)
    }
}

impl FromStr for TleText {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}
