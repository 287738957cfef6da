use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};
use crate::grammar::{decode_blocks, TROPHY_LAYOUT};
use crate::properties::PropertyRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Impossible,
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            "IMPOSSIBLE" => Ok(Difficulty::Impossible),
            _ => Err(Error::malformed(format!("unknown trophy difficulty {s:?}"))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Impossible => "IMPOSSIBLE",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trophy {
    pub id: u64,
    pub title: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub image_url: Url,
    /// When the user achieved it, as reported by the service.
    pub achieved: Option<String>,
}

impl Trophy {
    pub fn is_achieved(&self) -> bool {
        self.achieved.is_some()
    }

    pub fn from_record(record: &PropertyRecord) -> Result<Self> {
        let id = record.get_int("id")?;
        let id = u64::try_from(id)
            .map_err(|_| Error::malformed(format!("negative trophy id {id}")))?;
        let difficulty: Difficulty = record
            .get("difficulty")
            .ok_or_else(|| Error::malformed("trophy without difficulty"))?
            .parse()?;
        let achieved = record
            .get("achieved")
            .map(str::trim)
            .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case("false"))
            .map(str::to_string);

        Ok(Trophy {
            id,
            title: record.get("title").unwrap_or_default().to_string(),
            difficulty,
            description: record.get("description").unwrap_or_default().to_string(),
            image_url: record.get_url("image_url")?,
            achieved,
        })
    }
}

/// Decode a trophy listing. A failed listing yields no trophies.
pub fn parse_trophies(text: &str) -> Result<Vec<Trophy>> {
    let listing = decode_blocks(text, &TROPHY_LAYOUT);
    if !listing.is_success() {
        return Ok(Vec::new());
    }
    listing.records.iter().map(Trophy::from_record).collect()
}
