use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Role of a file entry in a task's `files` list.
///
/// The workflow format only defines `"input"` and `"output"`. Anything else is
/// kept as [`FileLink::Other`] so the loader can warn about it instead of
/// rejecting the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLink {
    Input,
    Output,
    Other(String),
}

impl FromStr for FileLink {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "input" => FileLink::Input,
            "output" => FileLink::Output,
            other => FileLink::Other(other.to_string()),
        })
    }
}

impl fmt::Display for FileLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileLink::Input => write!(f, "input"),
            FileLink::Output => write!(f, "output"),
            FileLink::Other(s) => write!(f, "{s}"),
        }
    }
}

impl<'de> Deserialize<'de> for FileLink {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        // Infallible.
        Ok(raw.parse().unwrap_or_else(|never| match never {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_links_parse() {
        assert_eq!("input".parse::<FileLink>().unwrap(), FileLink::Input);
        assert_eq!("output".parse::<FileLink>().unwrap(), FileLink::Output);
    }

    #[test]
    fn unknown_link_is_kept_verbatim() {
        let link: FileLink = serde_json::from_str("\"checkpoint\"").unwrap();
        assert_eq!(link, FileLink::Other("checkpoint".to_string()));
        assert_eq!(link.to_string(), "checkpoint");
    }
}
