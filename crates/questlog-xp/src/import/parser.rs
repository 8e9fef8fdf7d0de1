use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::ImportError;
use crate::xp::RawEvent;

pub(crate) fn parse_csv_events<R: Read>(reader: R) -> Result<Vec<RawEvent>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut events = Vec::new();

    for (index, record) in csv_reader.deserialize::<EventRow>().enumerate() {
        events.push(record?.into_raw(index)?);
    }

    Ok(events)
}

#[derive(Debug, Deserialize)]
struct EventRow {
    date: String,
    kind: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sp: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    assignees: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pr_closes: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    number: Option<String>,
}

impl EventRow {
    fn into_raw(self, index: usize) -> Result<RawEvent, ImportError> {
        let invalid = |column: &'static str, value: String| ImportError::InvalidCell {
            index,
            column,
            value,
        };

        let mut raw = RawEvent::new(self.date, self.kind);
        if let Some(sp) = self.sp {
            // Unparseable numbers become NaN so validation names the row.
            raw.sp = sp.parse().unwrap_or(f64::NAN);
        }
        if let Some(assignees) = self.assignees {
            raw.assignees = assignees
                .parse()
                .map_err(|_| invalid("assignees", assignees.clone()))?;
        }
        if let Some(flag) = self.pr_closes {
            raw.pr_closes = parse_flag(&flag).ok_or_else(|| invalid("pr_closes", flag.clone()))?;
        }
        if let Some(number) = self.number {
            raw.number = Some(
                number
                    .trim_start_matches('#')
                    .parse()
                    .map_err(|_| invalid("number", number.clone()))?,
            );
        }
        raw.title = self.title;
        Ok(raw)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
