use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::Error;

/// Pass/fail marker carried in an artifact's file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
  Success,
  Failure,
}

impl Verdict {
  pub fn suffix(self) -> &'static str {
    match self {
      Verdict::Success => "SUCCESS",
      Verdict::Failure => "FAILURE",
    }
  }

  pub fn opposite(self) -> Self {
    match self {
      Verdict::Success => Verdict::Failure,
      Verdict::Failure => Verdict::Success,
    }
  }
}

/// Artifact keys for one component's run on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
  date: NaiveDate,
  component: String,
}

impl ArtifactLayout {
  pub fn new(date: NaiveDate, component: impl Into<String>) -> Self {
    Self {
      date,
      component: component.into(),
    }
  }

  /// `<YYYY-MM-DD>/<component>`
  pub fn dir(&self) -> String {
    format!("{}/{}", self.date.format("%Y-%m-%d"), self.component)
  }

  /// `<YYYY-MM-DD>/<component>/<case_id>_<SUFFIX>.json`
  pub fn case_key(&self, case_id: &str, verdict: Verdict) -> String {
    format!("{}/{}", self.dir(), Self::case_file_name(case_id, verdict))
  }

  fn case_file_name(case_id: &str, verdict: Verdict) -> String {
    format!("{}_{}.json", case_id, verdict.suffix())
  }

  pub fn summary_key(&self) -> String {
    format!("{}/summary.json", self.dir())
  }
}

/// Encode a value as pretty-printed JSON with 4-space indentation and a
/// trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, Error> {
  let mut buf = Vec::new();
  let formatter = PrettyFormatter::with_indent(b"    ");
  let mut serializer = Serializer::with_formatter(&mut buf, formatter);
  value.serialize(&mut serializer)?;
  buf.push(b'\n');
  Ok(Bytes::from(buf))
}
