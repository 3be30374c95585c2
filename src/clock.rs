use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::model::Timestamp;

/// Zone used to render "now".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Zone {
  Local,
  Utc,
  Named(chrono_tz::Tz),
}

impl FromStr for Zone {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.eq_ignore_ascii_case("local") {
      return Ok(Zone::Local);
    }
    if s.eq_ignore_ascii_case("utc") {
      return Ok(Zone::Utc);
    }
    s.parse::<chrono_tz::Tz>()
      .map(Zone::Named)
      .map_err(|_| format!("unknown time zone {s:?} (use local, utc or an IANA name)"))
  }
}

/// Source of "now" for presets, defaults and the live author field.
///
/// A frozen clock always returns the same instant, which keeps tests and
/// `--now-override` runs deterministic. With `Zone::Local` a frozen instant
/// keeps its own offset instead of the machine's.
#[derive(Clone, Debug)]
pub struct Clock {
  zone: Zone,
  frozen: Option<DateTime<FixedOffset>>,
}

impl Clock {
  pub fn new(zone: Zone) -> Self {
    Self { zone, frozen: None }
  }

  pub fn frozen(at: DateTime<FixedOffset>, zone: Zone) -> Self {
    Self { zone, frozen: Some(at) }
  }

  pub fn zone(&self) -> Zone {
    self.zone
  }

  pub fn now(&self) -> Timestamp {
    match (self.frozen, self.zone) {
      (Some(at), Zone::Local) => Timestamp::from_datetime(&at),
      (Some(at), zone) => render(at.with_timezone(&Utc), zone),
      (None, zone) => render(Utc::now(), zone),
    }
  }
}

fn render(instant: DateTime<Utc>, zone: Zone) -> Timestamp {
  match zone {
    Zone::Local => Timestamp::from_datetime(&instant.with_timezone(&Local)),
    Zone::Utc => Timestamp::from_datetime(&instant),
    Zone::Named(tz) => Timestamp::from_datetime(&instant.with_timezone(&tz)),
  }
}
