// credits_checkout/src/models/plan.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Billing cadence of a credits purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
  #[serde(rename = "monthly")]
  Monthly,
  #[serde(rename = "one-time")]
  OneTime,
}

impl Plan {
  pub fn as_str(&self) -> &'static str {
    match self {
      Plan::Monthly => "monthly",
      Plan::OneTime => "one-time",
    }
  }

  pub fn is_recurring(&self) -> bool {
    matches!(self, Plan::Monthly)
  }
}

impl fmt::Display for Plan {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plan '{0}'")]
pub struct UnknownPlan(pub String);

impl FromStr for Plan {
  type Err = UnknownPlan;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "monthly" => Ok(Plan::Monthly),
      "one-time" => Ok(Plan::OneTime),
      other => Err(UnknownPlan(other.to_string())),
    }
  }
}
