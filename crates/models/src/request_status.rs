use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use strum::{AsRefStr, EnumString};

/// Lifecycle status of a plan request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr)]
#[cfg_attr(
    feature = "database",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum),
    sea_orm(rs_type = "i32", db_type = "Integer")
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RequestStatus {
    #[cfg_attr(feature = "database", sea_orm(num_value = 0))]
    Pending,
    #[cfg_attr(feature = "database", sea_orm(num_value = 1))]
    Accepted,
    #[cfg_attr(feature = "database", sea_orm(num_value = 2))]
    Rejected,
    #[cfg_attr(feature = "database", sea_orm(num_value = 3))]
    Cancelled,
}

impl RequestStatus {
    /// Whether the request is still live, i.e. its plan may change
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_ref())
    }
}
