//! The datasets this service replicates.

use model::dataset::{
    descriptor::DatasetDescriptor,
    filter::{Filter, FilterValue},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const CONTINUITY_RESOURCE_ID: &str = "4493985c-baea-429c-9df5-3030422c71d7";
pub const COMPENSATION_RESOURCE_ID: &str = "364d945e-a18b-4111-ab1b-73aa0f7b06b1";

pub const CONTINUITY_TABLE: &str = "stg_continuidades";
pub const COMPENSATION_TABLE: &str = "stg_compensacoes";

const INDICATOR_FIELD: &str = "SigIndicador";
const YEAR_FIELD: &str = "AnoIndice";
const AGENT_FIELD: &str = "SigAgente";

const CONTINUITY_INDICATORS: [&str; 2] = ["DEC", "FEC"];
const COMPENSATION_INDICATORS: [&str; 5] = ["PGUCAT", "PGUCBTNU", "PGUCBTU", "PGUCMTNU", "PGUCMTU"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Continuity indicators (DEC/FEC) per consumer set.
    Continuity,
    /// Compensation paid for continuity violations.
    Compensation,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Continuity, DatasetKind::Compensation];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Continuity => "continuity",
            DatasetKind::Compensation => "compensation",
        }
    }

    pub fn descriptor(&self, page_size: usize) -> DatasetDescriptor {
        let (resource_id, table, indicators) = match self {
            DatasetKind::Continuity => (
                CONTINUITY_RESOURCE_ID,
                CONTINUITY_TABLE,
                CONTINUITY_INDICATORS.as_slice(),
            ),
            DatasetKind::Compensation => (
                COMPENSATION_RESOURCE_ID,
                COMPENSATION_TABLE,
                COMPENSATION_INDICATORS.as_slice(),
            ),
        };

        let filter = Filter::new().with(
            INDICATOR_FIELD,
            FilterValue::list(indicators.iter().copied()),
        );
        DatasetDescriptor::new(self.as_str(), resource_id, table, filter)
            .with_page_size(page_size)
            .with_partition_field(YEAR_FIELD)
            .with_trim_field(AGENT_FIELD)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuity" | "continuidades" => Ok(DatasetKind::Continuity),
            "compensation" | "compensacoes" => Ok(DatasetKind::Compensation),
            other => Err(format!("unknown dataset '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::dataset::descriptor::DEFAULT_PAGE_SIZE;

    #[test]
    fn test_continuity_descriptor() {
        let d = DatasetKind::Continuity.descriptor(DEFAULT_PAGE_SIZE);
        assert_eq!(d.resource_id, CONTINUITY_RESOURCE_ID);
        assert_eq!(d.table, "stg_continuidades");
        assert_eq!(d.page_size, 50_000);
        assert_eq!(d.freshness_field, "DatGeracaoConjuntoDados");
        assert_eq!(d.partition_field.as_deref(), Some("AnoIndice"));
        assert_eq!(d.trim_field.as_deref(), Some("SigAgente"));
        assert_eq!(
            d.filter.to_json().unwrap(),
            r#"{"SigIndicador":["DEC","FEC"]}"#
        );
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_compensation_filter_has_own_indicators() {
        let d = DatasetKind::Compensation.descriptor(1_000);
        assert_eq!(d.table, "stg_compensacoes");
        assert_eq!(
            d.filter.get("SigIndicador"),
            Some(&FilterValue::list(COMPENSATION_INDICATORS))
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Continuity".parse(), Ok(DatasetKind::Continuity));
        assert_eq!("compensacoes".parse(), Ok(DatasetKind::Compensation));
        assert!("sgi".parse::<DatasetKind>().is_err());
    }
}
