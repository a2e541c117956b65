use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// BEL relationship keywords accepted in curation sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    Increases,
    Decreases,
    DirectlyIncreases,
    DirectlyDecreases,
    Association,
    PositiveCorrelation,
    NegativeCorrelation,
    CausesNoChange,
    Regulates,
    HasComponent,
    IsA,
    PartOf,
    BiomarkerFor,
    PrognosticBiomarkerFor,
    RateLimitingStepOf,
    SubProcessOf,
    TranslatedTo,
    TranscribedTo,
    HasVariant,
    HasMember,
}

impl Relation {
    /// Long-form BEL keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Relation::Increases => "increases",
            Relation::Decreases => "decreases",
            Relation::DirectlyIncreases => "directlyIncreases",
            Relation::DirectlyDecreases => "directlyDecreases",
            Relation::Association => "association",
            Relation::PositiveCorrelation => "positiveCorrelation",
            Relation::NegativeCorrelation => "negativeCorrelation",
            Relation::CausesNoChange => "causesNoChange",
            Relation::Regulates => "regulates",
            Relation::HasComponent => "hasComponent",
            Relation::IsA => "isA",
            Relation::PartOf => "partOf",
            Relation::BiomarkerFor => "biomarkerFor",
            Relation::PrognosticBiomarkerFor => "prognosticBiomarkerFor",
            Relation::RateLimitingStepOf => "rateLimitingStepOf",
            Relation::SubProcessOf => "subProcessOf",
            Relation::TranslatedTo => "translatedTo",
            Relation::TranscribedTo => "transcribedTo",
            Relation::HasVariant => "hasVariant",
            Relation::HasMember => "hasMember",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Raised when a relation cell holds neither a BEL keyword nor a short form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRelation(pub String);

impl fmt::Display for UnknownRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown relation '{}'", self.0)
    }
}

impl std::error::Error for UnknownRelation {}

impl FromStr for Relation {
    type Err = UnknownRelation;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let relation = match trimmed {
            "->" => Relation::Increases,
            "-|" => Relation::Decreases,
            "=>" => Relation::DirectlyIncreases,
            "=|" => Relation::DirectlyDecreases,
            "--" => Relation::Association,
            _ => match trimmed.to_ascii_lowercase().as_str() {
                "increases" => Relation::Increases,
                "decreases" => Relation::Decreases,
                "directlyincreases" => Relation::DirectlyIncreases,
                "directlydecreases" => Relation::DirectlyDecreases,
                "association" => Relation::Association,
                "positivecorrelation" | "pos" => Relation::PositiveCorrelation,
                "negativecorrelation" | "neg" => Relation::NegativeCorrelation,
                "causesnochange" | "cnc" => Relation::CausesNoChange,
                "regulates" | "reg" => Relation::Regulates,
                "hascomponent" => Relation::HasComponent,
                "isa" => Relation::IsA,
                "partof" => Relation::PartOf,
                "biomarkerfor" => Relation::BiomarkerFor,
                "prognosticbiomarkerfor" => Relation::PrognosticBiomarkerFor,
                "ratelimitingstepof" => Relation::RateLimitingStepOf,
                "subprocessof" => Relation::SubProcessOf,
                "translatedto" => Relation::TranslatedTo,
                "transcribedto" => Relation::TranscribedTo,
                "hasvariant" => Relation::HasVariant,
                "hasmember" => Relation::HasMember,
                _ => return Err(UnknownRelation(trimmed.to_string())),
            },
        };
        Ok(relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keywords_and_short_forms() {
        assert_eq!("increases".parse::<Relation>(), Ok(Relation::Increases));
        assert_eq!("DirectlyDecreases".parse::<Relation>(), Ok(Relation::DirectlyDecreases));
        assert_eq!(" -| ".parse::<Relation>(), Ok(Relation::Decreases));
        assert_eq!("pos".parse::<Relation>(), Ok(Relation::PositiveCorrelation));
    }

    #[test]
    fn rejects_unknown_relation() {
        let err = "binds".parse::<Relation>().unwrap_err();
        assert_eq!(err.to_string(), "unknown relation 'binds'");
    }
}
