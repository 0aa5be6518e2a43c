use serde::Serialize;

use crate::models::company::CompanyType;

/// Regions offered for discovery. Any free-text region is accepted; these
/// are the ones the sales team works.
pub const REGIONS: [&str; 5] = [
    "Nederland",
    "Randstad",
    "Noord-Brabant",
    "Gelderland",
    "Zuid-Holland",
];

pub const DEFAULT_REGION: &str = "Nederland";

/// Search terms and exclusion words for one sector. Terms are Dutch because
/// they are sent verbatim to the search engine.
#[derive(Debug, Clone, Serialize)]
pub struct SectorProfile {
    pub sector: CompanyType,
    pub search_terms: &'static [&'static str],
    /// A hit whose name or snippet contains one of these is not a company of
    /// this sector (e.g. a general contractor showing up for "prefab").
    pub exclusions: &'static [&'static str],
}

pub fn sector_profile(sector: CompanyType) -> SectorProfile {
    match sector {
        CompanyType::PrefabConcreteProducer => SectorProfile {
            sector,
            search_terms: &[
                "prefab beton fabriek",
                "betonelementen fabriek",
                "prefab betonelementen productie",
            ],
            exclusions: &["aannemer", "bouwbedrijf", "infra", "projectontwikkeling"],
        },
        CompanyType::ModularHousing => SectorProfile {
            sector,
            search_terms: &["modulaire woningen fabriek", "woningmodules productie"],
            exclusions: &["aannemer", "bouwbedrijf"],
        },
        CompanyType::MainContractor => SectorProfile {
            sector,
            search_terms: &["hoofdaannemer bouw"],
            exclusions: &[],
        },
        CompanyType::Subcontractor => SectorProfile {
            sector,
            search_terms: &["ruwbouw specialist", "betononderaannemer"],
            exclusions: &[],
        },
        CompanyType::SupplyWorkshop => SectorProfile {
            sector,
            search_terms: &["beton wapening productie", "bouw toeleverancier"],
            exclusions: &[],
        },
        CompanyType::Finishing => SectorProfile {
            sector,
            search_terms: &["afbouwbedrijf", "gipswanden montage"],
            exclusions: &[],
        },
    }
}

pub fn all_profiles() -> Vec<SectorProfile> {
    CompanyType::ALL.into_iter().map(sector_profile).collect()
}
