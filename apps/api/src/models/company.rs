use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Dutch aliases are the values written by earlier versions of the tracker;
// existing data.csv files keep loading.

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CompanyType {
    #[serde(alias = "Hoofdaannemer")]
    MainContractor,
    #[serde(alias = "Onderaannemer")]
    Subcontractor,
    #[serde(alias = "Prefab beton producent")]
    PrefabConcreteProducer,
    #[serde(alias = "Modulaire woningbouw")]
    ModularHousing,
    #[serde(alias = "Toelevering / Werkplaats")]
    SupplyWorkshop,
    #[serde(alias = "Afbouw")]
    Finishing,
}

impl CompanyType {
    pub const ALL: [CompanyType; 6] = [
        CompanyType::MainContractor,
        CompanyType::Subcontractor,
        CompanyType::PrefabConcreteProducer,
        CompanyType::ModularHousing,
        CompanyType::SupplyWorkshop,
        CompanyType::Finishing,
    ];

    /// Human-readable sector name used in prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            CompanyType::MainContractor => "Main contractor",
            CompanyType::Subcontractor => "Subcontractor",
            CompanyType::PrefabConcreteProducer => "Prefab concrete producer",
            CompanyType::ModularHousing => "Modular housing",
            CompanyType::SupplyWorkshop => "Supply / workshop",
            CompanyType::Finishing => "Finishing",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkKind {
    #[serde(alias = "Timmerman")]
    Carpentry,
    #[serde(alias = "Beton / Ruwbouw")]
    ConcreteShell,
    #[serde(alias = "Prefab")]
    Prefab,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    #[serde(alias = "Start")]
    Start,
    #[serde(alias = "Piek")]
    Peak,
    #[serde(alias = "Afronding")]
    Completion,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    #[serde(alias = "Vandaag bellen")]
    CallToday,
    #[serde(alias = "Deze week")]
    ThisWeek,
    #[serde(alias = "Later")]
    Later,
    #[serde(alias = "Klaar")]
    Done,
}

impl CallStatus {
    /// Sort rank for the grouped overview: call today first, done last.
    pub fn rank(&self) -> u8 {
        match self {
            CallStatus::CallToday => 1,
            CallStatus::ThisWeek => 2,
            CallStatus::Later => 3,
            CallStatus::Done => 4,
        }
    }
}

/// Always derived from the score; stored priority columns are never read.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLabel {
    High,
    Medium,
    Low,
}

/// One tracked company. `score` and `priority` are derived by the scoring
/// engine and are never taken from user input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRecord {
    pub name: String,
    pub company_type: CompanyType,
    pub work_kind: WorkKind,
    pub project_count: u8,
    pub vacancies_active: bool,
    pub project_phase: ProjectPhase,
    pub score: u8,
    pub priority: PriorityLabel,
    pub status: CallStatus,
    pub last_contact: Option<NaiveDate>,
    pub next_action: Option<String>,
    pub note: Option<String>,
}
