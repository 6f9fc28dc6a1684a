use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

use crate::odometer::{OdometerError, QuestionIndex};

/// The bundled question set, keyed "01".."99".
pub const DATASET: &str = include_str!("../assets/questions_answers.json");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("question dataset is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("question dataset is empty")]
    Empty,
    #[error("'{0}' is not a valid question key")]
    InvalidKey(String),
    #[error("question {index}: {category} text is empty")]
    EmptyText {
        index: QuestionIndex,
        category: Category,
    },
    #[error("question {0} has neither a VI nor a VE check")]
    MissingCheck(QuestionIndex),
    #[error("question {0} has both a VI and a VE check")]
    AmbiguousCheck(QuestionIndex),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no questions for index {0}")]
    NotFound(QuestionIndex),
    #[error(transparent)]
    InvalidKey(#[from] OdometerError),
}

/// How strictly the VI/VE exclusivity is enforced while loading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DatasetPolicy {
    /// Every bundle carries exactly one of VI/VE.
    #[default]
    Strict,
    /// VI wins over VE, a bundle without either loads with an absent check.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Interior,
    Exterior,
    RoadSafety,
    FirstAid,
}

impl Category {
    /// The key used in the dataset.
    pub fn code(self) -> &'static str {
        match self {
            Category::Interior => "VI",
            Category::Exterior => "VE",
            Category::RoadSafety => "QSER",
            Category::FirstAid => "1ers secours",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Interior => "Vérification Intérieure",
            Category::Exterior => "Vérification Extérieure",
            Category::RoadSafety => "Questions de Sécurité Routière",
            Category::FirstAid => "Premiers Secours",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", content = "entry")]
#[ts(export)]
pub enum PrimaryCheck {
    Interior(QaPair),
    Exterior(QaPair),
    Absent,
}

impl PrimaryCheck {
    pub fn entry(&self) -> Option<&QaPair> {
        match self {
            PrimaryCheck::Interior(pair) | PrimaryCheck::Exterior(pair) => Some(pair),
            PrimaryCheck::Absent => None,
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            PrimaryCheck::Interior(_) => Some(Category::Interior),
            PrimaryCheck::Exterior(_) => Some(Category::Exterior),
            PrimaryCheck::Absent => None,
        }
    }

    /// Heading as shown above the check, e.g. "VI - Vérification Intérieure".
    pub fn label(&self) -> Option<String> {
        self.category()
            .map(|category| format!("{} - {}", category.code(), category.title()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct QuestionBundle {
    pub index: QuestionIndex,
    pub check: PrimaryCheck,
    pub road_safety: QaPair,
    pub first_aid: QaPair,
}

impl QuestionBundle {
    pub fn primary_check(&self) -> Option<(Category, &QaPair)> {
        self.check.category().zip(self.check.entry())
    }

    /// All entries in display order: check (if any), road safety, first aid.
    pub fn entries(&self) -> impl Iterator<Item = (Category, &QaPair)> {
        self.primary_check().into_iter().chain([
            (Category::RoadSafety, &self.road_safety),
            (Category::FirstAid, &self.first_aid),
        ])
    }
}

// On-disk shape of the dataset.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    #[serde(rename = "Q")]
    question: String,
    #[serde(rename = "A")]
    answer: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBundle {
    #[serde(rename = "VI")]
    interior: Option<RawEntry>,
    #[serde(rename = "VE")]
    exterior: Option<RawEntry>,
    #[serde(rename = "QSER")]
    road_safety: RawEntry,
    #[serde(rename = "1ers secours")]
    first_aid: RawEntry,
}

impl RawEntry {
    fn into_pair(self, index: QuestionIndex, category: Category) -> Result<QaPair, DatasetError> {
        if self.question.trim().is_empty() || self.answer.trim().is_empty() {
            return Err(DatasetError::EmptyText { index, category });
        }
        Ok(QaPair {
            question: self.question,
            answer: self.answer,
        })
    }
}

impl RawBundle {
    fn into_bundle(
        self,
        index: QuestionIndex,
        policy: DatasetPolicy,
    ) -> Result<QuestionBundle, DatasetError> {
        let check = match (self.interior, self.exterior, policy) {
            (Some(vi), None, _) => PrimaryCheck::Interior(vi.into_pair(index, Category::Interior)?),
            (None, Some(ve), _) => PrimaryCheck::Exterior(ve.into_pair(index, Category::Exterior)?),
            (Some(_), Some(_), DatasetPolicy::Strict) => {
                return Err(DatasetError::AmbiguousCheck(index))
            }
            (Some(vi), Some(_), DatasetPolicy::Lenient) => {
                log::warn!("Question {index} has both VI and VE, keeping VI");
                PrimaryCheck::Interior(vi.into_pair(index, Category::Interior)?)
            }
            (None, None, DatasetPolicy::Strict) => return Err(DatasetError::MissingCheck(index)),
            (None, None, DatasetPolicy::Lenient) => {
                log::warn!("Question {index} has neither VI nor VE");
                PrimaryCheck::Absent
            }
        };

        Ok(QuestionBundle {
            index,
            check,
            road_safety: self.road_safety.into_pair(index, Category::RoadSafety)?,
            first_aid: self.first_aid.into_pair(index, Category::FirstAid)?,
        })
    }
}

/// Read-only question set. Built once, then only handed out by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDatabase {
    bundles: BTreeMap<QuestionIndex, QuestionBundle>,
    policy: DatasetPolicy,
}

impl QuestionDatabase {
    /// Loads the bundled dataset with the default policy.
    pub fn load() -> Result<Self, DatasetError> {
        Self::from_json(DATASET, DatasetPolicy::default())
    }

    pub fn from_json(json: &str, policy: DatasetPolicy) -> Result<Self, DatasetError> {
        let raw: BTreeMap<String, RawBundle> = serde_json::from_str(json)?;
        if raw.is_empty() {
            return Err(DatasetError::Empty);
        }

        let bundles = raw
            .into_iter()
            .map(|(key, raw_bundle)| -> Result<_, DatasetError> {
                let index = key
                    .parse::<QuestionIndex>()
                    .map_err(|_| DatasetError::InvalidKey(key))?;
                Ok((index, raw_bundle.into_bundle(index, policy)?))
            })
            .collect::<Result<BTreeMap<_, _>, DatasetError>>()?;

        let database = Self { bundles, policy };
        log::info!(
            "Loaded {} question bundles ({:?}), {} indices without questions",
            database.len(),
            policy,
            database.missing_indices().count()
        );
        Ok(database)
    }

    pub fn lookup(&self, index: QuestionIndex) -> Result<&QuestionBundle, LookupError> {
        self.bundles.get(&index).ok_or_else(|| {
            log::debug!("No questions for key \"{}\"", index.key());
            LookupError::NotFound(index)
        })
    }

    /// Looks up a two-digit key such as "07".
    pub fn lookup_key(&self, key: &str) -> Result<&QuestionBundle, LookupError> {
        self.lookup(key.parse()?)
    }

    pub fn policy(&self) -> DatasetPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = QuestionIndex> + '_ {
        self.bundles.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionBundle> {
        self.bundles.values()
    }

    pub fn missing_indices(&self) -> impl Iterator<Item = QuestionIndex> + '_ {
        QuestionIndex::all().filter(|index| !self.bundles.contains_key(index))
    }
}
