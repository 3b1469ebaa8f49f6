use std::fmt::Display;

use serde::Serialize;

use super::image_file::ImageFile;
use crate::infrastructure::Settled;

/// What the reverse-image search made of one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub image: ImageFile,
    pub resolved_name: Option<String>,
    pub error: Option<String>,
}

impl ResolutionOutcome {
    pub fn resolved(image: ImageFile, name: impl Into<String>) -> Self {
        Self {
            image,
            resolved_name: Some(name.into()),
            error: None,
        }
    }

    pub fn unresolved(image: ImageFile, error: impl Display) -> Self {
        Self {
            image,
            resolved_name: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_name.is_some()
    }
}

/// One entry of a page report, shaped like a settled promise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SettledRecord {
    Fulfilled { value: ResolutionOutcome },
    Rejected { reason: String },
}

impl SettledRecord {
    pub fn from_settled<E: Display>(settled: &Settled<ResolutionOutcome, E>) -> Self {
        match settled {
            Ok(outcome) => SettledRecord::Fulfilled {
                value: outcome.clone(),
            },
            Err(failure) => SettledRecord::Rejected {
                reason: failure.to_string(),
            },
        }
    }
}
