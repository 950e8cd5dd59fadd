//! The persisted application state blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assessment::Assessment;
use super::dimension::Priority;

/// The whole application state, mirrored to disk on every mutation.
///
/// `assessments` is insertion-ordered, which is also chronological order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "lastAssessment", default)]
    pub last_assessment: Option<DateTime<Utc>>,
}

impl AppData {
    /// Append a record and stamp the last-assessment setting.
    pub fn record(&mut self, assessment: Assessment) {
        self.settings.last_assessment = Some(assessment.date);
        self.assessments.push(assessment);
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&Assessment> {
        self.assessments.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionScores;

    #[test]
    fn test_record_stamps_last_assessment() {
        let mut data = AppData::default();
        assert!(data.settings.last_assessment.is_none());

        let a = Assessment::new(DimensionScores::default(), String::new(), None);
        let date = a.date;
        data.record(a);

        assert_eq!(data.assessments.len(), 1);
        assert_eq!(data.settings.last_assessment, Some(date));
        assert_eq!(data.latest().unwrap().date, date);
    }

    #[test]
    fn test_deserialize_legacy_blob_shape() {
        let json = r#"{
            "priority": "creation",
            "assessments": [],
            "settings": { "lastAssessment": null }
        }"#;
        let data: AppData = serde_json::from_str(json).unwrap();
        assert_eq!(data.priority, Some(Priority::Creation));
        assert!(data.assessments.is_empty());
    }
}
