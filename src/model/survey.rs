use serde::Serialize;

/// Survey metadata and response distribution behind one node.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SurveyDetail {
    pub survey_name: Option<String>,
    pub sample_size: Option<u64>,
    pub topic: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Question {
    pub text: String,
    pub responses: Vec<ResponseOption>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseOption {
    pub option: String,
    /// Share of respondents in `[0, 1]`.
    pub share: f64,
}

impl SurveyDetail {
    /// Responses of the first question; most surveys carry exactly one.
    pub fn primary_responses(&self) -> &[ResponseOption] {
        self.questions
            .first()
            .map(|q| q.responses.as_slice())
            .unwrap_or(&[])
    }

    /// Share of the most popular answer to the primary question.
    pub fn top_share(&self) -> Option<f64> {
        self.primary_responses()
            .iter()
            .map(|r| r.share)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Top share minus the sum of all other shares. Negative when the
    /// respondents are split.
    pub fn confidence(&self) -> Option<f64> {
        let top = self.top_share()?;
        let total: f64 = self.primary_responses().iter().map(|r| r.share).sum();
        Some(top - (total - top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(shares: &[f64]) -> SurveyDetail {
        SurveyDetail {
            questions: vec![Question {
                text: "Do you own a home?".to_string(),
                responses: shares
                    .iter()
                    .enumerate()
                    .map(|(i, &share)| ResponseOption {
                        option: format!("option {}", i),
                        share,
                    })
                    .collect(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_confidence() {
        let d = detail(&[0.7, 0.2, 0.1]);
        assert_eq!(d.top_share(), Some(0.7));
        assert!((d.confidence().unwrap() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_no_responses() {
        let d = SurveyDetail::default();
        assert!(d.primary_responses().is_empty());
        assert_eq!(d.top_share(), None);
        assert_eq!(d.confidence(), None);
    }
}
