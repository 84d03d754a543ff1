use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Free text describing the user's symptoms. Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Returns `None` for blank input, which must never reach the service.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One medication scored by the service against a condition
#[derive(Debug, Clone, PartialEq)]
pub struct MedicationEvaluation {
    pub name: String,
    pub match_percent: f64,
    pub associated_condition: String,
}

/// Parsed diagnostic response
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticResult {
    pub received_text: String,
    pub detected_condition: String,
    pub urgency_level: String,
    pub medications: Vec<MedicationEvaluation>,
    pub warnings: Vec<String>,
}

/// One titled block of chat output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub title: String,
    pub body: String,
}

impl DisplayEntry {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Request body sent to the diagnostic endpoint
#[derive(Debug, Serialize)]
pub struct DiagnosticRequest<'a> {
    pub texto: &'a str,
}

impl<'a> From<&'a Query> for DiagnosticRequest<'a> {
    fn from(query: &'a Query) -> Self {
        Self { texto: query.as_str() }
    }
}

/// Response body as the service sends it. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct DiagnosticResponse {
    pub texto_recibido: String,
    pub enfermedad_detectada: String,
    pub nivel_urgencia: String,
    pub medicamentos_evaluados: Vec<EvaluatedMedication>,
    #[serde(default)]
    pub advertencias: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluatedMedication {
    #[serde(rename = "Medicamento")]
    pub medicamento: String,
    #[serde(rename = "Match")]
    pub match_percent: f64,
    #[serde(rename = "Enfermedad")]
    pub enfermedad: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("match score for {name:?} is out of range: {value}")]
    MatchOutOfRange { name: String, value: f64 },
}

impl DiagnosticResponse {
    /// Checks value constraints serde cannot express and converts to the domain type.
    pub fn validate(self) -> Result<DiagnosticResult, SchemaError> {
        let medications = self
            .medicamentos_evaluados
            .into_iter()
            .map(|m| {
                if !m.match_percent.is_finite() || !(0.0..=100.0).contains(&m.match_percent) {
                    return Err(SchemaError::MatchOutOfRange {
                        name: m.medicamento,
                        value: m.match_percent,
                    });
                }
                Ok(MedicationEvaluation {
                    name: m.medicamento,
                    match_percent: m.match_percent,
                    associated_condition: m.enfermedad,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DiagnosticResult {
            received_text: self.texto_recibido,
            detected_condition: self.enfermedad_detectada,
            urgency_level: self.nivel_urgencia,
            medications,
            warnings: self.advertencias.unwrap_or_default(),
        })
    }
}
