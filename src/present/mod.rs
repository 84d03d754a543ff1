use crate::model::{DiagnosticResult, DisplayEntry, MedicationEvaluation};

/// Medications must score strictly above this to be listed
pub const MATCH_THRESHOLD: f64 = 70.0;

pub const RECEIVED_TEXT_TITLE: &str = "Received text";
pub const CONDITION_TITLE: &str = "Detected condition";
pub const URGENCY_TITLE: &str = "Urgency level";
pub const MEDICATIONS_TITLE: &str = "Medications not recommended";
pub const WARNINGS_TITLE: &str = "Warnings";
pub const NO_MEDICATIONS_MESSAGE: &str = "No medications with a match above 70%";

/// Turn a diagnostic result into the entries shown in the chat.
///
/// Order is fixed: received text, detected condition, urgency, medications,
/// then warnings when the service sent any.
pub fn present(result: &DiagnosticResult) -> Vec<DisplayEntry> {
    let mut entries = vec![
        DisplayEntry::new(RECEIVED_TEXT_TITLE, result.received_text.as_str()),
        DisplayEntry::new(CONDITION_TITLE, result.detected_condition.as_str()),
        DisplayEntry::new(URGENCY_TITLE, result.urgency_level.as_str()),
    ];

    let flagged: Vec<String> = flagged_medications(result)
        .map(format_medication)
        .collect();

    let body = if flagged.is_empty() {
        NO_MEDICATIONS_MESSAGE.to_string()
    } else {
        flagged.join("\n")
    };
    entries.push(DisplayEntry::new(MEDICATIONS_TITLE, body));

    if !result.warnings.is_empty() {
        entries.push(DisplayEntry::new(WARNINGS_TITLE, result.warnings.join("\n")));
    }

    entries
}

/// Medications scored against the detected condition above the threshold, in input order
fn flagged_medications(result: &DiagnosticResult) -> impl Iterator<Item = &MedicationEvaluation> {
    result.medications.iter().filter(move |m| {
        m.match_percent > MATCH_THRESHOLD && m.associated_condition == result.detected_condition
    })
}

fn format_medication(medication: &MedicationEvaluation) -> String {
    format!("{} ({:.1}%)", medication.name, medication.match_percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn med(name: &str, match_percent: f64, condition: &str) -> MedicationEvaluation {
        MedicationEvaluation {
            name: name.to_string(),
            match_percent,
            associated_condition: condition.to_string(),
        }
    }

    fn result(condition: &str, medications: Vec<MedicationEvaluation>) -> DiagnosticResult {
        DiagnosticResult {
            received_text: "fiebre y dolor de cabeza".to_string(),
            detected_condition: condition.to_string(),
            urgency_level: "media".to_string(),
            medications,
            warnings: Vec::new(),
        }
    }

    fn medication_body(entries: &[DisplayEntry]) -> &str {
        entries
            .iter()
            .find(|e| e.title == MEDICATIONS_TITLE)
            .map(|e| e.body.as_str())
            .expect("medications entry is always present")
    }

    #[test]
    fn header_entries_come_first_in_order() {
        let entries = present(&result("Flu", vec![]));
        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[0],
            DisplayEntry::new(RECEIVED_TEXT_TITLE, "fiebre y dolor de cabeza")
        );
        assert_eq!(entries[1], DisplayEntry::new(CONDITION_TITLE, "Flu"));
        assert_eq!(entries[2], DisplayEntry::new(URGENCY_TITLE, "media"));
        assert_eq!(entries[3].title, MEDICATIONS_TITLE);
    }

    #[test]
    fn lists_only_high_matches_for_detected_condition() {
        let entries = present(&result(
            "Flu",
            vec![med("Aspirin", 85.0, "Flu"), med("Paracetamol", 60.0, "Flu")],
        ));
        assert_eq!(medication_body(&entries), "Aspirin (85.0%)");
    }

    #[test]
    fn other_condition_is_never_listed() {
        let entries = present(&result("Flu", vec![med("Aspirin", 85.0, "Cold")]));
        assert_eq!(medication_body(&entries), NO_MEDICATIONS_MESSAGE);
    }

    #[test]
    fn condition_match_is_case_sensitive() {
        let entries = present(&result("asma", vec![med("propranolol", 90.0, "Asma")]));
        assert_eq!(medication_body(&entries), NO_MEDICATIONS_MESSAGE);
    }

    #[test]
    fn empty_medication_list_reports_none_found() {
        for condition in ["Flu", "", "ninguna"] {
            let entries = present(&result(condition, vec![]));
            assert_eq!(medication_body(&entries), NO_MEDICATIONS_MESSAGE);
        }
    }

    #[test]
    fn threshold_is_exclusive() {
        let entries = present(&result(
            "asma",
            vec![med("exact", 70.0, "asma"), med("just-over", 70.1, "asma")],
        ));
        assert_eq!(medication_body(&entries), "just-over (70.1%)");
    }

    #[test]
    fn survivors_keep_input_order() {
        let entries = present(&result(
            "asma",
            vec![
                med("zeta", 99.0, "asma"),
                med("skipped", 10.0, "asma"),
                med("alfa", 71.0, "asma"),
                med("other", 95.0, "reflujo"),
                med("mid", 85.71428571, "asma"),
            ],
        ));
        assert_eq!(
            medication_body(&entries),
            "zeta (99.0%)\nalfa (71.0%)\nmid (85.7%)"
        );
    }

    #[test]
    fn percentages_have_one_decimal() {
        let entries = present(&result(
            "asma",
            vec![
                med("a", 100.0, "asma"),
                med("b", 71.42857142857143, "asma"),
                med("c", 85.71, "asma"),
            ],
        ));
        for line in medication_body(&entries).lines() {
            let pct = line
                .rsplit_once('(')
                .and_then(|(_, rest)| rest.strip_suffix("%)"))
                .unwrap();
            let (_, decimals) = pct.split_once('.').unwrap();
            assert_eq!(decimals.len(), 1, "{line}");
        }
        assert_eq!(
            medication_body(&entries),
            "a (100.0%)\nb (71.4%)\nc (85.7%)"
        );
    }

    #[test]
    fn warnings_are_appended_when_present() {
        let mut input = result("asma", vec![med("propranolol", 85.7, "asma")]);
        input.warnings = vec![
            "RED FLAG: Dolor o presion en el pecho detectado".to_string(),
            "IMPORTANTE: 1 medicamentos estan contraindicados para esta enfermedad".to_string(),
        ];
        let entries = present(&input);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[4].title, WARNINGS_TITLE);
        assert_eq!(entries[4].body.lines().count(), 2);
    }

    #[test]
    fn presenting_is_deterministic_and_leaves_input_untouched() {
        let input = result(
            "Flu",
            vec![med("Aspirin", 85.0, "Flu"), med("Ibuprofen", 72.5, "Flu")],
        );
        let snapshot = input.clone();
        assert_eq!(present(&input), present(&input));
        assert_eq!(input, snapshot);
    }
}
