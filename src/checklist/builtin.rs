//! Built-in SELENA-SLEDAI descriptor table.

use super::types::SymptomDescriptor;

const SLEDAI: &[(&str, &str, u32)] = &[
    (
        "Seizure",
        "Recent onset. Exclude metabolic, infectious or drug causes.",
        8,
    ),
    (
        "Psychosis",
        "Altered ability to function in normal activity due to severe disturbance in the \
         perception of reality. Includes hallucinations, incoherence, marked loose associations, \
         impoverished thought content, marked illogical thinking, bizarre, disorganized or \
         catatonic behavior. Exclude uremia and drug causes.",
        8,
    ),
    (
        "Organic brain syndrome",
        "Altered mental function with impaired orientation, memory or other intellectual \
         function, with rapid onset and fluctuating clinical features: clouding of \
         consciousness with reduced capacity to focus, and inability to sustain attention to \
         environment, plus at least two of perceptual disturbance, incoherent speech, insomnia \
         or daytime drowsiness, increased or decreased psychomotor activity. Exclude metabolic, \
         infectious or drug causes.",
        8,
    ),
    (
        "Visual disturbance",
        "Retinal changes of SLE: cytoid bodies, retinal hemorrhages, serous exudate or \
         hemorrhages in the choroid, or optic neuritis. Exclude hypertension, infection or drug \
         causes.",
        8,
    ),
    (
        "Cranial nerve disorder",
        "New onset of sensory or motor neuropathy involving cranial nerves.",
        8,
    ),
    (
        "Lupus headache",
        "Severe, persistent headache; may be migrainous, but must be nonresponsive to narcotic \
         analgesia.",
        8,
    ),
    (
        "Cerebrovascular accident",
        "New onset of cerebrovascular accident(s). Exclude arteriosclerosis.",
        8,
    ),
    (
        "Vasculitis",
        "Ulceration, gangrene, tender finger nodules, periungual infarction, splinter \
         hemorrhages, or biopsy or angiogram proof of vasculitis.",
        8,
    ),
    (
        "Arthritis",
        "More than 2 joints with pain and signs of inflammation (tenderness, swelling or \
         effusion).",
        4,
    ),
    (
        "Myositis",
        "Proximal muscle aching or weakness, associated with elevated creatine \
         phosphokinase/aldolase or electromyogram changes or a biopsy showing myositis.",
        4,
    ),
    (
        "Urinary casts",
        "Heme-granular or red blood cell casts.",
        4,
    ),
    (
        "Hematuria",
        "More than 5 red blood cells per high power field. Exclude stone, infection or other \
         cause.",
        4,
    ),
    (
        "Proteinuria",
        "More than 0.5 g per 24 hours. New onset or recent increase of more than 0.5 g per 24 \
         hours.",
        4,
    ),
    (
        "Pyuria",
        "More than 5 white blood cells per high power field. Exclude infection.",
        4,
    ),
    (
        "New rash",
        "New onset or recurrence of inflammatory type rash.",
        2,
    ),
    (
        "Alopecia",
        "New onset or recurrence of abnormal, patchy or diffuse loss of hair.",
        2,
    ),
    (
        "Mucosal ulcers",
        "New onset or recurrence of oral or nasal ulcerations.",
        2,
    ),
    (
        "Pleurisy",
        "Pleuritic chest pain with pleural rub or effusion, or pleural thickening.",
        2,
    ),
    (
        "Pericarditis",
        "Pericardial pain with at least one of: rub, effusion, or electrocardiogram or \
         echocardiogram confirmation.",
        2,
    ),
    (
        "Low complement",
        "Decrease in CH50, C3 or C4 below the lower limit of normal for the testing \
         laboratory.",
        2,
    ),
    (
        "Increased DNA binding",
        "More than 25% binding by Farr assay, or above the normal range for the testing \
         laboratory.",
        2,
    ),
    (
        "Fever",
        "More than 38 C. Exclude infectious cause.",
        1,
    ),
    (
        "Thrombocytopenia",
        "Fewer than 100,000 platelets per cubic millimetre. Exclude drug causes.",
        1,
    ),
    (
        "Leukopenia",
        "Fewer than 3,000 white blood cells per cubic millimetre. Exclude drug causes.",
        1,
    ),
];

/// Owned copy of the built-in descriptor table, in display order
pub fn sledai_descriptors() -> Vec<SymptomDescriptor> {
    SLEDAI
        .iter()
        .map(|(title, description, score)| SymptomDescriptor::new(*title, *description, *score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_distribution() {
        let items = sledai_descriptors();
        let count = |points: u32| items.iter().filter(|d| d.score == points).count();
        assert_eq!(count(8), 8);
        assert_eq!(count(4), 6);
        assert_eq!(count(2), 7);
        assert_eq!(count(1), 3);
    }

    #[test]
    fn test_builtin_table_passes_validation() {
        assert!(crate::checklist::validate_checklist(&sledai_descriptors()).is_ok());
    }

    #[test]
    fn test_every_entry_has_description() {
        assert!(sledai_descriptors().iter().all(|d| !d.description.is_empty()));
    }
}
