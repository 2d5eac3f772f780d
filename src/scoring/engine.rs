use super::activity::Activity;
use super::selection::SelectionState;
use crate::checklist::Checklist;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub index: usize,  // Position in the checklist
    pub title: String, // e.g. "Seizure", "Fever"
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub total: u32,
    pub activity: Activity,
    pub contributions: Vec<Contribution>,
}

impl ScoreResult {
    pub fn is_high(&self) -> bool {
        self.activity.is_high()
    }
}

/// Sum the weights of every selected entry and classify the total.
///
/// Positions past the end of the shorter of the two inputs are ignored; a
/// selection built for this checklist always has the same length.
pub fn compute_score(selection: &SelectionState, checklist: &Checklist) -> ScoreResult {
    let mut total: u32 = 0;
    let mut contributions = Vec::new();

    for index in selection.selected_indices() {
        if let Some(descriptor) = checklist.get(index) {
            total = total.saturating_add(descriptor.score);
            contributions.push(Contribution {
                index,
                title: descriptor.title.clone(),
                points: descriptor.score,
            });
        }
    }

    ScoreResult {
        total,
        activity: Activity::classify(total),
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::SymptomDescriptor;

    fn weighted(weights: &[u32]) -> Checklist {
        Checklist::new(
            weights
                .iter()
                .enumerate()
                .map(|(i, w)| SymptomDescriptor::new(format!("Symptom {}", i), "", *w))
                .collect(),
        )
    }

    #[test]
    fn test_empty_selection() {
        let checklist = weighted(&[4, 8, 10]);
        let result = compute_score(&SelectionState::new(3), &checklist);
        assert_eq!(result.total, 0);
        assert_eq!(result.activity, Activity::Low);
        assert!(result.contributions.is_empty());
    }

    #[test]
    fn test_sum_of_selected_weights() {
        let checklist = weighted(&[4, 8, 10]);
        let selection = SelectionState::from_indices(3, &[0, 2]).unwrap();
        let result = compute_score(&selection, &checklist);
        assert_eq!(result.total, 14);
        assert_eq!(result.activity, Activity::Low);
    }

    #[test]
    fn test_all_selected_is_high() {
        let checklist = weighted(&[4, 8, 10]);
        let selection = SelectionState::from_indices(3, &[0, 1, 2]).unwrap();
        let result = compute_score(&selection, &checklist);
        assert_eq!(result.total, 22);
        assert!(result.is_high());
    }

    #[test]
    fn test_order_independent_for_equal_weight_multiset() {
        // Two different index sets that pick the same weights {2, 8}
        let checklist = weighted(&[8, 2, 8, 2]);
        let a = SelectionState::from_indices(4, &[0, 1]).unwrap();
        let b = SelectionState::from_indices(4, &[3, 2]).unwrap();
        assert_eq!(
            compute_score(&a, &checklist).total,
            compute_score(&b, &checklist).total
        );
    }

    #[test]
    fn test_matches_manual_sum_for_every_subset() {
        let weights = [8, 4, 2, 1, 4];
        let checklist = weighted(&weights);
        for mask in 0u32..(1 << weights.len()) {
            let indices: Vec<usize> = (0..weights.len()).filter(|i| mask & (1 << i) != 0).collect();
            let selection = SelectionState::from_indices(weights.len(), &indices).unwrap();
            let expected: u32 = indices.iter().map(|i| weights[*i]).sum();
            assert_eq!(compute_score(&selection, &checklist).total, expected);
        }
    }

    #[test]
    fn test_threshold_boundary_through_engine() {
        let checklist = weighted(&[19, 1]);
        let nineteen = SelectionState::from_indices(2, &[0]).unwrap();
        let twenty = SelectionState::from_indices(2, &[0, 1]).unwrap();
        assert_eq!(compute_score(&nineteen, &checklist).activity, Activity::Low);
        assert_eq!(compute_score(&twenty, &checklist).activity, Activity::High);
    }

    #[test]
    fn test_contributions_follow_checklist_order() {
        let checklist = weighted(&[4, 8, 10]);
        let selection = SelectionState::from_indices(3, &[2, 0]).unwrap();
        let result = compute_score(&selection, &checklist);
        let indices: Vec<usize> = result.contributions.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(result.contributions[1].title, "Symptom 2");
        assert_eq!(result.contributions[1].points, 10);
    }

    #[test]
    fn test_builtin_checklist_all_selected() {
        let checklist = Checklist::default();
        let all: Vec<usize> = (0..checklist.len()).collect();
        let selection = SelectionState::from_indices(checklist.len(), &all).unwrap();
        assert_eq!(compute_score(&selection, &checklist).total, 105);
    }
}
