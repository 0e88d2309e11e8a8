//! Compiled-in quiz catalog: every quiz the platform offers, with the file it
//! loads from and the container its cards render into.

use topaz_quiz::QuizModality;

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizInfo {
    /// Stable id used in routes and the last-visited record.
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Static asset path; doubles as the persistence session key.
    pub quiz_file: &'static str,
    pub modality: QuizModality,
    pub container_id: &'static str,
}

pub const CATALOG: &[QuizInfo] = &[
    QuizInfo {
        id: "pharma-1",
        title: "Pharmacology: Antibiotics I",
        subtitle: "Beta-lactams and cell-wall agents",
        quiz_file: "assets/quizzes/pharma_antibiotics1.json",
        modality: QuizModality::SingleChoice,
        container_id: "pharmaQuizContainer",
    },
    QuizInfo {
        id: "pharma-2",
        title: "Pharmacology: Antibiotics II",
        subtitle: "Protein-synthesis inhibitors",
        quiz_file: "assets/quizzes/pharma_antibiotics2.json",
        modality: QuizModality::SingleChoice,
        container_id: "pharmaQuizContainer",
    },
    QuizInfo {
        id: "infectious-theory-1",
        title: "Infectious Disease: Theory I",
        subtitle: "Gram-positive cocci",
        quiz_file: "assets/quizzes/infectious_theory1.json",
        modality: QuizModality::SingleChoice,
        container_id: "infectiousQuizContainer",
    },
    QuizInfo {
        id: "infectious-theory-2",
        title: "Infectious Disease: Theory II",
        subtitle: "Gram-negative rods",
        quiz_file: "assets/quizzes/infectious_theory2.json",
        modality: QuizModality::SingleChoice,
        container_id: "infectiousQuizContainer",
    },
    QuizInfo {
        id: "infectious-lab-1",
        title: "Infectious Disease: Lab I",
        subtitle: "Culture and identification",
        quiz_file: "assets/quizzes/infectious_lab1.json",
        modality: QuizModality::LabMultiPart,
        container_id: "infectiousLabQuizContainer",
    },
    QuizInfo {
        id: "infectious-lab-2",
        title: "Infectious Disease: Lab II",
        subtitle: "Case studies and smears",
        quiz_file: "assets/quizzes/infectious_lab2.json",
        modality: QuizModality::LabMultiPart,
        container_id: "infectiousLabQuizContainer",
    },
    QuizInfo {
        id: "epi-1",
        title: "Epidemiology I",
        subtitle: "Study designs and measures",
        quiz_file: "assets/quizzes/epidemiology1.json",
        modality: QuizModality::SingleChoice,
        container_id: "epidemiologyQuizContainer",
    },
    QuizInfo {
        id: "epi-2",
        title: "Epidemiology II",
        subtitle: "Outbreak investigation",
        quiz_file: "assets/quizzes/epidemiology2.json",
        modality: QuizModality::SingleChoice,
        container_id: "epidemiologyQuizContainer",
    },
];

/// Look an entry up by its route id.
#[must_use]
pub fn find(id: &str) -> Option<&'static QuizInfo> {
    CATALOG.iter().find(|info| info.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        for (index, info) in CATALOG.iter().enumerate() {
            assert!(
                CATALOG[index + 1..].iter().all(|other| other.id != info.id),
                "duplicate catalog id {}",
                info.id
            );
        }
    }

    #[test]
    fn find_resolves_known_ids() {
        let info = find("infectious-lab-1").unwrap();
        assert_eq!(info.modality, QuizModality::LabMultiPart);
        assert_eq!(info.container_id, "infectiousLabQuizContainer");
        assert!(find("cardiology-9").is_none());
    }
}
