// Built-in study task templates per subject category, with localised titles.

use serde::{Deserialize, Serialize};

use crate::models::Language;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubjectCategory {
    Language,
    Exact,
    Memory,
    Creative,
    Practical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Foundation,
    Practice,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub key: &'static str,
    pub phase: Phase,
    pub duration_minutes: i64,
    pub priority: u8,
}

const fn tpl(key: &'static str, phase: Phase, duration_minutes: i64, priority: u8) -> TaskTemplate {
    TaskTemplate {
        key,
        phase,
        duration_minutes,
        priority,
    }
}

use Phase::{Foundation, Practice, Review};

const LANGUAGE: [TaskTemplate; 6] = [
    tpl("readChapter", Foundation, 45, 1),
    tpl("vocabulary", Foundation, 30, 2),
    tpl("grammarExercises", Practice, 45, 3),
    tpl("practiceTexts", Practice, 40, 4),
    tpl("reviewNotes", Review, 30, 5),
    tpl("practiceTest", Review, 45, 6),
];

const EXACT: [TaskTemplate; 6] = [
    tpl("studyTheory", Foundation, 45, 1),
    tpl("learnFormulas", Foundation, 30, 2),
    tpl("solveExercises", Practice, 60, 3),
    tpl("extraExercises", Practice, 45, 4),
    tpl("reviewMistakes", Review, 30, 5),
    tpl("practiceTest", Review, 45, 6),
];

const MEMORY: [TaskTemplate; 6] = [
    tpl("readChapter", Foundation, 45, 1),
    tpl("makeSummary", Foundation, 40, 2),
    tpl("learnTerms", Practice, 35, 3),
    tpl("studyDates", Practice, 30, 4),
    tpl("reviewAll", Review, 40, 5),
    tpl("practiceTest", Review, 45, 6),
];

const CREATIVE: [TaskTemplate; 4] = [
    tpl("studyTheory", Foundation, 30, 1),
    tpl("practiceSkills", Practice, 45, 2),
    tpl("reviewExamples", Practice, 30, 3),
    tpl("finalPrep", Review, 30, 4),
];

const PRACTICAL: [TaskTemplate; 4] = [
    tpl("studyTheory", Foundation, 40, 1),
    tpl("practiceHands", Practice, 50, 2),
    tpl("reviewSteps", Practice, 30, 3),
    tpl("finalPrep", Review, 30, 4),
];

// Unknown subjects are treated as memory subjects.
pub fn category_for(subject: &str) -> SubjectCategory {
    match subject {
        "dutch" | "french" | "english" | "german" | "spanish" | "latin" | "greek" => SubjectCategory::Language,
        "math" | "physics" | "chemistry" | "science" => SubjectCategory::Exact,
        "music" | "art" => SubjectCategory::Creative,
        "pe" | "ict" | "technology" => SubjectCategory::Practical,
        _ => SubjectCategory::Memory,
    }
}

/// Templates of a category in their fixed order, foundation phase first.
pub fn templates_for(category: SubjectCategory) -> &'static [TaskTemplate] {
    match category {
        SubjectCategory::Language => &LANGUAGE,
        SubjectCategory::Exact => &EXACT,
        SubjectCategory::Memory => &MEMORY,
        SubjectCategory::Creative => &CREATIVE,
        SubjectCategory::Practical => &PRACTICAL,
    }
}

pub fn task_title(key: &'static str, language: Language) -> &'static str {
    let titles: Option<[&'static str; 3]> = match key {
        "readChapter" => Some(["Hoofdstuk doorlezen", "Lire le chapitre", "Read chapter"]),
        "vocabulary" => Some(["Woordenschat leren", "Apprendre le vocabulaire", "Learn vocabulary"]),
        "grammarExercises" => Some(["Grammatica oefeningen", "Exercices de grammaire", "Grammar exercises"]),
        "practiceTexts" => Some(["Teksten oefenen", "Pratiquer les textes", "Practice texts"]),
        "reviewNotes" => Some(["Notities doornemen", "Revoir les notes", "Review notes"]),
        "practiceTest" => Some(["Proeftoets maken", "Faire un test blanc", "Practice test"]),
        "studyTheory" => Some(["Theorie studeren", "Étudier la théorie", "Study theory"]),
        "learnFormulas" => Some(["Formules leren", "Apprendre les formules", "Learn formulas"]),
        "solveExercises" => Some(["Oefeningen maken", "Faire les exercices", "Solve exercises"]),
        "extraExercises" => Some(["Extra oefeningen", "Exercices supplémentaires", "Extra exercises"]),
        "reviewMistakes" => Some(["Fouten bekijken", "Revoir les erreurs", "Review mistakes"]),
        "makeSummary" => Some(["Samenvatting maken", "Faire un résumé", "Make summary"]),
        "learnTerms" => Some(["Begrippen leren", "Apprendre les termes", "Learn terms"]),
        "studyDates" => Some(["Data/feiten leren", "Apprendre les dates/faits", "Study dates/facts"]),
        "reviewAll" => Some(["Alles herhalen", "Tout réviser", "Review everything"]),
        "practiceSkills" => Some(["Vaardigheden oefenen", "Pratiquer les compétences", "Practice skills"]),
        "reviewExamples" => Some(["Voorbeelden bekijken", "Revoir les exemples", "Review examples"]),
        "finalPrep" => Some(["Laatste voorbereiding", "Préparation finale", "Final preparation"]),
        "practiceHands" => Some(["Praktijk oefenen", "Pratique manuelle", "Hands-on practice"]),
        "reviewSteps" => Some(["Stappen doornemen", "Revoir les étapes", "Review steps"]),
        _ => None,
    };
    match titles {
        Some([nl, fr, en]) => match language {
            Language::Nl => nl,
            Language::Fr => fr,
            Language::En => en,
        },
        None => key,
    }
}
