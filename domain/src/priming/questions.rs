//! The priming questionnaire shown before a voting round
//!
//! Every participant answers the same fixed catalog of questions; the
//! merged answers drive the weighted catalog queries that build the deck.

use serde::{Deserialize, Serialize};

/// One selectable option of a priming question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    pub value: String,
}

/// A question asked during the priming phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimingQuestion {
    pub id: String,
    pub question: String,
    /// Whether multiple options may be selected
    pub multiple: bool,
    pub options: Vec<QuestionOption>,
}

fn question(id: &str, text: &str, options: &[(&str, &str)]) -> PrimingQuestion {
    PrimingQuestion {
        id: id.to_string(),
        question: text.to_string(),
        multiple: true,
        options: options
            .iter()
            .map(|(text, value)| QuestionOption {
                text: text.to_string(),
                value: value.to_string(),
            })
            .collect(),
    }
}

/// The full priming questionnaire, in display order
pub fn priming_questions() -> Vec<PrimingQuestion> {
    vec![
        question(
            "genre",
            "What types of movies are you in the mood for?",
            &[
                ("Comedy", "comedy"),
                ("Thriller", "thriller"),
                ("Drama", "drama"),
                ("Action", "action"),
                ("Horror", "horror"),
                ("Romance", "romance"),
                ("Sci-Fi", "science_fiction"),
                ("Fantasy", "fantasy"),
                ("No preference", "any"),
            ],
        ),
        question(
            "mood",
            "What kind of mood are you looking for?",
            &[
                ("Something light and fun", "light"),
                ("Something thought-provoking", "thoughtful"),
                ("Something intense", "intense"),
                ("Something emotional", "emotional"),
                ("No preference", "any"),
            ],
        ),
        question(
            "era",
            "Any preferred time period?",
            &[
                ("Classic (pre-1980)", "classic"),
                ("Modern (1980-2010)", "modern"),
                ("Contemporary (2010+)", "contemporary"),
                ("No preference", "any"),
            ],
        ),
        question(
            "acclaim",
            "What kind of recognition interests you?",
            &[
                ("Award winners", "awarded"),
                ("Critic favorites", "critically_acclaimed"),
                ("Audience favorites", "popular"),
                ("Hidden gems", "hidden"),
                ("No preference", "any"),
            ],
        ),
        question(
            "length",
            "How long of a movie would you prefer?",
            &[
                ("Short (under 100 minutes)", "short"),
                ("Average (100-130 minutes)", "average"),
                ("Long (over 130 minutes)", "long"),
                ("No preference", "any"),
            ],
        ),
        question(
            "origin",
            "Any preference for where the movie is from?",
            &[
                ("Hollywood", "hollywood"),
                ("International", "international"),
                ("Independent", "independent"),
                ("No preference", "any"),
            ],
        ),
        question(
            "style",
            "What style of filmmaking interests you?",
            &[
                ("Action-packed", "action_packed"),
                ("Character-driven", "character_driven"),
                ("Visually stunning", "visual"),
                ("Documentary-style", "documentary"),
                ("No preference", "any"),
            ],
        ),
        question(
            "lists",
            "Interested in any of these curated lists?",
            &[
                ("AFI Top 100", "afi"),
                ("Oscar Winners", "oscar"),
                ("Film Festival Favorites", "festival"),
                ("No preference", "any"),
            ],
        ),
    ]
}
