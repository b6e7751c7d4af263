//! Built-in question pool used when the store cannot fill a request.

use crate::store::{Difficulty, QuestionSummary};
use rand::seq::SliceRandom;
use rand::Rng;

/// A hard-coded question from the built-in pool.
#[derive(Debug)]
pub struct FallbackQuestion {
    pub id: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
    pub difficulty: Difficulty,
    pub technologies: &'static [&'static str],
    pub rating: f64,
}

impl FallbackQuestion {
    pub fn summary(&self) -> QuestionSummary {
        QuestionSummary {
            id: self.id.to_string(),
            question: self.question.to_string(),
            difficulty: self.difficulty,
            technologies: self.technologies.iter().map(|t| t.to_string()).collect(),
            has_detailed_answer: !self.answer.is_empty(),
        }
    }
}

/// Pool entries keyed by (skill level, technology).
struct PoolGroup {
    difficulty: Difficulty,
    technology: &'static str,
    questions: &'static [FallbackQuestion],
}

static POOL: &[PoolGroup] = &[
    PoolGroup {
        difficulty: Difficulty::Junior,
        technology: "JavaScript",
        questions: &[
            FallbackQuestion {
                id: "js-junior-1",
                question: "Explain the difference between let, const, and var in JavaScript.",
                answer: "var has function scope and can be redeclared and updated. let has block scope, can be updated but not redeclared. const has block scope and cannot be updated or redeclared.",
                difficulty: Difficulty::Junior,
                technologies: &["JavaScript"],
                rating: 4.5,
            },
            FallbackQuestion {
                id: "js-junior-2",
                question: "What is the difference between == and === operators?",
                answer: "== compares values after type conversion while === compares both value and type without conversion.",
                difficulty: Difficulty::Junior,
                technologies: &["JavaScript"],
                rating: 4.2,
            },
        ],
    },
    PoolGroup {
        difficulty: Difficulty::Junior,
        technology: "React",
        questions: &[
            FallbackQuestion {
                id: "react-junior-1",
                question: "What is JSX in React?",
                answer: "JSX is a syntax extension for JavaScript that looks similar to HTML and allows you to write HTML elements in JavaScript. It makes it easier to write and add HTML in React.",
                difficulty: Difficulty::Junior,
                technologies: &["React", "JavaScript"],
                rating: 4.7,
            },
            FallbackQuestion {
                id: "react-junior-2",
                question: "Explain the purpose of useState hook in React.",
                answer: "useState is a Hook that lets you add React state to function components. It returns a stateful value and a function to update it.",
                difficulty: Difficulty::Junior,
                technologies: &["React", "JavaScript"],
                rating: 4.8,
            },
        ],
    },
    PoolGroup {
        difficulty: Difficulty::Junior,
        technology: "CSS",
        questions: &[FallbackQuestion {
            id: "css-junior-1",
            question: "What is the box model in CSS?",
            answer: "The CSS box model is a box that wraps around every HTML element. It consists of: content, padding, border, and margin.",
            difficulty: Difficulty::Junior,
            technologies: &["CSS"],
            rating: 4.3,
        }],
    },
    PoolGroup {
        difficulty: Difficulty::MidLevel,
        technology: "JavaScript",
        questions: &[
            FallbackQuestion {
                id: "js-mid-1",
                question: "Explain event delegation in JavaScript and its benefits.",
                answer: "Event delegation is a technique of attaching a single event listener to a parent element to handle events for its current and future children. Benefits include memory efficiency and not having to rebind handlers after DOM changes.",
                difficulty: Difficulty::MidLevel,
                technologies: &["JavaScript"],
                rating: 4.6,
            },
            FallbackQuestion {
                id: "js-mid-2",
                question: "Explain closures in JavaScript with a practical example.",
                answer: "A closure is when a function can remember and access variables from the place where it was defined, even after that outer function has finished executing.",
                difficulty: Difficulty::MidLevel,
                technologies: &["JavaScript"],
                rating: 4.9,
            },
        ],
    },
    PoolGroup {
        difficulty: Difficulty::MidLevel,
        technology: "React",
        questions: &[FallbackQuestion {
            id: "react-mid-1",
            question: "How do React hooks work under the hood?",
            answer: "React hooks rely on the order in which they are called. React keeps track of component state using a linked list where each node represents a hook call. This is why hooks cannot be used conditionally.",
            difficulty: Difficulty::MidLevel,
            technologies: &["React", "JavaScript"],
            rating: 4.5,
        }],
    },
    PoolGroup {
        difficulty: Difficulty::Senior,
        technology: "JavaScript",
        questions: &[FallbackQuestion {
            id: "js-senior-1",
            question: "Implement a debounce function from scratch in JavaScript.",
            answer: "A debounce function limits the rate at which a function can fire. It ensures that the function will not be executed until after a certain amount of time has passed since it was last called.",
            difficulty: Difficulty::Senior,
            technologies: &["JavaScript"],
            rating: 4.8,
        }],
    },
    PoolGroup {
        difficulty: Difficulty::Senior,
        technology: "React",
        questions: &[FallbackQuestion {
            id: "react-senior-1",
            question: "Explain React Fiber architecture and its benefits.",
            answer: "React Fiber is a complete reimplementation of React's core algorithm. It enables incremental rendering, splitting rendering work into chunks and spreading it out over multiple frames.",
            difficulty: Difficulty::Senior,
            technologies: &["React", "JavaScript"],
            rating: 4.9,
        }],
    },
    PoolGroup {
        difficulty: Difficulty::Senior,
        technology: "Performance",
        questions: &[FallbackQuestion {
            id: "perf-senior-1",
            question: "How would you implement code splitting in a large React application?",
            answer: "Code splitting can be implemented using dynamic imports, React.lazy, and Suspense. This allows loading parts of your application only when they're needed.",
            difficulty: Difficulty::Senior,
            technologies: &["React", "JavaScript", "Performance"],
            rating: 4.7,
        }],
    },
];

/// Pick up to `count` pool questions for a skill level.
///
/// Technologies match pool keys ignoring ASCII case. When none of them match,
/// every question for the skill level is a candidate. Candidates are shuffled
/// before truncation.
pub fn pick<R: Rng + ?Sized>(
    difficulty: Difficulty,
    technologies: &[String],
    count: usize,
    rng: &mut R,
) -> Vec<&'static FallbackQuestion> {
    let groups: Vec<&PoolGroup> = POOL.iter().filter(|g| g.difficulty == difficulty).collect();

    let mut candidates: Vec<&'static FallbackQuestion> = Vec::new();
    for tech in technologies {
        if let Some(group) = groups.iter().find(|g| g.technology.eq_ignore_ascii_case(tech)) {
            candidates.extend(group.questions.iter());
        }
    }

    if candidates.is_empty() {
        candidates = groups.iter().flat_map(|g| g.questions.iter()).collect();
    }

    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates
}

/// Look up a pool question by id.
pub fn find(id: &str) -> Option<&'static FallbackQuestion> {
    POOL.iter()
        .flat_map(|g| g.questions.iter())
        .find(|q| q.id == id)
}

/// Number of pool questions available for a skill level.
pub fn pool_size(difficulty: Difficulty) -> usize {
    POOL.iter()
        .filter(|g| g.difficulty == difficulty)
        .map(|g| g.questions.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn techs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_matches_technology_case_insensitively() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = pick(Difficulty::Junior, &techs(&["react"]), 5, &mut rng);
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|q| q.id.starts_with("react-junior")));
    }

    #[test]
    fn test_pick_falls_back_to_whole_level() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = pick(Difficulty::Junior, &techs(&["Angular"]), 3, &mut rng);
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|q| q.difficulty == Difficulty::Junior));

        let all = pick(Difficulty::Senior, &[], 10, &mut rng);
        assert_eq!(all.len(), pool_size(Difficulty::Senior));
    }

    #[test]
    fn test_pick_combines_matching_groups() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = pick(Difficulty::Junior, &techs(&["React", "CSS", "Vue"]), 10, &mut rng);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_pool_sizes() {
        assert_eq!(pool_size(Difficulty::Junior), 5);
        assert_eq!(pool_size(Difficulty::MidLevel), 3);
        assert_eq!(pool_size(Difficulty::Senior), 3);
    }

    #[test]
    fn test_find() {
        let q = find("react-senior-1").unwrap();
        assert_eq!(q.difficulty, Difficulty::Senior);
        assert!(find("missing").is_none());
    }
}
