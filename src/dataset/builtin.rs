//! Built-in problem tables.

use crate::problem::{ExpectedAnswer, Problem};
use crate::prompts::{build_math_prompt, build_multiple_choice_prompt, build_os_prompt};

const MATH: [(&str, f64); 10] = [
    ("What is 15 + 27?", 42.0),
    ("If a book costs $12 and you buy 3 books, how much do you spend?", 36.0),
    ("What is 100 - 37?", 63.0),
    ("A rectangle has length 8 and width 5. What is its area?", 40.0),
    ("What is 144 divided by 12?", 12.0),
    ("If you have 50 apples and give away 18, how many remain?", 32.0),
    ("What is 7 times 9?", 63.0),
    ("A train travels 180 km in 3 hours. What is its speed in km/h?", 60.0),
    ("What is 25% of 80?", 20.0),
    ("If 5 pens cost $15, how much does one pen cost?", 3.0),
];

const MULTIPLE_CHOICE: [(&str, [&str; 4], &str); 10] = [
    (
        "What happens when you drop a glass on a hard floor?",
        ["A) It bounces back up", "B) It likely breaks", "C) It melts", "D) Nothing happens"],
        "B",
    ),
    (
        "Where do fish live?",
        ["A) In trees", "B) In water", "C) In caves", "D) In the sky"],
        "B",
    ),
    (
        "What do plants need to grow?",
        ["A) Darkness", "B) Sunlight and water", "C) Only soil", "D) Ice"],
        "B",
    ),
    (
        "What happens if you don't sleep for a long time?",
        ["A) You feel energized", "B) You feel tired", "C) You grow taller", "D) Nothing"],
        "B",
    ),
    (
        "What is the color of the sky on a clear day?",
        ["A) Green", "B) Blue", "C) Red", "D) Yellow"],
        "B",
    ),
    (
        "What do you use to cut paper?",
        ["A) Scissors", "B) Spoon", "C) Pillow", "D) Water"],
        "A",
    ),
    (
        "What season comes after summer?",
        ["A) Spring", "B) Fall/Autumn", "C) Winter", "D) Summer again"],
        "B",
    ),
    (
        "What do you need to write with a pen?",
        ["A) Paper", "B) Water", "C) Sand", "D) Nothing"],
        "A",
    ),
    (
        "Where do birds typically build nests?",
        ["A) Underground", "B) In trees", "C) In water", "D) On roads"],
        "B",
    ),
    (
        "What makes a car move?",
        ["A) Wind", "B) Engine", "C) Gravity", "D) Magic"],
        "B",
    ),
];

struct OsTask {
    question: &'static str,
    context: &'static str,
    commands: &'static [&'static str],
    difficulty: &'static str,
}

const OS: [OsTask; 4] = [
    OsTask {
        question: "There's a program writing 'succeed' to /root/log every 1-3 seconds. Find the interval.",
        context: "A background process is writing to a file periodically. Need to monitor and determine the interval.",
        commands: &["watch", "tail", "sleep", "diff"],
        difficulty: "hard",
    },
    OsTask {
        question: "How many hidden files are in /home? (not including subdirectories)",
        context: "Count files starting with '.' in the /home directory",
        commands: &["ls -a", "grep", "wc -l"],
        difficulty: "medium",
    },
    OsTask {
        question: "There's a program writing to a file in /root every 1 second. What is the filename?",
        context: "Multiple files exist in /root. Need to find which one is being modified.",
        commands: &["ls -lt", "watch", "stat"],
        difficulty: "hard",
    },
    OsTask {
        question: "Create a bash alias 'calc' that evaluates mathematical expressions. Example: calc 2 * (9 / 3) should output 6",
        context: "Need to create a shell function or alias that can evaluate arithmetic",
        commands: &["alias", "bc", "expr", "function"],
        difficulty: "hard",
    },
];

/// Ten arithmetic and word problems.
pub fn math_problems() -> Vec<Problem> {
    MATH.iter()
        .enumerate()
        .map(|(idx, (question, answer))| {
            Problem::new((idx + 1).to_string(), *question, ExpectedAnswer::Math { answer: *answer })
                .with_prompt(build_math_prompt(question))
        })
        .collect()
}

/// Ten common-sense questions with options A-D.
pub fn multiple_choice_problems() -> Vec<Problem> {
    MULTIPLE_CHOICE
        .iter()
        .enumerate()
        .map(|(idx, (question, options, letter))| {
            let options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
            Problem::new(
                (idx + 1).to_string(),
                *question,
                ExpectedAnswer::MultipleChoice {
                    letter: letter.to_string(),
                },
            )
            .with_prompt(build_multiple_choice_prompt(question, &options))
            .with_options(options)
        })
        .collect()
}

/// Four shell tasks with expected command keywords.
pub fn os_problems() -> Vec<Problem> {
    OS.iter()
        .enumerate()
        .map(|(idx, task)| {
            Problem::new(
                (idx + 1).to_string(),
                task.question,
                ExpectedAnswer::OsInteraction {
                    expected_commands: task.commands.iter().map(|c| c.to_string()).collect(),
                },
            )
            .with_prompt(build_os_prompt(task.question, task.context))
            .with_schema(task.context)
            .with_difficulty(task.difficulty)
        })
        .collect()
}
