/// Tone a personality writes in. Intent templates branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Analytical,
    Quick,
    Thorough,
    Balanced,
    Concise,
    Informative,
    Technical,
    Conversational,
}

/// Phrase preset for one model.
#[derive(Debug)]
pub struct Personality {
    pub model: &'static str,
    pub openers: &'static [&'static str],
    pub closings: &'static [&'static str],
    pub style: Style,
    pub elaboration: &'static str,
}

pub const DEFAULT_MODEL: &str = "gpt-4";

pub static PERSONALITIES: &[Personality] = &[
    Personality {
        model: "gpt-4",
        openers: &[
            "Based on my analysis,",
            "I've processed your request.",
            "Let me break this down for you:",
            "After careful consideration,",
            "Here's my comprehensive analysis:",
        ],
        closings: &[
            "Let me know if you need more details.",
            "Feel free to ask for clarification.",
            "I can explore this further if needed.",
        ],
        style: Style::Analytical,
        elaboration: "detailed and methodical",
    },
    Personality {
        model: "gpt-3.5-turbo",
        openers: &["Sure!", "Got it!", "Absolutely!", "Here you go:", "Happy to help!"],
        closings: &["Anything else?", "Hope that helps!", "Let me know if you need more!"],
        style: Style::Quick,
        elaboration: "concise and direct",
    },
    Personality {
        model: "claude-3-opus",
        openers: &[
            "I appreciate you asking about this.",
            "This is quite interesting.",
            "Let me think through this carefully.",
            "I'd be delighted to explore this with you.",
            "What a thoughtful question.",
        ],
        closings: &[
            "I hope this provides useful perspective.",
            "Please let me know if you'd like me to expand on any aspect.",
            "I'm here if you have follow-up questions.",
        ],
        style: Style::Thorough,
        elaboration: "comprehensive and nuanced",
    },
    Personality {
        model: "claude-3-sonnet",
        openers: &[
            "Here's what I think:",
            "Let me explain:",
            "To answer your question:",
            "I can help with that.",
            "Good question -",
        ],
        closings: &[
            "Does this address your question?",
            "Let me know if you need clarification.",
            "Feel free to dig deeper into this.",
        ],
        style: Style::Balanced,
        elaboration: "clear and organized",
    },
    Personality {
        model: "claude-3-haiku",
        openers: &["Quick answer:", "Simply:", "In brief:", "Here it is:", "Short version:"],
        closings: &["Need more details?", "Want me to expand?", "That's the gist!"],
        style: Style::Concise,
        elaboration: "efficient and to-the-point",
    },
    Personality {
        model: "gemini-pro",
        openers: &[
            "Based on available information:",
            "Here's what I can provide:",
            "Let me help you understand:",
            "From my knowledge base:",
            "I can explain this:",
        ],
        closings: &[
            "I hope this information is helpful.",
            "Let me know if you need additional context.",
            "Feel free to ask for more details.",
        ],
        style: Style::Informative,
        elaboration: "structured and factual",
    },
    Personality {
        model: "mistral-large",
        openers: &[
            "Technically speaking,",
            "From a technical standpoint:",
            "Let me provide a precise answer:",
            "To be specific:",
            "Here's the technical breakdown:",
        ],
        closings: &[
            "This should give you the technical clarity you need.",
            "Let me know if you want more technical depth.",
            "I can provide more specifics if needed.",
        ],
        style: Style::Technical,
        elaboration: "precise and detailed",
    },
    Personality {
        model: "llama-3-70b",
        openers: &[
            "Hey!",
            "Great question!",
            "Oh, I love talking about this!",
            "That's interesting!",
            "Let me share my thoughts:",
        ],
        closings: &[
            "What do you think?",
            "Does that make sense?",
            "Let me know if you want to chat more about this!",
        ],
        style: Style::Conversational,
        elaboration: "friendly and engaging",
    },
];

fn lookup(model: &str) -> Option<&'static Personality> {
    PERSONALITIES.iter().find(|p| p.model == model)
}

/// Preset for `model`, or the [`DEFAULT_MODEL`] preset for anything unrecognized.
pub fn personality_for(model: &str) -> &'static Personality {
    lookup(model)
        .or_else(|| lookup(DEFAULT_MODEL))
        .unwrap_or(&PERSONALITIES[0])
}
