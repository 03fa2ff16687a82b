use super::personality::Style;
use crate::web::models::Message;

/// How many earlier messages feed the conversation context.
const CONTEXT_WINDOW: usize = 4;

/// What the offline responder sees of one chat turn.
#[derive(Debug)]
pub struct Turn<'a> {
    pub model: &'a str,
    pub query: &'a str,
    lower: String,
    context: String,
    is_follow_up: bool,
}

impl<'a> Turn<'a> {
    pub fn new(model: &'a str, query: &'a str, prior: &[Message]) -> Self {
        let start = prior.len().saturating_sub(CONTEXT_WINDOW);
        let context = prior[start..]
            .iter()
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            model,
            query,
            lower: query.to_lowercase(),
            context,
            is_follow_up: !prior.is_empty(),
        }
    }

    pub fn is_follow_up(&self) -> bool {
        self.is_follow_up
    }

    fn mentions(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.lower.contains(needle))
    }

    fn shorter_than(&self, limit: usize) -> bool {
        self.lower.chars().count() < limit
    }
}

/// Recognized request kinds, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Affirmation,
    Clarification,
    Request,
    Extension,
    ShortFollowUp,
    Greeting,
    Identity,
    Coding,
    Creation,
    Explanation,
    Blockchain,
    Reasoning,
    Correction,
    Walkthrough,
    ShortQuery,
}

/// Evaluation order. The first intent that matches wins.
pub const RULES: [Intent; 15] = [
    Intent::Affirmation,
    Intent::Clarification,
    Intent::Request,
    Intent::Extension,
    Intent::ShortFollowUp,
    Intent::Greeting,
    Intent::Identity,
    Intent::Coding,
    Intent::Creation,
    Intent::Explanation,
    Intent::Blockchain,
    Intent::Reasoning,
    Intent::Correction,
    Intent::Walkthrough,
    Intent::ShortQuery,
];

/// First matching intent for this turn, if any.
pub fn classify(turn: &Turn<'_>) -> Option<Intent> {
    RULES.into_iter().find(|intent| intent.matches(turn))
}

impl Intent {
    pub fn matches(self, turn: &Turn<'_>) -> bool {
        let follow_up = turn.is_follow_up;
        match self {
            Self::Affirmation => follow_up && turn.mentions(&["yes", "yeah", "sure", "ok"]),
            Self::Clarification => {
                follow_up && turn.mentions(&["what do you mean", "clarify", "explain more"])
            }
            Self::Request => {
                follow_up && turn.mentions(&["can you", "could you"]) && !turn.context.is_empty()
            }
            Self::Extension => {
                follow_up && turn.mentions(&["also", "additionally", "what about"])
            }
            Self::ShortFollowUp => follow_up && turn.shorter_than(20),
            Self::Greeting => turn.mentions(&["hello", "hi", "hey"]),
            Self::Identity => {
                turn.mentions(&["what"]) && turn.mentions(&["your name", "who are you"])
            }
            Self::Coding => turn.mentions(&["code", "program", "function"]),
            Self::Creation => turn.mentions(&["write", "create", "make"]),
            Self::Explanation => turn.mentions(&["explain", "what is", "tell me about"]),
            Self::Blockchain => turn.mentions(&["blockchain", "somnia", "crypto"]),
            Self::Reasoning => follow_up && turn.mentions(&["why", "how come"]),
            Self::Correction => follow_up && turn.mentions(&["no", "not quite", "wrong"]),
            Self::Walkthrough => follow_up && turn.mentions(&["how", "show me"]),
            Self::ShortQuery => turn.shorter_than(15),
        }
    }

    /// Reply body for this intent, without opener and closing.
    pub fn body(self, style: Style, turn: &Turn<'_>) -> String {
        use Style::*;

        let query = turn.query;
        let model = turn.model;

        match self {
            Self::Affirmation => match style {
                Conversational => "Awesome! Let me dive deeper into that for you.".into(),
                Concise => "Got it. Here's more.".into(),
                Thorough => "Excellent. I'll provide a more comprehensive explanation now.".into(),
                _ => "Perfect. Let me elaborate further.".into(),
            },
            Self::Clarification => match style {
                Thorough => "Let me break that down more clearly. What I was saying is that this concept involves multiple layers of understanding.".into(),
                Conversational => "Oh, let me put it another way! So basically, what I'm getting at is...".into(),
                Technical => "To clarify the technical aspects: the implementation requires careful consideration of the underlying architecture.".into(),
                _ => "Let me rephrase that for better clarity.".into(),
            },
            Self::Request => match style {
                Conversational => "Absolutely! Building on what we just talked about, I can definitely help with that.".into(),
                Quick => "Sure thing!".into(),
                _ => "Yes, I can assist with that based on our conversation.".into(),
            },
            Self::Extension => match style {
                Analytical => "That's a natural extension of what we discussed. Let me analyze that angle as well.".into(),
                Thorough => "I'm glad you're exploring this further. That's an important related consideration.".into(),
                _ => "Good question. Let's explore that aspect too.".into(),
            },
            Self::ShortFollowUp => match style {
                Conversational => format!("I'm picking up on \"{query}\" - are you referring to what we just discussed, or something new?"),
                Concise => format!("Need more context about \"{query}\"."),
                _ => format!("Could you elaborate on \"{query}\" in relation to our conversation?"),
            },
            Self::Greeting => match style {
                Conversational => "Welcome to Somnia GPU! I'm excited to chat with you. What's on your mind today?".into(),
                Concise => "Welcome! Ready to help.".into(),
                Thorough => "Welcome to Somnia GPU. I'm here to provide thoughtful assistance with whatever questions or tasks you bring.".into(),
                _ => "Welcome to Somnia GPU. How can I assist you?".into(),
            },
            Self::Identity => match style {
                Technical => format!("I'm {model}, an advanced language model accessible through Somnia GPU's blockchain infrastructure. My architecture enables natural language processing, code generation, and complex reasoning."),
                Conversational => format!("I'm {model}! I'm running on Somnia GPU, which lets you access AI through blockchain technology. Pretty cool, right? I can help with all sorts of things."),
                _ => format!("I'm {model}, accessible through Somnia GPU. I can help you with questions, writing, coding, and analysis."),
            },
            Self::Coding => match style {
                Technical => "I specialize in software development across multiple languages and paradigms. I can assist with algorithm design, debugging, optimization, and architectural decisions. What specific technical challenge are you facing?".into(),
                Quick => "I can code! JavaScript, Python, Solidity, you name it. What do you need?".into(),
                Thorough => "I'd be pleased to help with your coding needs. I can provide well-structured, documented code with explanations of the underlying logic and best practices. What would you like to build?".into(),
                _ => "I can help with coding across multiple languages. What are you working on?".into(),
            },
            Self::Creation => match style {
                Conversational => "I love creative projects! Whether it's code, content, or ideas, I'm all in. What would you like to create together?".into(),
                Analytical => "I can generate various types of content with appropriate structure and style. To optimize my output, please specify the format, tone, and purpose you're aiming for.".into(),
                _ => "I can help create content across different formats. What would you like me to build?".into(),
            },
            Self::Explanation => match style {
                Thorough => "I'd be delighted to provide a comprehensive explanation. To ensure I address exactly what you're looking for, could you tell me whether you want a conceptual overview, technical details, or practical applications?".into(),
                Concise => "I can explain that. Need basics or deep dive?".into(),
                _ => "I can explain that for you. What level of detail would be most helpful?".into(),
            },
            Self::Blockchain if turn.is_follow_up && turn.context.contains("blockchain") => {
                match style {
                    Conversational => "Yeah, continuing on the blockchain topic - Somnia really shines when it comes to AI integration.".into(),
                    _ => "Building on the blockchain discussion, Somnia's unique architecture is optimized specifically for AI workloads.".into(),
                }
            }
            Self::Blockchain => match style {
                Technical => "Somnia is a Layer-1 blockchain optimized for AI workloads, featuring high throughput and low latency. The architecture enables on-chain AI inference with cryptographic verification and transparent cost structures.".into(),
                Conversational => "Somnia is awesome! It's built specifically for AI, making it way cheaper and faster than traditional cloud services. Everything runs on-chain, so it's totally transparent.".into(),
                _ => "Somnia is a blockchain designed for AI applications, offering reduced costs and transparent access through smart contracts.".into(),
            },
            Self::Reasoning => match style {
                Analytical => "That's asking about causation. Based on what we've covered, there are several underlying factors at play here.".into(),
                Conversational => "Great \"why\" question! So the reason behind that is pretty interesting actually...".into(),
                _ => "Let me explain the reasoning behind that.".into(),
            },
            Self::Correction => match style {
                Thorough => "I appreciate the correction. Let me reconsider this from a different angle.".into(),
                Conversational => "Ah, my bad! Let me approach this differently then.".into(),
                _ => "I understand. Let me adjust my response based on that feedback.".into(),
            },
            Self::Walkthrough => match style {
                Technical => "From an implementation perspective, the process involves several key steps and technical considerations.".into(),
                Quick => "Here's how: step-by-step, straightforward approach.".into(),
                _ => "Let me walk you through the process.".into(),
            },
            Self::ShortQuery => match style {
                Conversational => format!("I got \"{query}\" - want to tell me more about what you're thinking?"),
                Concise => "Need more context. Can you elaborate?".into(),
                _ => format!("Could you provide more details about \"{query}\"?"),
            },
        }
    }
}

/// Number of clarifying variants used when no intent matches.
pub const CLARIFYING_VARIANTS: usize = 3;

/// One of the clarifying bodies used when no intent matches. `variant` is
/// taken modulo [`CLARIFYING_VARIANTS`].
pub fn clarifying_body(variant: usize, style: Style, query: &str) -> String {
    use Style::*;

    match (variant % CLARIFYING_VARIANTS, style) {
        (0, Thorough) => format!("Regarding your question about \"{query}\" - this touches on several interconnected concepts. The most comprehensive answer would consider multiple perspectives and their implications."),
        (0, Quick) => format!("About \"{query}\" - depends on your specific needs. More details?"),
        (0, Conversational) => format!("That's a really interesting question about \"{query}\"! There's actually a lot we could explore here."),
        (0, _) => format!("Regarding \"{query}\" - I can provide insights once I better understand your specific context."),
        (1, Analytical) => format!("Your query \"{query}\" requires context-dependent analysis. The optimal approach varies based on constraints, objectives, and environmental factors."),
        (1, Technical) => format!("From a technical perspective, \"{query}\" involves several implementation considerations and trade-offs."),
        (1, _) => format!("When considering \"{query}\", there are multiple angles to explore."),
        (_, Conversational) => format!("You're asking about \"{query}\" - I love this topic! Let's dive into it. What specifically interests you?"),
        (_, Concise) => format!("Re: \"{query}\" - need specifics to help better."),
        (_, _) => format!("To address \"{query}\" effectively, I'd like to understand your use case better."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn<'a>(query: &'a str, prior: &[Message]) -> Turn<'a> {
        Turn::new("gpt-4", query, prior)
    }

    #[test]
    fn greeting_beats_short_query() {
        assert_eq!(classify(&turn("hi", &[])), Some(Intent::Greeting));
        assert!(Intent::ShortQuery.matches(&turn("hi", &[])));
    }

    #[test]
    fn follow_up_rules_need_prior_messages() {
        assert_eq!(classify(&turn("yes please", &[])), Some(Intent::ShortQuery));
        let prior = [Message::user("tell me"), Message::assistant("sure")];
        assert_eq!(classify(&turn("yes please", &prior)), Some(Intent::Affirmation));
    }

    #[test]
    fn context_uses_last_four_messages_only() {
        let prior = [
            Message::user("blockchain one"),
            Message::assistant("a"),
            Message::user("b"),
            Message::assistant("c"),
            Message::user("d"),
        ];
        let t = turn("tell me more on the crypto space in general", &prior);
        assert_eq!(t.context, "a b c d");
        assert_eq!(
            Intent::Blockchain.body(Style::Analytical, &t),
            "Somnia is a blockchain designed for AI applications, offering reduced costs and transparent access through smart contracts."
        );
    }

    #[test]
    fn blockchain_continuation_uses_context() {
        let prior = [Message::user("is blockchain useful for ai?"), Message::assistant("yes")];
        let t = turn("and somnia in particular, please elaborate", &prior);
        assert_eq!(classify(&t), Some(Intent::Blockchain));
        assert!(Intent::Blockchain
            .body(Style::Balanced, &t)
            .starts_with("Building on the blockchain discussion"));
    }

    #[test]
    fn request_requires_context_text() {
        let prior = [Message::user("")];
        let t = turn("could you summarise the main points we had?", &prior);
        assert!(!Intent::Request.matches(&t));
    }

    #[test]
    fn identity_embeds_model_id() {
        let t = Turn::new("mistral-large", "What is your name, friend?", &[]);
        assert_eq!(classify(&t), Some(Intent::Identity));
        assert!(Intent::Identity
            .body(Style::Technical, &t)
            .starts_with("I'm mistral-large, an advanced language model"));
    }

    #[test]
    fn short_templates_echo_original_case() {
        let t = turn("GM Anon", &[]);
        assert_eq!(classify(&t), Some(Intent::ShortQuery));
        assert_eq!(
            Intent::ShortQuery.body(Style::Analytical, &t),
            "Could you provide more details about \"GM Anon\"?"
        );
    }

    #[test]
    fn long_unmatched_query_has_no_intent() {
        let t = turn("Quantum entanglement across galaxies at scale", &[]);
        assert_eq!(classify(&t), None);
    }

    #[test]
    fn clarifying_variants_wrap_around() {
        assert_eq!(
            clarifying_body(4, Style::Concise, "x"),
            clarifying_body(1, Style::Concise, "x")
        );
        assert_eq!(
            clarifying_body(2, Style::Concise, "Q"),
            "Re: \"Q\" - need specifics to help better."
        );
    }
}
