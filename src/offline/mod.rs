//! Rule-based reply generator used when no upstream provider is configured.
//!
//! A reply is `"{opener} {body} {closing}"`: opener and closing are sampled
//! from the model's personality, and the body comes from the first intent rule
//! that matches the query. Sampling is generic over [`rand::Rng`] so callers
//! can pass a seeded generator.

pub mod intent;
pub mod personality;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::web::models::Message;
use intent::{classify, clarifying_body, Intent, Turn, CLARIFYING_VARIANTS};
use personality::personality_for;

/// Replies to `query` using the thread-local random generator.
pub fn respond(model: &str, query: &str, prior: &[Message]) -> String {
    respond_with(&mut rand::thread_rng(), model, query, prior)
}

/// Replies to `query`, drawing every random choice from `rng`.
pub fn respond_with<R: Rng + ?Sized>(
    rng: &mut R,
    model: &str,
    query: &str,
    prior: &[Message],
) -> String {
    let personality = personality_for(model);
    let opener = personality.openers.choose(rng).copied().unwrap_or_default();
    let closing = personality.closings.choose(rng).copied().unwrap_or_default();

    let turn = Turn::new(model, query, prior);
    let body = match classify(&turn) {
        Some(intent) => intent.body(personality.style, &turn),
        None => {
            let variant = rng.gen_range(0..CLARIFYING_VARIANTS);
            clarifying_body(variant, personality.style, query)
        }
    };

    format!("{opener} {body} {closing}")
}

/// The intent the responder would answer `query` with, if any.
pub fn intent_for(model: &str, query: &str, prior: &[Message]) -> Option<Intent> {
    classify(&Turn::new(model, query, prior))
}

/// Token count charged for an offline reply: `floor(1.5 * |query| + |reply|)`,
/// measured in characters.
pub fn estimate_tokens(query: &str, reply: &str) -> u64 {
    let query_len = query.chars().count() as u64;
    let reply_len = reply.chars().count() as u64;
    query_len * 3 / 2 + reply_len
}
