//! Message catalog and the optional emoji decoration applied on top of it

use crate::ViolationKind;

/// Display message for a violation kind
pub fn message(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::DuplicatedIt => {
            "Don't start with `it`. By convention, the function name,`it`, is part of the description"
        }
        ViolationKind::RequiredDescription => "Missing description",
        ViolationKind::InvalidStartOfDescription => {
            "Invalid start of description. Use a conjugated verb instead"
        }
        ViolationKind::NoCapitalization => "Start descriptions with a lower-case letter",
        ViolationKind::TooLong => {
            "This description is too long, making it hard to read. Rephrase it and/or use a contextual `describe` to break it down"
        }
        ViolationKind::WrongGrammar => "The first verb must be conjugated with \"it\"",
        ViolationKind::WrongGrammarAddS => {
            "Add a \"s\" at the end of this verb to conjugate it with the subject \"it\""
        }
        ViolationKind::VagueStart => {
            "Avoid vague start of descriptions (should, could, may, might). Be assertive!"
        }
        ViolationKind::UseOfIfInsteadOfWhen => {
            "For consistency, use `when` instead of `if` to start the context part of the description"
        }
        ViolationKind::GenericError => "The description does not follow the naming convention",
    }
}

fn emoji(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::RequiredDescription => "📝",
        ViolationKind::TooLong => "📏",
        ViolationKind::NoCapitalization => "🔡",
        ViolationKind::WrongGrammar | ViolationKind::WrongGrammarAddS => "📖",
        ViolationKind::VagueStart => "💪",
        ViolationKind::InvalidStartOfDescription => "🚫",
        ViolationKind::DuplicatedIt => "👯",
        ViolationKind::GenericError => "⚠️",
        ViolationKind::UseOfIfInsteadOfWhen => "🔀",
    }
}

/// Prefix a message with the emoji of its kind
pub fn decorate(kind: ViolationKind, message: &str) -> String {
    format!("{} {}", emoji(kind), message)
}

/// Message as shown to users, decorated when `emoji` is set
pub fn display_message(kind: ViolationKind, emoji: bool) -> String {
    if emoji {
        decorate(kind, message(kind))
    } else {
        message(kind).to_string()
    }
}
