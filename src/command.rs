//! Chat command parsing.
//!
//! Guesses arrive as `/wordle <word>`. The short `/w <word>` form is always
//! accepted in private conversations and, when shorthand is enabled, in group
//! conversations too. A `@botname` suffix on the command is ignored.

/// Long command name.
pub const WORDLE_COMMAND: &str = "/wordle";

/// Short command name.
pub const SHORTHAND_COMMAND: &str = "/w";

/// Extract the guessed word from a chat message.
///
/// Returns the lowercased argument, or `None` when the message is not a guess
/// command this conversation accepts.
pub fn parse_command(text: &str, is_private: bool, shorthand: bool) -> Option<String> {
    let text = text.trim_start();
    let (command, argument) = text.split_once(char::is_whitespace)?;
    let command = command.split_once('@').map_or(command, |(name, _)| name);

    let accepted = match command {
        WORDLE_COMMAND => true,
        SHORTHAND_COMMAND => is_private || shorthand,
        _ => false,
    };
    if !accepted {
        return None;
    }

    let argument = argument.trim();
    if argument.is_empty() {
        return None;
    }
    Some(argument.to_lowercase())
}
