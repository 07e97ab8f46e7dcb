// Chat command parsing

/// Who a `remove` command targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// The caller (`remove me`)
    Me,
    /// Everyone whose display name equals this
    Named(String),
}

/// A parsed desk command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Add { metadata: String },
    Done,
    Current,
    Next,
    Remove { target: RemoveTarget },
    List,
    Dump,
    Ping,
}

impl Command {
    /// Parse `<prefix> <command> [argument]`, case-insensitive
    ///
    /// Returns `None` for text that is not addressed to the desk or names an
    /// unknown command.
    pub fn parse(prefix: &str, text: &str) -> Option<Self> {
        let rest = strip_prefix(prefix, text.trim())?;
        let (word, tail) = match rest.split_once(char::is_whitespace) {
            Some((word, tail)) => (word, tail.trim()),
            None => (rest, ""),
        };
        let word = normalize(word);

        let command = match word.as_str() {
            "help" if tail.is_empty() => Self::Help,
            "add" => Self::Add {
                metadata: tail.to_string(),
            },
            "done" | "complete" if tail.is_empty() => Self::Done,
            "current" if tail.is_empty() => Self::Current,
            "next" if tail.is_empty() => Self::Next,
            "who's" => match normalize(tail).as_str() {
                "deploying" => Self::Current,
                "next" => Self::Next,
                _ => return None,
            },
            "remove" | "kick" if !tail.is_empty() => Self::Remove {
                target: if tail.eq_ignore_ascii_case("me") {
                    RemoveTarget::Me
                } else {
                    RemoveTarget::Named(tail.to_string())
                },
            },
            "list" if tail.is_empty() => Self::List,
            "dump" | "debug" if tail.is_empty() => Self::Dump,
            "ping" if tail.is_empty() => Self::Ping,
            _ => return None,
        };
        Some(command)
    }
}

fn strip_prefix<'a>(prefix: &str, text: &'a str) -> Option<&'a str> {
    let (head, rest) = text.split_once(char::is_whitespace)?;
    head.eq_ignore_ascii_case(prefix).then(|| rest.trim_start())
}

// Chat clients like to turn ' into ’
fn normalize(word: &str) -> String {
    word.to_lowercase().replace('\u{2019}', "'")
}
