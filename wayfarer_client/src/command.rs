//! Command module
//!
//! Describes possible commands used during play.
use variantly::Variantly;

use crate::location::Direction;
use crate::panel::PanelPreset;

/// Commands that can be executed by the player.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum Command {
    /// Apply a panel action to a named entry. `panel` is the panel the verb belongs to,
    /// or `None` for `use`, which means whatever the active panel offers.
    Act {
        panel: Option<PanelPreset>,
        target: String,
    },
    Examine(String),
    Exits,
    Help,
    Look,
    #[variantly(rename = "move_to")]
    Move(Direction),
    Quit,
    Reload,
    SelectPanel(PanelPreset),
    Status,
    Unknown,
}

/// Parses an input string and returns a corresponding `Command` if recognized.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if let [word] = words.as_slice()
        && let Some(direction) = Direction::parse(word)
    {
        return Command::Move(direction);
    }
    match words.as_slice() {
        ["go" | "move" | "walk", dir] => Direction::parse(dir).map_or(Command::Unknown, Command::Move),
        ["items" | "local"] => Command::SelectPanel(PanelPreset::LocalItems),
        ["inventory" | "inv" | "i"] => Command::SelectPanel(PanelPreset::Inventory),
        ["combat" | "enemies"] => Command::SelectPanel(PanelPreset::Combat),
        ["take" | "get", rest @ ..] if !rest.is_empty() => act(Some(PanelPreset::LocalItems), rest),
        ["drop", rest @ ..] if !rest.is_empty() => act(Some(PanelPreset::Inventory), rest),
        ["attack" | "fight" | "hit", rest @ ..] if !rest.is_empty() => act(Some(PanelPreset::Combat), rest),
        ["use", rest @ ..] if !rest.is_empty() => act(None, rest),
        ["examine" | "x", rest @ ..] if !rest.is_empty() => Command::Examine(rest.join(" ")),
        ["look" | "l"] => Command::Look,
        ["exits"] => Command::Exits,
        ["reload" | "refresh"] => Command::Reload,
        ["status"] => Command::Status,
        ["help" | "?"] => Command::Help,
        ["quit" | "exit"] => Command::Quit,
        _ => Command::Unknown,
    }
}

fn act(panel: Option<PanelPreset>, words: &[&str]) -> Command {
    Command::Act {
        panel,
        target: words.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_parse_alone_or_with_go() {
        assert_eq!(parse_command("n"), Command::Move(Direction::North));
        assert_eq!(parse_command("  West "), Command::Move(Direction::West));
        assert_eq!(parse_command("go south"), Command::Move(Direction::South));
        assert_eq!(parse_command("go up"), Command::Unknown);
    }

    #[test]
    fn panel_commands() {
        assert_eq!(parse_command("inv"), Command::SelectPanel(PanelPreset::Inventory));
        assert_eq!(parse_command("enemies"), Command::SelectPanel(PanelPreset::Combat));
        assert_eq!(parse_command("items"), Command::SelectPanel(PanelPreset::LocalItems));
    }

    #[test]
    fn actions_keep_multi_word_targets() {
        assert_eq!(
            parse_command("take Rusty Sword"),
            Command::Act {
                panel: Some(PanelPreset::LocalItems),
                target: "rusty sword".into()
            }
        );
        assert_eq!(
            parse_command("attack the ghoul"),
            Command::Act {
                panel: Some(PanelPreset::Combat),
                target: "the ghoul".into()
            }
        );
        assert!(parse_command("use torch").is_act());
        assert_eq!(parse_command("x old map"), Command::Examine("old map".into()));
    }

    #[test]
    fn bare_verbs_are_unknown() {
        assert_eq!(parse_command("take"), Command::Unknown);
        assert_eq!(parse_command("drop"), Command::Unknown);
        assert_eq!(parse_command(""), Command::Unknown);
    }

    #[test]
    fn system_commands() {
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("refresh"), Command::Reload);
        assert_eq!(parse_command("l"), Command::Look);
    }
}
