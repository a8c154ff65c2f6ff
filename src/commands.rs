//! Command registry for the Pokedex REPL.
//!
//! Every command the REPL understands, with the name it is typed as and the
//! description shown by `help`.

/// Commands the user can type at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show usage for every command
    Help,
    /// Leave the REPL
    Exit,
    /// Show the next page of location areas
    Map,
    /// Show the previous page of location areas
    MapBack,
    /// List the Pokemon found in a location area
    Explore,
    /// Try to catch a Pokemon
    Catch,
    /// Show details of a caught Pokemon
    Inspect,
    /// List caught Pokemon
    Pokedex,
}

impl Command {
    /// Returns every command in the order `help` lists them.
    pub fn all() -> &'static [Command] {
        &[
            Command::Help,
            Command::Exit,
            Command::Map,
            Command::MapBack,
            Command::Explore,
            Command::Catch,
            Command::Inspect,
            Command::Pokedex,
        ]
    }

    /// The word typed to run the command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Exit => "exit",
            Command::Map => "map",
            Command::MapBack => "mapb",
            Command::Explore => "explore",
            Command::Catch => "catch",
            Command::Inspect => "inspect",
            Command::Pokedex => "pokedex",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Help => "Displays a help message.",
            Command::Exit => "Exits the Pokedex.",
            Command::Map => "Displays the next 20 location areas.",
            Command::MapBack => "Displays the previous 20 location areas.",
            Command::Explore => "Lists the Pokemon found in a location area.",
            Command::Catch => "Throws a Pokeball at a Pokemon.",
            Command::Inspect => "Shows details of a caught Pokemon.",
            Command::Pokedex => "Lists every Pokemon you have caught.",
        }
    }

    /// Name of the required argument, for commands that take one.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            Command::Explore => Some("area"),
            Command::Catch | Command::Inspect => Some("pokemon"),
            _ => None,
        }
    }

    /// Parses a typed command word.
    ///
    /// Matching is case-insensitive. Returns `None` for unknown commands.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Command> {
        let s = s.trim().to_lowercase();
        Command::all().iter().copied().find(|c| c.name() == s)
    }
}
